//! qtipack-core: Document model, scoring compiler, and test structure.
//!
//! This crate turns a parsed quiz [`model::Document`] into dialect-agnostic
//! item records and a test structure that the dialect emitters render.

pub mod engine;
pub mod error;
pub mod export;
pub mod expr;
pub mod ids;
pub mod interaction;
pub mod item;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod structure;

#[cfg(test)]
pub(crate) mod fixtures;
