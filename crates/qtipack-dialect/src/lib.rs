//! qtipack-dialect: QTI 2.1 and QTI 3.0 emitters.
//!
//! Renders a [`qtipack_core::engine::CompiledDocument`] into the text blobs
//! of an assessment package. Both dialects share one renderer and differ only
//! in vocabulary, so another dialect is one more [`Dialect`] implementation.

pub mod dialect;
pub mod manifest;
pub mod package;
pub mod qti21;
pub mod qti30;
pub mod render;
pub mod xml;

pub use dialect::{Dialect, DialectKind};
pub use package::{RenderError, RenderedFile, RenderedPackage};
pub use qti21::Qti21;
pub use qti30::Qti30;
