//! Compiler error and warning types.
//!
//! Fatal problems are [`CompileError`]s: compilation of the whole document
//! stops and the caller gets the offending identifier or entity position.
//! Recoverable anomalies are [`Diagnostic`]s returned next to the output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::QuestionKind;

/// Fatal compilation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// A group end marker with no open group.
    #[error("entity {position}: group end without a matching group start")]
    UnmatchedGroupEnd { position: usize },

    /// A group start marker while another group is still open.
    #[error("entity {position}: group '{group_id}' starts inside open group '{open_id}'")]
    NestedGroup {
        position: usize,
        group_id: String,
        open_id: String,
    },

    /// The entity sequence ended inside a group.
    #[error("entity {position}: group '{group_id}' is never closed")]
    UnclosedGroup { position: usize, group_id: String },

    /// A group whose pick count is zero or exceeds its member count.
    #[error("group '{group_id}': pick {pick} is invalid for {members} member item(s)")]
    InvalidPick {
        group_id: String,
        pick: u32,
        members: usize,
    },

    /// Two entities map to the same item identifier.
    #[error("duplicate item identifier: {identifier}")]
    DuplicateIdentifier { identifier: String },

    /// A question kind that requires choices has none.
    #[error("question '{id}' ({kind}) has no choices")]
    MissingChoices { id: String, kind: QuestionKind },

    /// A question kind that requires a correct choice has none.
    #[error("question '{id}' ({kind}) has no correct choice")]
    NoCorrectChoice { id: String, kind: QuestionKind },

    /// A numerical question without a target value.
    #[error("numerical question '{id}' has no answer")]
    MissingNumericalAnswer { id: String },

    /// A numerical answer whose bounds are not finite or not ordered.
    #[error("numerical question '{id}': invalid range [{min}, {max}]")]
    InvalidNumericalRange { id: String, min: f64, max: f64 },

    /// A gap-match question without gaps, options, or assignments.
    #[error("gap-match question '{id}' has no {what}")]
    MissingGapMatch { id: String, what: &'static str },

    /// An assignment references an option that is not declared.
    #[error("gap-match question '{id}' assigns unknown option '{option}'")]
    UnknownGapOption { id: String, option: String },

    /// An assignment references a gap that is not declared.
    #[error("gap-match question '{id}' assigns to unknown gap '{gap}'")]
    UnknownGap { id: String, gap: String },

    /// Points must be finite and non-negative.
    #[error("question '{id}' has invalid point value {points}")]
    InvalidPoints { id: String, points: f64 },

    /// An identifier that cannot appear in a QTI identifier or file name.
    #[error("{entity} has invalid identifier '{id}' (allowed: ASCII letters, digits, '_', '-', '.')")]
    InvalidIdentifier { entity: String, id: String },

    /// An image whose archive path is absolute or leaves the package root.
    #[error("image '{name}': archive path '{path}' must be relative and inside the package")]
    InvalidArchivePath { name: String, path: String },

    /// A compile worker panicked or was cancelled.
    #[error("compile worker failed for entity {position}: {message}")]
    WorkerFailed { position: usize, message: String },
}

impl CompileError {
    /// Returns `true` for errors about the shape of the entity sequence
    /// rather than the content of one question.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            CompileError::UnmatchedGroupEnd { .. }
                | CompileError::NestedGroup { .. }
                | CompileError::UnclosedGroup { .. }
                | CompileError::InvalidPick { .. }
                | CompileError::DuplicateIdentifier { .. }
        )
    }
}

/// A recoverable data-integrity warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Identifier of the offending entity.
    pub entity_id: String,
    /// Warning message.
    pub message: String,
}

impl Diagnostic {
    pub fn new(entity_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.entity_id, self.message)
    }
}
