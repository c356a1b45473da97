//! Identifier scheme for items, choices, feedback markers, and files.

use crate::model::{Choice, Group, Question, TextRegion};

/// Derives every output identifier from the document identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdScheme {
    prefix: String,
}

impl Default for IdScheme {
    fn default() -> Self {
        Self::new("qtipack")
    }
}

/// Role of a question-level feedback body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackRole {
    General,
    Correct,
    Incorrect,
}

impl FeedbackRole {
    fn suffix(self) -> &'static str {
        match self {
            FeedbackRole::General => "general_fb",
            FeedbackRole::Correct => "correct_fb",
            FeedbackRole::Incorrect => "incorrect_fb",
        }
    }
}

impl IdScheme {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn question(&self, question: &Question) -> String {
        format!("{}_question_{}", self.prefix, question.id)
    }

    pub fn text(&self, region: &TextRegion) -> String {
        format!("{}_text_{}", self.prefix, region.id)
    }

    pub fn group(&self, group: &Group) -> String {
        format!("{}_group_{}", self.prefix, group.id)
    }

    pub fn choice(&self, question: &Question, choice: &Choice) -> String {
        format!("{}_choice_{}_{}", self.prefix, question.id, choice.id)
    }

    pub fn choice_feedback(&self, question: &Question, choice: &Choice) -> String {
        format!("{}_fb", self.choice(question, choice))
    }

    pub fn feedback(&self, question: &Question, role: FeedbackRole) -> String {
        format!("{}_{}", self.question(question), role.suffix())
    }

    pub fn test(&self, document_id: &str) -> String {
        format!("{}_test_{}", self.prefix, document_id)
    }

    pub fn manifest(&self, document_id: &str) -> String {
        format!("{}_manifest_{}", self.prefix, document_id)
    }
}

/// File name of an item or test document.
pub fn file_name(identifier: &str) -> String {
    format!("{identifier}.xml")
}

/// Whether `id` can be embedded in a QTI identifier and a file name:
/// ASCII letters, digits, `_`, `-`, and `.`, never `..`.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && !id.contains("..")
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Identifier prefixes must also start like an XML name.
pub fn is_valid_prefix(prefix: &str) -> bool {
    is_valid_id(prefix)
        && prefix
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

/// Whether `path` is a relative `/`-separated path that stays inside the
/// package root.
pub fn is_valid_archive_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .split('/')
            .all(|segment| segment != "." && is_valid_id(segment))
}
