//! Item assembler.
//!
//! Joins the scoring compiler and the interaction builder into one immutable
//! [`ItemRecord`] per question, plus unscored records for text regions.

use std::collections::BTreeSet;

use crate::engine::CompileOptions;
use crate::error::{CompileError, Diagnostic};
use crate::expr::{OutcomeDeclaration, ResponseDeclaration, ResponseProcessing};
use crate::ids::{self, FeedbackRole};
use crate::interaction::{self, BodyBlock, InteractionKind, ItemBody};
use crate::model::{Question, QuestionKind, TextRegion};
use crate::scoring;

/// What an item was compiled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Question(QuestionKind),
    Text,
}

/// A feedback body shown when its identifier is in `FEEDBACK`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackBlock {
    pub identifier: String,
    pub body: String,
}

/// One compiled item, ready for any dialect.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub identifier: String,
    pub title: String,
    /// Identifier of the source entity in the document.
    pub source_id: String,
    pub kind: ItemKind,
    pub points: f64,
    pub response: Option<ResponseDeclaration>,
    pub outcomes: Vec<OutcomeDeclaration>,
    pub body: ItemBody,
    pub processing: ResponseProcessing,
    pub feedback: Vec<FeedbackBlock>,
    pub interactions: Vec<InteractionKind>,
}

impl ItemRecord {
    pub fn file_name(&self) -> String {
        ids::file_name(&self.identifier)
    }

    pub fn is_text(&self) -> bool {
        self.kind == ItemKind::Text
    }

    /// Feedback markers the scoring tree can assign but no block displays.
    pub fn dangling_markers(&self) -> BTreeSet<String> {
        let shown: BTreeSet<&str> = self.feedback.iter().map(|f| f.identifier.as_str()).collect();
        self.processing
            .feedback_markers()
            .into_iter()
            .filter(|m| !shown.contains(m.as_str()))
            .collect()
    }
}

/// An assembled item and the warnings raised while building it.
#[derive(Debug, Clone)]
pub struct Assembled {
    pub record: ItemRecord,
    pub warnings: Vec<Diagnostic>,
}

/// Assemble the item of one question.
pub fn assemble(question: &Question, options: &CompileOptions) -> Result<Assembled, CompileError> {
    let ids = &options.ids;
    let scoring = scoring::compile(question, ids)?;
    let built = interaction::build(question, ids, options.shuffle_choices);

    let mut feedback = Vec::new();
    let roles = [
        (FeedbackRole::General, &question.feedback.general),
        (FeedbackRole::Correct, &question.feedback.correct),
        (FeedbackRole::Incorrect, &question.feedback.incorrect),
    ];
    for (role, body) in roles {
        if let Some(body) = body {
            feedback.push(FeedbackBlock {
                identifier: ids.feedback(question, role),
                body: body.clone(),
            });
        }
    }
    if question.kind.uses_choices() {
        for choice in &question.choices {
            if let Some(body) = &choice.feedback {
                feedback.push(FeedbackBlock {
                    identifier: ids.choice_feedback(question, choice),
                    body: body.clone(),
                });
            }
        }
    }

    let mut warnings = scoring.warnings;
    warnings.extend(built.warnings);

    let record = ItemRecord {
        identifier: ids.question(question),
        title: question.title.clone(),
        source_id: question.id.clone(),
        kind: ItemKind::Question(question.kind),
        points: question.points,
        response: Some(scoring.response),
        outcomes: scoring.outcomes,
        body: built.body,
        processing: scoring.processing,
        feedback,
        interactions: built.kinds,
    };
    tracing::debug!(
        "assembled {} ({}, {} feedback block(s))",
        record.identifier,
        question.kind,
        record.feedback.len()
    );
    Ok(Assembled { record, warnings })
}

/// Assemble the unscored item of a text region.
pub fn assemble_text(region: &TextRegion, options: &CompileOptions) -> ItemRecord {
    let mut html = String::from("<div class=\"text-region\">");
    if let Some(title) = &region.title {
        html.push_str(&format!("<h3>{}</h3>", escape(title)));
    }
    html.push_str(&region.body);
    html.push_str("</div>");

    ItemRecord {
        identifier: options.ids.text(region),
        title: region
            .title
            .clone()
            .unwrap_or_else(|| format!("Text {}", region.id)),
        source_id: region.id.clone(),
        kind: ItemKind::Text,
        points: 0.0,
        response: None,
        outcomes: Vec::new(),
        body: ItemBody {
            blocks: vec![BodyBlock::Markup(html)],
        },
        processing: ResponseProcessing::default(),
        feedback: Vec::new(),
        interactions: Vec::new(),
    }
}

/// Escape text for use in markup content or attribute values.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
