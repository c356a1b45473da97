//! Interaction builder: the presentational half of an item.
//!
//! Produces an [`ItemBody`] of markup blocks and interactions for a question.
//! Gap placeholders (`{GAP_ID}`) in gap-match prompts are split into
//! structured fragments here so dialects never scan markup.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::Diagnostic;
use crate::expr::RESPONSE;
use crate::ids::IdScheme;
use crate::model::{GapMatch, Question, QuestionKind};

/// Expected length of a short-answer text entry.
pub const SHORT_ANSWER_LENGTH: u32 = 20;
/// Expected length of a numerical text entry.
pub const NUMERICAL_LENGTH: u32 = 10;
/// Expected lines of an essay box.
pub const ESSAY_LINES: u32 = 10;

/// One selectable choice of a choice interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleChoice {
    pub identifier: String,
    pub body: String,
}

/// One draggable option of a gap-match interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct GapText {
    pub identifier: String,
    pub text: String,
    pub match_max: u32,
}

/// A piece of gap-match content: markup or a gap marker.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyFragment {
    Markup(String),
    Gap(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Choice {
        response: String,
        prompt: String,
        shuffle: bool,
        max_choices: usize,
        choices: Vec<SimpleChoice>,
    },
    TextEntry {
        response: String,
        expected_length: u32,
    },
    ExtendedText {
        response: String,
        prompt: String,
        expected_lines: u32,
    },
    GapMatch {
        response: String,
        shuffle: bool,
        gap_texts: Vec<GapText>,
        content: Vec<BodyFragment>,
    },
}

impl Interaction {
    pub fn kind(&self) -> InteractionKind {
        match self {
            Interaction::Choice { .. } => InteractionKind::Choice,
            Interaction::TextEntry { .. } => InteractionKind::TextEntry,
            Interaction::ExtendedText { .. } => InteractionKind::ExtendedText,
            Interaction::GapMatch { .. } => InteractionKind::GapMatch,
        }
    }
}

/// Interaction kinds recorded for manifest metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InteractionKind {
    Choice,
    TextEntry,
    ExtendedText,
    Upload,
    GapMatch,
}

impl InteractionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionKind::Choice => "choice",
            InteractionKind::TextEntry => "text-entry",
            InteractionKind::ExtendedText => "extended-text",
            InteractionKind::Upload => "upload",
            InteractionKind::GapMatch => "gap-match",
        }
    }
}

/// A block of the item body.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyBlock {
    Markup(String),
    Interaction(Interaction),
}

/// Ordered content of an item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemBody {
    pub blocks: Vec<BodyBlock>,
}

impl ItemBody {
    pub fn interactions(&self) -> impl Iterator<Item = &Interaction> {
        self.blocks.iter().filter_map(|b| match b {
            BodyBlock::Interaction(i) => Some(i),
            BodyBlock::Markup(_) => None,
        })
    }
}

/// Result of building the presentation of a question.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltBody {
    pub body: ItemBody,
    pub kinds: Vec<InteractionKind>,
    pub warnings: Vec<Diagnostic>,
}

/// Build the item body of a question.
///
/// Data validity (choices present, gap references) is checked by the
/// scoring compiler, which runs first.
pub fn build(question: &Question, ids: &IdScheme, shuffle: bool) -> BuiltBody {
    let mut warnings = Vec::new();
    let markup = |s: &str| BodyBlock::Markup(s.to_string());

    let blocks = match question.kind {
        QuestionKind::TrueFalse | QuestionKind::MultipleChoice | QuestionKind::MultipleAnswers => {
            let max_choices = if question.kind == QuestionKind::MultipleAnswers {
                question.correct_choices().count()
            } else {
                1
            };
            vec![BodyBlock::Interaction(Interaction::Choice {
                response: RESPONSE.into(),
                prompt: question.prompt.clone(),
                shuffle,
                max_choices,
                choices: question
                    .choices
                    .iter()
                    .map(|c| SimpleChoice {
                        identifier: ids.choice(question, c),
                        body: c.body.clone(),
                    })
                    .collect(),
            })]
        }
        QuestionKind::ShortAnswer | QuestionKind::Numerical => {
            let expected_length = if question.kind == QuestionKind::ShortAnswer {
                SHORT_ANSWER_LENGTH
            } else {
                NUMERICAL_LENGTH
            };
            vec![
                markup(&question.prompt),
                BodyBlock::Interaction(Interaction::TextEntry {
                    response: RESPONSE.into(),
                    expected_length,
                }),
            ]
        }
        QuestionKind::Essay => vec![BodyBlock::Interaction(Interaction::ExtendedText {
            response: RESPONSE.into(),
            prompt: question.prompt.clone(),
            expected_lines: ESSAY_LINES,
        })],
        QuestionKind::FileUpload => vec![markup(&question.prompt)],
        QuestionKind::GapMatch => {
            let empty = GapMatch::default();
            let data = question.gap_match.as_ref().unwrap_or(&empty);
            let content = split_gaps(&question.prompt, &data.gaps);
            for gap in &data.gaps {
                if !content.contains(&BodyFragment::Gap(gap.clone())) {
                    warnings.push(Diagnostic::new(
                        &question.id,
                        format!("gap '{gap}' does not appear in the prompt"),
                    ));
                }
            }
            vec![BodyBlock::Interaction(Interaction::GapMatch {
                response: RESPONSE.into(),
                shuffle,
                gap_texts: data
                    .options
                    .iter()
                    .map(|o| GapText {
                        identifier: o.id.clone(),
                        text: o.text.clone(),
                        match_max: 1,
                    })
                    .collect(),
                content,
            })]
        }
    };

    let mut kinds: Vec<InteractionKind> = blocks
        .iter()
        .filter_map(|b| match b {
            BodyBlock::Interaction(i) => Some(i.kind()),
            BodyBlock::Markup(_) => None,
        })
        .collect();
    if question.kind == QuestionKind::FileUpload {
        kinds.push(InteractionKind::Upload);
    }

    BuiltBody {
        body: ItemBody { blocks },
        kinds,
        warnings,
    }
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("valid gap placeholder pattern"))
}

/// Split markup at `{GAP}` placeholders naming a declared gap.
///
/// Placeholders for undeclared gaps stay in the markup verbatim.
pub fn split_gaps(markup: &str, gaps: &[String]) -> Vec<BodyFragment> {
    let mut fragments = Vec::new();
    let mut last = 0;
    for caps in placeholder().captures_iter(markup) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if !gaps.iter().any(|g| g == name.as_str()) {
            continue;
        }
        if whole.start() > last {
            fragments.push(BodyFragment::Markup(markup[last..whole.start()].to_string()));
        }
        fragments.push(BodyFragment::Gap(name.as_str().to_string()));
        last = whole.end();
    }
    if last < markup.len() {
        fragments.push(BodyFragment::Markup(markup[last..].to_string()));
    }
    fragments
}
