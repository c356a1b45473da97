//! Document model consumed by the compiler.
//!
//! A [`Document`] is the already-parsed form of a quiz: an ordered sequence of
//! entities plus a side table of embedded images. Question, choice, and
//! feedback bodies arrive here already rendered to markup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A complete quiz document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable document identifier, used for the test and manifest identifiers.
    pub id: String,
    /// Quiz title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
    /// Entities in delivery order.
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// Embedded images keyed by reference name.
    #[serde(default)]
    pub images: BTreeMap<String, Image>,
}

impl Document {
    /// Iterate over the questions of the document in order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Question(q) => Some(q),
            _ => None,
        })
    }
}

/// One entry of the ordered entity sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Entity {
    Question(Question),
    GroupStart(Group),
    GroupEnd,
    TextRegion(TextRegion),
}

impl Entity {
    /// Short human label used in structural error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Entity::Question(_) => "question",
            Entity::GroupStart(_) => "group start",
            Entity::GroupEnd => "group end",
            Entity::TextRegion(_) => "text region",
        }
    }
}

/// A scorable (or manually graded) question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique among the document's questions.
    pub id: String,
    /// Item title.
    pub title: String,
    /// Question type.
    pub kind: QuestionKind,
    /// Rendered question text.
    pub prompt: String,
    /// Points awarded for a fully correct response.
    pub points: f64,
    /// Question-level feedback bodies.
    #[serde(default)]
    pub feedback: Feedback,
    /// Choices (or accepted answers for short-answer questions).
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Target for numerical questions.
    #[serde(default)]
    pub numerical: Option<NumericalAnswer>,
    /// Gaps, options, and assignments for gap-match questions.
    #[serde(default)]
    pub gap_match: Option<GapMatch>,
}

impl Question {
    /// Choices flagged correct, in document order.
    pub fn correct_choices(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter().filter(|c| c.correct)
    }
}

/// Question-level feedback. Every body is already rendered markup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub general: Option<String>,
    #[serde(default)]
    pub correct: Option<String>,
    #[serde(default)]
    pub incorrect: Option<String>,
}

/// A choice within a question. The identifier is scoped to its question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub body: String,
    #[serde(default)]
    pub correct: bool,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// The numerical target of a numerical question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericalAnswer {
    /// `target ± tolerance`; an exact answer has a tolerance of zero.
    Tolerance { target: f64, tolerance: f64 },
    /// Explicit inclusive bounds.
    Range { min: f64, max: f64 },
}

impl NumericalAnswer {
    /// Inclusive `(min, max)` bounds of the accepted range.
    ///
    /// `target ± tolerance` is rounded to the decimal places written in the
    /// two inputs, so `0.7 ± 0.1` ends at `0.8` and not at the float sum.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            NumericalAnswer::Tolerance { target, tolerance } => {
                let places = decimal_places(target).max(decimal_places(tolerance));
                (
                    round_to(target - tolerance, places),
                    round_to(target + tolerance, places),
                )
            }
            NumericalAnswer::Range { min, max } => (min, max),
        }
    }

    /// The canonical correct value, when one exists.
    pub fn target(&self) -> Option<f64> {
        match *self {
            NumericalAnswer::Tolerance { target, .. } => Some(target),
            NumericalAnswer::Range { .. } => None,
        }
    }
}

/// Digits after the point in the shortest text form of `value`.
fn decimal_places(value: f64) -> usize {
    format!("{value}")
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len())
}

fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.places$}").parse().unwrap_or(value)
}

/// Drag-to-gap data for a gap-match question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GapMatch {
    /// Gap identifiers, as written in `{GAP}` placeholders of the prompt.
    pub gaps: Vec<String>,
    /// Draggable text options.
    pub options: Vec<GapOption>,
    /// Which option belongs in which gap.
    pub assignments: Vec<GapAssignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapAssignment {
    pub option: String,
    pub gap: String,
}

/// A randomized-selection group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub title: String,
    /// How many member items are delivered.
    pub pick: u32,
}

/// A non-scored informational block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRegion {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub body: String,
}

/// An embedded image, passed through to the packager untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Reference name used by the document.
    pub name: String,
    /// Path of the file inside the package.
    pub archive_path: String,
    /// Raw file content.
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// Supported question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    TrueFalse,
    MultipleChoice,
    MultipleAnswers,
    ShortAnswer,
    Numerical,
    Essay,
    FileUpload,
    GapMatch,
}

impl QuestionKind {
    /// Whether responses to this kind are scored automatically.
    pub fn is_auto_scored(self) -> bool {
        !matches!(self, QuestionKind::Essay | QuestionKind::FileUpload)
    }

    /// Whether this kind is answered by selecting or typing one of its choices.
    pub fn uses_choices(self) -> bool {
        matches!(
            self,
            QuestionKind::TrueFalse
                | QuestionKind::MultipleChoice
                | QuestionKind::MultipleAnswers
                | QuestionKind::ShortAnswer
        )
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuestionKind::TrueFalse => "true-false",
            QuestionKind::MultipleChoice => "multiple-choice",
            QuestionKind::MultipleAnswers => "multiple-answers",
            QuestionKind::ShortAnswer => "short-answer",
            QuestionKind::Numerical => "numerical",
            QuestionKind::Essay => "essay",
            QuestionKind::FileUpload => "file-upload",
            QuestionKind::GapMatch => "gap-match",
        };
        f.write_str(s)
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "true-false" | "tf" => Ok(QuestionKind::TrueFalse),
            "multiple-choice" | "mc" => Ok(QuestionKind::MultipleChoice),
            "multiple-answers" | "multiple-answer" => Ok(QuestionKind::MultipleAnswers),
            "short-answer" => Ok(QuestionKind::ShortAnswer),
            "numerical" | "numeric" => Ok(QuestionKind::Numerical),
            "essay" => Ok(QuestionKind::Essay),
            "file-upload" | "upload" => Ok(QuestionKind::FileUpload),
            "gap-match" | "matching-with-gaps" => Ok(QuestionKind::GapMatch),
            other => Err(format!("unknown question kind: {other}")),
        }
    }
}
