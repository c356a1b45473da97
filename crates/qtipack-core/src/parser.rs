//! TOML quiz document loader.
//!
//! Loads a [`Document`] from a TOML file, resolves embedded images relative
//! to the file, and validates the result for common authoring mistakes.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

use crate::error::Diagnostic;
use crate::model::{
    Choice, Document, Entity, Feedback, GapAssignment, GapMatch, GapOption, Group, Image,
    NumericalAnswer, Question, QuestionKind, TextRegion,
};

/// Intermediate TOML structure for quiz files.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    entities: Vec<TomlEntity>,
    #[serde(default)]
    images: Vec<TomlImage>,
}

#[derive(Debug, Deserialize)]
struct TomlQuizHeader {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum TomlEntity {
    Question(TomlQuestion),
    GroupStart(TomlGroup),
    GroupEnd,
    Text(TomlText),
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(default)]
    title: Option<String>,
    kind: String,
    prompt: String,
    #[serde(default = "default_points")]
    points: f64,
    #[serde(default)]
    feedback: Feedback,
    #[serde(default)]
    choices: Vec<TomlChoice>,
    #[serde(default)]
    numerical: Option<NumericalAnswer>,
    #[serde(default)]
    gap_match: Option<TomlGapMatch>,
}

fn default_points() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
struct TomlChoice {
    #[serde(default)]
    id: Option<String>,
    body: String,
    #[serde(default)]
    correct: Option<bool>,
    #[serde(default)]
    feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlGapMatch {
    gaps: Vec<String>,
    options: Vec<TomlGapOption>,
    #[serde(default)]
    assignments: Vec<TomlGapAssignment>,
}

#[derive(Debug, Deserialize)]
struct TomlGapOption {
    id: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct TomlGapAssignment {
    option: String,
    gap: String,
}

#[derive(Debug, Deserialize)]
struct TomlGroup {
    id: String,
    #[serde(default)]
    title: Option<String>,
    pick: u32,
}

#[derive(Debug, Deserialize)]
struct TomlText {
    id: String,
    #[serde(default)]
    title: Option<String>,
    body: String,
}

#[derive(Debug, Deserialize)]
struct TomlImage {
    name: String,
    path: String,
    #[serde(default)]
    archive_path: Option<String>,
}

/// Parse a quiz file into a `Document`.
pub fn parse_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_document_str(&content, path)
}

/// Parse a TOML string into a `Document`. Images are read relative to
/// `source_path`'s directory.
pub fn parse_document_str(content: &str, source_path: &Path) -> Result<Document> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let entities = parsed
        .entities
        .into_iter()
        .map(convert_entity)
        .collect::<Result<Vec<_>>>()?;

    let base = source_path.parent().unwrap_or_else(|| Path::new("."));
    let mut images = BTreeMap::new();
    for image in parsed.images {
        let file = base.join(&image.path);
        let data = std::fs::read(&file)
            .with_context(|| format!("failed to read image '{}': {}", image.name, file.display()))?;
        let archive_path = image
            .archive_path
            .unwrap_or_else(|| format!("images/{}", image.name));
        images.insert(
            image.name.clone(),
            Image {
                name: image.name,
                archive_path,
                data,
            },
        );
    }

    let id = parsed.quiz.id.unwrap_or_else(|| {
        source_path
            .file_stem()
            .map(|s| id_from_stem(&s.to_string_lossy()))
            .unwrap_or_else(|| "quiz".to_string())
    });

    Ok(Document {
        id,
        title: parsed.quiz.title,
        description: parsed.quiz.description,
        entities,
        images,
    })
}

/// Document id derived from a file name, with unusable characters replaced.
fn id_from_stem(stem: &str) -> String {
    let id: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if id.is_empty() {
        "quiz".to_string()
    } else {
        id
    }
}

fn convert_entity(entity: TomlEntity) -> Result<Entity> {
    Ok(match entity {
        TomlEntity::Question(q) => Entity::Question(convert_question(q)?),
        TomlEntity::GroupStart(g) => Entity::GroupStart(Group {
            title: g.title.unwrap_or_else(|| format!("Group {}", g.id)),
            id: g.id,
            pick: g.pick,
        }),
        TomlEntity::GroupEnd => Entity::GroupEnd,
        TomlEntity::Text(t) => Entity::TextRegion(TextRegion {
            id: t.id,
            title: t.title,
            body: t.body,
        }),
    })
}

fn convert_question(q: TomlQuestion) -> Result<Question> {
    let kind: QuestionKind = q
        .kind
        .parse()
        .map_err(|e: String| anyhow::anyhow!("question '{}': {}", q.id, e))?;

    // Every listed short answer is accepted unless marked otherwise.
    let correct_by_default = kind == QuestionKind::ShortAnswer;
    let choices = q
        .choices
        .into_iter()
        .enumerate()
        .map(|(i, c)| Choice {
            id: c.id.unwrap_or_else(|| (i + 1).to_string()),
            body: c.body,
            correct: c.correct.unwrap_or(correct_by_default),
            feedback: c.feedback,
        })
        .collect();

    let gap_match = q.gap_match.map(|g| GapMatch {
        gaps: g.gaps,
        options: g
            .options
            .into_iter()
            .map(|o| GapOption {
                id: o.id,
                text: o.text,
            })
            .collect(),
        assignments: g
            .assignments
            .into_iter()
            .map(|a| GapAssignment {
                option: a.option,
                gap: a.gap,
            })
            .collect(),
    });

    Ok(Question {
        title: q.title.unwrap_or_else(|| format!("Question {}", q.id)),
        id: q.id,
        kind,
        prompt: q.prompt,
        points: q.points,
        feedback: q.feedback,
        choices,
        numerical: q.numerical,
        gap_match,
    })
}

fn image_source() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"src="([^"]+)""#).expect("valid image source pattern"))
}

/// Validate a document for common authoring issues.
///
/// These are warnings only; compilation reports the fatal problems.
pub fn validate_document(document: &Document) -> Vec<Diagnostic> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for entity in &document.entities {
        let id = match entity {
            Entity::Question(q) => &q.id,
            Entity::TextRegion(t) => &t.id,
            Entity::GroupStart(g) => &g.id,
            Entity::GroupEnd => continue,
        };
        if !seen_ids.insert((entity.label(), id)) {
            warnings.push(Diagnostic::new(
                id,
                format!("duplicate {} ID: {id}", entity.label()),
            ));
        }
    }

    for q in document.questions() {
        if q.prompt.trim().is_empty() {
            warnings.push(Diagnostic::new(&q.id, "prompt is empty"));
        }
        if q.kind.is_auto_scored() && q.points == 0.0 {
            warnings.push(Diagnostic::new(&q.id, "scored question is worth 0 points"));
        }
        for c in &q.choices {
            if c.body.trim().is_empty() {
                warnings.push(Diagnostic::new(&q.id, format!("choice '{}' is empty", c.id)));
            }
        }
    }

    let declared: HashSet<&str> = document
        .images
        .values()
        .map(|i| i.archive_path.as_str())
        .collect();
    for (entity_id, markup) in markup_sources(document) {
        for caps in image_source().captures_iter(markup) {
            let Some(src) = caps.get(1).map(|m| m.as_str()) else {
                continue;
            };
            let external = src.contains("://") || src.starts_with("data:");
            if !external && !declared.contains(src) {
                warnings.push(Diagnostic::new(
                    entity_id,
                    format!("image '{src}' is not declared in the document"),
                ));
            }
        }
    }

    warnings
}

/// Every markup body of the document with the identifier of its entity.
fn markup_sources(document: &Document) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    for entity in &document.entities {
        match entity {
            Entity::Question(q) => {
                out.push((q.id.as_str(), q.prompt.as_str()));
                for body in [&q.feedback.general, &q.feedback.correct, &q.feedback.incorrect]
                    .into_iter()
                    .flatten()
                {
                    out.push((q.id.as_str(), body.as_str()));
                }
                for c in &q.choices {
                    out.push((q.id.as_str(), c.body.as_str()));
                    if let Some(fb) = &c.feedback {
                        out.push((q.id.as_str(), fb.as_str()));
                    }
                }
            }
            Entity::TextRegion(t) => out.push((t.id.as_str(), t.body.as_str())),
            Entity::GroupStart(_) | Entity::GroupEnd => {}
        }
    }
    out
}
