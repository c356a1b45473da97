//! Build report with JSON persistence.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::CompiledDocument;
use crate::error::Diagnostic;
use crate::item::ItemKind;

/// A record of one package build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the compiled document.
    pub document: DocumentSummary,
    /// Dialects the package was rendered in.
    pub dialects: Vec<String>,
    /// One entry per item, in document order.
    pub items: Vec<ItemSummary>,
    /// Data-integrity warnings raised during compilation.
    pub warnings: Vec<Diagnostic>,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub question_count: usize,
    pub text_count: usize,
    pub total_points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSummary {
    pub identifier: String,
    pub source_id: String,
    /// Question kind, or `text` for text regions.
    pub kind: String,
    pub points: f64,
    pub interactions: Vec<String>,
    pub feedback_blocks: usize,
}

impl BuildReport {
    pub fn new(compiled: &CompiledDocument, dialects: Vec<String>, elapsed: Duration) -> Self {
        let (question_count, text_count) = compiled.counts();
        let items = compiled
            .items
            .iter()
            .map(|item| ItemSummary {
                identifier: item.identifier.clone(),
                source_id: item.source_id.clone(),
                kind: match item.kind {
                    ItemKind::Question(kind) => kind.to_string(),
                    ItemKind::Text => "text".to_string(),
                },
                points: item.points,
                interactions: item
                    .interactions
                    .iter()
                    .map(|k| k.as_str().to_string())
                    .collect(),
                feedback_blocks: item.feedback.len(),
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            document: DocumentSummary {
                id: compiled.document_id.clone(),
                title: compiled.title.clone(),
                question_count,
                text_count,
                total_points: compiled.total_points(),
            },
            dialects,
            items,
            warnings: compiled.warnings.clone(),
            duration_ms: elapsed.as_millis() as u64,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: BuildReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
