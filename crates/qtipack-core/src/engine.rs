//! Compile pipeline.
//!
//! Builds the test structure, assembles every item in document order, and
//! collects warnings. The concurrent variant spreads item assembly over a
//! bounded pool of blocking tasks and restores document order afterwards.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::error::{CompileError, Diagnostic};
use crate::expr::evaluate;
use crate::ids::{self, IdScheme};
use crate::item::{self, Assembled, ItemKind, ItemRecord};
use crate::model::{Document, Entity, Image};
use crate::structure::{self, TestStructure};

/// Options shared by every stage of compilation.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Identifier scheme for every output identifier.
    pub ids: IdScheme,
    /// Whether choice and gap-match interactions shuffle their options.
    pub shuffle_choices: bool,
}

impl CompileOptions {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            ids: IdScheme::new(prefix),
            shuffle_choices: false,
        }
    }
}

/// A fully compiled document, ready for any dialect.
#[derive(Debug, Clone)]
pub struct CompiledDocument {
    pub document_id: String,
    pub title: String,
    pub description: String,
    pub manifest_identifier: String,
    /// Items in document order.
    pub items: Vec<ItemRecord>,
    pub structure: TestStructure,
    pub images: Vec<Image>,
    pub warnings: Vec<Diagnostic>,
}

impl CompiledDocument {
    pub fn item(&self, identifier: &str) -> Option<&ItemRecord> {
        self.items.iter().find(|i| i.identifier == identifier)
    }

    /// Number of scored and text items.
    pub fn counts(&self) -> (usize, usize) {
        let text = self.items.iter().filter(|i| i.is_text()).count();
        (self.items.len() - text, text)
    }

    /// Sum of the points of every question.
    pub fn total_points(&self) -> f64 {
        self.items.iter().map(|i| i.points).sum()
    }
}

/// Compile a document sequentially.
pub fn compile_document(
    document: &Document,
    options: &CompileOptions,
) -> Result<CompiledDocument, CompileError> {
    let structure = prepare(document, options)?;
    let mut assembled = Vec::new();
    for entity in &document.entities {
        if let Some(result) = assemble_entity(entity, options) {
            assembled.push(result?);
        }
    }
    Ok(finish(document, options, structure, assembled))
}

/// Compile a document with item assembly spread over `parallelism` workers.
///
/// Produces the same result as [`compile_document`]: items come back in
/// document order, and when several items fail the first failure in
/// document order is returned.
pub async fn compile_document_concurrent(
    document: Arc<Document>,
    options: CompileOptions,
    parallelism: usize,
) -> Result<CompiledDocument, CompileError> {
    let structure = prepare(&document, &options)?;
    let options = Arc::new(options);
    let semaphore = Arc::new(Semaphore::new(parallelism.max(1)));

    let mut futures = FuturesUnordered::new();
    for (position, entity) in document.entities.iter().enumerate() {
        if !matches!(entity, Entity::Question(_) | Entity::TextRegion(_)) {
            continue;
        }
        let document = Arc::clone(&document);
        let options = Arc::clone(&options);
        let semaphore = Arc::clone(&semaphore);

        futures.push(async move {
            let worker_failed =
                move |message: String| CompileError::WorkerFailed { position, message };
            let inner = async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| worker_failed("semaphore closed".into()))?;
                let joined = tokio::task::spawn_blocking(move || {
                    assemble_entity(&document.entities[position], &options)
                })
                .await
                .map_err(|e| worker_failed(e.to_string()))?;
                joined.transpose()
            };
            (position, inner.await)
        });
    }

    let mut results = Vec::with_capacity(futures.len());
    while let Some(result) = futures.next().await {
        results.push(result);
    }
    results.sort_by_key(|(position, _)| *position);

    let mut assembled = Vec::with_capacity(results.len());
    for (_, result) in results {
        if let Some(item) = result? {
            assembled.push(item);
        }
    }
    Ok(finish(&document, &options, structure, assembled))
}

/// Structure and identifier checks that must pass before any item is built.
fn prepare(document: &Document, options: &CompileOptions) -> Result<TestStructure, CompileError> {
    check_identifiers(document, options)?;
    let structure = structure::build(document, &options.ids)?;
    let mut seen = HashSet::new();
    for identifier in structure.item_refs() {
        if !seen.insert(identifier) {
            return Err(CompileError::DuplicateIdentifier {
                identifier: identifier.to_string(),
            });
        }
    }
    Ok(structure)
}

/// Every source id ends up in an identifier, and item ids also in file
/// names, so they are restricted to a safe charset up front.
fn check_identifiers(document: &Document, options: &CompileOptions) -> Result<(), CompileError> {
    let invalid = |entity: String, id: &str| CompileError::InvalidIdentifier {
        entity,
        id: id.to_string(),
    };
    let check = |entity: &str, id: &str| {
        if ids::is_valid_id(id) {
            Ok(())
        } else {
            Err(invalid(entity.to_string(), id))
        }
    };

    let prefix = options.ids.prefix();
    if !ids::is_valid_prefix(prefix) {
        return Err(invalid("identifier prefix".into(), prefix));
    }
    check("document", &document.id)?;

    for entity in &document.entities {
        match entity {
            Entity::Question(q) => {
                check("question", &q.id)?;
                let owner = format!("question '{}'", q.id);
                for choice in &q.choices {
                    check(&format!("choice of {owner}"), &choice.id)?;
                }
                if let Some(data) = &q.gap_match {
                    for gap in &data.gaps {
                        check(&format!("gap of {owner}"), gap)?;
                    }
                    for option in &data.options {
                        check(&format!("gap option of {owner}"), &option.id)?;
                    }
                }
            }
            Entity::TextRegion(r) => check("text region", &r.id)?,
            Entity::GroupStart(g) => check("group", &g.id)?,
            Entity::GroupEnd => {}
        }
    }

    for image in document.images.values() {
        if !ids::is_valid_archive_path(&image.archive_path) {
            return Err(CompileError::InvalidArchivePath {
                name: image.name.clone(),
                path: image.archive_path.clone(),
            });
        }
    }
    Ok(())
}

fn assemble_entity(
    entity: &Entity,
    options: &CompileOptions,
) -> Option<Result<Assembled, CompileError>> {
    match entity {
        Entity::Question(q) => Some(item::assemble(q, options)),
        Entity::TextRegion(r) => Some(Ok(Assembled {
            record: item::assemble_text(r, options),
            warnings: Vec::new(),
        })),
        Entity::GroupStart(_) | Entity::GroupEnd => None,
    }
}

fn finish(
    document: &Document,
    options: &CompileOptions,
    structure: TestStructure,
    assembled: Vec<Assembled>,
) -> CompiledDocument {
    let mut items = Vec::with_capacity(assembled.len());
    let mut warnings = Vec::new();
    for a in assembled {
        items.push(a.record);
        warnings.extend(a.warnings);
    }
    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    tracing::debug!(
        "compiled '{}': {} item(s), {} warning(s)",
        document.id,
        items.len(),
        warnings.len()
    );

    CompiledDocument {
        document_id: document.id.clone(),
        title: document.title.clone(),
        description: document.description.clone(),
        manifest_identifier: options.ids.manifest(&document.id),
        items,
        structure,
        images: document.images.values().cloned().collect(),
        warnings,
    }
}

/// Check a compiled document against its own declarations.
///
/// Every scored item must award its full points for its declared correct
/// response, every assignable feedback marker must have a block, and every
/// item reference must resolve. Returns one diagnostic per violation.
pub fn self_check(compiled: &CompiledDocument) -> Vec<Diagnostic> {
    let mut problems = Vec::new();

    for item in &compiled.items {
        let ItemKind::Question(kind) = item.kind else {
            continue;
        };
        if kind.is_auto_scored() {
            if let Some(correct) = item.response.as_ref().and_then(|r| r.correct_value()) {
                let score = evaluate(&item.processing, correct).score;
                if score != item.points {
                    problems.push(Diagnostic::new(
                        &item.source_id,
                        format!(
                            "declared correct response scores {score} of {} point(s)",
                            item.points
                        ),
                    ));
                }
            }
        }
        for marker in item.dangling_markers() {
            problems.push(Diagnostic::new(
                &item.source_id,
                format!("feedback marker '{marker}' has no feedback block"),
            ));
        }
    }

    for reference in compiled.structure.item_refs() {
        if compiled.item(reference).is_none() {
            problems.push(Diagnostic::new(
                &compiled.document_id,
                format!("test references missing item '{reference}'"),
            ));
        }
    }
    problems
}
