//! Package layout: which file lands where, and writing the tree to disk.

use std::path::Path;

use anyhow::{Context, Result};
use qtipack_core::engine::CompiledDocument;
use qtipack_core::ids;
use qtipack_core::model::Image;
use thiserror::Error;

use crate::dialect::Dialect;
use crate::{manifest, render as markup};

pub const MANIFEST_PATH: &str = "imsmanifest.xml";
pub const TESTS_DIR: &str = "assessmentTests";
pub const ITEMS_DIR: &str = "assessmentItems";

/// Errors raised while rendering a package.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("{dialect} cannot express {construct} interactions (item {item})")]
    Unsupported {
        dialect: String,
        construct: String,
        item: String,
    },
}

/// Archive path of a test document.
pub fn test_path(identifier: &str) -> String {
    format!("{TESTS_DIR}/{}", ids::file_name(identifier))
}

/// Archive path of an item document.
pub fn item_path(identifier: &str) -> String {
    format!("{ITEMS_DIR}/{}", ids::file_name(identifier))
}

/// One rendered document and where it lives in the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub identifier: String,
    pub path: String,
    pub content: String,
}

/// Every text blob of one dialect's package, plus the images it ships.
#[derive(Debug, Clone)]
pub struct RenderedPackage {
    /// Machine name of the dialect that produced the package.
    pub dialect: &'static str,
    pub manifest: String,
    pub test: RenderedFile,
    /// Items in document order.
    pub items: Vec<RenderedFile>,
    pub images: Vec<Image>,
}

impl RenderedPackage {
    pub fn item(&self, identifier: &str) -> Option<&RenderedFile> {
        self.items.iter().find(|f| f.identifier == identifier)
    }

    /// `(path, content)` of every text file, manifest first.
    pub fn files(&self) -> Vec<(&str, &str)> {
        let mut files = vec![
            (MANIFEST_PATH, self.manifest.as_str()),
            (self.test.path.as_str(), self.test.content.as_str()),
        ];
        files.extend(
            self.items
                .iter()
                .map(|f| (f.path.as_str(), f.content.as_str())),
        );
        files
    }

    /// Write the package tree under `dir`. Returns the number of files written.
    ///
    /// Every path must stay inside `dir`; nothing is written otherwise.
    pub fn write_to_dir(&self, dir: &Path) -> Result<usize> {
        let files = self.files();
        let paths = files
            .iter()
            .map(|(path, _)| *path)
            .chain(self.images.iter().map(|i| i.archive_path.as_str()));
        for path in paths {
            anyhow::ensure!(
                ids::is_valid_archive_path(path),
                "refusing to write '{path}' outside the package directory"
            );
        }

        let mut written = 0;
        for (path, content) in files {
            write_file(&dir.join(path), content.as_bytes())?;
            written += 1;
        }
        for image in &self.images {
            write_file(&dir.join(&image.archive_path), &image.data)?;
            written += 1;
        }
        tracing::info!(
            "wrote {} package ({} files) to {}",
            self.dialect,
            written,
            dir.display()
        );
        Ok(written)
    }
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Render a compiled document with a dialect.
///
/// Interaction support is checked for every item before anything is
/// rendered, so an unsupported construct never yields a partial package.
pub fn render<D: Dialect + ?Sized>(
    dialect: &D,
    compiled: &CompiledDocument,
) -> Result<RenderedPackage, RenderError> {
    let tokens = compiled
        .items
        .iter()
        .map(|record| manifest::interaction_tokens(dialect, record))
        .collect::<Result<Vec<_>, _>>()?;

    let items: Vec<RenderedFile> = compiled
        .items
        .iter()
        .map(|record| RenderedFile {
            identifier: record.identifier.clone(),
            path: item_path(&record.identifier),
            content: markup::item(dialect, record),
        })
        .collect();

    let test = RenderedFile {
        identifier: compiled.structure.identifier.clone(),
        path: test_path(&compiled.structure.identifier),
        content: markup::test(dialect, &compiled.structure),
    };

    let manifest = manifest::render(dialect, compiled, &tokens, &items);

    tracing::debug!(
        "rendered {} with {} ({} item(s))",
        compiled.document_id,
        dialect.label(),
        items.len()
    );

    Ok(RenderedPackage {
        dialect: dialect.name(),
        manifest,
        test,
        items,
        images: compiled.images.clone(),
    })
}
