//! The `qtipack solutions` command: instructor solutions as Markdown.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use qtipack_core::export::{solutions_markdown, SolutionsOptions};
use qtipack_core::model::Document;
use qtipack_core::parser;

use crate::config::load_config_from;

pub fn execute(
    document_path: PathBuf,
    output: PathBuf,
    config_path: Option<PathBuf>,
    points: bool,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let mut options = config.solutions_options();
    options.show_points |= points;

    let document = parser::parse_document(&document_path)?;
    write_solutions(&document, &output, &options)
}

/// Render and save the solutions of `document`; `.md` and `.markdown` only.
pub fn write_solutions(document: &Document, path: &Path, options: &SolutionsOptions) -> Result<()> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    anyhow::ensure!(
        matches!(extension.as_str(), "md" | "markdown"),
        "unsupported solutions format '{}': use .md or .markdown",
        path.display()
    );

    let markdown = solutions_markdown(document, options)
        .with_context(|| format!("failed to export solutions for '{}'", document.id))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, markdown)
        .with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("Solutions: {}", path.display());
    Ok(())
}
