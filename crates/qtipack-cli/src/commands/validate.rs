//! The `qtipack validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use qtipack_core::engine::{compile_document, self_check};
use qtipack_core::parser;
use qtipack_dialect::DialectKind;

use crate::config::load_config_from;

pub fn execute(document_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let document = parser::parse_document(&document_path)?;

    println!(
        "Document: {} ({} entities)",
        document.title,
        document.entities.len()
    );

    let mut warnings = parser::validate_document(&document);

    let compiled = compile_document(&document, &config.compile_options())
        .with_context(|| format!("failed to compile {}", document_path.display()))?;
    warnings.extend(compiled.warnings.iter().cloned());
    warnings.extend(self_check(&compiled));

    for kind in DialectKind::ALL {
        let dialect = kind.dialect();
        let package = dialect.render(&compiled)?;
        println!("  {}: {} item(s)", dialect.label(), package.items.len());
    }

    for w in &warnings {
        println!("  [{}] WARNING: {}", w.entity_id, w.message);
    }

    if warnings.is_empty() {
        println!("Document valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
