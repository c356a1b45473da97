//! The `qtipack build` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use qtipack_core::engine::compile_document_concurrent;
use qtipack_core::parser;
use qtipack_core::report::BuildReport;

use crate::commands::solutions::write_solutions;
use crate::config::{load_config_from, parse_dialects};

pub async fn execute(
    document_path: PathBuf,
    dialect: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    parallelism: Option<usize>,
    solutions: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    let dialects = match &dialect {
        Some(list) => parse_dialects(list)?,
        None => config.dialect_kinds()?,
    };
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let started = Instant::now();
    let document = parser::parse_document(&document_path)?;
    for warning in parser::validate_document(&document) {
        eprintln!("  WARNING: {warning}");
    }

    eprintln!(
        "qtipack v{}: compiling {} entities into {} dialect(s)",
        env!("CARGO_PKG_VERSION"),
        document.entities.len(),
        dialects.len()
    );

    let document = Arc::new(document);
    let compiled =
        compile_document_concurrent(Arc::clone(&document), config.compile_options(), parallelism)
            .await
            .with_context(|| format!("failed to compile {}", document_path.display()))?;

    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create {}", output.display()))?;

    for kind in &dialects {
        let dialect = kind.dialect();
        let package = dialect.render(&compiled)?;
        let dir = output.join(kind.to_string());
        let written = package.write_to_dir(&dir)?;
        eprintln!(
            "{}: {written} file(s) written to {}",
            dialect.label(),
            dir.display()
        );
    }

    if let Some(path) = &solutions {
        write_solutions(&document, path, &config.solutions_options())?;
    }

    let report = BuildReport::new(
        &compiled,
        dialects.iter().map(|d| d.to_string()).collect(),
        started.elapsed(),
    );
    print_summary(&report);

    let report_path = output.join("build-report.json");
    report.save_json(&report_path)?;
    eprintln!("Build report: {}", report_path.display());

    Ok(())
}

fn print_summary(report: &BuildReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Item",
        "Kind",
        "Points",
        "Interactions",
        "Feedback",
    ]);

    for item in &report.items {
        table.add_row(vec![
            Cell::new(&item.identifier),
            Cell::new(&item.kind),
            Cell::new(item.points),
            Cell::new(item.interactions.join(", ")),
            Cell::new(item.feedback_blocks),
        ]);
    }

    let summary = &report.document;
    eprintln!("\n{table}");
    eprintln!(
        "{}: {} question(s), {} text region(s), {} point(s), {} warning(s)",
        summary.title,
        summary.question_count,
        summary.text_count,
        summary.total_points,
        report.warnings.len()
    );
}
