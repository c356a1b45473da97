//! qtipack CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "qtipack", version, about = "QTI assessment package compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a quiz document into QTI packages
    Build {
        /// Path to the .toml quiz document
        #[arg(long)]
        document: PathBuf,

        /// Dialects to emit (e.g. "qti21,qti30" or "all")
        #[arg(long)]
        dialect: Option<String>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Max concurrent item compilations
        #[arg(long)]
        parallelism: Option<usize>,

        /// Also write instructor solutions to this .md file
        #[arg(long)]
        solutions: Option<PathBuf>,
    },

    /// Write instructor solutions as Pandoc Markdown, without packages
    Solutions {
        /// Path to the .toml quiz document
        #[arg(long)]
        document: PathBuf,

        /// Output .md file
        #[arg(long)]
        output: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Show point values
        #[arg(long)]
        points: bool,
    },

    /// Check a quiz document without writing anything
    Validate {
        /// Path to the .toml quiz document
        #[arg(long)]
        document: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example quiz
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("qtipack=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            document,
            dialect,
            output,
            config,
            parallelism,
            solutions,
        } => {
            commands::build::execute(document, dialect, output, config, parallelism, solutions)
                .await
        }
        Commands::Solutions {
            document,
            output,
            config,
            points,
        } => commands::solutions::execute(document, output, config, points),
        Commands::Validate { document, config } => commands::validate::execute(document, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
