//! The `qtipack init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create qtipack.toml
    if std::path::Path::new("qtipack.toml").exists() {
        println!("qtipack.toml already exists, skipping.");
    } else {
        std::fs::write("qtipack.toml", SAMPLE_CONFIG)?;
        println!("Created qtipack.toml");
    }

    // Create example quiz
    std::fs::create_dir_all("quizzes")?;
    let example_path = std::path::Path::new("quizzes/example.toml");
    if example_path.exists() {
        println!("quizzes/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUIZ)?;
        println!("Created quizzes/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit quizzes/example.toml");
    println!("  2. Run: qtipack validate --document quizzes/example.toml");
    println!("  3. Run: qtipack build --document quizzes/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# qtipack configuration

# Dialects emitted by `qtipack build` (qti21, qti30)
dialects = ["qti21", "qti30"]

# Prefix of every generated identifier
id_prefix = "qtipack"

shuffle_choices = false
parallelism = 4
output_dir = "./qtipack-out"

# Solutions document (`qtipack solutions`, `build --solutions`)
solutions_show_points = false
solutions_sample_groups = false
"#;

const EXAMPLE_QUIZ: &str = include_str!("../../templates/example.toml");
