//! Build configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use qtipack_core::engine::CompileOptions;
use qtipack_core::export::SolutionsOptions;
use qtipack_dialect::DialectKind;

/// Top-level qtipack configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QtipackConfig {
    /// Dialects emitted by `build` when `--dialect` is not given.
    #[serde(default = "default_dialects")]
    pub dialects: Vec<String>,
    /// Prefix of every generated identifier.
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
    /// Whether choice and gap-match interactions shuffle their options.
    #[serde(default)]
    pub shuffle_choices: bool,
    /// Max concurrent item compilations.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Output directory for packages.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Print point values in solutions exports.
    #[serde(default)]
    pub solutions_show_points: bool,
    /// Show only `pick` representative members of each group in solutions.
    #[serde(default)]
    pub solutions_sample_groups: bool,
}

fn default_dialects() -> Vec<String> {
    DialectKind::ALL.iter().map(|d| d.to_string()).collect()
}
fn default_id_prefix() -> String {
    "qtipack".to_string()
}
fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./qtipack-out")
}

impl Default for QtipackConfig {
    fn default() -> Self {
        Self {
            dialects: default_dialects(),
            id_prefix: default_id_prefix(),
            shuffle_choices: false,
            parallelism: default_parallelism(),
            output_dir: default_output_dir(),
            solutions_show_points: false,
            solutions_sample_groups: false,
        }
    }
}

impl QtipackConfig {
    pub fn dialect_kinds(&self) -> Result<Vec<DialectKind>> {
        parse_dialects(&self.dialects.join(","))
    }

    pub fn compile_options(&self) -> CompileOptions {
        let mut options = CompileOptions::with_prefix(self.id_prefix.clone());
        options.shuffle_choices = self.shuffle_choices;
        options
    }

    pub fn solutions_options(&self) -> SolutionsOptions {
        SolutionsOptions {
            show_points: self.solutions_show_points,
            sample_groups: self.solutions_sample_groups,
        }
    }

    /// Apply environment overrides and expand `${VAR}` references.
    fn resolve(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(list) = lookup("QTIPACK_DIALECTS") {
            self.dialects = list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        self.id_prefix = resolve_env_vars(&self.id_prefix, &lookup);
        self.output_dir = PathBuf::from(resolve_env_vars(&self.output_dir.to_string_lossy(), &lookup));
        self.dialects = self
            .dialects
            .iter()
            .map(|d| resolve_env_vars(d, &lookup))
            .collect();
        self
    }
}

/// Parse a comma-separated dialect list; `all` selects every dialect.
pub fn parse_dialects(list: &str) -> Result<Vec<DialectKind>> {
    let mut kinds = Vec::new();
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if name.eq_ignore_ascii_case("all") {
            kinds.extend(DialectKind::ALL);
            continue;
        }
        let kind = name.parse::<DialectKind>().map_err(anyhow::Error::msg)?;
        kinds.push(kind);
    }
    kinds.sort();
    kinds.dedup();
    anyhow::ensure!(!kinds.is_empty(), "at least one dialect is required");
    Ok(kinds)
}

/// Resolve references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&lookup(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `qtipack.toml` in the current directory
/// 2. `~/.config/qtipack/config.toml`
///
/// Environment variable override: `QTIPACK_DIALECTS`.
pub fn load_config_from(path: Option<&Path>) -> Result<QtipackConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("qtipack.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            toml::from_str::<QtipackConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QtipackConfig::default(),
    };

    Ok(config.resolve(|key| std::env::var(key).ok()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("qtipack"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn default_config() {
        let config = QtipackConfig::default();
        assert_eq!(config.dialects, ["qti21", "qti30"]);
        assert_eq!(config.id_prefix, "qtipack");
        assert_eq!(config.parallelism, 4);
        assert!(!config.shuffle_choices);
        assert_eq!(
            config.dialect_kinds().unwrap(),
            vec![DialectKind::Qti21, DialectKind::Qti30]
        );
    }

    #[test]
    fn parse_partial_config() {
        let config: QtipackConfig = toml::from_str(
            r#"
dialects = ["qti30"]
shuffle_choices = true
"#,
        )
        .unwrap();
        assert_eq!(config.dialect_kinds().unwrap(), vec![DialectKind::Qti30]);
        assert_eq!(config.id_prefix, "qtipack");
        assert!(config.compile_options().shuffle_choices);
        assert_eq!(config.solutions_options(), SolutionsOptions::default());
    }

    #[test]
    fn resolve_env_vars_basic() {
        let lookup = |k: &str| (k == "COURSE").then(|| "bio101".to_string());
        assert_eq!(resolve_env_vars("${COURSE}", lookup), "bio101");
        assert_eq!(resolve_env_vars("q_${COURSE}_x", lookup), "q_bio101_x");
        assert_eq!(resolve_env_vars("${MISSING}", lookup), "");
        assert_eq!(resolve_env_vars("${open", lookup), "${open");
        assert_eq!(resolve_env_vars("${COURSE}-${open", lookup), "bio101-${open");
    }

    #[test]
    fn self_referencing_values_expand_once() {
        let lookup = |k: &str| (k == "LOOP").then(|| "${LOOP}!".to_string());
        assert_eq!(resolve_env_vars("a${LOOP}b", lookup), "a${LOOP}!b");
    }

    #[test]
    fn dialect_env_override_wins() {
        let lookup = |k: &str| (k == "QTIPACK_DIALECTS").then(|| "qti30, ".to_string());
        let config = QtipackConfig::default().resolve(lookup);
        assert_eq!(config.dialect_kinds().unwrap(), vec![DialectKind::Qti30]);

        let config = QtipackConfig::default().resolve(no_env);
        assert_eq!(config.dialects.len(), 2);
    }

    #[test]
    fn prefix_and_output_are_expanded() {
        let config = QtipackConfig {
            id_prefix: "${TERM_ID}".into(),
            output_dir: PathBuf::from("out/${TERM_ID}"),
            ..QtipackConfig::default()
        };
        let config = config.resolve(|k: &str| (k == "TERM_ID").then(|| "fall".to_string()));
        assert_eq!(config.id_prefix, "fall");
        assert_eq!(config.output_dir, PathBuf::from("out/fall"));
    }

    #[test]
    fn parse_dialect_lists() {
        assert_eq!(
            parse_dialects("all").unwrap(),
            vec![DialectKind::Qti21, DialectKind::Qti30]
        );
        assert_eq!(
            parse_dialects("qti30,qti21,qti30").unwrap(),
            vec![DialectKind::Qti21, DialectKind::Qti30]
        );
        assert!(parse_dialects("qti12").is_err());
        assert!(parse_dialects(" , ").is_err());
    }

    #[test]
    fn explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "id_prefix = \"exam\"\nparallelism = 2\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.id_prefix, "exam");
        assert_eq!(config.parallelism, 2);

        assert!(load_config_from(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
