//! coursequiz configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::selection::DifficultyWeights;

/// Top-level coursequiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseQuizConfig {
    /// Questions drawn from a bank when no count is given.
    #[serde(default = "default_question_count")]
    pub default_question_count: usize,
    /// Percentage needed to pass.
    #[serde(default = "default_pass_mark")]
    pub pass_mark: u8,
    /// Time limit for banks that do not set their own.
    #[serde(default)]
    pub time_limit_secs: Option<u64>,
    /// Difficulty mix for weighted draws.
    #[serde(default)]
    pub difficulty_weights: DifficultyWeights,
    /// Shuffle bank questions before an attempt.
    #[serde(default = "default_true")]
    pub shuffle: bool,
    /// Where attempt reports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Save a report after every attempt even without `--output`.
    #[serde(default)]
    pub save_reports: bool,
}

fn default_question_count() -> usize {
    30
}
fn default_pass_mark() -> u8 {
    80
}
fn default_true() -> bool {
    true
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./coursequiz-results")
}

impl Default for CourseQuizConfig {
    fn default() -> Self {
        Self {
            default_question_count: default_question_count(),
            pass_mark: default_pass_mark(),
            time_limit_secs: None,
            difficulty_weights: DifficultyWeights::default(),
            shuffle: true,
            output_dir: default_output_dir(),
            save_reports: false,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied through as-is and never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `coursequiz.toml` in the current directory
/// 2. `~/.config/coursequiz/config.toml`
///
/// Environment variable overrides: `COURSEQUIZ_OUTPUT_DIR`, `COURSEQUIZ_PASS_MARK`.
pub fn load_config() -> Result<CourseQuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<CourseQuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("coursequiz.toml");
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
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::info!("loaded config from {}", path.display());
            config
        }
        None => CourseQuizConfig::default(),
    };

    apply_env_overrides(config)
}

/// Parse a config file body and expand `${VAR}` references in paths.
pub fn parse_config_str(content: &str) -> Result<CourseQuizConfig> {
    let mut config: CourseQuizConfig = toml::from_str(content)?;
    let output_dir = config.output_dir.to_string_lossy().into_owned();
    config.output_dir = PathBuf::from(resolve_env_vars(&output_dir));
    Ok(config)
}

fn apply_env_overrides(mut config: CourseQuizConfig) -> Result<CourseQuizConfig> {
    if let Ok(dir) = std::env::var("COURSEQUIZ_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    if let Ok(mark) = std::env::var("COURSEQUIZ_PASS_MARK") {
        config.pass_mark = mark
            .trim()
            .parse()
            .with_context(|| format!("invalid COURSEQUIZ_PASS_MARK: {mark}"))?;
    }

    anyhow::ensure!(
        config.pass_mark <= 100,
        "pass_mark must be between 0 and 100, got {}",
        config.pass_mark
    );

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("coursequiz"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_COURSEQUIZ_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_COURSEQUIZ_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_COURSEQUIZ_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_COURSEQUIZ_TEST_VAR");
    }

    #[test]
    fn self_referencing_value_is_not_expanded_again() {
        std::env::set_var("_COURSEQUIZ_SELF_REF", "${_COURSEQUIZ_SELF_REF}");
        let config =
            parse_config_str("output_dir = \"${_COURSEQUIZ_SELF_REF}/out\"\n").unwrap();
        assert_eq!(
            config.output_dir,
            PathBuf::from("${_COURSEQUIZ_SELF_REF}/out")
        );
        std::env::remove_var("_COURSEQUIZ_SELF_REF");
    }

    #[test]
    fn unset_variable_expands_to_empty() {
        assert_eq!(resolve_env_vars("a${_COURSEQUIZ_UNSET_VAR}b"), "ab");
    }

    #[test]
    fn unterminated_reference_left_alone() {
        assert_eq!(resolve_env_vars("${NOT_CLOSED"), "${NOT_CLOSED");
    }

    #[test]
    fn default_config() {
        let config = CourseQuizConfig::default();
        assert_eq!(config.default_question_count, 30);
        assert_eq!(config.pass_mark, 80);
        assert!(config.shuffle);
        assert!(config.time_limit_secs.is_none());
        assert_eq!(config.difficulty_weights, DifficultyWeights::default());
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config_str(
            r#"
pass_mark = 70
time_limit_secs = 2700
shuffle = false

[difficulty_weights]
basic = 30
intermediate = 50
advanced = 20
"#,
        )
        .unwrap();
        assert_eq!(config.pass_mark, 70);
        assert_eq!(config.time_limit_secs, Some(2700));
        assert!(!config.shuffle);
        assert_eq!(config.difficulty_weights.intermediate, 50);
        assert_eq!(config.default_question_count, 30);
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coursequiz.toml");
        std::fs::write(&path, "default_question_count = 12\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_question_count, 12);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = load_config_from(Some(Path::new("definitely/not/here.toml")));
        assert!(result.is_err());
    }
}
