//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use studypulse_core::AggregatorConfig;

/// Top-level studypulse configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudypulseConfig {
    /// Path to the JSON dataset served by the in-memory store.
    #[serde(default = "default_dataset")]
    pub dataset: PathBuf,
    /// Engine tunables.
    #[serde(default)]
    pub aggregator: AggregatorConfig,
}

fn default_dataset() -> PathBuf {
    PathBuf::from("./studypulse-data.json")
}

impl Default for StudypulseConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            aggregator: AggregatorConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(len) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + len];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + len + 1..]);
        // Substituted text is never expanded again.
        from = start + value.len();
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `studypulse.toml` in the current directory
/// 2. `~/.config/studypulse/config.toml`
///
/// `STUDYPULSE_DATASET` overrides the dataset path.
pub fn load_config_from(path: Option<&Path>) -> Result<StudypulseConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("studypulse.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => StudypulseConfig::default(),
    };

    if let Ok(dataset) = std::env::var("STUDYPULSE_DATASET") {
        config.dataset = PathBuf::from(dataset);
    }
    config.dataset = PathBuf::from(resolve_env_vars(&config.dataset.to_string_lossy()));

    Ok(config)
}

/// Parse a TOML config document.
pub fn parse_config(content: &str) -> Result<StudypulseConfig> {
    let config: StudypulseConfig = toml::from_str(content)?;
    anyhow::ensure!(
        (0.0..=1.0).contains(&config.aggregator.quiz_pass_threshold),
        "quiz_pass_threshold must be between 0.0 and 1.0"
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("studypulse"))
}
