use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::controller::{OverlapPolicy, ValidationMode};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const SETTINGS_FILE_NAME: &str = "fraud_check.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub validation: ValidationMode,
    pub overlap: OverlapPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            validation: ValidationMode::default(),
            overlap: OverlapPolicy::default(),
        }
    }
}

/// Defaults, then the settings file, then environment variables.
///
/// An explicit path must exist. Without one, `./fraud_check.toml` and then
/// `<config dir>/fraud_check/fraud_check.toml` are tried.
pub fn load_settings(explicit_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match explicit_path {
        Some(path) => read_settings_file(path)?,
        None => match default_settings_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => read_settings_file(&path)?,
            None => Settings::default(),
        },
    };

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok())?;
    Ok(settings)
}

pub fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    toml::from_str(raw).context("invalid settings file")
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    parse_settings(&raw).with_context(|| format!("in '{}'", path.display()))
}

fn default_settings_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SETTINGS_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("fraud_check").join(SETTINGS_FILE_NAME));
    }
    paths
}

pub(crate) fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("PREDICTION_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = non_empty("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = non_empty("APP__VALIDATION") {
        settings.validation = v
            .parse()
            .map_err(|err: String| anyhow!("APP__VALIDATION: {err}"))?;
    }
    if let Some(v) = non_empty("APP__OVERLAP") {
        settings.overlap = v
            .parse()
            .map_err(|err: String| anyhow!("APP__OVERLAP: {err}"))?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
