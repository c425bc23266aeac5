use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::ast::PavingMode;

/// Engine defaults. `reset` and every domain-error reset come back to these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub safe_input: bool,
    pub debug: bool,
    pub precision: i64,
    pub resolution: f64,
    pub granularity: f64,
    pub depth: i64,
    pub var_select: i64,
    pub bp: bool,
    pub paving_mode: PavingMode,
    /// Empty means stdout.
    pub output: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            safe_input: true,
            debug: false,
            precision: -1,
            resolution: 0.01,
            granularity: 0.0,
            depth: 0,
            var_select: 1,
            bp: false,
            paving_mode: PavingMode::Std,
            output: String::new(),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    // ~/.kodiak/config.toml
    dirs_next::home_dir().map(|h| h.join(".kodiak").join("config.toml"))
}

pub fn resolve_config_path(cli_path: &Option<PathBuf>) -> Option<PathBuf> {
    if let Some(p) = cli_path {
        return Some(p.clone());
    }
    default_config_path()
}

/// Reads settings from `path`. A missing file yields the defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    if !path.exists() {
        return Ok(Settings::default());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Read config {}", path.display()))?;
    let settings: Settings =
        toml::from_str(&text).with_context(|| format!("Parse config {}", path.display()))?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "resolution = 0.5\npaving_mode = \"full\"\n").unwrap();
        let s = load_settings(Some(&path)).unwrap();
        assert_eq!(s.resolution, 0.5);
        assert_eq!(s.paving_mode, PavingMode::Full);
        assert!(s.safe_input);
        assert_eq!(s.var_select, 1);
    }

    #[test]
    fn missing_file_is_default() {
        let s = load_settings(Some(Path::new("/nonexistent/kodiak.toml"))).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "depth = \"deep\"").unwrap();
        assert!(load_settings(Some(&path)).is_err());
    }
}
