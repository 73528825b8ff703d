use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::templates::TemplateRegistry;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/";

/// Environment variable that overrides `base_url`.
pub const BASE_URL_ENV: &str = "DSIR_BASE_URL";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "https://dayssinceitrained.com/"
/// templates_dir = "/home/me/dsir-templates"
/// default_threshold = 0.1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Server exposing `/data` and `/historydata`.
    pub base_url: Option<String>,

    /// Directory of `<template-name>.hbs` files replacing the built-in templates.
    pub templates_dir: Option<PathBuf>,

    /// Threshold used when none is given on the command line.
    pub default_threshold: Option<f64>,
}

impl Config {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn default_threshold(&self) -> f64 {
        self.default_threshold.unwrap_or(0.0)
    }

    /// Apply `DSIR_BASE_URL`, if set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_base_url_override(std::env::var(BASE_URL_ENV).ok())
    }

    fn with_base_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.base_url = Some(url);
        }
        self
    }

    /// Templates to render with: built-ins plus overrides from `templates_dir`.
    pub fn template_registry(&self) -> Result<TemplateRegistry> {
        let registry = match &self.templates_dir {
            Some(dir) => TemplateRegistry::with_overrides(dir)
                .with_context(|| format!("Failed to load templates from {}", dir.display()))?,
            None => TemplateRegistry::new().context("Failed to build built-in templates")?,
        };
        Ok(registry)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "dayssinceitrained", "dsir")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::default();

        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert_eq!(cfg.default_threshold(), 0.0);
    }

    #[test]
    fn parses_toml() {
        let cfg: Config = toml::from_str(
            r#"
            base_url = "https://example.com/"
            default_threshold = 0.25
            "#,
        )
        .expect("config must parse");

        assert_eq!(cfg.base_url(), "https://example.com/");
        assert_eq!(cfg.default_threshold(), 0.25);
        assert!(cfg.templates_dir.is_none());
    }

    #[test]
    fn toml_roundtrip_keeps_templates_dir() {
        let cfg = Config {
            templates_dir: Some(PathBuf::from("/tmp/templates")),
            ..Config::default()
        };

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn env_override_replaces_base_url() {
        let cfg = Config { base_url: Some("http://a/".into()), ..Config::default() };

        let cfg = cfg.with_base_url_override(Some("http://b/".into()));
        assert_eq!(cfg.base_url(), "http://b/");

        let cfg = cfg.with_base_url_override(Some("  ".into()));
        assert_eq!(cfg.base_url(), "http://b/");

        let cfg = cfg.with_base_url_override(None);
        assert_eq!(cfg.base_url(), "http://b/");
    }

    #[test]
    fn missing_templates_dir_falls_back_to_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config { templates_dir: Some(dir.path().join("absent")), ..Config::default() };

        assert!(cfg.template_registry().is_ok());
    }
}
