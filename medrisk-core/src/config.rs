//! Configuration system for MedRisk.
//!
//! Uses `figment` for layered configuration: defaults -> user file ->
//! workspace file -> explicit file -> environment -> overrides. Files live at
//! `~/.config/medrisk/config.toml` and `<workspace>/.medrisk/config.toml`.

use crate::catalog::Catalog;
use crate::error::{ConfigError, MedRiskError, Result};
use crate::report::{RenderOptions, ReportFormat};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory under the workspace holding config and data.
pub const WORKSPACE_DIR: &str = ".medrisk";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedRiskConfig {
    pub store: StoreConfig,
    pub catalog: CatalogConfig,
    pub report: ReportConfig,
}

/// Where datasets are persisted and how often the file is polled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON document path. Relative paths resolve against the workspace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub poll_interval_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            poll_interval_secs: 2,
        }
    }
}

impl StoreConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

/// Optional custom checklist catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// TOML or JSON catalog file. `None` uses the built-in catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub format: ReportFormat,
    pub score_precision: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Markdown,
            score_precision: 2,
        }
    }
}

impl ReportConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            precision: self.score_precision,
        }
    }
}

/// Values set explicitly by the caller; unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogConfig>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl MedRiskConfig {
    /// Dataset document path for a workspace.
    pub fn store_path(&self, workspace: &Path) -> PathBuf {
        match &self.store.path {
            Some(path) => resolve(workspace, path),
            None => workspace.join(WORKSPACE_DIR).join("datasets.json"),
        }
    }

    /// Custom catalog path, if configured.
    pub fn catalog_path(&self, workspace: &Path) -> Option<PathBuf> {
        self.catalog.path.as_deref().map(|p| resolve(workspace, p))
    }

    /// Load the configured catalog, or borrow the built-in one.
    pub fn load_catalog(&self, workspace: &Path) -> Result<Cow<'static, Catalog>> {
        let Some(path) = self.catalog_path(workspace) else {
            return Ok(Cow::Borrowed(Catalog::builtin()));
        };
        let source = std::fs::read_to_string(&path)?;
        let catalog = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Catalog::from_json_str(&source)?,
            _ => Catalog::from_toml_str(&source)?,
        };
        tracing::info!(path = %path.display(), items = catalog.len(), "Loaded custom catalog");
        Ok(Cow::Owned(catalog))
    }

    /// Reject values that would make the registry unusable.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.report.score_precision > 6 {
            return Err(ConfigError::Invalid {
                message: format!(
                    "report.score_precision must be at most 6, got {}",
                    self.report.score_precision
                ),
            });
        }
        Ok(())
    }
}

fn resolve(workspace: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace.join(path)
    }
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "medrisk", "medrisk")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Workspace-level config file location.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(WORKSPACE_DIR).join("config.toml")
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `MEDRISK_`)
/// 3. An explicit config file (`--config`)
/// 4. Workspace-local config (`.medrisk/config.toml`)
/// 5. User config (`~/.config/medrisk/config.toml`)
/// 6. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    config_file: Option<&Path>,
    overrides: Option<&ConfigOverrides>,
) -> Result<MedRiskConfig> {
    let mut figment = Figment::from(Serialized::defaults(MedRiskConfig::default()));

    // User-level config
    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    if let Some(file) = config_file {
        if !file.exists() {
            return Err(ConfigError::Invalid {
                message: format!("config file not found: {}", file.display()),
            }
            .into());
        }
        figment = figment.merge(Toml::file(file));
    }

    // Environment variables (MEDRISK_STORE__PATH, MEDRISK_REPORT__FORMAT, etc.)
    figment = figment.merge(Env::prefixed("MEDRISK_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    let config: MedRiskConfig = figment
        .extract()
        .map_err(|e| MedRiskError::Config(ConfigError::Extract(Box::new(e))))?;
    config.validate()?;
    Ok(config)
}

/// Check whether any MedRisk configuration file exists (user-level or workspace-level).
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if user_config_path().is_some_and(|p| p.exists()) {
        return true;
    }
    workspace.is_some_and(|ws| workspace_config_path(ws).exists())
}
