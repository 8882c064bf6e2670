//! User configuration: TOML under the XDG config dir, loaded once per run.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fixed address of the user-facing configuration page.
pub const CONFIGURE_URL: &str = "https://ungate.github.io/configure.html";

/// Global configuration loaded from `~/.config/ungate/config.toml`.
/// Read once at startup, handed to site handlers, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UngateConfig {
    /// Redirect image-host gate pages straight to the raw image.
    pub redirect_image: bool,
    /// Allow handlers to consult external resolver services.
    pub external_server_support: bool,
    /// Optional log filter override (e.g. "debug"); `RUST_LOG` wins.
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for UngateConfig {
    fn default() -> Self {
        Self {
            redirect_image: true,
            external_server_support: false,
            log_level: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ungate")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub async fn load_or_init() -> Result<UngateConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = UngateConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, toml).await?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = tokio::fs::read_to_string(&path).await?;
    let cfg: UngateConfig = toml::from_str(&data)?;
    Ok(cfg)
}

/// JSON snapshot of the resolved configuration, for the startup log line.
pub fn dump(cfg: &UngateConfig) -> Result<String> {
    Ok(serde_json::to_string(cfg)?)
}
