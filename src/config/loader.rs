use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Looked up in the working directory, in order, when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["driftbench.toml", "driftbench.json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    fn for_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or(ConfigError::MissingExtension)?;
        if ext.eq_ignore_ascii_case("toml") {
            Ok(Self::Toml)
        } else if ext.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(ConfigError::UnsupportedExtension {
                ext: ext.to_owned(),
            })
        }
    }
}

/// Load the driftbench config named by `--config`, else the first default
/// file present. `Ok(None)` means no config at all.
///
/// # Errors
///
/// Returns an error when the chosen file cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> AppResult<Option<ConfigFile>> {
    let chosen = path.map(PathBuf::from).or_else(find_default_config);
    let Some(chosen) = chosen else {
        debug!("No driftbench config file found.");
        return Ok(None);
    };
    debug!("Loading driftbench config from {}", chosen.display());
    load_config_file(&chosen).map(Some)
}

fn find_default_config() -> Option<PathBuf> {
    DEFAULT_CONFIG_FILES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.is_file())
}

pub(crate) fn load_config_file(path: &Path) -> AppResult<ConfigFile> {
    let format = ConfigFormat::for_path(path).map_err(AppError::config)?;
    let content = std::fs::read_to_string(path).map_err(|err| ConfigError::ReadConfig {
        path: path.to_path_buf(),
        source: err,
    })?;

    let parsed: Result<ConfigFile, ConfigError> = match format {
        ConfigFormat::Toml => toml::from_str(&content).map_err(|err| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source: err,
        }),
        ConfigFormat::Json => {
            serde_json::from_str(&content).map_err(|err| ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };
    parsed.map_err(AppError::from)
}
