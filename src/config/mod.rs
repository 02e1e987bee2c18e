use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::error::{Error, Result};
use crate::export::{ExportFormat, Exporter};

pub const CONFIG_DIR: &str = ".svggloo";
pub const CONFIG_FILE: &str = "config.json";

/// Defaults for every render invocation run from this directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output_dir: PathBuf,
    pub separator: String,
    pub exporter: Exporter,
    pub format: ExportFormat,
    pub escape: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: PathBuf::from("output"),
            separator: String::from("-"),
            exporter: Exporter::Inkscape,
            format: ExportFormat::Pdf,
            escape: true,
        }
    }
}

/// The configuration directory under the current directory.
pub fn config_dir() -> Result<PathBuf> {
    Ok(env::current_dir()?.join(CONFIG_DIR))
}

/// Writes configuration to a JSON file.
pub fn write_config(config: &Config, config_path: &Path) -> Result<()> {
    let config_json = serde_json::to_string_pretty(config)?;
    fs::write(config_path, config_json)?;
    Ok(())
}

/// Reads `config.json` from `config_dir`, falling back to the defaults.
pub fn read_config(config_dir: &Path) -> Result<Config> {
    let config_path = config_dir.join(CONFIG_FILE);
    if config_path.exists() {
        return read_config_file(&config_path);
    }
    Ok(Config::default())
}

pub fn read_config_file(config_path: &Path) -> Result<Config> {
    let config_json = fs::read_to_string(config_path)?;
    let config: Config = serde_json::from_str(&config_json)?;
    log::debug!("read configuration from {}", config_path.display());
    Ok(config)
}

/// Loads the explicit configuration file, or the one of the current directory.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) if !path.exists() => Err(Error::ConfigNotFound(path.to_path_buf())),
        Some(path) => read_config_file(path),
        None => read_config(&config_dir()?),
    }
}

pub fn display_relative_path(path: &Path) -> String {
    match env::current_dir() {
        Ok(current_dir) => path
            .strip_prefix(&current_dir)
            .unwrap_or(path)
            .display()
            .to_string(),
        Err(_) => path.display().to_string(),
    }
}
