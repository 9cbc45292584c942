use crate::dates::{DateFormat, DEFAULT_LOCALE};
use crate::processor::ProcessOptions;
use crate::template::DEFAULT_TEMPLATE;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted defaults; command-line flags take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub date_format: String,
    pub locale: String,
    pub template: String,
    pub use_modified_time: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            date_format: DateFormat::default().as_str().to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
            use_modified_time: false,
        }
    }
}

impl AppConfig {
    pub fn to_options(&self, do_write: bool) -> ProcessOptions {
        ProcessOptions {
            date_format: self.date_format.clone(),
            do_write,
            locale: self.locale.clone(),
            template: self.template.clone(),
            use_modified_time: self.use_modified_time,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("", "", "stamp-renamer")
        .context("could not determine the configuration directory")?;
    let config_dir = proj.config_dir().to_path_buf();
    Ok(AppPaths {
        config_path: config_dir.join("config.toml"),
        config_dir,
    })
}

pub fn load_config() -> Result<AppConfig> {
    let paths = app_paths()?;
    if !paths.config_path.exists() {
        return Ok(AppConfig::default());
    }

    let raw = fs::read_to_string(&paths.config_path).with_context(|| {
        format!(
            "could not read config file: {}",
            paths.config_path.display()
        )
    })?;

    parse_config(&raw)
        .with_context(|| format!("invalid config file: {}", paths.config_path.display()))
}

pub fn save_config(config: &AppConfig) -> Result<PathBuf> {
    let paths = app_paths()?;
    fs::create_dir_all(&paths.config_dir).with_context(|| {
        format!(
            "could not create config directory: {}",
            paths.config_dir.display()
        )
    })?;
    let body = toml::to_string_pretty(config).context("could not serialize config")?;
    fs::write(&paths.config_path, body).with_context(|| {
        format!(
            "could not write config file: {}",
            paths.config_path.display()
        )
    })?;
    Ok(paths.config_path)
}

fn parse_config(raw: &str) -> Result<AppConfig> {
    Ok(toml::from_str::<AppConfig>(raw)?)
}
