use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fmt, fs, io};

use serde::Deserialize;

use crate::content::MicropostDefaults;

/// Overrides the `[build] mode` of the configuration file.
pub const MODE_ENV_VAR: &str = "BLOG_MODE";

#[derive(Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Production,
    #[default]
    Development,
}

impl BuildMode {
    pub fn is_production(&self) -> bool {
        *self == BuildMode::Production
    }

    pub fn parse(value: &str) -> Option<BuildMode> {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(BuildMode::Production),
            "development" | "dev" => Some(BuildMode::Development),
            _ => None,
        }
    }

    pub fn from_env() -> Option<BuildMode> {
        let value = env::var(MODE_ENV_VAR).ok()?;
        let mode = BuildMode::parse(&value);
        if mode.is_none() {
            spdlog::warn!("Ignoring unknown {}={}", MODE_ENV_VAR, value);
        }
        mode
    }
}

impl Display for BuildMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Production => write!(f, "production"),
            BuildMode::Development => write!(f, "development"),
        }
    }
}

#[derive(Deserialize, Default)]
pub struct Build {
    #[serde(default)]
    pub mode: BuildMode,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub build: Build,
    #[serde(default)]
    pub micropost: MicropostDefaults,
    pub log: Option<Log>,
}

impl Config {
    /// The mode from the environment wins over the one in the file.
    pub fn build_mode(&self) -> BuildMode {
        BuildMode::from_env().unwrap_or(self.build.mode)
    }
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if !path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe.parent()
        .and_then(|p| p.to_str())
        .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "Could not find the executable directory"))?;
    let str_path = path.to_str()
        .ok_or_else(|| io::Error::new(ErrorKind::InvalidData, format!("Invalid path {}", path.display())))?;
    Ok(PathBuf::from(str_path.replace("${exe_dir}", exe_dir)))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    if let Some(ref mut log) = cfg.log {
        if let Some(location) = log.location.take() {
            log.location = Some(parse_path(location)?);
        }
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
