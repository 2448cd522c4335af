//! TOML configuration parsing and validation.
//!
//! ```toml
//! [db]
//! path = "./data/leads.sqlite"
//!
//! [console]
//! latency_ms = 300
//!
//! [export]
//! path = "leads.csv"
//!
//! [logging]
//! level = "warn"
//! ```
//!
//! Only `[db]` is required. When no config file exists the CLI falls back
//! to [`Config::minimal`].

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConsoleConfig {
    /// Artificial delay before update, convert and revert complete.
    #[serde(default)]
    pub latency_ms: u64,
}

impl ConsoleConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    #[serde(default = "default_export_path")]
    pub path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: default_export_path(),
        }
    }
}

fn default_export_path() -> PathBuf {
    PathBuf::from("leads.csv")
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Longest artificial delay accepted from config.
const MAX_LATENCY_MS: u64 = 10_000;

impl Config {
    /// Defaults used when no config file is present.
    pub fn minimal() -> Self {
        Self {
            db: DbConfig {
                path: PathBuf::from("./data/leads.sqlite"),
            },
            console: ConsoleConfig::default(),
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.db.path.as_os_str().is_empty() {
        anyhow::bail!("db.path must not be empty");
    }

    if config.console.latency_ms > MAX_LATENCY_MS {
        anyhow::bail!("console.latency_ms must be <= {}", MAX_LATENCY_MS);
    }

    match config.logging.level.as_str() {
        "error" | "warn" | "info" | "debug" | "trace" => {}
        other => anyhow::bail!(
            "Unknown logging level: '{}'. Must be error, warn, info, debug, or trace.",
            other
        ),
    }

    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`Config::minimal`].
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::minimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("leads.toml");
        std::fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let (_tmp, path) = write_config("[db]\npath = \"./x.sqlite\"\n");
        let config = load_config(&path).unwrap();
        assert_eq!(config.console.latency_ms, 0);
        assert_eq!(config.export.path, PathBuf::from("leads.csv"));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_full_config() {
        let (_tmp, path) = write_config(
            r#"
[db]
path = "./data/leads.sqlite"

[console]
latency_ms = 300

[export]
path = "out/leads.csv"

[logging]
level = "debug"
"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.console.latency(), Duration::from_millis(300));
        assert_eq!(config.export.path, PathBuf::from("out/leads.csv"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_rejects_bad_logging_level() {
        let (_tmp, path) = write_config("[db]\npath = \"x\"\n[logging]\nlevel = \"loud\"\n");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("logging level"));
    }

    #[test]
    fn test_rejects_excessive_latency() {
        let (_tmp, path) = write_config("[db]\npath = \"x\"\n[console]\nlatency_ms = 60000\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tmp = TempDir::new().unwrap();
        let config = load_or_default(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.db.path, PathBuf::from("./data/leads.sqlite"));
    }
}
