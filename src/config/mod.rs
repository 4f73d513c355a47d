//! Configuration module for sen.
//!
//! Handles loading and parsing the .senrc configuration file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::docker::discovery::{DEFAULT_COMMAND_TIMEOUT_MS, DEFAULT_TAIL_LINES, default_program};
use crate::logging::LogConfig;

/// Bounds for `command_timeout_ms`.
const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 120_000;

/// Upper bound for `log_tail_lines`.
const MAX_TAIL_LINES: u64 = 100_000;

/// Default .senrc file content with all settings documented.
const DEFAULT_SENRC: &str = r#"# sen Configuration File
# ======================
# This file is read on application startup.
# Lines starting with '#' are comments.
#
# Docker
# ------
# Docker executable name or full path
# docker_command = docker
#
# Timeout for one-shot docker commands (list, inspect), in milliseconds
# command_timeout_ms = 5000
#
# Number of existing log lines shown when opening container logs
# log_tail_lines = 200

# Keys
# ----
# i       Inspect the selected image or container
# l       Follow the logs of the selected container
# p / n   Previous / next view
# x       Close the current view (the list stays open)
# q / Q   Quit
# j / k   Move the cursor (arrows, Home/End, PageUp/PageDown also work)

# Logging Configuration
# ---------------------
# Logs are stored in ~/.sen/logs/ with automatic cleanup.
#
# log_enabled = true       # Enable/disable file logging (true/false)
# log_level = info         # Log level: trace, debug, info, warn, error, off
# log_retention = 24       # Hours to keep log files (default: 24)
"#;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Docker executable.
    pub docker_command: String,
    /// Timeout for one-shot Docker commands in milliseconds.
    pub command_timeout_ms: u64,
    /// Existing log lines fetched when opening logs.
    pub log_tail_lines: u64,
    /// Path to config file.
    pub config_path: PathBuf,
    /// Logging configuration.
    pub log_config: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docker_command: default_program().to_string(),
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
            log_tail_lines: DEFAULT_TAIL_LINES,
            config_path: Self::default_config_path(),
            log_config: LogConfig::default(),
        }
    }
}

impl Config {
    /// Returns the default config file path (~/.senrc).
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".senrc")
    }

    /// Loads configuration from the default path, creating it if it doesn't exist.
    ///
    /// # Errors
    /// Returns error if config cannot be read.
    pub fn load() -> io::Result<Self> {
        let path = Self::default_config_path();
        Self::load_from(&path)
    }

    /// Loads configuration from a specific path.
    ///
    /// # Errors
    /// Returns error if config cannot be read.
    pub fn load_from(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            Self::create_default_config(path)?;
        }

        let content = fs::read_to_string(path)?;
        let mut config = Self {
            config_path: path.to_path_buf(),
            ..Self::default()
        };
        config.parse(&content);

        Ok(config)
    }

    /// Creates the default config file.
    fn create_default_config(path: &Path) -> io::Result<()> {
        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_SENRC.as_bytes())?;
        Ok(())
    }

    /// Parses the config file content.
    fn parse(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                // Remove inline comments
                let value = value.split('#').next().unwrap_or(value).trim();

                self.apply_setting(key, value);
            }
        }
    }

    /// Applies a single setting.
    fn apply_setting(&mut self, key: &str, value: &str) {
        match key {
            "docker_command" | "docker" => {
                if !value.is_empty() {
                    self.docker_command = value.to_string();
                }
            }
            "command_timeout_ms" => {
                if let Ok(ms) = value.parse::<u64>() {
                    self.command_timeout_ms = ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS);
                }
            }
            "log_tail_lines" | "tail_lines" => {
                if let Ok(lines) = value.parse::<u64>() {
                    self.log_tail_lines = lines.min(MAX_TAIL_LINES);
                }
            }
            "log_level" => {
                self.log_config.level = LogConfig::parse_level(value);
            }
            "log_retention" | "log_retention_hours" => {
                self.log_config.retention_hours = LogConfig::parse_retention(value);
            }
            "log_enabled" | "logging" => {
                self.log_config.enabled = parse_bool(value);
            }
            _ => {
                tracing::debug!("Ignoring unknown config key: {}", key);
            }
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "yes" | "1" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::DEFAULT_LOG_RETENTION_HOURS;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join(".senrc");

        let config = Config::load_from(&path).expect("load config");

        assert!(path.exists());
        assert_eq!(config.docker_command, default_program());
        assert_eq!(config.command_timeout_ms, DEFAULT_COMMAND_TIMEOUT_MS);
        assert_eq!(config.log_tail_lines, DEFAULT_TAIL_LINES);
        assert_eq!(config.config_path, path);
    }

    #[test]
    fn test_settings_are_applied() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join(".senrc");
        fs::write(
            &path,
            "# comment\n\
             docker_command = podman\n\
             command_timeout_ms = 2500   # inline\n\
             log_tail_lines = 50\n\
             log_level = DEBUG\n\
             log_enabled = no\n\
             unknown_key = whatever\n",
        )
        .expect("write config");

        let config = Config::load_from(&path).expect("load config");

        assert_eq!(config.docker_command, "podman");
        assert_eq!(config.command_timeout_ms, 2500);
        assert_eq!(config.log_tail_lines, 50);
        assert_eq!(config.log_config.level, "debug");
        assert!(!config.log_config.enabled);
        assert_eq!(config.log_config.retention_hours, DEFAULT_LOG_RETENTION_HOURS);
    }

    #[test]
    fn test_numeric_settings_are_clamped() {
        let mut config = Config::default();
        config.parse("command_timeout_ms = 1\nlog_tail_lines = 999999999");
        assert_eq!(config.command_timeout_ms, MIN_TIMEOUT_MS);
        assert_eq!(config.log_tail_lines, MAX_TAIL_LINES);

        config.parse("command_timeout_ms = 99999999");
        assert_eq!(config.command_timeout_ms, MAX_TIMEOUT_MS);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let mut config = Config::default();
        config.parse("command_timeout_ms = soon\nlog_tail_lines = -3\ndocker_command =");
        assert_eq!(config.command_timeout_ms, DEFAULT_COMMAND_TIMEOUT_MS);
        assert_eq!(config.log_tail_lines, DEFAULT_TAIL_LINES);
        assert_eq!(config.docker_command, default_program());
    }

    #[test]
    fn test_parse_bool() {
        for yes in ["true", "YES", "1", "on"] {
            assert!(parse_bool(yes), "{}", yes);
        }
        for no in ["false", "0", "off", "maybe"] {
            assert!(!parse_bool(no), "{}", no);
        }
    }
}
