//! tracing subscriber setup shared by the binaries.
//!
//! # Environment Variables
//!
//! - `LOG_LEVEL`: default filter when `RUST_LOG` is not set (default: info)
//! - `LOG_USE_JSON`: emit json lines instead of plain text (default: false)
//! - `LOG_USE_STDOUT`: write to stdout instead of stderr (default: true)
//! - `LOG_FILE_NAME`: append to this file instead of a standard stream

use crate::error::ImmichSearchError;
use anyhow::Result;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub use_json: bool,
    #[serde(default = "default_use_stdout")]
    pub use_stdout: bool,
    #[serde(default)]
    pub file_name: Option<String>,
}

fn default_level() -> String {
    "info".to_string()
}
fn default_use_stdout() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            use_json: false,
            use_stdout: default_use_stdout(),
            file_name: None,
        }
    }
}

pub fn load_tracing_config_from_env() -> Result<LoggingConfig> {
    envy::prefixed("LOG_")
        .from_env::<LoggingConfig>()
        .map_err(|e| {
            ImmichSearchError::ConfigError(format!("cannot read logging config from env: {e:?}"))
                .into()
        })
}

fn make_writer(conf: &LoggingConfig) -> Result<BoxMakeWriter> {
    if let Some(file_name) = &conf.file_name {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_name)
            .map_err(|e| {
                ImmichSearchError::ConfigError(format!("cannot open log file {file_name}: {e:?}"))
            })?;
        Ok(BoxMakeWriter::new(Mutex::new(file)))
    } else if conf.use_stdout {
        Ok(BoxMakeWriter::new(std::io::stdout))
    } else {
        // stdout carries the protocol in stdio mode
        Ok(BoxMakeWriter::new(std::io::stderr))
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn tracing_init(conf: LoggingConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&conf.level))?;
    let writer = make_writer(&conf)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(conf.file_name.is_none() && conf.use_stdout);
    let result = if conf.use_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("tracing init error: {e:?}"))?;
    tracing::debug!("tracing initialized: {:?}", conf);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let conf = LoggingConfig::default();
        assert_eq!(conf.level, "info");
        assert!(!conf.use_json);
        assert!(conf.use_stdout);
        assert!(conf.file_name.is_none());
    }

    #[test]
    fn test_make_writer_opens_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("immich-mcp.log");
        let conf = LoggingConfig {
            file_name: Some(path.to_string_lossy().to_string()),
            ..Default::default()
        };
        make_writer(&conf)?;
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn test_make_writer_rejects_unwritable_path() {
        let conf = LoggingConfig {
            file_name: Some("/nonexistent-dir/immich-mcp.log".to_string()),
            ..Default::default()
        };
        let err = make_writer(&conf).err().expect("should fail");
        assert!(matches!(
            err.downcast_ref::<ImmichSearchError>(),
            Some(ImmichSearchError::ConfigError(_))
        ));
    }
}
