//! Demo configuration, read from TOML.
//!
//! Every key is optional; the defaults give the classic walkthrough
//! (lines of length 10, 20 and 40, a four-element vector).
//!
//! ```toml
//! [scalar]
//! first = 10
//! second = 20
//! fourth = 40
//!
//! [array]
//! len = 4
//! fill = 1.5
//!
//! [output]
//! color = true
//! json_logs = false
//! log_filter = "warn"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Upper bound on `array.len`, the demo prints every element.
pub const MAX_DEMO_LEN: usize = 1 << 16;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("value {value} for field '{field}' is out of range (min: {min}, max: {max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("invalid value for field '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScalarConfig {
    pub first: i32,
    pub second: i32,
    pub fourth: i32,
}

impl Default for ScalarConfig {
    fn default() -> Self {
        Self {
            first: 10,
            second: 20,
            fourth: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrayConfig {
    pub len: usize,
    pub fill: f64,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self { len: 4, fill: 1.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub color: bool,
    pub json_logs: bool,
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    pub log_filter: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            json_logs: false,
            log_filter: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    pub scalar: ScalarConfig,
    pub array: ArrayConfig,
    pub output: OutputConfig,
}

impl DemoConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_DEMO_LEN).contains(&self.array.len) {
            return Err(ConfigError::OutOfRange {
                field: "array.len",
                value: i64::try_from(self.array.len).unwrap_or(i64::MAX),
                min: 1,
                max: MAX_DEMO_LEN as i64,
            });
        }

        if !self.array.fill.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "array.fill",
                reason: format!("{} is not a finite number", self.array.fill),
            });
        }

        if self.output.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output.log_filter",
                reason: "must not be empty".to_string(),
            });
        }

        // The demos compute first + second and fourth + second.
        let ScalarConfig {
            first,
            second,
            fourth,
        } = self.scalar;
        let sums = [
            ("scalar.second", i64::from(first) + i64::from(second)),
            ("scalar.fourth", i64::from(fourth) + i64::from(second)),
        ];
        for (field, value) in sums {
            if i32::try_from(value).is_err() {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    min: i64::from(i32::MIN),
                    max: i64::from(i32::MAX),
                });
            }
        }

        Ok(())
    }
}
