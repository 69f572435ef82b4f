//! Run configuration.
//!
//! [`Config`] carries everything a run needs: input path, worker count, record
//! delimiter, record policy and input strategy. The binary builds it from CLI
//! flags. With the `config` feature, values can also come from a TOML file,
//! by default `<config dir>/rbrc/config.toml`; CLI flags take precedence.

use crate::error::{RbrcError, Result};
use crate::parser::{ParseOptions, RecordPolicy, DEFAULT_DELIMITER};
use crate::source::SourceStrategy;
use std::path::PathBuf;

/// Input path used when none is given
pub const DEFAULT_INPUT: &str = "measurements.txt";

/// Settings for one aggregation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input: PathBuf,
    /// Worker threads; `None` means available parallelism
    pub threads: Option<usize>,
    pub delimiter: u8,
    pub policy: RecordPolicy,
    pub strategy: SourceStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            threads: None,
            delimiter: DEFAULT_DELIMITER,
            policy: RecordPolicy::Strict,
            strategy: SourceStrategy::Auto,
        }
    }
}

impl Config {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            delimiter: self.delimiter,
            policy: self.policy,
        }
    }

    /// Worker threads to use, resolving `None` to the platform's parallelism
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check settings that cannot be expressed in the types alone
    pub fn validate(&self) -> Result<()> {
        if self.threads == Some(0) {
            return Err(RbrcError::invalid_argument("thread count must be at least 1"));
        }
        check_delimiter(self.delimiter)
    }
}

/// Parse a delimiter given as a one-character string
pub fn parse_delimiter(s: &str) -> Result<u8> {
    match s.as_bytes() {
        [byte] => {
            check_delimiter(*byte)?;
            Ok(*byte)
        }
        _ => Err(RbrcError::invalid_argument(format!(
            "delimiter must be a single ASCII character, got {:?}",
            s
        ))),
    }
}

fn check_delimiter(byte: u8) -> Result<()> {
    // Bytes that can appear in a value or terminate a line cannot delimit
    if !byte.is_ascii() || byte.is_ascii_digit() || matches!(byte, b'-' | b'.' | b'\n' | b'\r')
    {
        return Err(RbrcError::invalid_argument(format!(
            "{:?} cannot be used as a delimiter",
            char::from(byte)
        )));
    }
    Ok(())
}

#[cfg(feature = "config")]
pub use file::FileConfig;

#[cfg(feature = "config")]
mod file {
    use super::{parse_delimiter, Config};
    use crate::error::{RbrcError, Result};
    use crate::parser::RecordPolicy;
    use crate::source::SourceStrategy;
    use serde::Deserialize;
    use std::path::{Path, PathBuf};

    /// Settings read from a TOML file; every field is optional
    #[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct FileConfig {
        pub threads: Option<usize>,
        pub delimiter: Option<String>,
        pub lenient: Option<bool>,
        pub strategy: Option<SourceStrategy>,
    }

    impl FileConfig {
        /// `<config dir>/rbrc/config.toml`, if the platform has a config dir
        pub fn default_path() -> Option<PathBuf> {
            dirs::config_dir().map(|dir| dir.join("rbrc").join("config.toml"))
        }

        pub fn from_toml(text: &str) -> Result<Self> {
            toml::from_str(text).map_err(|e| RbrcError::config(e.to_string()))
        }

        pub fn load(path: &Path) -> Result<Self> {
            let text = std::fs::read_to_string(path).map_err(|e| {
                RbrcError::file_error(
                    format!("Failed to read config file: {}", path.display()),
                    e,
                )
            })?;
            Self::from_toml(&text)
        }

        /// Load the file at the default location, or nothing if it is absent
        pub fn load_default() -> Result<Option<Self>> {
            match Self::default_path() {
                Some(path) if path.is_file() => Self::load(&path).map(Some),
                _ => Ok(None),
            }
        }

        /// Copy the values present in the file onto `config`
        pub fn apply_to(&self, config: &mut Config) -> Result<()> {
            if let Some(threads) = self.threads {
                config.threads = Some(threads);
            }
            if let Some(delimiter) = &self.delimiter {
                config.delimiter = parse_delimiter(delimiter)?;
            }
            if let Some(lenient) = self.lenient {
                config.policy = if lenient {
                    RecordPolicy::Lenient
                } else {
                    RecordPolicy::Strict
                };
            }
            if let Some(strategy) = self.strategy {
                config.strategy = strategy;
            }
            Ok(())
        }
    }

}
