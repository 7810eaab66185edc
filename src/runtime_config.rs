//! # Runtime Configuration Module
//!
//! Router tuning knobs, loaded from a TOML file and/or environment variables.
//!
//! ## Environment Variables
//!
//! ### `ALTR_SLOW_MATCH_US`
//!
//! Matching slower than this many microseconds is logged at WARN as
//! "Slow route matching detected". Default: `1000` (1 ms).
//!
//! ### `ALTR_REGEX_SIZE_LIMIT`
//!
//! Compiled size limit for the combined pattern, in bytes. Accepts values in:
//! - Decimal: `10485760` (10 MiB)
//! - Hexadecimal: `0xA00000` (10 MiB)
//!
//! Default: `0xA00000`, the regex crate's own default. Raise it when many
//! large patterns are registered and compilation fails with a size error.
//!
//! ## TOML
//!
//! ```toml
//! slow_match_threshold_us = 250
//! regex_size_limit = 0x1400000
//! ```
//!
//! Environment variables override file values.

use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_SLOW_MATCH_US: u64 = 1_000;
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Router configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Slow-match warning threshold in microseconds
    pub slow_match_threshold_us: u64,
    /// Compiled size limit for the combined pattern in bytes
    pub regex_size_limit: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            slow_match_threshold_us: DEFAULT_SLOW_MATCH_US,
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Parse a TOML document; unset keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("Failed to parse router config")
    }

    /// Load a TOML file, then apply environment overrides.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read router config: {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to load router config: {}", path.display()))?;
        Ok(config.with_overrides(|key| env::var(key).ok()))
    }

    /// Apply overrides from `lookup`; unparsable values are ignored.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(us) = lookup("ALTR_SLOW_MATCH_US").and_then(|v| v.trim().parse().ok()) {
            self.slow_match_threshold_us = us;
        }
        if let Some(limit) = lookup("ALTR_REGEX_SIZE_LIMIT").and_then(|v| parse_size(&v)) {
            self.regex_size_limit = limit;
        }
        self
    }

    #[must_use]
    pub fn slow_match_threshold(&self) -> Duration {
        Duration::from_micros(self.slow_match_threshold_us)
    }
}

fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    if let Some(hex) = val.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}
