// shelfkeep-core/src/config.rs
//! Run-time settings for catalog front ends
//!
//! All fields have defaults, so an empty `{}` config file is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::logging::LogLevel;

pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;
pub const DEFAULT_TOP_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CatalogConfig {
    /// Stock strictly below this counts as low
    pub low_stock_threshold: i64,

    /// Entries returned by most-rated style rankings
    pub top_limit: usize,

    pub log_level: LogLevel,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            top_limit: DEFAULT_TOP_LIMIT,
            log_level: LogLevel::default(),
        }
    }
}

impl CatalogConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn with_low_stock_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    pub fn with_top_limit(mut self, limit: usize) -> Self {
        self.top_limit = limit;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}
