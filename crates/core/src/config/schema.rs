//! Configuration schema definitions
//!
//! Every section defaults independently, so a partial `.nutrilog.toml` is valid.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub browse: BrowseConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.index.validate()?;
        self.search.validate()?;
        self.browse.validate()
    }
}

/// Fuzzy index matching options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Weight of the `name` field
    #[serde(default = "default_name_weight")]
    pub name_weight: f64,

    /// Weight of the `tags` field
    #[serde(default = "default_tags_weight")]
    pub tags_weight: f64,

    /// Fragments shorter than this never match
    #[serde(default = "default_min_match_char_length")]
    pub min_match_char_length: usize,

    /// Character distance over which a match location costs a full score point
    #[serde(default = "default_distance")]
    pub distance: usize,

    /// Score matches without regard to where they occur in the field
    #[serde(default = "default_true")]
    pub ignore_location: bool,

    /// Expected match position when location is not ignored
    #[serde(default)]
    pub location: usize,

    /// Per-field cutoff; field matches scoring above it are not hits
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,

    /// Skip the field-length normalisation of scores
    #[serde(default)]
    pub ignore_field_norm: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name_weight: default_name_weight(),
            tags_weight: default_tags_weight(),
            min_match_char_length: default_min_match_char_length(),
            distance: default_distance(),
            ignore_location: true,
            location: 0,
            match_threshold: default_match_threshold(),
            ignore_field_norm: false,
        }
    }
}

impl IndexConfig {
    fn validate(&self) -> Result<()> {
        if !(self.name_weight > 0.0 && self.tags_weight > 0.0) {
            return Err(Error::config_invalid("index weights must be greater than 0"));
        }
        if self.min_match_char_length == 0 {
            return Err(Error::config_invalid(
                "index.min_match_char_length must be at least 1",
            ));
        }
        if !(self.match_threshold > 0.0 && self.match_threshold <= 1.0) {
            return Err(Error::config_invalid(
                "index.match_threshold must be in (0, 1]",
            ));
        }
        if !self.ignore_location && self.distance == 0 {
            return Err(Error::config_invalid(
                "index.distance must be positive when location is scored",
            ));
        }
        Ok(())
    }
}

fn default_name_weight() -> f64 {
    1.0
}

fn default_tags_weight() -> f64 {
    0.5
}

fn default_min_match_char_length() -> usize {
    2
}

fn default_distance() -> usize {
    50
}

fn default_match_threshold() -> f64 {
    0.6
}

fn default_true() -> bool {
    true
}

/// Query planning options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Index hits must score strictly below this to be kept
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f64,

    /// Maximum results on the index path
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Maximum results on the substring fallback path
    #[serde(default = "default_fallback_limit")]
    pub fallback_limit: usize,

    /// Queries shorter than this skip the fallback path
    #[serde(default = "default_fallback_min_chars")]
    pub fallback_min_chars: usize,

    /// Idle window before a query is executed
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            quality_threshold: default_quality_threshold(),
            max_results: default_max_results(),
            fallback_limit: default_fallback_limit(),
            fallback_min_chars: default_fallback_min_chars(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<()> {
        if !(self.quality_threshold > 0.0 && self.quality_threshold <= 1.0) {
            return Err(Error::config_invalid(
                "search.quality_threshold must be in (0, 1]",
            ));
        }
        if self.max_results == 0 || self.fallback_limit == 0 {
            return Err(Error::config_invalid(
                "search.max_results and search.fallback_limit must be positive",
            ));
        }
        Ok(())
    }
}

fn default_quality_threshold() -> f64 {
    0.5
}

fn default_max_results() -> usize {
    20
}

fn default_fallback_limit() -> usize {
    10
}

fn default_fallback_min_chars() -> usize {
    2
}

fn default_debounce_ms() -> u64 {
    150
}

/// Browse (no active query) list sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseConfig {
    #[serde(default = "default_list_limit")]
    pub popular_limit: usize,

    #[serde(default = "default_list_limit")]
    pub recent_limit: usize,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            popular_limit: default_list_limit(),
            recent_limit: default_list_limit(),
        }
    }
}

impl BrowseConfig {
    fn validate(&self) -> Result<()> {
        if self.popular_limit == 0 || self.recent_limit == 0 {
            return Err(Error::config_invalid("browse limits must be positive"));
        }
        Ok(())
    }
}

fn default_list_limit() -> usize {
    8
}

/// Catalog storage location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path of the JSON catalog file
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> String {
    "catalog.json".to_string()
}

/// Log output options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
