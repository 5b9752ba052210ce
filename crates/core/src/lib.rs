//! Core types for Nutrilog
//!
//! This crate provides shared functionality used by the search engine, the
//! serving resolver and the CLI:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Food model**: [`FoodRecord`], nutrients per 100 g, serving presets
//! - **Catalog storage**: the [`CatalogStore`] trait with in-memory and JSON-file stores
//! - **Configuration**: TOML-based configuration with validation
//!
//! # Example
//!
//! ```rust,no_run
//! use nutrilog_core::{catalog::{CatalogStore, JsonFileCatalog}, config::Config};
//!
//! # async fn run() -> nutrilog_core::Result<()> {
//! let config = Config::load(None)?;
//! let catalog = JsonFileCatalog::new(&config.schema.catalog.path);
//! let foods = catalog.read_all().await?;
//! println!("{} foods", foods.len());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod food;
pub mod seed;

pub use catalog::{CatalogStore, InMemoryCatalog, JsonFileCatalog};
pub use error::{Error, ErrorCode, Result, ResultExt};
pub use food::{FoodId, FoodRecord, FoodSource, Nutrients, Serving};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{CatalogStore, InMemoryCatalog, JsonFileCatalog};
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::food::{FoodId, FoodRecord, FoodSource, Nutrients, Serving};
}
