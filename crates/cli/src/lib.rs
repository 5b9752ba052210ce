//! Terminal output for the Nutrilog CLI
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Food, nutrient and search-quality formatting

#![warn(missing_docs)]

pub mod output;
