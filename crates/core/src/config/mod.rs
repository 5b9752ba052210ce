//! Configuration loading and schema definitions
//!
//! One TOML file configures matching, planning, browse lists, storage and logging.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
