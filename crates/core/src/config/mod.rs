//! Configuration loading and schema definitions
//!
//! One TOML file configures the geocoder client, the matching engine, fare
//! allocation and logging.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
