//! Configuration module for the framecrop pipeline
//!
//! Provides types and parsing for `fcrop.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
