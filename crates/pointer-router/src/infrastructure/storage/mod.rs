//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML configuration file, resolves where
//! it lives, and falls back to defaults when no file exists yet.

pub mod config;
