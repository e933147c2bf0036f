//! Configuration module for Spindel
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Only `[crawler].seed` is required; every other key has a default.
//!
//! # Example
//!
//! ```no_run
//! use spindel::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("spindel.toml")).unwrap();
//! println!("Crawler will use {} fetch workers", config.crawler.fetch_workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, LoggingConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub use validation::validate;
