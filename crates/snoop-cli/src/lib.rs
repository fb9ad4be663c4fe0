//! Snoop CLI - find webpack chunk loaders and enumerate the chunks they load.
//!
//! This crate wires `snoop-core` into a command-line tool: input discovery, layered
//! configuration, parallel scanning, report rendering and optional chunk fetching.
//!
//! # Architecture
//!
//! - [`cli`] - Argument definitions (clap)
//! - [`config`] - `snoop.config.json` / `SNOOP_*` / CLI layering (figment) and validation
//! - [`inputs`] - File and directory input discovery (walkdir + globset)
//! - [`analysis`] - Per-file scanning, parallel across files (rayon)
//! - [`report`] - Text and JSON output
//! - [`fetch`] - Bounded concurrent chunk requests (reqwest + tokio)
//! - [`commands`] - The scan command tying it together
//! - [`error`] / [`logger`] - Error types and tracing setup
//!
//! # Example
//!
//! ```rust
//! use snoop_cli::analysis::analyze_source;
//! use snoop_core::BoaEvaluator;
//!
//! let reports = analyze_source(r#"r.u = e => ({ 7: "seven.js" })[e];"#, &BoaEvaluator::default())?;
//! assert_eq!(reports[0].entries[0].to_string(), "7: seven.js");
//! # Ok::<(), snoop_core::SnoopError>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetch;
pub mod inputs;
pub mod logger;
pub mod report;

pub use error::{CliError, ConfigError, Result};
