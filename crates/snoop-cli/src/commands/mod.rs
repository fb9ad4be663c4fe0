//! Command implementations for the Snoop CLI.
//!
//! - [`run`] - Scan inputs, print loaders and their chunks, optionally fetch the chunks

pub mod run;

pub use run::execute as run_execute;
