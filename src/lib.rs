//! braidcfg - Typed configuration loader for layer-parallel network training
//!
//! Reads line-oriented `key = value` files into an order-preserving table of
//! integer, float and string parameters checked against a fixed schema, and
//! writes tables back out in the same format.

pub mod cli;
pub mod config;
pub mod logging;

pub use config::*;

/// Result type alias for braidcfg operations
pub type Result<T> = anyhow::Result<T>;

/// Error types surfaced by the braidcfg command-line tool
#[derive(thiserror::Error, Debug)]
pub enum BraidCfgError {
    #[error(transparent)]
    Parse(#[from] ConfigParseError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Unrecognized config parameter: {0}")]
    UnknownParameter(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}
