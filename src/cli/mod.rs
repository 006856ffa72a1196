//! Command-line interface for braidcfg
//!
//! Inspect, validate, edit and normalize training configuration files.

use crate::{
    config::{coerce_value, ConfigParser, ConfigTable, SchemaRegistry, ValueKind},
    trace_performance, BraidCfgError, Result,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// braidcfg command-line interface
#[derive(Parser)]
#[command(name = "braidcfg")]
#[command(about = "Inspect and edit key = value training configuration files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct BraidCfgCli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable JSON output for machine-readable results
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every recognized parameter in file order
    Show {
        /// Configuration file path
        file: PathBuf,
    },

    /// Print a single parameter value
    Get {
        /// Configuration file path
        file: PathBuf,

        /// Parameter name
        key: String,
    },

    /// Set a parameter and rewrite the existing file
    Set {
        /// Configuration file path (must already exist)
        file: PathBuf,

        /// Parameter name
        key: String,

        /// New value, coerced to the parameter's declared type
        value: String,
    },

    /// Parse a file and report problems
    Check {
        /// Configuration file path
        file: PathBuf,

        /// Treat unrecognized parameters as errors
        #[arg(long)]
        strict: bool,
    },

    /// Write a normalized copy of a configuration file
    Dump {
        /// Configuration file path
        file: PathBuf,

        /// Output file path (created or truncated)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List recognized parameters
    Schema {
        /// Only list parameters of this kind (integer, float, string)
        #[arg(short, long)]
        kind: Option<ValueKind>,
    },
}

/// CLI command executor
pub struct BraidCfgCliExecutor {
    registry: &'static SchemaRegistry,
    json_output: bool,
}

impl BraidCfgCliExecutor {
    pub fn new(json_output: bool) -> Self {
        Self {
            registry: SchemaRegistry::global(),
            json_output,
        }
    }

    /// Execute a CLI command
    pub fn execute(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Show { file } => self.show(&file),
            Commands::Get { file, key } => self.get(&file, &key),
            Commands::Set { file, key, value } => self.set(&file, &key, &value),
            Commands::Check { file, strict } => self.check(&file, strict),
            Commands::Dump { file, output } => self.dump(&file, &output),
            Commands::Schema { kind } => self.schema(kind),
        }
    }

    fn load(&self, file: &Path) -> Result<(ConfigTable, Vec<String>)> {
        let mut parser = ConfigParser::new(self.registry);
        let mut table = trace_performance!("parse_config", {
            parser.parse_file(file).map_err(BraidCfgError::from)?
        });
        table.set_path(file);

        for key in parser.skipped_keys() {
            warn!(key = %key, file = %file.display(), "Ignoring unrecognized parameter");
        }

        Ok((table, parser.skipped_keys().to_vec()))
    }

    fn show(&self, file: &Path) -> Result<()> {
        let (table, _) = self.load(file)?;

        if self.json_output {
            let entries: serde_json::Map<String, serde_json::Value> = table
                .iter()
                .map(|(key, value)| (key.to_string(), json!(value)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            println!("{}", table);
        }

        Ok(())
    }

    fn get(&self, file: &Path, key: &str) -> Result<()> {
        let (table, _) = self.load(file)?;
        let value = table.lookup(key).map_err(BraidCfgError::from)?;

        if self.json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "key": key,
                    "kind": value.kind(),
                    "value": value,
                }))?
            );
        } else {
            println!("{}", value);
        }

        Ok(())
    }

    fn set(&self, file: &Path, key: &str, value: &str) -> Result<()> {
        let typed = coerce_value(self.registry, key, value.trim())
            .map_err(BraidCfgError::from)?
            .ok_or_else(|| BraidCfgError::UnknownParameter(key.to_string()))?;

        let (mut table, _) = self.load(file)?;
        debug!(key, value = %typed, "Setting parameter");
        table.set(key, typed);
        table.overwrite_existing("").map_err(BraidCfgError::from)?;

        info!(key, file = %file.display(), "Updated config file");
        Ok(())
    }

    fn check(&self, file: &Path, strict: bool) -> Result<()> {
        let (table, skipped) = self.load(file)?;

        if self.json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "file": file.display().to_string(),
                    "parameters": table.len(),
                    "unrecognized": skipped,
                }))?
            );
        } else {
            println!("{}: {} parameters", file.display(), table.len());
            for key in &skipped {
                println!("  unrecognized: {}", key);
            }
        }

        if strict && !skipped.is_empty() {
            return Err(BraidCfgError::UnknownParameter(skipped.join(", ")).into());
        }

        Ok(())
    }

    fn dump(&self, file: &Path, output: &Path) -> Result<()> {
        let (table, _) = self.load(file)?;
        table.dump(output).map_err(BraidCfgError::from)?;

        if !self.json_output {
            println!("Wrote {} parameters to {}", table.len(), output.display());
        }

        Ok(())
    }

    fn schema(&self, kind: Option<ValueKind>) -> Result<()> {
        let kinds = match kind {
            Some(kind) => vec![kind],
            None => vec![ValueKind::Integer, ValueKind::Float, ValueKind::String],
        };

        if self.json_output {
            let listing: serde_json::Map<String, serde_json::Value> = kinds
                .iter()
                .map(|kind| (kind.to_string(), json!(self.registry.parameters(*kind))))
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            for kind in kinds {
                for name in self.registry.parameters(kind) {
                    println!("{:<28}{}", name, kind);
                }
            }
        }

        Ok(())
    }
}
