//! braidcfg - command-line entry point

use braidcfg::{
    cli::{BraidCfgCli, BraidCfgCliExecutor},
    logging::{init_logging, LogConfig, LogLevel},
    BraidCfgError, Result,
};
use clap::Parser;
use tracing::{debug, error};

fn main() {
    let cli = BraidCfgCli::parse();

    if let Err(e) = run(cli) {
        error!("Command failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: BraidCfgCli) -> Result<()> {
    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }

    init_logging(&log_config).map_err(|e| {
        BraidCfgError::ConfigurationError(format!("Failed to initialize logging: {}", e))
    })?;

    debug!("braidcfg v{}", env!("CARGO_PKG_VERSION"));

    BraidCfgCliExecutor::new(cli.json).execute(cli.command)
}
