// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! frameguard type registry inspector
//!
//! # Usage
//!
//! ```bash
//! # List registered data types
//! frameguard-dtypes list
//!
//! # Resolve a string representation
//! frameguard-dtypes resolve bigint
//! frameguard-dtypes resolve "StringType()"
//!
//! # Wrap a native type directly (shows the compatibility warning)
//! frameguard-dtypes wrap "DecimalType(12,2)"
//!
//! # Using a configuration file
//! frameguard-dtypes --config frameguard.toml resolve decimal
//! ```

use clap::{Parser, Subcommand};
use frameguard::{warnings, ConfigError, DataType, Engine, EngineConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// frameguard type registry inspector
#[derive(Parser, Debug)]
#[command(name = "frameguard-dtypes")]
#[command(about = "Inspect and query the frameguard data type registry")]
#[command(version)]
struct Args {
    /// Configuration file path (defaults to FRAMEGUARD_* environment)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered data types in registration order
    List,

    /// Resolve a name or native rendering to its registered data type
    Resolve {
        /// Type name ("bigint") or native rendering ("LongType()")
        repr: String,
    },

    /// Wrap a native rendering directly, bypassing the registry
    Wrap {
        /// Native rendering ("DecimalType(12,2)")
        repr: String,
    },

    /// Generate a configuration file with default values
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "frameguard.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Commands::List => Ok(cmd_list(&load_engine(args.config.as_deref())?)),
        Commands::Resolve { repr } => {
            let engine = load_engine(args.config.as_deref())?;
            Ok(cmd_resolve(&engine, &repr))
        }
        Commands::Wrap { repr } => {
            load_engine(args.config.as_deref())?;
            Ok(cmd_wrap(&repr))
        }
        Commands::GenConfig { output } => cmd_gen_config(&output),
    }
}

/// Build the engine and install its warning action for this process.
fn load_engine(path: Option<&Path>) -> Result<Engine, ConfigError> {
    let config = match path {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::from_env()?,
    };
    if !warnings::set_default_action(config.warnings) {
        log::warn!(
            "[CONFIG] warning action already fixed at {:?}, ignoring configured {:?}",
            warnings::default_action(),
            config.warnings
        );
    }
    Ok(Engine::standard(config))
}

fn cmd_list(engine: &Engine) -> ExitCode {
    println!("{:<12} {:<28} {}", "NAME", "NATIVE", "PARAMETERIZED");
    for data_type in engine.get_registered_dtypes() {
        let native = data_type
            .native_type()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<12} {:<28} {}",
            data_type.name(),
            native,
            if data_type.is_parameterized() { "yes" } else { "no" }
        );
    }
    println!();
    println!("{} data types registered", engine.len());
    ExitCode::SUCCESS
}

fn cmd_resolve(engine: &Engine, repr: &str) -> ExitCode {
    match engine.dtype(repr) {
        Ok(data_type) => {
            print_dtype(&data_type);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("[X] {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_wrap(repr: &str) -> ExitCode {
    match DataType::from_native(repr) {
        Ok(data_type) => {
            print_dtype(&data_type);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("[X] {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_gen_config(output: &Path) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let content = EngineConfig::default().to_toml_string()?;
    std::fs::write(output, content)?;
    println!("[OK] Generated configuration: {}", output.display());
    Ok(ExitCode::SUCCESS)
}

fn print_dtype(data_type: &DataType) {
    println!("name:          {}", data_type.name());
    println!("family:        {}", data_type.family_name());
    match data_type.native_type() {
        Some(native) => println!("native:        {}", native),
        None => println!("native:        -"),
    }
    println!("parameterized: {}", data_type.is_parameterized());
}
