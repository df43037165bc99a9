//! Command-line interface for srcveto
//!
//! Thin clap front end over the filter, the reference pipeline and the
//! configuration layer.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};

pub mod commands;
mod output;

pub use output::Output;

use crate::config::SrcvetoConfig;

/// srcveto - veto ARM-specific LVGL sources before they reach the compiler
#[derive(Parser)]
#[command(name = "srcveto", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the decision for literal paths (no filesystem access)
    Check(commands::check::CheckArgs),
    /// Discover sources under a directory and run them through the filter
    Scan(commands::scan::ScanArgs),
    /// List the active exclusion rules
    Rules(commands::rules::RulesArgs),
    /// Configuration management
    Config(commands::config::ConfigArgs),
    /// Show version information
    Version(commands::version::VersionArgs),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("Failed to change directory to {dir}"))?;
        }

        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        let Some(command) = self.command else {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            return Ok(());
        };

        let load_config = || SrcvetoConfig::load_with_custom_config(self.config.as_deref());

        match command {
            Commands::Check(args) => {
                commands::check::execute(args, &load_config()?.settings()?, &output)
            }
            Commands::Scan(args) => {
                commands::scan::execute(args, &load_config()?.settings()?, &output)
            }
            Commands::Rules(args) => {
                commands::rules::execute(args, &load_config()?.settings()?, &output)
            }
            Commands::Config(args) => commands::config::execute(args, &load_config()?),
            Commands::Version(args) => commands::version::execute(args),
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info,globset=warn",
            2 => "debug,globset=warn",
            _ => "trace",
        })
    });

    // Logs go to stderr so `scan --format files` output stays pipeable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
