use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::cli::Output;
use crate::config::Settings;
use crate::filter::{Decision, InclusionFilter};

#[derive(Args)]
pub struct CheckArgs {
    /// Paths to evaluate; they do not need to exist
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: CheckFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CheckFormat {
    /// Human-readable text output
    Text,
    /// JSON array of decisions
    Json,
}

#[derive(Serialize)]
struct CheckedPath<'a> {
    path: &'a str,
    #[serde(flatten)]
    decision: Decision,
}

pub fn execute(args: CheckArgs, settings: &Settings, output: &Output) -> Result<()> {
    let filter = InclusionFilter::from_settings(&settings.filter)?;
    let decisions = filter.evaluate_all_parallel(&args.paths);

    match args.format {
        CheckFormat::Text => {
            for (path, decision) in args.paths.iter().zip(decisions) {
                output.decision(path, decision);
            }
        }
        CheckFormat::Json => {
            let report: Vec<CheckedPath> = args
                .paths
                .iter()
                .zip(decisions)
                .map(|(path, decision)| CheckedPath { path, decision })
                .collect();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
