use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use crate::cli::Output;
use crate::config::Settings;
use crate::discovery::discover_sources;
use crate::filter::{Decision, ExcludeReason, FilterStats, InclusionFilter};
use crate::pipeline::{BuildPipeline, MiddlewareChain, WILDCARD_SCOPE, register};

#[derive(Args)]
pub struct ScanArgs {
    /// Library source root to discover candidate files in
    #[arg(value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ScanFormat,

    /// Only list excluded files
    #[arg(long)]
    pub excluded: bool,

    /// Show statistics after scanning
    #[arg(long)]
    pub stats: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ScanFormat {
    /// Human-readable text output
    Text,
    /// JSON report
    Json,
    /// Plain list of paths, one per line
    Files,
}

#[derive(Serialize)]
struct ExcludedFile {
    path: String,
    reason: ExcludeReason,
}

#[derive(Serialize)]
struct ScanReport {
    root: String,
    included: Vec<String>,
    excluded: Vec<ExcludedFile>,
    stats: FilterStats,
}

pub fn execute(args: ScanArgs, settings: &Settings, output: &Output) -> Result<()> {
    let start = Instant::now();
    let filter = InclusionFilter::from_settings(&settings.filter)?;

    let mut pipeline: MiddlewareChain<PathBuf> = MiddlewareChain::new();
    if settings.pipeline.scope == WILDCARD_SCOPE {
        register(&mut pipeline, &filter)?;
    } else {
        pipeline.add_build_middleware(filter.middleware(), &settings.pipeline.scope)?;
    }
    tracing::info!(
        "Filter attached to scope(s): {}",
        pipeline.scopes().collect::<Vec<_>>().join(", ")
    );

    let candidates = discover_sources(&args.root, &settings.discovery)?;
    let kept = pipeline.process_all(candidates.clone());
    let kept_set: HashSet<&PathBuf> = kept.iter().collect();

    let mut stats = FilterStats::default();
    let mut excluded = Vec::new();
    for candidate in &candidates {
        if kept_set.contains(candidate) {
            stats.record(Decision::Include);
            continue;
        }
        // Nodes outside a narrowed scope are never dropped, so anything
        // missing from `kept` was vetoed by the filter
        let decision = filter.evaluate(candidate);
        stats.record(decision);
        if let Some(reason) = decision.reason() {
            excluded.push(ExcludedFile {
                path: candidate.display().to_string(),
                reason,
            });
        }
    }
    tracing::info!("Scan finished in {:?}", start.elapsed());

    let included: Vec<String> = kept.iter().map(|p| p.display().to_string()).collect();

    match args.format {
        ScanFormat::Files => {
            if args.excluded {
                excluded.iter().for_each(|file| println!("{}", file.path));
            } else {
                included.iter().for_each(|path| println!("{path}"));
            }
        }
        ScanFormat::Json => {
            let report = ScanReport {
                root: args.root.display().to_string(),
                included: if args.excluded { Vec::new() } else { included },
                excluded,
                stats,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ScanFormat::Text => {
            output.header(&format!("Scanning {}", args.root.display()));
            if !args.excluded {
                for path in &included {
                    output.decision(path, Decision::Include);
                }
            }
            for file in &excluded {
                output.decision(&file.path, Decision::Exclude(file.reason));
            }

            output.blank_line();
            if excluded.is_empty() {
                output.success(&format!(
                    "No architecture-specific sources among {} candidates",
                    stats.evaluated
                ));
            } else {
                output.info(&format!(
                    "Excluded {} of {} candidate sources",
                    stats.excluded, stats.evaluated
                ));
            }

            if args.stats {
                output.count("📊", "Filter statistics", stats.evaluated);
                output.summary_stats("Included:", stats.included);
                output.summary_stats("Excluded:", stats.excluded);
                for (reason, count) in &stats.by_reason {
                    output.summary_stats(&format!("  {reason}:"), *count);
                }
                output.verbose(&format!("Elapsed: {:?}", start.elapsed()));
            }
        }
    }
    Ok(())
}
