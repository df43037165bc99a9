use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::cli::Output;
use crate::config::Settings;
use crate::filter::InclusionFilter;

#[derive(Args)]
pub struct RulesArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: RulesFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RulesFormat {
    Text,
    Json,
}

pub fn execute(args: RulesArgs, settings: &Settings, output: &Output) -> Result<()> {
    let filter = InclusionFilter::from_settings(&settings.filter)?;

    match args.format {
        RulesFormat::Json => println!("{}", serde_json::to_string_pretty(filter.rules())?),
        RulesFormat::Text => {
            output.count("❯", "Active exclusion rules", filter.rules().len());
            if !settings.filter.use_default_rules {
                output.warning("Built-in ARM rules are disabled");
            }
            for rule in filter.rules() {
                let suffix = rule
                    .suffix
                    .as_deref()
                    .map(|s| format!(" and ends with '{s}'"))
                    .unwrap_or_default();
                output.table_row(
                    &rule.name,
                    &format!("contains '{}'{} -> {}", rule.marker, suffix, rule.reason),
                );
            }
        }
    }
    Ok(())
}
