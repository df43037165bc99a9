use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};

use crate::config::SrcvetoConfig;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the merged configuration
    Show {
        #[arg(long, value_enum, default_value = "toml")]
        format: ConfigFormat,
    },
    /// Validate the merged configuration
    Validate,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

pub fn execute(args: ConfigArgs, config: &SrcvetoConfig) -> Result<()> {
    match args.command {
        ConfigCommand::Show { format } => {
            let settings = config.settings()?;
            let rendered = match format {
                ConfigFormat::Toml => {
                    toml::to_string_pretty(&settings).context("Failed to render TOML")?
                }
                ConfigFormat::Json => serde_json::to_string_pretty(&settings)?,
                ConfigFormat::Yaml => {
                    serde_yml::to_string(&settings).context("Failed to render YAML")?
                }
            };
            println!("{}", rendered.trim_end());
        }
        ConfigCommand::Validate => {
            config.settings()?;
            println!("Configuration is valid");
        }
    }
    Ok(())
}
