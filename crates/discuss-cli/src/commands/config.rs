//! Config command
//!
//! Show the effective configuration.

use anyhow::Result;
use clap::Args;

use super::context::Settings;

/// Config command arguments
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Show as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the config command
pub fn execute(args: ConfigArgs, settings: &Settings) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(settings)?);
    } else {
        print!("{}", settings.to_toml_string()?);
    }
    Ok(())
}
