//! Render command
//!
//! Format a raw comment body from a file or stdin.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Read;
use std::path::PathBuf;

use super::context::Settings;

/// Render command arguments
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// File holding the raw body; stdin when omitted or `-`
    pub file: Option<PathBuf>,
}

/// Execute the render command
pub fn execute(args: RenderArgs, settings: &Settings) -> Result<()> {
    let raw = read_input(args.file.as_deref())?;
    println!("{}", settings.formatter().format(&raw));
    Ok(())
}

fn read_input(file: Option<&std::path::Path>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read stdin")?;
            Ok(raw)
        }
    }
}
