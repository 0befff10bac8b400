//! CLI commands module

pub mod config;
pub mod context;
pub mod post;
pub mod render;
pub mod thread;
pub mod vote;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// discuss - threaded comments, votes and comment rendering
#[derive(Debug, Parser)]
#[command(name = "discuss")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DISCUSS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data directory, overrides `storage.data_dir`
    #[arg(long, global = true, env = "DISCUSS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a comment body to HTML
    Render(render::RenderArgs),

    /// Post a comment on a resource or a reply to a comment
    Post(post::PostArgs),

    /// Show the comment thread of a resource
    Thread(thread::ThreadArgs),

    /// Vote on a comment
    Vote(vote::VoteArgs),

    /// Show the effective configuration
    Config(config::ConfigArgs),
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let settings = context::Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Render(args) => render::execute(args, &settings),
        Commands::Config(args) => config::execute(args, &settings),
        Commands::Post(args) => post::execute(args, &settings.open(cli.data_dir)?),
        Commands::Thread(args) => thread::execute(args, &settings.open(cli.data_dir)?),
        Commands::Vote(args) => vote::execute(args, &settings.open(cli.data_dir)?),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::try_from_env("DISCUSS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_vote_requires_direction() {
        let id = "6f1c1a0e-8c1b-4a57-9a53-0d1e2f3a4b5c";
        assert!(Cli::try_parse_from(["discuss", "vote", id, "--author", "a"]).is_err());
        assert!(Cli::try_parse_from(["discuss", "vote", id, "--author", "a", "--up", "--down"]).is_err());
        assert!(Cli::try_parse_from(["discuss", "vote", id, "--author", "a", "--down"]).is_ok());
    }

    #[test]
    fn test_post_target_is_exclusive() {
        assert!(Cli::try_parse_from(["discuss", "post", "--author", "a", "body"]).is_err());
        assert!(Cli::try_parse_from([
            "discuss", "post", "--resource", "proposal:1", "--author", "a", "--alignment", "-1", "body"
        ])
        .is_ok());
    }
}
