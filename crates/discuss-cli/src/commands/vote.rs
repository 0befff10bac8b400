//! Vote command

use anyhow::Result;
use clap::{ArgGroup, Args};
use colored::Colorize;

use discuss_core::types::AuthorId;

use super::context::Services;
use super::post::parse_comment_id;

/// Vote command arguments
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("direction").required(true).args(["up", "down"])))]
pub struct VoteArgs {
    /// Comment ID
    pub comment: String,

    /// Voter identity
    #[arg(long)]
    pub author: String,

    /// Up-vote
    #[arg(long)]
    pub up: bool,

    /// Down-vote
    #[arg(long)]
    pub down: bool,
}

/// Execute the vote command
pub fn execute(args: VoteArgs, services: &Services) -> Result<()> {
    let comment = parse_comment_id(&args.comment)?;
    let weight = if args.up { 1 } else { -1 };

    services
        .ledger
        .cast_vote(&comment, AuthorId::from_string(args.author), weight)?;

    let tally = services.ledger.tally(&comment)?;
    println!(
        "{} {} {}",
        "✓".green(),
        format!("+{}", tally.up).green(),
        format!("-{}", tally.down).red()
    );
    Ok(())
}
