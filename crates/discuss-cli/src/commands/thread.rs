//! Thread command
//!
//! Print the visible comment tree of a resource.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use discuss_core::comment::{Alignment, Comment};
use discuss_core::types::ResourceRef;

use super::context::Services;

/// Thread command arguments
#[derive(Debug, Args)]
pub struct ThreadArgs {
    /// Resource whose thread to show, as KIND:ID
    pub resource: ResourceRef,

    /// Print rendered HTML instead of the raw body
    #[arg(long)]
    pub html: bool,
}

/// Execute the thread command
pub fn execute(args: ThreadArgs, services: &Services) -> Result<()> {
    let top_level = services.tree.comments_on(&args.resource)?;

    println!("{}", args.resource.to_string().bold().underline());
    if top_level.is_empty() {
        println!("No comments yet.");
        return Ok(());
    }

    for comment in &top_level {
        print_subtree(services, comment, args.html)?;
    }

    if let Some(authors) = services
        .tree
        .commentator_ids_in(std::slice::from_ref(&args.resource))?
    {
        let names: Vec<_> = authors.iter().map(|a| a.as_str()).collect();
        println!();
        println!("{} {}", "Commentators:".dimmed(), names.join(", "));
    }
    Ok(())
}

fn print_subtree(services: &Services, comment: &Comment, html: bool) -> Result<()> {
    let indent = "  ".repeat(comment.depth as usize);
    let tally = services.ledger.tally(&comment.id)?;

    println!(
        "{}{} {} {} {}",
        indent,
        comment.author.as_str().cyan(),
        alignment_marker(comment.alignment),
        format!("[+{} -{}]", tally.up, tally.down).dimmed(),
        comment.id.to_string().dimmed()
    );

    let body = if html {
        services.formatter.format_comment(comment)
    } else {
        comment.body.clone()
    };
    for line in body.lines() {
        println!("{}  {}", indent, line);
    }

    for reply in services.tree.threads_of(comment)? {
        print_subtree(services, &reply, html)?;
    }
    Ok(())
}

fn alignment_marker(alignment: Alignment) -> colored::ColoredString {
    match alignment {
        Alignment::InFavor => "(in favor)".green(),
        Alignment::Against => "(against)".red(),
        Alignment::Neutral => "".normal(),
    }
}
