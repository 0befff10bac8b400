//! Post command
//!
//! Create a top-level comment or a reply.

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Args};
use colored::Colorize;

use discuss_core::types::{AuthorId, CommentId, CommentableRef, ResourceRef};

use super::context::Services;

/// Post command arguments
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("target").required(true).args(["resource", "reply_to"])))]
pub struct PostArgs {
    /// Resource to comment on, as KIND:ID
    #[arg(long)]
    pub resource: Option<ResourceRef>,

    /// Comment to reply to
    #[arg(long)]
    pub reply_to: Option<String>,

    /// Author identity
    #[arg(long)]
    pub author: String,

    /// Position on the resource: -1 against, 0 neutral, 1 in favor
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub alignment: i8,

    /// Comment body
    pub body: String,
}

/// Execute the post command
pub fn execute(args: PostArgs, services: &Services) -> Result<()> {
    let commentable = match (args.resource, args.reply_to) {
        (Some(resource), _) => CommentableRef::Resource(resource),
        (None, Some(id)) => CommentableRef::comment(parse_comment_id(&id)?),
        (None, None) => bail!("either --resource or --reply-to is required"),
    };

    let comment = services.tree.create(
        args.body,
        AuthorId::from_string(args.author),
        commentable,
        args.alignment,
    )?;
    let recipients = services.recipients.recipients_for(&comment)?;

    println!("{}", comment.id);
    println!("  {} {}", "depth:".dimmed(), comment.depth);
    println!("  {} {}", "thread:".dimmed(), comment.root_commentable);
    println!(
        "  {} {}",
        "notify:".dimmed(),
        recipients
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

pub(crate) fn parse_comment_id(id: &str) -> Result<CommentId> {
    CommentId::from_string(id).with_context(|| format!("Invalid comment ID '{}'", id))
}
