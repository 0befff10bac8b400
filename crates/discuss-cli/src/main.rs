//! discuss - threaded comments from the command line
//!
//! ## Quick Start
//!
//! ```bash
//! # Render a comment body
//! echo "> quoted\n\nreply with https://example.org" | discuss render
//!
//! # Start a thread and reply to it
//! discuss post --resource proposal:1 --author alice "First!"
//! discuss post --reply-to <COMMENT_ID> --author bob "Agreed"
//!
//! # Vote and inspect
//! discuss vote <COMMENT_ID> --author carol --up
//! discuss thread proposal:1
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
