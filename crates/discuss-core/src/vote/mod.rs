//! Comment votes

mod ledger;
mod model;

pub use ledger::VoteLedger;
pub use model::{Vote, VoteTally, VoteWeight};
