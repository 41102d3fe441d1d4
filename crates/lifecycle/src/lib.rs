//! Item lifecycle commands and the item read model.
//!
//! Every command runs as one transaction: the item row is read
//! `FOR UPDATE`, the requested change is validated against the transition
//! table, fields are mutated, history is appended, and the transaction
//! commits. Any failure before commit leaves the item and its history
//! untouched.

pub mod commands;
pub mod error;
pub mod queries;

mod history;

pub use error::{CommandError, CommandResult};
