//! Pure domain layer for inventory item (ТМЦ) lifecycle tracking.
//!
//! No I/O lives here: the transition table, history template registry,
//! payload sanitization, lock ownership rules, and input validation are all
//! plain functions over plain values so that the persistence and command
//! layers share a single definition of every business rule.

pub mod actor;
pub mod error;
pub mod history;
pub mod lock;
pub mod payload;
pub mod search;
pub mod status;
pub mod types;
pub mod write_off;
