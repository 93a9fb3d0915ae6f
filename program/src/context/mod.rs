//! Account context definitions for each instruction.
//!
//! Each context groups and validates the accounts required by its corresponding instruction before
//! execution.

pub mod initialize_context;
