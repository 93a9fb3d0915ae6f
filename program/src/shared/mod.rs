//! Shared utilities and helpers for program logic.

pub mod state_account_creation;
