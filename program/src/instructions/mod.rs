//! Instruction handlers for the program.

pub mod initialize;

pub use initialize::process_initialize;
