//! On-chain program that creates and initializes a single program-owned state account per
//! authority.

#![no_std]

#[cfg(not(feature = "no-entrypoint"))]
mod entrypoint;

pub mod context;
pub mod debug;
pub mod instructions;
pub mod shared;
pub mod validation;

pub use keystone_interface::program::ID;

#[cfg(not(feature = "no-entrypoint"))]
pub use entrypoint::process_instruction;
