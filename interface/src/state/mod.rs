//! On-chain state definitions for the program's single state account type.

pub mod state_header;
pub mod transmutable;

pub const U64_SIZE: usize = core::mem::size_of::<u64>();

/// Alias type for a u64 stored as little-endian bytes.
pub type LeU64 = [u8; U64_SIZE];

pub const SYSTEM_PROGRAM_ID: solana_address::Address =
    solana_address::Address::from_str_const("11111111111111111111111111111111");
