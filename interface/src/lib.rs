//! Public interface layer defining the instruction schema, program state layout, and error codes
//! shared by the on-chain program and its clients.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod instructions;
pub mod seeds;
pub mod state;

pub mod program {
    use solana_address::Address;

    pub const ID: Address = Address::from_str_const("acVeuAwGRVKa4i3aTurgynaYQGER9BieHbXTVwdRAWX");
}
