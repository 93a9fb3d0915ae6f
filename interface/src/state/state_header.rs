//! See [`StateHeader`].

use solana_address::Address;
use static_assertions::const_assert_eq;

use crate::{
    error::{
        StateError,
        StateResult,
    },
    state::{
        transmutable::Transmutable,
        LeU64,
    },
};

pub const STATE_ACCOUNT_DISCRIMINANT: u64 = 0x5ea1ed57a7eb00d5u64;

/// The entire data region of an initialized state account.
///
/// The account carries no program-defined payload beyond the marker discriminant and the
/// authority that paid for and initialized it.
#[repr(C)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateHeader {
    /// The u64 state account discriminant as LE bytes.
    discriminant: LeU64,
    /// The signer that initialized the state account.
    pub authority: Address,
    /// The canonical bump for the state account PDA.
    pub bump: u8,
    _padding: [u8; 7],
}

// Safety:
//
// - Stable layout with `#[repr(C)]`.
// - `size_of` and `align_of` are checked below.
// - All bit patterns are valid.
unsafe impl Transmutable for StateHeader {
    #[allow(clippy::identity_op)]
    const LEN: usize = 0
    /* discriminant */ + size_of::<LeU64>()
    /* authority */    + size_of::<Address>()
    /* bump */         + size_of::<u8>()
    /* _padding */     + size_of::<[u8; 7]>();

    fn validate_bit_patterns(_bytes: &[u8]) -> StateResult {
        Ok(())
    }
}

const_assert_eq!(StateHeader::LEN, size_of::<StateHeader>());
const_assert_eq!(StateHeader::LEN, 48);
const_assert_eq!(align_of::<StateHeader>(), 1);

impl StateHeader {
    pub fn new(authority: Address, bump: u8) -> Self {
        Self {
            discriminant: STATE_ACCOUNT_DISCRIMINANT.to_le_bytes(),
            authority,
            bump,
            _padding: [0; 7],
        }
    }

    /// Writes a fresh header over `zeroed_data`, which must be exactly [`StateHeader::LEN`] bytes.
    pub fn init(
        zeroed_data: &mut [u8],
        authority: Address,
        bump: u8,
    ) -> Result<&mut StateHeader, StateError> {
        let header = StateHeader::load_mut(zeroed_data)?;
        *header = StateHeader::new(authority, bump);
        Ok(header)
    }

    /// Loads the header from account data and checks the discriminant.
    pub fn load_initialized(data: &[u8]) -> Result<&StateHeader, StateError> {
        let header = StateHeader::load(data)?;
        if !header.is_initialized() {
            return Err(StateError::AccountNotInitialized);
        }
        Ok(header)
    }

    #[inline(always)]
    pub fn discriminant(&self) -> u64 {
        u64::from_le_bytes(self.discriminant)
    }

    #[inline(always)]
    pub fn is_initialized(&self) -> bool {
        self.discriminant() == STATE_ACCOUNT_DISCRIMINANT
    }
}
