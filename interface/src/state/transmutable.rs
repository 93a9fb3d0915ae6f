// Derived from `pinocchio-token-interface` – commit 75116550519a9ee3fdfa6c819aca91e383fffa39, Apache-2.0.
// Substantial modifications by DASMAC, 2025:
// - Removed `Initializable` trait
// - Moved `load_*` functions to trait methods with validation contract
// - Added validate_bit_patterns requirement
// - Made load/load_mut safe for callers
// Further modified for keystone: errors report `StateError`.
// Original: https://github.com/solana-program/token/blob/75116550519a9ee3fdfa6c819aca91e383fffa39/p-interface/src/state/mod.rs

use crate::error::{StateError, StateResult};

/// Marker trait for a zero-copy view of account bytes as `&Self` via an unchecked cast.
///
/// # Safety
///
/// Implementor guarantees:
/// - `Self` has a stable layout; i.e. `#[repr(C)]` or `#[repr(transparent)]`
/// - `size_of::<Self> == LEN`
/// - `align_of::<Self> == 1`
/// - `validate_bit_patterns` returns `Ok(())` only when `bytes` is a valid representation of `Self`
pub unsafe trait Transmutable: Sized {
    /// The cumulative size in bytes of all fields in the struct.
    const LEN: usize;

    /// Validates that `bytes` represents a valid `Self`. Only called once `bytes.len() == LEN`.
    fn validate_bit_patterns(bytes: &[u8]) -> StateResult;

    /// Returns a reference to `Self` after checking the byte length and bit patterns.
    #[inline(always)]
    fn load(bytes: &[u8]) -> Result<&Self, StateError> {
        if bytes.len() != Self::LEN {
            return Err(StateError::InsufficientByteLength);
        }
        Self::validate_bit_patterns(bytes)?;

        // Safety: All bit patterns were validated and `bytes.len() == Self::LEN`.
        unsafe { Ok(&*(bytes.as_ptr() as *const Self)) }
    }

    /// Returns a mutable reference to `Self` after checking the byte length and bit patterns.
    #[inline(always)]
    fn load_mut(bytes: &mut [u8]) -> Result<&mut Self, StateError> {
        if bytes.len() != Self::LEN {
            return Err(StateError::InsufficientByteLength);
        }
        Self::validate_bit_patterns(bytes)?;

        // Safety: All bit patterns were validated and `bytes.len() == Self::LEN`.
        unsafe { Ok(&mut *(bytes.as_mut_ptr() as *mut Self)) }
    }
}
