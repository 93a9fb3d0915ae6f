//! Seeds for the program-derived state account address.

/// The static prefix seed for every state account PDA.
pub const STATE_SEED_PREFIX: &[u8] = b"state";

/// The seed slices for the state account PDA owned by `authority`, without the bump.
#[macro_export]
macro_rules! state_seeds {
    ($authority:expr) => {
        &[$crate::seeds::STATE_SEED_PREFIX, $authority.as_ref()]
    };
}
