use keystone_interface::state_seeds;
use solana_address::Address;

/// Derives the state account address and canonical bump for `authority`.
pub fn find_state_address(authority: &Address) -> (Address, u8) {
    Address::find_program_address(state_seeds!(authority), &keystone_interface::program::ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_address_is_per_authority() {
        let alice = Address::new_unique();
        let bob = Address::new_unique();

        let (alice_state, alice_bump) = find_state_address(&alice);
        assert_eq!(find_state_address(&alice), (alice_state, alice_bump));
        assert_ne!(find_state_address(&bob).0, alice_state);

        let derived = Address::create_program_address(
            &[b"state", alice.as_ref(), &[alice_bump]],
            &keystone_interface::program::ID,
        )
        .unwrap();
        assert_eq!(derived, alice_state);
    }
}
