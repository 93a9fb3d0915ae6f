//! Authority-level context for building state instructions from derived address data.

use keystone_interface::{
    instructions::Initialize,
    state::SYSTEM_PROGRAM_ID,
};
use solana_address::Address;
use solana_instruction::Instruction;

use crate::pda::find_state_address;

/// The authority and its derived state account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateContext {
    pub authority: Address,
    pub state_account: Address,
    pub bump: u8,
}

impl StateContext {
    pub fn new(authority: Address) -> Self {
        let (state_account, bump) = find_state_address(&authority);
        Self {
            authority,
            state_account,
            bump,
        }
    }

    pub fn initialize(&self) -> Instruction {
        Initialize {
            authority: self.authority,
            state_account: self.state_account,
            system_program: SYSTEM_PROGRAM_ID,
        }
        .create_instruction()
    }
}

#[cfg(test)]
mod tests {
    use keystone_interface::instructions::StateInstruction;

    use super::*;

    #[test]
    fn initialize_instruction_layout() {
        let ctx = StateContext::new(Address::new_unique());
        let ix = ctx.initialize();

        assert_eq!(ix.program_id, keystone_interface::program::ID);
        assert_eq!(ix.data, vec![StateInstruction::Initialize as u8]);
        assert_eq!(ix.accounts.len(), 3);

        assert_eq!(ix.accounts[0].pubkey, ctx.authority);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, ctx.state_account);
        assert!(!ix.accounts[1].is_signer && ix.accounts[1].is_writable);
        assert_eq!(ix.accounts[2].pubkey, SYSTEM_PROGRAM_ID);
        assert!(!ix.accounts[2].is_signer && !ix.accounts[2].is_writable);
    }
}
