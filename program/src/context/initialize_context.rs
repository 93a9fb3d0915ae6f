//! See [`InitializeContext`].

use keystone_interface::{
    error::StateError,
    state::SYSTEM_PROGRAM_ID,
};
use pinocchio::{
    error::ProgramError,
    AccountView,
};

use crate::validation::uninitialized_state_account::UninitializedStateAccount;

/// The account context for the `Initialize` instruction, validating the authority's signature,
/// the system program, and the state PDA before anything is allocated.
#[derive(Clone)]
pub struct InitializeContext<'a> {
    pub authority: &'a AccountView,
    pub state_account: UninitializedStateAccount<'a>,
    pub system_program: &'a AccountView,
}

impl<'a> InitializeContext<'a> {
    pub fn load(accounts: &'a [AccountView]) -> Result<InitializeContext<'a>, ProgramError> {
        let [authority, state_account, system_program, ..] = accounts else {
            return Err(ProgramError::NotEnoughAccountKeys);
        };

        if !authority.is_signer() {
            return Err(StateError::Unauthorized.into());
        }

        if !authority.is_writable() {
            return Err(StateError::AuthorityNotWritable.into());
        }

        if system_program.address() != &SYSTEM_PROGRAM_ID {
            return Err(StateError::IncorrectSystemProgram.into());
        }

        // The system program's own writable checks cover the state account, so only its address,
        // owner, and allocation are validated here.
        let state_account = UninitializedStateAccount::new(authority, state_account)?;

        Ok(Self {
            authority,
            state_account,
            system_program,
        })
    }
}
