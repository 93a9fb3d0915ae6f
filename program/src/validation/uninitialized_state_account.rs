//! See [`UninitializedStateAccount`].

use keystone_interface::{
    error::StateError,
    state::SYSTEM_PROGRAM_ID,
    state_seeds,
};
use pinocchio::{
    AccountView,
    Address,
};

/// Who owns the account passed in the state account slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountOwner {
    ThisProgram,
    SystemProgram,
    Foreign,
}

/// How much of the state account already exists before initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateAllocation {
    /// Nothing exists at the address yet.
    Absent,
    /// A system-owned account with no data already holds lamports at the address.
    PreFunded { lamports: u64 },
}

impl StateAllocation {
    /// The lamports the authority must still pay to make the account rent exempt.
    #[inline(always)]
    pub fn required_lamports(&self, rent_minimum: u64) -> u64 {
        match self {
            StateAllocation::Absent => rent_minimum,
            StateAllocation::PreFunded { lamports } => rent_minimum.saturating_sub(*lamports),
        }
    }
}

/// Decides whether an account can become a state account, and how it must be allocated.
pub fn classify_state_account(
    owner: AccountOwner,
    data_len: usize,
    lamports: u64,
) -> Result<StateAllocation, StateError> {
    match owner {
        AccountOwner::ThisProgram => Err(StateError::AlreadyInitialized),
        AccountOwner::Foreign => Err(StateError::AccountSizeMismatch),
        AccountOwner::SystemProgram if data_len != 0 => Err(StateError::AccountSizeMismatch),
        AccountOwner::SystemProgram if lamports == 0 => Ok(StateAllocation::Absent),
        AccountOwner::SystemProgram => Ok(StateAllocation::PreFunded { lamports }),
    }
}

/// A state account that was verified to be the authority's state PDA and not yet initialized.
#[derive(Clone)]
pub struct UninitializedStateAccount<'a> {
    /// Private so the wrapper can only be built through [`UninitializedStateAccount::new`].
    account: &'a AccountView,
    pub allocation: StateAllocation,
    pub bump: u8,
}

impl<'a> UninitializedStateAccount<'a> {
    /// Checks the PDA derivation for `authority` and then the ownership and allocation of the
    /// account.
    ///
    /// ### Accounts
    ///   0. `[READ]` Authority
    ///   1. `[READ]` State account
    #[inline(always)]
    pub fn new(
        authority: &AccountView,
        account: &'a AccountView,
    ) -> Result<UninitializedStateAccount<'a>, StateError> {
        let (expected, bump) =
            Address::try_find_program_address(state_seeds!(authority.address()), &crate::ID)
                .ok_or(StateError::AddressDerivationFailed)?;

        if account.address() != &expected {
            return Err(StateError::IncorrectStateAddress);
        }

        let owner = if account.owned_by(&crate::ID) {
            AccountOwner::ThisProgram
        } else if account.owned_by(&SYSTEM_PROGRAM_ID) {
            AccountOwner::SystemProgram
        } else {
            AccountOwner::Foreign
        };

        let allocation = classify_state_account(owner, account.data_len(), account.lamports())?;

        Ok(Self {
            account,
            allocation,
            bump,
        })
    }

    #[inline(always)]
    pub fn account(&self) -> &'a AccountView {
        self.account
    }
}
