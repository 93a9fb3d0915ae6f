//! Allocation and ownership assignment of the state account through the system program.

use keystone_interface::{
    seeds::STATE_SEED_PREFIX,
    state::{
        state_header::StateHeader,
        transmutable::Transmutable,
    },
};
use pinocchio::{
    cpi::{
        Seed,
        Signer,
    },
    AccountView,
    ProgramResult,
};
use pinocchio_system::instructions::{
    Allocate,
    Assign,
    CreateAccount,
    Transfer,
};

use crate::validation::uninitialized_state_account::{
    StateAllocation,
    UninitializedStateAccount,
};

/// Funds, allocates, and assigns the state account to this program so that it's rent exempt at
/// exactly [`StateHeader::LEN`] bytes.
///
/// An absent account is created in one `CreateAccount` call. A system account that already holds
/// lamports can't be passed to `CreateAccount`, so it's topped up, allocated, and assigned
/// separately.
///
/// ### Accounts
///   0. `[WRITE]` Authority
///   1. `[WRITE]` State account
pub fn create_state_account(
    authority: &AccountView,
    state_account: &UninitializedStateAccount,
    rent_minimum: u64,
) -> ProgramResult {
    let authority_seed: &[u8] = authority.address().as_ref();
    let bump_seed = [state_account.bump];
    let seeds = [
        Seed::from(STATE_SEED_PREFIX),
        Seed::from(authority_seed),
        Seed::from(&bump_seed[..]),
    ];
    let space = StateHeader::LEN as u64;

    match state_account.allocation {
        StateAllocation::Absent => CreateAccount {
            from: authority,                // WRITE
            to: state_account.account(),    // WRITE
            lamports: rent_minimum,
            space,
            owner: &crate::ID,
        }
        .invoke_signed(&[Signer::from(&seeds[..])]),
        StateAllocation::PreFunded { .. } => {
            let shortfall = state_account.allocation.required_lamports(rent_minimum);
            if shortfall > 0 {
                Transfer {
                    from: authority,             // WRITE
                    to: state_account.account(), // WRITE
                    lamports: shortfall,
                }
                .invoke()?;
            }

            Allocate {
                account: state_account.account(), // WRITE
                space,
            }
            .invoke_signed(&[Signer::from(&seeds[..])])?;

            Assign {
                account: state_account.account(), // WRITE
                owner: &crate::ID,
            }
            .invoke_signed(&[Signer::from(&seeds[..])])
        }
    }
}
