//! See [`process_initialize`].

use keystone_interface::{
    error::StateError,
    instructions::InitializeInstructionData,
    state::{
        state_header::StateHeader,
        transmutable::Transmutable,
    },
};
use pinocchio::{
    sysvars::{
        rent::Rent,
        Sysvar,
    },
    AccountView,
    ProgramResult,
};

use crate::{
    context::initialize_context::InitializeContext,
    debug,
    shared::state_account_creation::create_state_account,
};

/// Instruction handler logic for creating the authority's state account and writing its header.
///
/// Fails with [`StateError::AlreadyInitialized`] when the state account is already owned by this
/// program, so an account transitions to initialized at most once.
#[inline(never)]
pub fn process_initialize(accounts: &[AccountView], instruction_data: &[u8]) -> ProgramResult {
    InitializeInstructionData::unpack(instruction_data)?;
    let ctx = InitializeContext::load(accounts)?;

    let rent = Rent::get()?;
    let rent_minimum = rent.try_minimum_balance(StateHeader::LEN)?;
    let required_lamports = ctx
        .state_account
        .allocation
        .required_lamports(rent_minimum);
    let authority_rent_minimum = rent.try_minimum_balance(ctx.authority.data_len())?;

    if !can_fund(
        ctx.authority.lamports(),
        required_lamports,
        authority_rent_minimum,
    ) {
        return Err(StateError::InsufficientFunds.into());
    }

    create_state_account(ctx.authority, &ctx.state_account, rent_minimum)?;

    let mut data = ctx.state_account.account().try_borrow_mut()?;
    StateHeader::init(&mut data, *ctx.authority.address(), ctx.state_account.bump)?;

    debug!("state account initialized");

    Ok(())
}

/// The authority must cover `required`. A rent exempt authority must also be left either empty or
/// still rent exempt; the runtime fails any other remainder with `InsufficientFundsForRent`.
#[inline(always)]
fn can_fund(balance: u64, required: u64, authority_rent_minimum: u64) -> bool {
    match balance.checked_sub(required) {
        Some(remainder) => {
            remainder == 0 || remainder >= authority_rent_minimum || balance < authority_rent_minimum
        }
        None => false,
    }
}
