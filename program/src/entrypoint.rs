//! Solana program entrypoint.
//!
//! Forwards incoming instructions from the runtime into the program's instruction handlers.

use keystone_interface::{
    error::StateError,
    instructions::StateInstruction,
};
use pinocchio::{
    no_allocator,
    nostd_panic_handler,
    program_entrypoint,
    AccountView,
    Address,
    ProgramResult,
};

use crate::instructions::process_initialize;

program_entrypoint!(process_instruction);
no_allocator!();
nostd_panic_handler!();

pub fn process_instruction(
    _program_id: &Address,
    accounts: &[AccountView],
    instruction_data_with_tag: &[u8],
) -> ProgramResult {
    let [tag, instruction_data @ ..] = instruction_data_with_tag else {
        return Err(StateError::InvalidInstructionTag.into());
    };

    match StateInstruction::try_from(*tag)? {
        StateInstruction::Initialize => process_initialize(accounts, instruction_data),
    }
}
