//! Definitions of all program instructions for both client-side and on-chain usage.
//!
//! Instruction data is a single tag byte ([`StateInstruction`]) followed by the instruction's
//! packed arguments.

use crate::error::StateError;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(test, derive(strum_macros::FromRepr, strum_macros::EnumIter))]
#[cfg_attr(feature = "client", derive(strum_macros::Display))]
pub enum StateInstruction {
    /// Creates the authority's state account and assigns it to this program.
    ///
    /// ### Accounts
    ///   0. `[WRITE, SIGNER]` Authority, pays for the state account and is recorded in it.
    ///   1. `[WRITE]` State account PDA.
    ///   2. `[READ]` System program.
    Initialize,
}

impl TryFrom<u8> for StateInstruction {
    type Error = StateError;

    #[inline(always)]
    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(StateInstruction::Initialize),
            _ => Err(StateError::InvalidInstructionTag),
        }
    }
}

/// The (empty) argument payload of [`StateInstruction::Initialize`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InitializeInstructionData;

impl InitializeInstructionData {
    pub const LEN: usize = 0;

    /// Unpacks the instruction data that follows the tag byte.
    #[inline(always)]
    pub fn unpack(instruction_data: &[u8]) -> Result<Self, StateError> {
        if instruction_data.len() != Self::LEN {
            return Err(StateError::InvalidInstructionData);
        }
        Ok(Self)
    }

    /// Packs the tag byte and arguments into the full instruction data.
    #[inline(always)]
    pub fn pack(&self) -> [u8; 1 + Self::LEN] {
        [StateInstruction::Initialize as u8]
    }
}

/// Client-side builder for the [`StateInstruction::Initialize`] instruction.
#[cfg(feature = "client")]
#[derive(Clone, Debug)]
pub struct Initialize {
    pub authority: solana_address::Address,
    pub state_account: solana_address::Address,
    pub system_program: solana_address::Address,
}

#[cfg(feature = "client")]
impl Initialize {
    pub fn create_instruction(&self) -> solana_instruction::Instruction {
        use solana_instruction::{
            AccountMeta,
            Instruction,
        };

        Instruction {
            program_id: crate::program::ID,
            accounts: std::vec![
                AccountMeta::new(self.authority, true),
                AccountMeta::new(self.state_account, false),
                AccountMeta::new_readonly(self.system_program, false),
            ],
            data: InitializeInstructionData.pack().to_vec(),
        }
    }
}
