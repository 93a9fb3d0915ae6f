//! Program error codes and conversion helpers to represent them as error message strings.

use solana_program_error::ProgramError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[cfg_attr(any(test, feature = "client"), derive(strum_macros::FromRepr))]
#[repr(u8)]
pub enum StateError {
    InvalidInstructionTag,
    InvalidInstructionData,
    InsufficientByteLength,
    AlreadyInitialized,
    Unauthorized,
    InsufficientFunds,
    AccountSizeMismatch,
    AuthorityNotWritable,
    IncorrectSystemProgram,
    IncorrectStateAddress,
    AddressDerivationFailed,
    AccountNotInitialized,
}

impl StateError {
    /// Recovers the program error from the `u32` carried by [`ProgramError::Custom`].
    #[cfg(any(test, feature = "client"))]
    pub fn from_custom_code(code: u32) -> Option<Self> {
        u8::try_from(code).ok().and_then(Self::from_repr)
    }
}

impl From<StateError> for ProgramError {
    #[inline(always)]
    fn from(e: StateError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl From<StateError> for &'static str {
    fn from(value: StateError) -> Self {
        match value {
            StateError::InvalidInstructionTag => "Invalid instruction tag",
            StateError::InvalidInstructionData => "Instruction data is invalid",
            StateError::InsufficientByteLength => "Not enough bytes passed",
            StateError::AlreadyInitialized => "State account has already been initialized",
            StateError::Unauthorized => "Authority must sign the transaction",
            StateError::InsufficientFunds => "Authority can't cover the state account rent",
            StateError::AccountSizeMismatch => {
                "Existing account has the wrong size or belongs to a foreign program"
            }
            StateError::AuthorityNotWritable => "Authority account must be writable",
            StateError::IncorrectSystemProgram => "Invalid system program ID",
            StateError::IncorrectStateAddress => "State account isn't the authority's state PDA",
            StateError::AddressDerivationFailed => "PDA derivation failed",
            StateError::AccountNotInitialized => "State account hasn't been initialized",
        }
    }
}

#[cfg(not(target_os = "solana"))]
impl core::fmt::Display for StateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StateError {}

pub type StateResult = Result<(), StateError>;
