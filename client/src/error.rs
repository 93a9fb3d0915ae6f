//! Client-side error taxonomy for submitting and confirming transactions, and the mapping from RPC
//! failures into it.

use std::fmt;

use keystone_interface::error::StateError;
use solana_client::client_error::{
    ClientError,
    ClientErrorKind,
};
use solana_instruction_error::InstructionError;
use solana_sdk::{
    signature::Signature,
    signer::SignerError,
    transaction::Transaction,
};
use solana_transaction_error::TransactionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionClientError {
    /// The network rejected the transaction, or it landed with an execution error.
    #[error("Transaction submission failed: {0}")]
    SubmissionFailed(SubmissionFailure),

    /// The transaction was sent but never observed at the requested commitment. It may still land,
    /// so the account state must be re-queried before retrying.
    #[error("Transaction {signature} wasn't confirmed after {polls} status polls; outcome unknown")]
    ConfirmationTimeout { signature: Signature, polls: u32 },

    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    /// The cluster answered a request that submits nothing with an error, or with a response that
    /// couldn't be decoded.
    #[error("RPC request failed: {0}")]
    RequestFailed(String),

    #[error("Couldn't sign transaction: {0}")]
    Signing(#[from] SignerError),
}

impl TransactionClientError {
    /// Only transport failures are retried; program and signing failures are deterministic and a
    /// timed out transaction has an unknown outcome.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransactionClientError::NetworkUnreachable(_))
    }

    /// The program error that caused the failure, if the program itself rejected the instruction.
    pub fn program_error(&self) -> Option<StateError> {
        match self {
            TransactionClientError::SubmissionFailed(failure) => failure.program_error,
            _ => None,
        }
    }

    pub fn transaction_error(&self) -> Option<&TransactionError> {
        match self {
            TransactionClientError::SubmissionFailed(failure) => failure.transaction_error.as_ref(),
            _ => None,
        }
    }

    /// Maps a failed RPC request that isn't a transaction submission. Only transport failures are
    /// [`TransactionClientError::NetworkUnreachable`].
    pub fn from_request_error(error: ClientError) -> Self {
        match error.kind() {
            ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => {
                TransactionClientError::NetworkUnreachable(error.to_string())
            }
            _ => TransactionClientError::RequestFailed(error.to_string()),
        }
    }

    /// Maps a failed `sendTransaction` request, including preflight simulation failures.
    pub fn from_send_error(error: ClientError, transaction: &Transaction) -> Self {
        if let Some(transaction_error) = error.get_transaction_error() {
            return TransactionClientError::SubmissionFailed(SubmissionFailure::new(
                transaction_error,
                transaction,
            ));
        }

        match error.kind() {
            ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => {
                TransactionClientError::NetworkUnreachable(error.to_string())
            }
            _ => TransactionClientError::SubmissionFailed(SubmissionFailure::rejected(
                error.to_string(),
            )),
        }
    }
}

/// Why the network refused or failed a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionFailure {
    /// The transaction error reported by the network, if it reported one.
    pub transaction_error: Option<TransactionError>,
    /// The decoded custom error, when the failing instruction targets this program.
    pub program_error: Option<StateError>,
    /// The raw rejection message for failures that carry no transaction error.
    pub reason: Option<String>,
}

impl SubmissionFailure {
    pub fn new(transaction_error: TransactionError, transaction: &Transaction) -> Self {
        let program_error = program_error_in(&transaction_error, transaction);
        Self {
            transaction_error: Some(transaction_error),
            program_error,
            reason: None,
        }
    }

    pub fn rejected(reason: String) -> Self {
        Self {
            transaction_error: None,
            program_error: None,
            reason: Some(reason),
        }
    }
}

impl fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.program_error, &self.transaction_error, &self.reason) {
            (Some(program_error), _, _) => {
                let message: &'static str = (*program_error).into();
                write!(f, "{program_error} ({message})")
            }
            (None, Some(transaction_error), _) => write!(f, "{transaction_error}"),
            (None, None, Some(reason)) => write!(f, "{reason}"),
            (None, None, None) => write!(f, "unknown failure"),
        }
    }
}

/// Decodes a custom program error, but only when the failing instruction was sent to this
/// program. Other programs reuse the same small custom codes.
fn program_error_in(
    transaction_error: &TransactionError,
    transaction: &Transaction,
) -> Option<StateError> {
    let TransactionError::InstructionError(index, InstructionError::Custom(code)) =
        transaction_error
    else {
        return None;
    };

    let message = &transaction.message;
    let instruction = message.instructions.get(*index as usize)?;
    let program_id = message
        .account_keys
        .get(instruction.program_id_index as usize)?;

    if program_id != &keystone_interface::program::ID {
        return None;
    }

    StateError::from_custom_code(*code)
}
