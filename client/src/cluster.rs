//! The network boundary used by [`crate::transactions::TransactionClient`].

use solana_account::Account;
use solana_address::Address;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::RpcSendTransactionConfig,
};
use solana_commitment_config::CommitmentConfig;
use solana_sdk::{
    hash::Hash,
    signature::Signature,
    transaction::Transaction,
};
use solana_transaction_error::TransactionError;

use crate::error::TransactionClientError;

/// The RPC operations needed to submit a transaction and observe its outcome.
///
/// Implementations map their own failures into [`TransactionClientError`]: rejections of the
/// transaction itself become [`TransactionClientError::SubmissionFailed`], transport failures
/// become [`TransactionClientError::NetworkUnreachable`], and any other failed request becomes
/// [`TransactionClientError::RequestFailed`].
#[allow(async_fn_in_trait)]
pub trait Cluster {
    async fn latest_blockhash(&self) -> Result<Hash, TransactionClientError>;

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        skip_preflight: bool,
    ) -> Result<Signature, TransactionClientError>;

    /// `None` until the transaction is observed at `commitment`, then its execution result.
    async fn signature_status(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<Option<Result<(), TransactionError>>, TransactionClientError>;

    async fn get_account(
        &self,
        address: &Address,
        commitment: CommitmentConfig,
    ) -> Result<Option<Account>, TransactionClientError>;
}

impl Cluster for RpcClient {
    async fn latest_blockhash(&self) -> Result<Hash, TransactionClientError> {
        self.get_latest_blockhash()
            .await
            .map_err(TransactionClientError::from_request_error)
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        skip_preflight: bool,
    ) -> Result<Signature, TransactionClientError> {
        self.send_transaction_with_config(
            transaction,
            RpcSendTransactionConfig {
                skip_preflight,
                preflight_commitment: Some(self.commitment().commitment),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| TransactionClientError::from_send_error(e, transaction))
    }

    async fn signature_status(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<Option<Result<(), TransactionError>>, TransactionClientError> {
        self.get_signature_status_with_commitment(signature, commitment)
            .await
            .map_err(TransactionClientError::from_request_error)
    }

    async fn get_account(
        &self,
        address: &Address,
        commitment: CommitmentConfig,
    ) -> Result<Option<Account>, TransactionClientError> {
        self.get_account_with_commitment(address, commitment)
            .await
            .map(|response| response.value)
            .map_err(TransactionClientError::from_request_error)
    }
}

impl<C: Cluster> Cluster for &C {
    async fn latest_blockhash(&self) -> Result<Hash, TransactionClientError> {
        (**self).latest_blockhash().await
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        skip_preflight: bool,
    ) -> Result<Signature, TransactionClientError> {
        (**self).send_transaction(transaction, skip_preflight).await
    }

    async fn signature_status(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<Option<Result<(), TransactionError>>, TransactionClientError> {
        (**self).signature_status(signature, commitment).await
    }

    async fn get_account(
        &self,
        address: &Address,
        commitment: CommitmentConfig,
    ) -> Result<Option<Account>, TransactionClientError> {
        (**self).get_account(address, commitment).await
    }
}
