//! Nonblocking transaction submission with confirmation polling and bounded retries, plus state
//! account reads.

use std::{
    future::Future,
    time::Duration,
};

use colored::Colorize;
use solana_address::Address;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use solana_compute_budget_interface::ComputeBudgetInstruction;
use solana_sdk::{
    message::{
        Instruction,
        Message,
    },
    signature::{
        Keypair,
        Signature,
        Signer,
    },
    signer::SignerError,
    transaction::Transaction,
};
use solana_transaction_error::TransactionError;

use crate::{
    cluster::Cluster,
    error::{
        SubmissionFailure,
        TransactionClientError,
    },
    logs,
    pda::find_state_address,
    views::StateAccountView,
};

/// Bounds on re-sending and on waiting for confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total sends of one signed transaction, including the first.
    pub max_send_attempts: u32,
    /// Backoff after the first retryable failure; doubled after each further one.
    pub initial_backoff: Duration,
    /// Status queries before giving up with [`TransactionClientError::ConfirmationTimeout`].
    pub max_confirmation_polls: u32,
    pub poll_interval: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_send_attempts: 5,
            initial_backoff: Duration::from_millis(250),
            max_confirmation_polls: 60,
            poll_interval: Duration::from_millis(500),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SendTransactionConfig {
    /// The commitment a transaction must reach before it's reported as confirmed.
    pub commitment: CommitmentConfig,
    pub compute_budget: Option<u32>,
    pub debug_logs: Option<bool>,
    pub skip_preflight: bool,
    pub retry: RetryConfig,
}

impl Default for SendTransactionConfig {
    fn default() -> Self {
        SendTransactionConfig {
            commitment: CommitmentConfig::confirmed(),
            compute_budget: Default::default(),
            debug_logs: Some(true),
            skip_preflight: false,
            retry: Default::default(),
        }
    }
}

impl SendTransactionConfig {
    fn debug_logs(&self) -> bool {
        matches!(self.debug_logs, Some(true))
    }
}

/// The result of a single status query for a sent transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Not yet observed at the configured commitment.
    Pending,
    Confirmed,
    /// Landed at the configured commitment with an execution error.
    Failed(TransactionError),
}

pub struct TransactionClient<C> {
    pub cluster: C,
    pub config: SendTransactionConfig,
}

impl Default for TransactionClient<RpcClient> {
    fn default() -> Self {
        TransactionClient::new_from_url("http://localhost:8899", Default::default())
    }
}

impl TransactionClient<RpcClient> {
    pub fn new_from_url(url: &str, config: SendTransactionConfig) -> Self {
        TransactionClient {
            cluster: RpcClient::new_with_commitment(url.into(), config.commitment),
            config,
        }
    }
}

impl<C: Cluster> TransactionClient<C> {
    pub fn new(cluster: C, config: SendTransactionConfig) -> Self {
        Self { cluster, config }
    }

    /// Submits `instruction` in a transaction signed by `signers` and waits for it to reach the
    /// configured commitment. The first signer pays the fee.
    ///
    /// Returns the signature only once the transaction is confirmed and executed without error. A
    /// [`TransactionClientError::ConfirmationTimeout`] means the outcome is unknown.
    pub async fn submit_and_confirm(
        &self,
        instruction: Instruction,
        signers: &[&Keypair],
    ) -> Result<Signature, TransactionClientError> {
        let (payer, rest) = signers
            .split_first()
            .ok_or(TransactionClientError::Signing(SignerError::NotEnoughSigners))?;

        self.send_and_confirm_txn(payer, rest, &[instruction]).await
    }

    /// Sends and confirms a transaction with `signer` as the payer and sole signer.
    pub async fn send_single_signer(
        &self,
        signer: &Keypair,
        instructions: impl AsRef<[Instruction]>,
    ) -> Result<Signature, TransactionClientError> {
        self.send_and_confirm_txn(signer, &[], instructions.as_ref())
            .await
    }

    pub async fn send_and_confirm_txn(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> Result<Signature, TransactionClientError> {
        let res = self.try_send_and_confirm(payer, signers, instructions).await;
        if let Err(error) = &res {
            if self.config.debug_logs() {
                logs::log_failure(error);
                crate::print_kv!("Payer", payer.pubkey(), crate::LogColor::Error);
            }
        }
        res
    }

    async fn try_send_and_confirm(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> Result<Signature, TransactionClientError> {
        let blockhash = self
            .retry_unreachable(|| self.cluster.latest_blockhash())
            .await?;

        let final_instructions: &[Instruction] = &[
            self.config
                .compute_budget
                .map_or(vec![], |budget| {
                    vec![ComputeBudgetInstruction::set_compute_unit_limit(budget)]
                }),
            instructions.to_vec(),
        ]
        .concat();

        let msg = Message::new(final_instructions, Some(&payer.pubkey()));
        let mut tx = Transaction::new_unsigned(msg);

        let mut all_signers = vec![payer];
        for signer in signers {
            if all_signers.iter().all(|s| s.pubkey() != signer.pubkey()) {
                all_signers.push(*signer);
            }
        }
        tx.try_sign(&all_signers, blockhash)?;

        let signature = self.send_with_retry(&tx).await?;
        self.await_confirmation(&tx, signature).await
    }

    /// Sends `tx`, re-sending the identical signed transaction after transport failures. A
    /// re-send can't double-apply since the network deduplicates by signature.
    async fn send_with_retry(&self, tx: &Transaction) -> Result<Signature, TransactionClientError> {
        let retry = &self.config.retry;
        let max_attempts = retry.max_send_attempts.max(1);
        let mut backoff = retry.initial_backoff;
        let mut attempt = 1;

        loop {
            if self.config.debug_logs() {
                logs::log_send_attempt(&tx.signatures[0], attempt, max_attempts);
            }

            match self
                .cluster
                .send_transaction(tx, self.config.skip_preflight)
                .await
            {
                // An earlier attempt reached the network even though its response didn't.
                Err(e)
                    if attempt > 1
                        && e.transaction_error() == Some(&TransactionError::AlreadyProcessed) =>
                {
                    return Ok(tx.signatures[0]);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    if self.config.debug_logs() {
                        logs::log_retry(&e, backoff.as_millis());
                    }
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                    attempt += 1;
                }
                res => return res,
            }
        }
    }

    /// Polls until `signature` reaches the configured commitment. Once sent, a status that can't
    /// be read is reported as [`TransactionClientError::ConfirmationTimeout`], never as a
    /// retryable error, since the transaction may still land.
    async fn await_confirmation(
        &self,
        tx: &Transaction,
        signature: Signature,
    ) -> Result<Signature, TransactionClientError> {
        let retry = &self.config.retry;

        for poll in 1..=retry.max_confirmation_polls {
            let status = match self.confirmation_status(&signature).await {
                Ok(status) => status,
                Err(e) => {
                    if self.config.debug_logs() {
                        logs::log_failure(&e);
                    }
                    return Err(TransactionClientError::ConfirmationTimeout {
                        signature,
                        polls: poll,
                    });
                }
            };

            match status {
                ConfirmationStatus::Confirmed => {
                    if self.config.debug_logs() {
                        logs::log_confirmed(&signature, poll);
                    }
                    return Ok(signature);
                }
                ConfirmationStatus::Failed(error) => {
                    return Err(TransactionClientError::SubmissionFailed(
                        SubmissionFailure::new(error, tx),
                    ));
                }
                ConfirmationStatus::Pending => {
                    if poll < retry.max_confirmation_polls {
                        tokio::time::sleep(retry.poll_interval).await;
                    }
                }
            }
        }

        Err(TransactionClientError::ConfirmationTimeout {
            signature,
            polls: retry.max_confirmation_polls,
        })
    }

    /// Queries the status of `signature` once at the configured commitment.
    pub async fn confirmation_status(
        &self,
        signature: &Signature,
    ) -> Result<ConfirmationStatus, TransactionClientError> {
        let status = self
            .retry_unreachable(|| {
                self.cluster
                    .signature_status(signature, self.config.commitment)
            })
            .await?;

        Ok(match status {
            None => ConfirmationStatus::Pending,
            Some(Ok(())) => ConfirmationStatus::Confirmed,
            Some(Err(error)) => ConfirmationStatus::Failed(error),
        })
    }

    /// Reads the state account of `authority`, returning `None` if nothing exists at its address.
    pub async fn fetch_state_account(
        &self,
        authority: &Address,
    ) -> Result<Option<StateAccountView>, TransactionClientError> {
        let (address, _bump) = find_state_address(authority);
        let account = self
            .retry_unreachable(|| self.cluster.get_account(&address, self.config.commitment))
            .await?;

        Ok(account.map(|account| StateAccountView::new(address, &account)))
    }

    /// Runs a request that doesn't submit anything, retrying transport failures with the
    /// configured backoff.
    async fn retry_unreachable<T, F, Fut>(&self, mut request: F) -> Result<T, TransactionClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransactionClientError>>,
    {
        let retry = &self.config.retry;
        let max_attempts = retry.max_send_attempts.max(1);
        let mut backoff = retry.initial_backoff;
        let mut attempt = 1;

        loop {
            match request().await {
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    if self.config.debug_logs() {
                        logs::log_retry(&e, backoff.as_millis());
                    }
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                    attempt += 1;
                }
                res => return res,
            }
        }
    }
}
