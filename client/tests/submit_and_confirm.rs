use std::{
    cell::{
        Cell,
        RefCell,
    },
    collections::VecDeque,
    time::{
        Duration,
        Instant,
    },
};

use client::{
    cluster::Cluster,
    context::state::StateContext,
    error::{
        SubmissionFailure,
        TransactionClientError,
    },
    transactions::{
        ConfirmationStatus,
        RetryConfig,
        SendTransactionConfig,
        TransactionClient,
    },
};
use keystone_interface::error::StateError;
use solana_account::Account;
use solana_address::Address;
use solana_commitment_config::CommitmentConfig;
use solana_instruction_error::InstructionError;
use solana_sdk::{
    hash::Hash,
    signature::{
        Keypair,
        Signature,
    },
    signer::Signer,
    transaction::Transaction,
};
use solana_transaction_error::TransactionError;

type Status = Option<Result<(), TransactionError>>;

/// A cluster that replays scripted responses.
///
/// Sends pop the next scripted send result (accepting once the script runs out). Status queries
/// pop the next scripted status, but the last one repeats forever. Blockhash, status and account
/// requests first fail with each of their scripted errors, in order.
#[derive(Default)]
struct ScriptedCluster {
    sends: RefCell<VecDeque<Result<(), TransactionClientError>>>,
    statuses: RefCell<VecDeque<Status>>,
    blockhash_errors: RefCell<VecDeque<TransactionClientError>>,
    status_errors: RefCell<VecDeque<TransactionClientError>>,
    account_errors: RefCell<VecDeque<TransactionClientError>>,
    sent: RefCell<Vec<Signature>>,
    blockhash_count: Cell<u32>,
    send_count: Cell<u32>,
    poll_count: Cell<u32>,
    account_count: Cell<u32>,
}

impl ScriptedCluster {
    fn new(
        sends: impl IntoIterator<Item = Result<(), TransactionClientError>>,
        statuses: impl IntoIterator<Item = Status>,
    ) -> Self {
        Self {
            sends: RefCell::new(sends.into_iter().collect()),
            statuses: RefCell::new(statuses.into_iter().collect()),
            ..Default::default()
        }
    }

    fn failing_blockhash(self, errors: impl IntoIterator<Item = TransactionClientError>) -> Self {
        self.blockhash_errors.borrow_mut().extend(errors);
        self
    }

    fn failing_status(self, errors: impl IntoIterator<Item = TransactionClientError>) -> Self {
        self.status_errors.borrow_mut().extend(errors);
        self
    }

    fn failing_account(self, errors: impl IntoIterator<Item = TransactionClientError>) -> Self {
        self.account_errors.borrow_mut().extend(errors);
        self
    }
}

fn bump(counter: &Cell<u32>) {
    counter.set(counter.get() + 1);
}

fn next_error(
    errors: &RefCell<VecDeque<TransactionClientError>>,
) -> Result<(), TransactionClientError> {
    match errors.borrow_mut().pop_front() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

impl Cluster for ScriptedCluster {
    async fn latest_blockhash(&self) -> Result<Hash, TransactionClientError> {
        bump(&self.blockhash_count);
        next_error(&self.blockhash_errors)?;
        Ok(Hash::new_from_array([1; 32]))
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        _skip_preflight: bool,
    ) -> Result<Signature, TransactionClientError> {
        bump(&self.send_count);
        self.sent.borrow_mut().push(transaction.signatures[0]);

        match self.sends.borrow_mut().pop_front() {
            Some(Err(e)) => Err(e),
            Some(Ok(())) | None => Ok(transaction.signatures[0]),
        }
    }

    async fn signature_status(
        &self,
        _signature: &Signature,
        _commitment: CommitmentConfig,
    ) -> Result<Status, TransactionClientError> {
        bump(&self.poll_count);
        next_error(&self.status_errors)?;

        let mut statuses = self.statuses.borrow_mut();
        if statuses.len() > 1 {
            Ok(statuses.pop_front().flatten())
        } else {
            Ok(statuses.front().cloned().flatten())
        }
    }

    async fn get_account(
        &self,
        _address: &Address,
        _commitment: CommitmentConfig,
    ) -> Result<Option<Account>, TransactionClientError> {
        bump(&self.account_count);
        next_error(&self.account_errors)?;
        Ok(None)
    }
}

fn test_config() -> SendTransactionConfig {
    SendTransactionConfig {
        debug_logs: Some(false),
        retry: RetryConfig {
            max_send_attempts: 3,
            initial_backoff: Duration::from_millis(1),
            max_confirmation_polls: 4,
            poll_interval: Duration::ZERO,
        },
        ..Default::default()
    }
}

fn network_down() -> TransactionClientError {
    TransactionClientError::NetworkUnreachable("connection refused".into())
}

fn unreachable() -> Result<(), TransactionClientError> {
    Err(network_down())
}

fn network_down_forever() -> impl Iterator<Item = TransactionClientError> {
    std::iter::repeat_with(network_down).take(100)
}

fn already_initialized() -> TransactionError {
    TransactionError::InstructionError(
        0,
        InstructionError::Custom(StateError::AlreadyInitialized as u32),
    )
}

#[tokio::test]
async fn confirms_after_pending_polls() {
    let authority = Keypair::new();
    let client = TransactionClient::new(
        ScriptedCluster::new([], [None, None, Some(Ok(()))]),
        test_config(),
    );

    let signature = client
        .submit_and_confirm(StateContext::new(authority.pubkey()).initialize(), &[&authority])
        .await
        .unwrap();

    assert_ne!(signature, Signature::default());
    assert_eq!(client.cluster.sent.borrow().as_slice(), &[signature]);
    assert_eq!(client.cluster.send_count.get(), 1);
    assert_eq!(client.cluster.poll_count.get(), 3);
}

#[tokio::test]
async fn network_failures_are_retried_with_the_same_signature() {
    let authority = Keypair::new();
    let client = TransactionClient::new(
        ScriptedCluster::new([unreachable(), unreachable()], [Some(Ok(()))]),
        test_config(),
    );

    let signature = client
        .submit_and_confirm(StateContext::new(authority.pubkey()).initialize(), &[&authority])
        .await
        .unwrap();

    assert_eq!(client.cluster.send_count.get(), 3);
    assert_eq!(client.cluster.sent.borrow().as_slice(), &[signature; 3]);
}

#[tokio::test]
async fn network_retries_are_bounded() {
    let authority = Keypair::new();
    let client = TransactionClient::new(
        ScriptedCluster::new([unreachable(), unreachable(), unreachable()], [Some(Ok(()))]),
        test_config(),
    );

    let err = client
        .submit_and_confirm(StateContext::new(authority.pubkey()).initialize(), &[&authority])
        .await
        .unwrap_err();

    assert!(matches!(err, TransactionClientError::NetworkUnreachable(_)));
    assert_eq!(client.cluster.send_count.get(), 3);
    assert_eq!(client.cluster.poll_count.get(), 0);
}

#[tokio::test]
async fn program_errors_are_not_retried() {
    let authority = Keypair::new();
    let rejected = TransactionClientError::SubmissionFailed(SubmissionFailure {
        transaction_error: Some(already_initialized()),
        program_error: Some(StateError::AlreadyInitialized),
        reason: None,
    });
    let client = TransactionClient::new(
        ScriptedCluster::new([Err(rejected)], [Some(Ok(()))]),
        test_config(),
    );

    let err = client
        .submit_and_confirm(StateContext::new(authority.pubkey()).initialize(), &[&authority])
        .await
        .unwrap_err();

    assert_eq!(err.program_error(), Some(StateError::AlreadyInitialized));
    assert_eq!(client.cluster.send_count.get(), 1);
    assert_eq!(client.cluster.poll_count.get(), 0);
}

#[tokio::test]
async fn already_processed_after_a_lost_response_counts_as_sent() {
    let authority = Keypair::new();
    let already_processed = TransactionClientError::SubmissionFailed(SubmissionFailure {
        transaction_error: Some(TransactionError::AlreadyProcessed),
        program_error: None,
        reason: None,
    });
    let client = TransactionClient::new(
        ScriptedCluster::new([unreachable(), Err(already_processed)], [Some(Ok(()))]),
        test_config(),
    );

    let signature = client
        .submit_and_confirm(StateContext::new(authority.pubkey()).initialize(), &[&authority])
        .await
        .unwrap();

    assert_eq!(client.cluster.sent.borrow().as_slice(), &[signature; 2]);
}

#[tokio::test]
async fn unconfirmed_transaction_times_out() {
    let authority = Keypair::new();
    let client = TransactionClient::new(ScriptedCluster::new([], [None]), test_config());

    let err = client
        .submit_and_confirm(StateContext::new(authority.pubkey()).initialize(), &[&authority])
        .await
        .unwrap_err();

    let sent = client.cluster.sent.borrow()[0];
    match err {
        TransactionClientError::ConfirmationTimeout { signature, polls } => {
            assert_eq!(signature, sent);
            assert_eq!(polls, 4);
        }
        other => panic!("Expected a confirmation timeout, got {other}"),
    }
    assert_eq!(client.cluster.poll_count.get(), 4);
    assert_eq!(
        client.confirmation_status(&sent).await.unwrap(),
        ConfirmationStatus::Pending
    );
}

#[tokio::test]
async fn landed_execution_error_is_decoded() {
    let authority = Keypair::new();
    let client = TransactionClient::new(
        ScriptedCluster::new([], [None, Some(Err(already_initialized()))]),
        test_config(),
    );

    let err = client
        .submit_and_confirm(StateContext::new(authority.pubkey()).initialize(), &[&authority])
        .await
        .unwrap_err();

    assert!(matches!(err, TransactionClientError::SubmissionFailed(_)));
    assert_eq!(err.program_error(), Some(StateError::AlreadyInitialized));
    assert_eq!(err.transaction_error(), Some(&already_initialized()));
}

#[tokio::test]
async fn missing_signers_fail_before_sending() {
    let authority = Keypair::new();
    let payer = Keypair::new();
    let client = TransactionClient::new(ScriptedCluster::default(), test_config());
    let initialize = StateContext::new(authority.pubkey()).initialize();

    let err = client
        .submit_and_confirm(initialize.clone(), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, TransactionClientError::Signing(_)));

    // The authority must sign the initialize instruction.
    let err = client
        .submit_and_confirm(initialize, &[&payer])
        .await
        .unwrap_err();
    assert!(matches!(err, TransactionClientError::Signing(_)));
    assert!(!err.is_retryable());
    assert_eq!(client.cluster.send_count.get(), 0);
}

#[tokio::test]
async fn blockhash_fetch_is_retried_with_backoff() {
    let authority = Keypair::new();
    let mut config = test_config();
    config.retry.initial_backoff = Duration::from_millis(10);
    let client = TransactionClient::new(
        ScriptedCluster::new([], [Some(Ok(()))])
            .failing_blockhash([network_down(), network_down()]),
        config,
    );

    let started = Instant::now();
    client
        .submit_and_confirm(StateContext::new(authority.pubkey()).initialize(), &[&authority])
        .await
        .unwrap();

    // 10ms, then 20ms.
    assert!(started.elapsed() >= Duration::from_millis(30));
    assert_eq!(client.cluster.blockhash_count.get(), 3);
    assert_eq!(client.cluster.send_count.get(), 1);
}

#[tokio::test]
async fn blockhash_fetch_retries_are_bounded() {
    let authority = Keypair::new();
    let client = TransactionClient::new(
        ScriptedCluster::default().failing_blockhash(network_down_forever()),
        test_config(),
    );

    let err = client
        .submit_and_confirm(StateContext::new(authority.pubkey()).initialize(), &[&authority])
        .await
        .unwrap_err();

    assert!(matches!(err, TransactionClientError::NetworkUnreachable(_)));
    assert_eq!(client.cluster.blockhash_count.get(), 3);
    assert_eq!(client.cluster.send_count.get(), 0);
}

#[tokio::test]
async fn failed_requests_other_than_transport_are_not_retried() {
    let authority = Keypair::new();
    let client = TransactionClient::new(
        ScriptedCluster::default()
            .failing_blockhash([TransactionClientError::RequestFailed("Invalid params".into())]),
        test_config(),
    );

    let err = client
        .submit_and_confirm(StateContext::new(authority.pubkey()).initialize(), &[&authority])
        .await
        .unwrap_err();

    assert!(matches!(err, TransactionClientError::RequestFailed(_)));
    assert_eq!(client.cluster.blockhash_count.get(), 1);
    assert_eq!(client.cluster.send_count.get(), 0);
}

#[tokio::test]
async fn status_poll_is_retried_after_network_failures() {
    let authority = Keypair::new();
    let client = TransactionClient::new(
        ScriptedCluster::new([], [Some(Ok(()))])
            .failing_status([network_down(), network_down()]),
        test_config(),
    );

    client
        .submit_and_confirm(StateContext::new(authority.pubkey()).initialize(), &[&authority])
        .await
        .unwrap();

    assert_eq!(client.cluster.send_count.get(), 1);
    assert_eq!(client.cluster.poll_count.get(), 3);
}

#[tokio::test]
async fn unreadable_status_after_sending_is_a_timeout() {
    let authority = Keypair::new();
    let client = TransactionClient::new(
        ScriptedCluster::new([], [Some(Ok(()))]).failing_status(network_down_forever()),
        test_config(),
    );

    let err = client
        .submit_and_confirm(StateContext::new(authority.pubkey()).initialize(), &[&authority])
        .await
        .unwrap_err();

    let sent = client.cluster.sent.borrow()[0];
    match err {
        TransactionClientError::ConfirmationTimeout { signature, polls } => {
            assert_eq!(signature, sent);
            assert_eq!(polls, 1);
        }
        ref other => panic!("Expected a confirmation timeout, got {other}"),
    }
    assert!(!err.is_retryable());
    assert_eq!(client.cluster.send_count.get(), 1);
    assert_eq!(client.cluster.poll_count.get(), 3);
}

#[tokio::test]
async fn state_account_read_is_retried_and_bounded() {
    let authority = Keypair::new();

    let client = TransactionClient::new(
        ScriptedCluster::default().failing_account([network_down(), network_down()]),
        test_config(),
    );
    assert_eq!(client.fetch_state_account(&authority.pubkey()).await.unwrap(), None);
    assert_eq!(client.cluster.account_count.get(), 3);

    let client = TransactionClient::new(
        ScriptedCluster::default().failing_account(network_down_forever()),
        test_config(),
    );
    let err = client
        .fetch_state_account(&authority.pubkey())
        .await
        .unwrap_err();
    assert!(matches!(err, TransactionClientError::NetworkUnreachable(_)));
    assert_eq!(client.cluster.account_count.get(), 3);
}

#[tokio::test]
async fn failures_are_logged_with_the_payer() {
    let authority = Keypair::new();
    let client = TransactionClient::new(
        ScriptedCluster::new([], [Some(Err(already_initialized()))]),
        SendTransactionConfig {
            debug_logs: Some(true),
            ..test_config()
        },
    );

    let err = client
        .submit_and_confirm(StateContext::new(authority.pubkey()).initialize(), &[&authority])
        .await
        .unwrap_err();

    assert_eq!(err.program_error(), Some(StateError::AlreadyInitialized));
}
