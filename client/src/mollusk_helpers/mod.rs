//! An in-process [`Cluster`] backed by mollusk, for tests and local experiments.

use std::{
    collections::{
        HashMap,
        HashSet,
    },
    path::PathBuf,
    sync::{
        Arc,
        Mutex,
        MutexGuard,
        PoisonError,
    },
};

use anyhow::Context;
use mollusk_svm::Mollusk;
use solana_account::Account;
use solana_address::Address;
use solana_commitment_config::CommitmentConfig;
use solana_instruction::{
    AccountMeta,
    Instruction,
};
use solana_sdk::{
    hash::Hash,
    signature::Signature,
    transaction::Transaction,
};
use solana_transaction_error::TransactionError;

use crate::{
    cluster::Cluster,
    error::{
        SubmissionFailure,
        TransactionClientError,
    },
};

/// Converts an input deploy file to a program name used by the [`Mollusk::new`] function.
///
/// Requires the full file name; for example, `keystone.so` would return the absolute path version
/// of `target/deploy/keystone`, which is exactly what [`Mollusk::new`] expects. Returns `None` if
/// the program hasn't been built.
pub fn deploy_file_to_program_name(program_name: &str) -> Option<String> {
    let path = PathBuf::from(env!("CARGO_WORKSPACE_DIR"))
        .join("target/deploy/")
        .join(program_name)
        .canonicalize()
        .ok()?;

    path.to_str()?.strip_suffix(".so").map(str::to_string)
}

pub const KEYSTONE_DEPLOY_FILE: &str = "keystone.so";

/// The ledger shared by every clone of a [`MolluskCluster`].
struct Ledger {
    mollusk: Mollusk,
    accounts: HashMap<Address, Account>,
    statuses: HashMap<Signature, Result<(), TransactionError>>,
    issued_blockhashes: HashSet<Hash>,
    blockhash_counter: u64,
}

/// Executes transactions one at a time against a shared account store.
///
/// A transaction holds the ledger lock for its whole execution and its resulting accounts are
/// committed only if every instruction succeeded, so concurrent submissions behave as if the
/// network had serialized them. Every executed transaction is immediately visible at all
/// commitment levels and no fees are charged.
#[derive(Clone)]
pub struct MolluskCluster {
    ledger: Arc<Mutex<Ledger>>,
}

impl MolluskCluster {
    /// Creates a cluster with the `keystone` program loaded from `target/deploy` and the passed
    /// accounts created.
    pub fn new(accounts: Vec<(Address, Account)>) -> anyhow::Result<Self> {
        let program_name = deploy_file_to_program_name(KEYSTONE_DEPLOY_FILE)
            .context("The keystone program must be built to target/deploy/keystone.so")?;

        Ok(Self::with_mollusk(
            Mollusk::new(&keystone_interface::program::ID, &program_name),
            accounts,
        ))
    }

    pub fn with_mollusk(mollusk: Mollusk, accounts: Vec<(Address, Account)>) -> Self {
        let (system_program, system_program_account) =
            mollusk_svm::program::keyed_account_for_system_program();

        let mut all_accounts: HashMap<Address, Account> = accounts.into_iter().collect();
        all_accounts.insert(system_program, system_program_account);

        Self {
            ledger: Arc::new(Mutex::new(Ledger {
                mollusk,
                accounts: all_accounts,
                statuses: HashMap::new(),
                issued_blockhashes: HashSet::new(),
                blockhash_counter: 0,
            })),
        }
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the stored account, including accounts with zero lamports.
    pub fn account(&self, address: &Address) -> Option<Account> {
        self.ledger().accounts.get(address).cloned()
    }

    pub fn set_account(&self, address: Address, account: Account) {
        self.ledger().accounts.insert(address, account);
    }

    /// Executes `tx` and records its status, returning the transaction error if it failed.
    fn execute(&self, tx: &Transaction) -> Result<(), TransactionError> {
        let mut ledger = self.ledger();

        if !ledger
            .issued_blockhashes
            .contains(&tx.message.recent_blockhash)
        {
            return Err(TransactionError::BlockhashNotFound);
        }

        tx.verify()?;
        let signature = tx.signatures[0];

        if ledger.statuses.contains_key(&signature) {
            return Err(TransactionError::AlreadyProcessed);
        }

        let result = ledger.process(tx);
        ledger.statuses.insert(signature, result.clone());
        result
    }
}

impl Ledger {
    /// Runs every instruction on a working copy of the touched accounts and commits the copy only
    /// if all of them succeed.
    fn process(&mut self, tx: &Transaction) -> Result<(), TransactionError> {
        let instructions = decompile_instructions(tx)?;
        let mut working: HashMap<Address, Account> = HashMap::new();

        for (index, instruction) in instructions.iter().enumerate() {
            // Compute budget instructions are consumed by the runtime before execution.
            if instruction.program_id == solana_compute_budget_interface::ID {
                continue;
            }

            let mut seen = HashSet::new();
            let accounts = instruction
                .accounts
                .iter()
                .filter(|meta| seen.insert(meta.pubkey))
                .map(|meta| {
                    let account = working
                        .get(&meta.pubkey)
                        .or_else(|| self.accounts.get(&meta.pubkey))
                        .cloned()
                        .unwrap_or_default();
                    (meta.pubkey, account)
                })
                .collect::<Vec<_>>();

            let result = self.mollusk.process_instruction(instruction, &accounts);
            if let Err(error) = result.raw_result {
                return Err(TransactionError::InstructionError(index as u8, error));
            }

            working.extend(result.resulting_accounts);
        }

        self.accounts.extend(working);
        Ok(())
    }
}

/// Rebuilds the instructions of a legacy message with their signer and writable flags.
fn decompile_instructions(tx: &Transaction) -> Result<Vec<Instruction>, TransactionError> {
    let message = &tx.message;
    let keys = &message.account_keys;
    let num_signers = message.header.num_required_signatures as usize;
    let num_readonly_signed = message.header.num_readonly_signed_accounts as usize;
    let num_readonly_unsigned = message.header.num_readonly_unsigned_accounts as usize;

    if num_signers > keys.len() || num_readonly_unsigned > keys.len() - num_signers {
        return Err(TransactionError::SanitizeFailure);
    }

    let is_writable = |i: usize| {
        if i < num_signers {
            i < num_signers.saturating_sub(num_readonly_signed)
        } else {
            i - num_signers < keys.len() - num_signers - num_readonly_unsigned
        }
    };

    message
        .instructions
        .iter()
        .map(|compiled| {
            let program_id = *keys
                .get(compiled.program_id_index as usize)
                .ok_or(TransactionError::SanitizeFailure)?;
            let accounts = compiled
                .accounts
                .iter()
                .map(|&i| {
                    let i = i as usize;
                    keys.get(i)
                        .map(|pubkey| AccountMeta {
                            pubkey: *pubkey,
                            is_signer: i < num_signers,
                            is_writable: is_writable(i),
                        })
                        .ok_or(TransactionError::SanitizeFailure)
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Instruction {
                program_id,
                accounts,
                data: compiled.data.clone(),
            })
        })
        .collect()
}

impl Cluster for MolluskCluster {
    async fn latest_blockhash(&self) -> Result<Hash, TransactionClientError> {
        let mut ledger = self.ledger();
        ledger.blockhash_counter += 1;

        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&ledger.blockhash_counter.to_le_bytes());
        let blockhash = Hash::new_from_array(bytes);
        ledger.issued_blockhashes.insert(blockhash);

        Ok(blockhash)
    }

    /// Without preflight, failed transactions are still recorded and their signature returned,
    /// the same as a validator that accepted the transaction and failed it on execution.
    async fn send_transaction(
        &self,
        transaction: &Transaction,
        skip_preflight: bool,
    ) -> Result<Signature, TransactionClientError> {
        match self.execute(transaction) {
            Ok(()) => Ok(transaction.signatures[0]),
            Err(TransactionError::InstructionError(..)) if skip_preflight => {
                Ok(transaction.signatures[0])
            }
            Err(error) => Err(TransactionClientError::SubmissionFailed(
                SubmissionFailure::new(error, transaction),
            )),
        }
    }

    async fn signature_status(
        &self,
        signature: &Signature,
        _commitment: CommitmentConfig,
    ) -> Result<Option<Result<(), TransactionError>>, TransactionClientError> {
        Ok(self.ledger().statuses.get(signature).cloned())
    }

    async fn get_account(
        &self,
        address: &Address,
        _commitment: CommitmentConfig,
    ) -> Result<Option<Account>, TransactionClientError> {
        Ok(self
            .account(address)
            .filter(|account| account.lamports > 0))
    }
}
