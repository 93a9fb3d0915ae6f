use std::time::Duration;

use clap::{
    command,
    Parser,
};
use client::transactions::{
    RetryConfig,
    SendTransactionConfig,
};
use solana_commitment_config::CommitmentConfig;
use strum_macros::{
    Display,
    EnumString,
};

/// The commitment level a transaction must reach before it's reported as confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl From<Commitment> for CommitmentConfig {
    fn from(commitment: Commitment) -> Self {
        match commitment {
            Commitment::Processed => CommitmentConfig::processed(),
            Commitment::Confirmed => CommitmentConfig::confirmed(),
            Commitment::Finalized => CommitmentConfig::finalized(),
        }
    }
}

#[derive(Parser)]
#[command(name = "keystone-cli")]
pub struct CliArgs {
    /// The cluster's JSON RPC URL.
    #[arg(short = 'u', long, default_value = "http://localhost:8899")]
    pub url: String,

    /// One of `processed`, `confirmed`, or `finalized`.
    #[arg(short = 'c', long, default_value_t = Commitment::Confirmed)]
    pub commitment: Commitment,

    /// Total sends of the transaction when the cluster can't be reached, including the first.
    #[arg(long, default_value_t = RetryConfig::default().max_send_attempts)]
    pub max_send_attempts: u32,

    #[arg(long, default_value_t = 500)]
    pub poll_interval_ms: u64,

    /// Status polls before giving up. A timed out transaction may still land.
    #[arg(long, default_value_t = RetryConfig::default().max_confirmation_polls)]
    pub max_polls: u32,

    #[arg(long)]
    pub skip_preflight: bool,

    /// Only print the signature.
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl CliArgs {
    pub fn send_config(&self) -> SendTransactionConfig {
        SendTransactionConfig {
            commitment: self.commitment.into(),
            debug_logs: Some(!self.quiet),
            skip_preflight: self.skip_preflight,
            retry: RetryConfig {
                max_send_attempts: self.max_send_attempts,
                poll_interval: Duration::from_millis(self.poll_interval_ms),
                max_confirmation_polls: self.max_polls,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
