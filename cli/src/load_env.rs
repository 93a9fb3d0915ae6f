//! Keypairs loaded once from the environment.
//!
//! - `KEYSTONE_AUTHORITY`: the authority's secret key, required.
//! - `KEYSTONE_PAYER`: the fee payer's secret key, defaults to the authority.
//!
//! Both accept a base58 string or a JSON byte array like the one `solana-keygen` writes.

use std::sync::LazyLock;

use anyhow::anyhow;
use solana_sdk::{
    bs58,
    signature::Keypair,
};

pub const AUTHORITY_ENV: &str = "KEYSTONE_AUTHORITY";
pub const PAYER_ENV: &str = "KEYSTONE_PAYER";

pub fn authority_keypair() -> anyhow::Result<&'static Keypair> {
    static KEYPAIR: LazyLock<Result<Keypair, String>> = LazyLock::new(|| {
        let kp_str = std::env::var(AUTHORITY_ENV)
            .map_err(|_| format!("Environment variable {AUTHORITY_ENV} must be set."))?;
        parse_keypair(&kp_str)
    });

    LazyLock::force(&KEYPAIR).as_ref().map_err(|e| anyhow!("{e}"))
}

/// Returns `None` when no separate payer is configured.
pub fn payer_keypair() -> anyhow::Result<Option<&'static Keypair>> {
    static KEYPAIR: LazyLock<Option<Result<Keypair, String>>> = LazyLock::new(|| {
        std::env::var(PAYER_ENV)
            .ok()
            .map(|kp_str| parse_keypair(&kp_str))
    });

    match LazyLock::force(&KEYPAIR) {
        None => Ok(None),
        Some(res) => res.as_ref().map(Some).map_err(|e| anyhow!("{e}")),
    }
}

pub fn parse_keypair(kp_str: &str) -> Result<Keypair, String> {
    let kp_str = kp_str.trim();
    let byte_vec: Vec<u8> = if kp_str.starts_with('[') {
        serde_json::from_str(kp_str).map_err(|e| format!("Invalid JSON keypair: {e}"))?
    } else {
        bs58::decode(kp_str)
            .into_vec()
            .map_err(|e| format!("Invalid base58 keypair: {e}"))?
    };

    Keypair::try_from(byte_vec.as_slice()).map_err(|e| format!("Invalid keypair bytes: {e}"))
}
