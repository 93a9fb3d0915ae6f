//! Initializes the state account of the configured authority and waits for confirmation.
//!
//! See [`cli::CliArgs`] for the flags and [`load_env`] for the expected environment variables.

use anyhow::Context;
use clap::Parser;
use client::{
    context::state::StateContext,
    logs::log_divider,
    print_kv,
    transactions::TransactionClient,
    LogColor,
};
use colored::Colorize;
use solana_sdk::signer::Signer;

use crate::cli::CliArgs;

pub mod cli;
pub mod load_env;

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, false)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let authority = load_env::authority_keypair()?;
    let payer = load_env::payer_keypair()?.unwrap_or(authority);

    let rpc = TransactionClient::new_from_url(&args.url, args.send_config());
    let ctx = StateContext::new(authority.pubkey());

    if !args.quiet {
        log_divider();
        print_kv!(format!("[{}]", timestamp()), "initialize", LogColor::Header);
        print_kv!("Cluster", &args.url);
        print_kv!("Commitment", args.commitment);
        print_kv!("Authority", authority.pubkey());
        print_kv!("Payer", payer.pubkey());
        print_kv!("State account", ctx.state_account, LogColor::Info);
    }

    let signature = rpc
        .submit_and_confirm(ctx.initialize(), &[payer, authority])
        .await
        .context("Couldn't initialize the state account")?;

    if args.quiet {
        println!("{signature}");
    } else {
        print_kv!(
            format!("[{}]", timestamp()),
            "confirmed",
            LogColor::Header
        );
        print_kv!("Signature", signature, LogColor::Highlight, LogColor::Info);
        log_divider();
    }

    Ok(())
}
