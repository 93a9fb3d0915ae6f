//! Read-only view helpers for decoding state accounts into ergonomic Rust structs.

use keystone_interface::state::{
    state_header::StateHeader,
    transmutable::Transmutable,
};
use solana_account::Account;
use solana_address::Address;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateHeaderView {
    pub discriminant: u64,
    pub authority: Address,
    pub bump: u8,
}

impl From<&StateHeader> for StateHeaderView {
    fn from(header: &StateHeader) -> Self {
        Self {
            discriminant: header.discriminant(),
            authority: header.authority,
            bump: header.bump,
        }
    }
}

/// A snapshot of whatever exists at a state account address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateAccountView {
    pub address: Address,
    pub owner: Address,
    pub lamports: u64,
    pub data_len: usize,
    /// The decoded header, if the account is owned by the program and initialized.
    pub header: Option<StateHeaderView>,
}

impl StateAccountView {
    pub fn new(address: Address, account: &Account) -> Self {
        Self {
            address,
            owner: account.owner,
            lamports: account.lamports,
            data_len: account.data.len(),
            header: try_state_header_view_from_owner_and_data(account.owner, &account.data).ok(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.owner == keystone_interface::program::ID && self.header.is_some()
    }
}

pub fn try_state_header_view_from_owner_and_data(
    owner: Address,
    data: &[u8],
) -> anyhow::Result<StateHeaderView> {
    if owner != keystone_interface::program::ID {
        return Err(anyhow::Error::msg("Account isn't owned by the keystone program"));
    }

    if data.len() != StateHeader::LEN {
        return Err(anyhow::Error::msg("Account data isn't a state header"));
    }

    let header = StateHeader::load_initialized(data).map_err(anyhow::Error::msg)?;
    Ok(header.into())
}
