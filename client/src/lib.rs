//! Client-side utilities for submitting `keystone` instructions and confirming them.
//!
//! Includes the [`cluster::Cluster`] network seam, transaction submission with confirmation
//! polling, account views, PDA derivations, and an in-process mollusk cluster.

pub mod cluster;
pub mod context;
pub mod error;
pub mod logs;
pub mod mollusk_helpers;
pub mod pda;
pub mod transactions;
pub mod views;

pub use logs::LogColor;
