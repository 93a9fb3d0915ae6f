//! Account validation wrappers used by the instruction contexts.

pub mod uninitialized_state_account;
