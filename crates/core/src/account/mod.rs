//! Chart of accounts.
//!
//! Decides which accounts may receive postings and keeps the account tree
//! well formed (known parents, consistent types, no cycles).

pub mod catalog;
pub mod types;

pub use catalog::AccountCatalog;
pub use types::{Account, AccountType, NewAccount, NormalBalance};
