//! Transactional wallet ledger.
//!
//! Two accounts exchange value through recorded payments: either both balances
//! change and the payment is recorded, or nothing happens. Storage is reached
//! only through the [`domain::ports`] traits so any transactional store can
//! back the [`application::service::LedgerService`].

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
