//! Error taxonomy for the ledger.
//!
//! Each layer owns one error type: request validation, balance mutation,
//! storage, and the service surface that wraps all of them. Transports should
//! only ever see [`LedgerError`] and use [`LedgerError::fault`] to decide how
//! to report it.

use crate::domain::account::AccountId;
use crate::domain::money::Money;
use thiserror::Error;

/// Rejections raised while checking a payment request, before anything is read
/// or written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("can't convert {0} to decimal")]
    MalformedAmount(String),
    #[error("payment amount {0} is not positive")]
    NotPositiveAmount(Money),
    #[error("account id {0} must be positive")]
    InvalidAccount(AccountId),
    #[error("from and to must be different, both are {0}")]
    SameAccount(AccountId),
}

/// Failures of [`Account::apply_payment`](crate::domain::account::Account::apply_payment).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error("not enough funds in account {account}: balance {balance}, requested {amount}")]
    InsufficientFunds {
        account: AccountId,
        balance: Money,
        amount: Money,
    },
    #[error("payment from {from} to {to} does not involve account {account}")]
    MismatchedPayment {
        account: AccountId,
        from: AccountId,
        to: AccountId,
    },
}

/// Failures reported by a [`LedgerStore`](crate::domain::ports::LedgerStore)
/// or one of its units of work.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store is unavailable: {0}")]
    Unavailable(String),
    #[error("account {0} is not found")]
    AccountNotFound(AccountId),
    #[error("failed to commit unit of work: {0}")]
    CommitFailed(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// How a transport should present a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The caller sent something that can never succeed as-is.
    Client,
    NotFound,
    /// Anything else. Details stay in the logs.
    Internal,
}

/// Errors returned by the wallet service operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("payment is invalid: {0}")]
    InvalidRequest(#[from] ValidationError),
    #[error("failed to apply payment: {0}")]
    Balance(#[from] BalanceError),
    #[error("account {0} is not found")]
    AccountNotFound(AccountId),
    #[error("storage failure: {0}")]
    Storage(#[source] StoreError),
    #[error("deadline exceeded before the unit of work completed")]
    DeadlineExceeded,
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AccountNotFound(id) => Self::AccountNotFound(id),
            other => Self::Storage(other),
        }
    }
}

impl LedgerError {
    pub fn fault(&self) -> Fault {
        match self {
            Self::InvalidRequest(_) | Self::Balance(BalanceError::InsufficientFunds { .. }) => {
                Fault::Client
            }
            Self::AccountNotFound(_) => Fault::NotFound,
            Self::Balance(BalanceError::MismatchedPayment { .. })
            | Self::Storage(_)
            | Self::DeadlineExceeded => Fault::Internal,
        }
    }

    /// Message safe to hand back to a remote caller.
    pub fn public_message(&self) -> String {
        match self.fault() {
            Fault::Internal => "internal error".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
