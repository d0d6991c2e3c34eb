use super::account::{Account, AccountId};
use super::payment::Payment;
use crate::error::StoreResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Entry point to a transactional store.
///
/// Implementations must isolate concurrent units of work well enough that two
/// debits of the same account can never both read the same starting balance
/// (row locks, serializable transactions, or a store-wide lock all qualify).
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Opens a new unit of work. Fails with `StoreError::Unavailable` when the
    /// store cannot be reached.
    async fn begin(&self) -> StoreResult<UnitOfWorkBox>;
}

/// A scoped, atomic sequence of reads and writes.
///
/// Writes become visible to other units of work only after [`commit`]
/// succeeds. Dropping a unit of work without committing discards everything
/// it staged, which is how cancellation and deadlines roll back.
///
/// [`commit`]: UnitOfWork::commit
#[async_trait]
pub trait UnitOfWork: Send {
    /// Fails with `StoreError::AccountNotFound` when there is no record.
    async fn get_account(&mut self, id: AccountId) -> StoreResult<Account>;

    /// Returns only the accounts that exist; missing ids are simply absent.
    async fn get_accounts(&mut self, ids: &[AccountId]) -> StoreResult<Vec<Account>>;

    /// Payments where `account_id` is sender or receiver, in store order.
    async fn get_payments(&mut self, account_id: AccountId) -> StoreResult<Vec<Payment>>;

    /// Inserts new accounts, or overwrites only `balance` for existing ids.
    async fn upsert_accounts(&mut self, accounts: &[Account]) -> StoreResult<()>;

    /// Records `payment` and returns it with the store-assigned id.
    async fn insert_payment(&mut self, payment: Payment) -> StoreResult<Payment>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;

    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}

pub type UnitOfWorkBox = Box<dyn UnitOfWork>;
pub type LedgerStoreRef = Arc<dyn LedgerStore>;
