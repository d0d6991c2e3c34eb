use crate::domain::account::{Account, AccountId};
use crate::domain::payment::{Payment, PaymentId};
use crate::domain::ports::{LedgerStore, UnitOfWork, UnitOfWorkBox};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
struct LedgerState {
    accounts: BTreeMap<AccountId, Account>,
    payments: Vec<Payment>,
    last_payment_id: PaymentId,
}

/// Committed contents of an [`InMemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub accounts: Vec<Account>,
    pub payments: Vec<Payment>,
}

/// A thread-safe in-memory ledger store.
///
/// Every unit of work owns the store lock until it commits, rolls back, or is
/// dropped, so units of work are fully serialized. Writes are staged inside
/// the unit of work and only published on commit.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `accounts`.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let state = LedgerState {
            accounts: accounts.into_iter().map(|a| (a.id, a)).collect(),
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Waits for in-flight units of work and returns the committed state.
    pub async fn snapshot(&self) -> LedgerSnapshot {
        let state = self.state.lock().await;
        LedgerSnapshot {
            accounts: state.accounts.values().cloned().collect(),
            payments: state.payments.clone(),
        }
    }
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    async fn begin(&self) -> StoreResult<UnitOfWorkBox> {
        let state = self.state.clone().lock_owned().await;
        let next_payment_id = state.last_payment_id + 1;
        Ok(Box::new(InMemoryUnitOfWork {
            state,
            staged_accounts: BTreeMap::new(),
            staged_payments: Vec::new(),
            next_payment_id,
        }))
    }
}

struct InMemoryUnitOfWork {
    state: OwnedMutexGuard<LedgerState>,
    staged_accounts: BTreeMap<AccountId, Account>,
    staged_payments: Vec<Payment>,
    next_payment_id: PaymentId,
}

impl InMemoryUnitOfWork {
    fn lookup(&self, id: AccountId) -> Option<&Account> {
        self.staged_accounts
            .get(&id)
            .or_else(|| self.state.accounts.get(&id))
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn get_account(&mut self, id: AccountId) -> StoreResult<Account> {
        self.lookup(id)
            .cloned()
            .ok_or(StoreError::AccountNotFound(id))
    }

    async fn get_accounts(&mut self, ids: &[AccountId]) -> StoreResult<Vec<Account>> {
        let mut found: Vec<Account> = Vec::with_capacity(ids.len());
        for id in ids {
            if found.iter().any(|a| a.id == *id) {
                continue;
            }
            if let Some(account) = self.lookup(*id) {
                found.push(account.clone());
            }
        }
        Ok(found)
    }

    async fn get_payments(&mut self, account_id: AccountId) -> StoreResult<Vec<Payment>> {
        Ok(self
            .state
            .payments
            .iter()
            .chain(self.staged_payments.iter())
            .filter(|p| p.involves(account_id))
            .cloned()
            .collect())
    }

    async fn upsert_accounts(&mut self, accounts: &[Account]) -> StoreResult<()> {
        for account in accounts {
            let row = match self.lookup(account.id) {
                Some(existing) => Account {
                    balance: account.balance,
                    ..existing.clone()
                },
                None => account.clone(),
            };
            self.staged_accounts.insert(row.id, row);
        }
        Ok(())
    }

    async fn insert_payment(&mut self, mut payment: Payment) -> StoreResult<Payment> {
        payment.id = Some(self.next_payment_id);
        self.next_payment_id += 1;
        self.staged_payments.push(payment.clone());
        Ok(payment)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let InMemoryUnitOfWork {
            mut state,
            staged_accounts,
            staged_payments,
            next_payment_id,
        } = *self;
        state.accounts.extend(staged_accounts);
        state.payments.extend(staged_payments);
        state.last_payment_id = next_payment_id - 1;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        Ok(())
    }
}
