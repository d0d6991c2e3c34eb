#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wallet_ledger::application::service::LedgerService;
use wallet_ledger::domain::account::{Account, AccountId};
use wallet_ledger::domain::clock::FixedClock;
use wallet_ledger::domain::money::Money;
use wallet_ledger::domain::payment::Payment;
use wallet_ledger::domain::ports::{LedgerStore, UnitOfWork, UnitOfWorkBox};
use wallet_ledger::error::{StoreError, StoreResult};
use wallet_ledger::infrastructure::in_memory::InMemoryStore;

pub fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2001, 1, 2, 8, 22, 33).unwrap()
}

pub fn account(id: AccountId, balance: &str) -> Account {
    Account::open(id, Money::parse(balance).unwrap(), at())
}

pub fn service(store: impl LedgerStore + 'static) -> LedgerService {
    LedgerService::new(Arc::new(store)).with_clock(FixedClock(at()))
}

pub fn balance_of(accounts: &[Account], id: AccountId) -> String {
    accounts
        .iter()
        .find(|a| a.id == id)
        .map(|a| a.balance.to_string())
        .unwrap_or_default()
}

/// Store call at which [`FaultyStore`] injects a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Never,
    Begin,
    GetAccounts,
    UpsertAccounts,
    InsertPayment,
    Commit,
}

/// Wraps an [`InMemoryStore`] and fails at a chosen call.
#[derive(Clone)]
pub struct FaultyStore {
    pub inner: InMemoryStore,
    fail_at: FailPoint,
    fail_rollback: bool,
    begins: Arc<AtomicUsize>,
}

impl FaultyStore {
    pub fn new(inner: InMemoryStore, fail_at: FailPoint) -> Self {
        Self {
            inner,
            fail_at,
            fail_rollback: false,
            begins: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing_rollback(mut self) -> Self {
        self.fail_rollback = true;
        self
    }

    pub fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }
}

fn injected(point: &str) -> StoreError {
    StoreError::Unavailable(format!("injected failure at {point}"))
}

#[async_trait]
impl LedgerStore for FaultyStore {
    async fn begin(&self) -> StoreResult<UnitOfWorkBox> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == FailPoint::Begin {
            return Err(injected("begin"));
        }
        let inner = self.inner.begin().await?;
        Ok(Box::new(FaultyUnitOfWork {
            inner,
            fail_at: self.fail_at,
            fail_rollback: self.fail_rollback,
        }))
    }
}

struct FaultyUnitOfWork {
    inner: UnitOfWorkBox,
    fail_at: FailPoint,
    fail_rollback: bool,
}

#[async_trait]
impl UnitOfWork for FaultyUnitOfWork {
    async fn get_account(&mut self, id: AccountId) -> StoreResult<Account> {
        self.inner.get_account(id).await
    }

    async fn get_accounts(&mut self, ids: &[AccountId]) -> StoreResult<Vec<Account>> {
        if self.fail_at == FailPoint::GetAccounts {
            return Err(injected("get_accounts"));
        }
        self.inner.get_accounts(ids).await
    }

    async fn get_payments(&mut self, account_id: AccountId) -> StoreResult<Vec<Payment>> {
        self.inner.get_payments(account_id).await
    }

    async fn upsert_accounts(&mut self, accounts: &[Account]) -> StoreResult<()> {
        // Stage the write first so a rollback really has something to discard.
        self.inner.upsert_accounts(accounts).await?;
        if self.fail_at == FailPoint::UpsertAccounts {
            return Err(injected("upsert_accounts"));
        }
        Ok(())
    }

    async fn insert_payment(&mut self, payment: Payment) -> StoreResult<Payment> {
        let payment = self.inner.insert_payment(payment).await?;
        if self.fail_at == FailPoint::InsertPayment {
            return Err(injected("insert_payment"));
        }
        Ok(payment)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        if self.fail_at == FailPoint::Commit {
            return Err(StoreError::CommitFailed("injected failure at commit".to_string()));
        }
        self.inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        if self.fail_rollback {
            return Err(injected("rollback"));
        }
        self.inner.rollback().await
    }
}
