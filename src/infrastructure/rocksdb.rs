use crate::domain::account::{Account, AccountId};
use crate::domain::payment::{Payment, PaymentId};
use crate::domain::ports::{LedgerStore, UnitOfWork, UnitOfWorkBox};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Column Family for storing account states.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column Family for storing the payment log, keyed by big-endian payment id.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family for store bookkeeping such as the payment id sequence.
pub const CF_META: &str = "meta";

const LAST_PAYMENT_ID_KEY: &[u8] = b"last_payment_id";

/// A persistent ledger store backed by RocksDB.
///
/// Accounts, payments and bookkeeping live in separate Column Families and are
/// stored as JSON. A unit of work holds the store-wide writer lock for its
/// whole lifetime and flushes its staged rows as a single atomic
/// `WriteBatch` on commit.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
    writer: Arc<Mutex<()>>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_ACCOUNTS, CF_PAYMENTS, CF_META]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            writer: Arc::new(Mutex::new(())),
        })
    }
}

fn column<'a>(db: &'a DB, name: &str) -> StoreResult<&'a ColumnFamily> {
    db.cf_handle(name)
        .ok_or_else(|| StoreError::Unavailable(format!("column family {name} not found")))
}

#[async_trait]
impl LedgerStore for RocksDbStore {
    async fn begin(&self) -> StoreResult<UnitOfWorkBox> {
        let guard = self.writer.clone().lock_owned().await;
        let meta = column(&self.db, CF_META)?;
        let last_payment_id = match self.db.get_cf(meta, LAST_PAYMENT_ID_KEY)? {
            Some(bytes) => serde_json::from_slice(&bytes)?,
            None => 0,
        };
        Ok(Box::new(RocksDbUnitOfWork {
            db: self.db.clone(),
            _guard: guard,
            staged_accounts: BTreeMap::new(),
            staged_payments: Vec::new(),
            next_payment_id: last_payment_id + 1,
        }))
    }
}

struct RocksDbUnitOfWork {
    db: Arc<DB>,
    _guard: OwnedMutexGuard<()>,
    staged_accounts: BTreeMap<AccountId, Account>,
    staged_payments: Vec<Payment>,
    next_payment_id: PaymentId,
}

impl RocksDbUnitOfWork {
    fn lookup(&self, id: AccountId) -> StoreResult<Option<Account>> {
        if let Some(account) = self.staged_accounts.get(&id) {
            return Ok(Some(account.clone()));
        }
        let cf = column(&self.db, CF_ACCOUNTS)?;
        match self.db.get_cf(cf, id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn stored_payments(&self) -> StoreResult<Vec<Payment>> {
        let cf = column(&self.db, CF_PAYMENTS)?;
        let mut payments = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            payments.push(serde_json::from_slice(&value)?);
        }
        Ok(payments)
    }
}

#[async_trait]
impl UnitOfWork for RocksDbUnitOfWork {
    async fn get_account(&mut self, id: AccountId) -> StoreResult<Account> {
        self.lookup(id)?.ok_or(StoreError::AccountNotFound(id))
    }

    async fn get_accounts(&mut self, ids: &[AccountId]) -> StoreResult<Vec<Account>> {
        let mut found: Vec<Account> = Vec::with_capacity(ids.len());
        for id in ids {
            if found.iter().any(|a| a.id == *id) {
                continue;
            }
            if let Some(account) = self.lookup(*id)? {
                found.push(account);
            }
        }
        Ok(found)
    }

    async fn get_payments(&mut self, account_id: AccountId) -> StoreResult<Vec<Payment>> {
        let mut payments = self.stored_payments()?;
        payments.extend(self.staged_payments.iter().cloned());
        payments.retain(|p| p.involves(account_id));
        Ok(payments)
    }

    async fn upsert_accounts(&mut self, accounts: &[Account]) -> StoreResult<()> {
        for account in accounts {
            let row = match self.lookup(account.id)? {
                Some(existing) => Account {
                    balance: account.balance,
                    ..existing
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
        let mut batch = WriteBatch::default();

        let accounts = column(&self.db, CF_ACCOUNTS)?;
        for (id, account) in &self.staged_accounts {
            batch.put_cf(accounts, id.to_be_bytes(), serde_json::to_vec(account)?);
        }

        let payments = column(&self.db, CF_PAYMENTS)?;
        for payment in &self.staged_payments {
            let id = payment
                .id
                .ok_or_else(|| StoreError::CommitFailed("staged payment has no id".to_string()))?;
            batch.put_cf(payments, id.to_be_bytes(), serde_json::to_vec(payment)?);
        }

        if !self.staged_payments.is_empty() {
            let meta = column(&self.db, CF_META)?;
            let last = self.next_payment_id - 1;
            batch.put_cf(meta, LAST_PAYMENT_ID_KEY, serde_json::to_vec(&last)?);
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::CommitFailed(e.to_string()))
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        Ok(())
    }
}
