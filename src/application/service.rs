use crate::config::ServiceConfig;
use crate::domain::account::{Account, AccountId, validate_account_id};
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::payment::{Payment, PaymentRequest};
use crate::domain::ports::{LedgerStore, LedgerStoreRef, UnitOfWork, UnitOfWorkBox};
use crate::domain::validation::validate_payment_request;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error};

/// Operations exposed to transport adapters.
///
/// Decorators such as [`LoggingMiddleware`](super::logging::LoggingMiddleware)
/// implement this same trait around an inner service.
#[async_trait]
pub trait WalletService: Send + Sync {
    /// Moves `request.amount` from `request.from` to `request.to` and records
    /// the payment, all in one unit of work.
    async fn apply_payment(&self, request: PaymentRequest) -> Result<Payment>;

    async fn get_account(&self, id: AccountId) -> Result<Account>;

    /// Payments where the account is sender or receiver, in store order.
    async fn get_payments(&self, account_id: AccountId) -> Result<Vec<Payment>>;
}

/// The transfer engine.
///
/// Holds no mutable state of its own: every call opens its own unit of work
/// and all consistency comes from the store's transaction boundary.
pub struct LedgerService {
    store: LedgerStoreRef,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl LedgerService {
    pub fn new(store: LedgerStoreRef) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            config: ServiceConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Applies `request` as of `now`.
    ///
    /// Validation failures return before the store is touched. Any failure
    /// after the unit of work is opened rolls it back, so either both balances
    /// and the payment row are written or nothing is.
    pub async fn apply_payment_at(
        &self,
        request: &PaymentRequest,
        now: DateTime<Utc>,
    ) -> Result<Payment> {
        let amount = validate_payment_request(request)?;
        let payment = request.to_payment(amount, now);
        self.with_deadline(self.transfer(payment, now)).await
    }

    async fn transfer(&self, payment: Payment, now: DateTime<Utc>) -> Result<Payment> {
        let mut uow = self.store.begin().await?;
        let staged = self.stage_transfer(uow.as_mut(), payment, now).await;
        match staged {
            Ok(payment) => {
                uow.commit().await?;
                debug!(
                    payment_id = ?payment.id,
                    from = payment.from,
                    to = payment.to,
                    amount = %payment.amount,
                    "payment committed"
                );
                Ok(payment)
            }
            Err(err) => {
                rollback(uow, &err).await;
                Err(err)
            }
        }
    }

    async fn stage_transfer(
        &self,
        uow: &mut dyn UnitOfWork,
        payment: Payment,
        now: DateTime<Utc>,
    ) -> Result<Payment> {
        let mut found = uow.get_accounts(&[payment.from, payment.to]).await?;
        let mut sender = self.take_or_open(&mut found, payment.from, now);
        let mut receiver = self.take_or_open(&mut found, payment.to, now);

        // Debit first: a failed debit must never be followed by a credit.
        sender.apply_payment(&payment)?;
        receiver.apply_payment(&payment)?;

        uow.upsert_accounts(&[sender, receiver]).await?;
        Ok(uow.insert_payment(payment).await?)
    }

    fn take_or_open(&self, found: &mut Vec<Account>, id: AccountId, now: DateTime<Utc>) -> Account {
        match found.iter().position(|a| a.id == id) {
            Some(index) => found.swap_remove(index),
            None => {
                debug!(account = id, opening_balance = %self.config.opening_balance, "materializing account");
                Account::open(id, self.config.opening_balance, now)
            }
        }
    }

    async fn read_account(&self, id: AccountId) -> Result<Account> {
        let mut uow = self.store.begin().await?;
        let account = uow.get_account(id).await;
        release(uow).await;
        Ok(account?)
    }

    async fn read_payments(&self, account_id: AccountId) -> Result<Vec<Payment>> {
        let mut uow = self.store.begin().await?;
        let payments = uow.get_payments(account_id).await;
        release(uow).await;
        Ok(payments?)
    }

    async fn with_deadline<T>(&self, work: impl Future<Output = Result<T>>) -> Result<T> {
        match self.config.deadline {
            Some(deadline) => tokio::time::timeout(deadline, work)
                .await
                .map_err(|_| LedgerError::DeadlineExceeded)?,
            None => work.await,
        }
    }
}

/// Rolls back after a failure. A rollback error is logged and never replaces
/// the failure that triggered it.
async fn rollback(uow: UnitOfWorkBox, cause: &LedgerError) {
    if let Err(rollback_err) = uow.rollback().await {
        error!(error = %rollback_err, cause = %cause, "failed to rollback unit of work");
    }
}

/// Read-only units of work are always rolled back once the read is done.
async fn release(uow: UnitOfWorkBox) {
    if let Err(err) = uow.rollback().await {
        error!(error = %err, "failed to release read-only unit of work");
    }
}

#[async_trait]
impl WalletService for LedgerService {
    async fn apply_payment(&self, request: PaymentRequest) -> Result<Payment> {
        self.apply_payment_at(&request, self.clock.now()).await
    }

    async fn get_account(&self, id: AccountId) -> Result<Account> {
        validate_account_id(id)?;
        self.with_deadline(self.read_account(id)).await
    }

    async fn get_payments(&self, account_id: AccountId) -> Result<Vec<Payment>> {
        validate_account_id(account_id)?;
        self.with_deadline(self.read_payments(account_id)).await
    }
}
