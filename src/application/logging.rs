use super::service::WalletService;
use crate::domain::account::{Account, AccountId};
use crate::domain::payment::{Payment, PaymentRequest};
use crate::error::{Fault, LedgerError, Result};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Wraps a [`WalletService`] and logs every call with its latency.
///
/// Client faults are logged at `warn`, everything else that fails at `error`.
pub struct LoggingMiddleware<S> {
    next: S,
}

impl<S: WalletService> LoggingMiddleware<S> {
    pub fn new(next: S) -> Self {
        Self { next }
    }
}

fn log_outcome<T>(method: &'static str, took: Duration, outcome: &Result<T>) {
    match outcome {
        Ok(_) => debug!(method, ?took, "call succeeded"),
        Err(err) => log_failure(method, took, err),
    }
}

fn log_failure(method: &'static str, took: Duration, err: &LedgerError) {
    match err.fault() {
        Fault::Client | Fault::NotFound => warn!(method, ?took, error = %err, "call rejected"),
        Fault::Internal => error!(method, ?took, error = %err, "call failed"),
    }
}

#[async_trait]
impl<S: WalletService> WalletService for LoggingMiddleware<S> {
    async fn apply_payment(&self, request: PaymentRequest) -> Result<Payment> {
        let started = Instant::now();
        let out = self.next.apply_payment(request).await;
        log_outcome("apply_payment", started.elapsed(), &out);
        out
    }

    async fn get_account(&self, id: AccountId) -> Result<Account> {
        let started = Instant::now();
        let out = self.next.get_account(id).await;
        log_outcome("get_account", started.elapsed(), &out);
        out
    }

    async fn get_payments(&self, account_id: AccountId) -> Result<Vec<Payment>> {
        let started = Instant::now();
        let out = self.next.get_payments(account_id).await;
        log_outcome("get_payments", started.elapsed(), &out);
        out
    }
}
