use super::money::Money;
use super::payment::Payment;
use crate::error::{BalanceError, ValidationError};
use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Externally assigned account identifier. Valid ids are strictly positive.
pub type AccountId = i64;

/// Balance granted to an account the first time a payment references it.
pub const DEFAULT_OPENING_BALANCE: Money = Money::new(dec!(1000));

/// Current state of a wallet account.
///
/// Balances are mutable current state; the payment log is the audit trail and
/// is never replayed to recompute them.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Account {
    pub id: AccountId,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Materializes an account that has no stored record yet.
    ///
    /// Nothing is persisted here; the account only reaches the store once a
    /// payment involving it commits.
    pub fn open(id: AccountId, opening_balance: Money, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            balance: opening_balance,
            created_at,
        }
    }

    /// Debits or credits this account depending on which side of `payment` it is.
    ///
    /// On error the account is left untouched.
    pub fn apply_payment(&mut self, payment: &Payment) -> Result<(), BalanceError> {
        if self.id == payment.from {
            if self.balance.less_than(payment.amount) {
                return Err(BalanceError::InsufficientFunds {
                    account: self.id,
                    balance: self.balance,
                    amount: payment.amount,
                });
            }
            self.balance = (self.balance - payment.amount).to_stored();
        } else if self.id == payment.to {
            self.balance = (self.balance + payment.amount).to_stored();
        } else {
            return Err(BalanceError::MismatchedPayment {
                account: self.id,
                from: payment.from,
                to: payment.to,
            });
        }
        Ok(())
    }
}

pub fn validate_account_id(id: AccountId) -> Result<(), ValidationError> {
    if id <= 0 {
        return Err(ValidationError::InvalidAccount(id));
    }
    Ok(())
}
