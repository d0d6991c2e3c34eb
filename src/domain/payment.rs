use super::account::AccountId;
use super::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned payment identifier.
pub type PaymentId = i64;

/// A transfer as submitted by a caller. The amount stays as raw text until it
/// is validated.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct PaymentRequest {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: String,
}

impl PaymentRequest {
    pub fn new(from: AccountId, to: AccountId, amount: impl Into<String>) -> Self {
        Self {
            from,
            to,
            amount: amount.into(),
        }
    }

    /// Stamps an already validated request.
    pub fn to_payment(&self, amount: Money, created_at: DateTime<Utc>) -> Payment {
        Payment {
            id: None,
            from: self.from,
            to: self.to,
            amount,
            created_at,
        }
    }
}

/// A recorded transfer. Immutable once the store has assigned its id.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct Payment {
    pub id: Option<PaymentId>,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn involves(&self, account: AccountId) -> bool {
        self.from == account || self.to == account
    }
}
