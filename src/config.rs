use crate::domain::account::DEFAULT_OPENING_BALANCE;
use crate::domain::money::Money;
use std::time::Duration;

/// Tunables of the ledger service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Balance of an account materialized on first reference.
    pub opening_balance: Money,
    /// Upper bound for one unit of work. `None` waits indefinitely.
    pub deadline: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            opening_balance: DEFAULT_OPENING_BALANCE,
            deadline: None,
        }
    }
}

impl ServiceConfig {
    pub fn with_opening_balance(mut self, opening_balance: Money) -> Self {
        self.opening_balance = opening_balance;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.opening_balance, Money::new(dec!(1000)));
        assert_eq!(config.deadline, None);
    }

    #[test]
    fn test_builders() {
        let config = ServiceConfig::default()
            .with_opening_balance(Money::new(dec!(50)))
            .with_deadline(Duration::from_millis(250));
        assert_eq!(config.opening_balance, Money::new(dec!(50)));
        assert_eq!(config.deadline, Some(Duration::from_millis(250)));
    }
}
