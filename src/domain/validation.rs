//! Pure well-formedness checks run before any unit of work is opened.

use super::account::validate_account_id;
use super::money::Money;
use super::payment::PaymentRequest;
use crate::error::ValidationError;

/// Checks `request` and returns its parsed amount.
///
/// Checks run in a fixed order and the first failure wins: amount syntax,
/// amount sign, sender id, receiver id, then sender/receiver distinctness.
pub fn validate_payment_request(request: &PaymentRequest) -> Result<Money, ValidationError> {
    let amount = Money::parse(&request.amount)?;
    if !amount.is_positive() {
        return Err(ValidationError::NotPositiveAmount(amount));
    }
    validate_account_id(request.from)?;
    validate_account_id(request.to)?;
    if request.from == request.to {
        return Err(ValidationError::SameAccount(request.from));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(from: i64, to: i64, amount: &str) -> PaymentRequest {
        PaymentRequest::new(from, to, amount)
    }

    #[test]
    fn test_valid_request() {
        assert_eq!(
            validate_payment_request(&request(1, 2, "500")),
            Ok(Money::new(dec!(500)))
        );
    }

    #[test]
    fn test_each_rule() {
        assert_eq!(
            validate_payment_request(&request(1, 2, "321,13")),
            Err(ValidationError::MalformedAmount("321,13".to_string()))
        );
        assert_eq!(
            validate_payment_request(&request(1, 2, "-1")),
            Err(ValidationError::NotPositiveAmount(Money::new(dec!(-1))))
        );
        assert_eq!(
            validate_payment_request(&request(1, 2, "0")),
            Err(ValidationError::NotPositiveAmount(Money::ZERO))
        );
        assert_eq!(
            validate_payment_request(&request(0, 2, "1")),
            Err(ValidationError::InvalidAccount(0))
        );
        assert_eq!(
            validate_payment_request(&request(1, -2, "1")),
            Err(ValidationError::InvalidAccount(-2))
        );
        assert_eq!(
            validate_payment_request(&request(1, 1, "1")),
            Err(ValidationError::SameAccount(1))
        );
    }

    #[test]
    fn test_first_failure_wins() {
        // Malformed amount is reported even though every other field is bad too.
        assert!(matches!(
            validate_payment_request(&request(0, 0, "abc")),
            Err(ValidationError::MalformedAmount(_))
        ));
        assert!(matches!(
            validate_payment_request(&request(0, 0, "0")),
            Err(ValidationError::NotPositiveAmount(_))
        ));
        assert_eq!(
            validate_payment_request(&request(-1, -1, "5")),
            Err(ValidationError::InvalidAccount(-1))
        );
        assert_eq!(
            validate_payment_request(&request(3, 0, "5")),
            Err(ValidationError::InvalidAccount(0))
        );
    }
}
