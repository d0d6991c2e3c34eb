//! Domain model: money, accounts, payments, validation rules and the ports
//! the application layer needs from storage.

pub mod account;
pub mod clock;
pub mod money;
pub mod payment;
pub mod ports;
pub mod validation;
