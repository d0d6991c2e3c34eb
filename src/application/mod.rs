//! Application layer orchestrating the domain against the storage ports.
//!
//! [`service::LedgerService`] is the transfer engine; every request runs in
//! its own unit of work and the service keeps no shared mutable state.
//! [`logging::LoggingMiddleware`] decorates any [`service::WalletService`].

pub mod logging;
pub mod service;
