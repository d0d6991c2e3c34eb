//! Adapters between the outside world and the ledger service.

pub mod csv;
