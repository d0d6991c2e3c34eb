pub mod payment_reader;
pub mod writer;
