use crate::domain::payment::PaymentRequest;
use std::io::Read;

/// Reads payment requests from a CSV source with a `from,to,amount` header.
///
/// Whitespace around fields is trimmed. Amounts are kept as raw text so that
/// malformed values surface as validation errors rather than parse errors.
pub struct PaymentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PaymentReader<R> {
    /// Creates a new `PaymentReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes requests.
    ///
    /// A row that cannot be decoded yields a `csv::Error` and does not stop
    /// the stream.
    pub fn requests(self) -> impl Iterator<Item = csv::Result<PaymentRequest>> {
        self.reader.into_deserialize()
    }
}
