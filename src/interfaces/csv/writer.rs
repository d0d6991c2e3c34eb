use crate::domain::account::Account;
use crate::domain::payment::Payment;
use std::io::Write;

/// Writes account balances as `account,balance` rows.
pub struct AccountWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AccountWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_accounts(&mut self, accounts: impl IntoIterator<Item = Account>) -> csv::Result<()> {
        self.writer.write_record(["account", "balance"])?;
        for account in accounts {
            self.writer
                .write_record([account.id.to_string(), account.balance.to_string()])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Writes one account including its creation time.
    pub fn write_account_details(&mut self, account: &Account) -> csv::Result<()> {
        self.writer
            .write_record(["account", "balance", "created_at"])?;
        self.writer.write_record([
            account.id.to_string(),
            account.balance.to_string(),
            account.created_at.to_rfc3339(),
        ])?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes payments as `id,from,to,amount,created_at` rows.
pub struct PaymentWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PaymentWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_payments(&mut self, payments: impl IntoIterator<Item = Payment>) -> csv::Result<()> {
        self.writer
            .write_record(["id", "from", "to", "amount", "created_at"])?;
        for payment in payments {
            self.writer.write_record([
                payment.id.map(|id| id.to_string()).unwrap_or_default(),
                payment.from.to_string(),
                payment.to.to_string(),
                payment.amount.to_string(),
                payment.created_at.to_rfc3339(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
