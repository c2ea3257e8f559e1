use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Account, AccountId, Favorite, Payment};

/// Complete ledger state, including payments and favorites which the flat
/// account snapshot does not carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub last_account_id: AccountId,
    pub accounts: Vec<Account>,
    pub payments: Vec<Payment>,
    pub favorites: Vec<Favorite>,
}

/// Exporter for writing ledger data as CSV or JSON
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export accounts to CSV format
    pub fn export_accounts_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["id", "phone", "balance"])?;

        for account in self.service.accounts() {
            csv_writer.write_record([
                account.id.to_string(),
                account.phone.clone(),
                account.balance.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(self.service.accounts().len())
    }

    /// Export payments to CSV format
    pub fn export_payments_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["id", "account_id", "amount", "category", "status"])?;

        for payment in self.service.payments() {
            csv_writer.write_record([
                payment.id.clone(),
                payment.account_id.to_string(),
                payment.amount.to_string(),
                payment.category.clone(),
                payment.status.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(self.service.payments().len())
    }

    /// Export the full ledger as a JSON snapshot
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = self.service.snapshot();

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
