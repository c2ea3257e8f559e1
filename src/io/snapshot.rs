//! Flat-file account snapshot: `<id>;<phone>;<balance>|` repeated per account.
//!
//! Example for two accounts: `1;+992000000001;0|2;+992000000002;500|`

use thiserror::Error;

use crate::domain::Account;

pub const FIELD_SEPARATOR: char = ';';
pub const RECORD_TERMINATOR: char = '|';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("phone {phone:?} of account {account_id} contains a snapshot delimiter")]
    DelimiterInPhone { account_id: i64, phone: String },

    #[error("record {record}: expected 3 fields, found {found}")]
    FieldCount { record: usize, found: usize },

    #[error("record {record}: invalid {field} {value:?}")]
    InvalidNumber {
        record: usize,
        field: &'static str,
        value: String,
    },

    #[error("{0}")]
    Invalid(String),
}

/// Encode accounts in collection order. Every record, including the last,
/// is followed by the terminator.
pub fn encode_accounts(accounts: &[Account]) -> Result<String, SnapshotError> {
    let mut out = String::new();
    for account in accounts {
        if account
            .phone
            .contains([FIELD_SEPARATOR, RECORD_TERMINATOR])
        {
            return Err(SnapshotError::DelimiterInPhone {
                account_id: account.id,
                phone: account.phone.clone(),
            });
        }
        out.push_str(&account.id.to_string());
        out.push(FIELD_SEPARATOR);
        out.push_str(&account.phone);
        out.push(FIELD_SEPARATOR);
        out.push_str(&account.balance.to_string());
        out.push(RECORD_TERMINATOR);
    }
    Ok(out)
}

/// Decode a snapshot produced by [`encode_accounts`].
pub fn decode_accounts(data: &str) -> Result<Vec<Account>, SnapshotError> {
    let mut records: Vec<&str> = data.split(RECORD_TERMINATOR).collect();
    // The terminator after the final record leaves one empty tail segment.
    if records.last().is_some_and(|tail| tail.is_empty()) {
        records.pop();
    }

    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| decode_record(idx + 1, record))
        .collect()
}

fn decode_record(record: usize, raw: &str) -> Result<Account, SnapshotError> {
    let fields: Vec<&str> = raw.split(FIELD_SEPARATOR).collect();
    let [id, phone, balance] = fields.as_slice() else {
        return Err(SnapshotError::FieldCount {
            record,
            found: fields.len(),
        });
    };

    let id = parse_field(record, "account id", id)?;
    let balance = parse_field(record, "balance", balance)?;
    Ok(Account::new(id, *phone).with_balance(balance))
}

fn parse_field(record: usize, field: &'static str, value: &str) -> Result<i64, SnapshotError> {
    value.parse().map_err(|_| SnapshotError::InvalidNumber {
        record,
        field,
        value: value.to_string(),
    })
}
