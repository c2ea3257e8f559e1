use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{AccountId, Money};
use crate::io::SnapshotError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Phone already registered: {0}")]
    DuplicatePhone(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(Money),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Insufficient balance on account {account_id}: balance {balance}, required {required}")]
    InsufficientBalance {
        account_id: AccountId,
        balance: Money,
        required: Money,
    },

    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    #[error("Favorite not found: {0}")]
    FavoriteNotFound(String),

    #[error("Could not generate a unique token after {attempts} attempts")]
    TokenCollision { attempts: usize },

    #[error("No account IDs left after {last_id}")]
    AccountIdsExhausted { last_id: AccountId },

    #[error("Cannot access file {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(#[from] SnapshotError),
}
