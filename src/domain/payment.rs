use serde::{Deserialize, Serialize};

use super::{AccountId, Money};

pub type PaymentId = String;

/// Lifecycle of a payment. Only `InProgress -> Ok` and `InProgress -> Fail`
/// are legal; `Fail` is reached through a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "INPROGRESS")]
    InProgress,
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FAIL")]
    Fail,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::InProgress => "INPROGRESS",
            PaymentStatus::Ok => "OK",
            PaymentStatus::Fail => "FAIL",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "INPROGRESS" => Some(PaymentStatus::InProgress),
            "OK" => Some(PaymentStatus::Ok),
            "FAIL" => Some(PaymentStatus::Fail),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A debit recorded against an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub account_id: AccountId,
    /// Always positive
    pub amount: Money,
    /// Free-form tag, e.g. "food" or "mobile"
    pub category: String,
    pub status: PaymentStatus,
}

impl Payment {
    /// Create an in-progress payment. `amount` must be positive; the
    /// service checks it before calling, and a zero or negative amount panics.
    pub fn new(
        id: PaymentId,
        account_id: AccountId,
        amount: Money,
        category: impl Into<String>,
    ) -> Self {
        assert!(amount > 0, "Payment amount must be positive");
        Self {
            id,
            account_id,
            amount,
            category: category.into(),
            status: PaymentStatus::InProgress,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == PaymentStatus::Fail
    }
}
