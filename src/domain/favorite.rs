use serde::{Deserialize, Serialize};

use super::{AccountId, Money, Payment};

pub type FavoriteId = String;

/// A payment template frozen from an existing payment. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub account_id: AccountId,
    pub name: String,
    pub amount: Money,
    pub category: String,
}

impl Favorite {
    /// Copy account, amount and category out of `payment`.
    pub fn from_payment(id: FavoriteId, payment: &Payment, name: impl Into<String>) -> Self {
        Self {
            id,
            account_id: payment.account_id,
            name: name.into(),
            amount: payment.amount,
            category: payment.category.clone(),
        }
    }
}
