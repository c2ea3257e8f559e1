use serde::{Deserialize, Serialize};

use super::Money;

pub type AccountId = i64;

/// A balance holder identified by a sequential ID and a unique phone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub phone: String,
    /// Never negative: every debit is checked against it first.
    pub balance: Money,
}

impl Account {
    /// A freshly registered account always starts empty.
    pub fn new(id: AccountId, phone: impl Into<String>) -> Self {
        Self {
            id,
            phone: phone.into(),
            balance: 0,
        }
    }

    pub fn with_balance(mut self, balance: Money) -> Self {
        self.balance = balance;
        self
    }

    pub fn can_afford(&self, amount: Money) -> bool {
        self.balance >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_is_empty() {
        let account = Account::new(1, "+992000000001");
        assert_eq!(account.id, 1);
        assert_eq!(account.phone, "+992000000001");
        assert_eq!(account.balance, 0);
    }

    #[test]
    fn test_can_afford_is_inclusive() {
        let account = Account::new(1, "+992000000001").with_balance(500);
        assert!(account.can_afford(500));
        assert!(account.can_afford(1));
        assert!(!account.can_afford(501));
    }
}
