// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use tempfile::TempDir;
use wallet::LedgerService;

pub const PHONE_1: &str = "+992000000001";
pub const PHONE_2: &str = "+992000000002";
pub const PHONE_3: &str = "+992000000003";

/// Helper to create an empty ledger plus a temporary directory for snapshots
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    Ok((LedgerService::new(), temp_dir))
}

/// Test fixture: standard account setup
pub struct StandardAccounts;

impl StandardAccounts {
    /// Register the three demo phones as accounts 1, 2 and 3
    pub fn register(service: &mut LedgerService) -> Result<()> {
        for phone in [PHONE_1, PHONE_2, PHONE_3] {
            service.register_account(phone)?;
        }
        Ok(())
    }

    /// Register the demo accounts and fund account 1
    pub fn register_funded(service: &mut LedgerService, amount: i64) -> Result<()> {
        Self::register(service)?;
        service.deposit(1, amount)?;
        Ok(())
    }
}

/// Generator handing out the given tokens in order, repeating the last one
pub fn scripted_tokens(tokens: &[&str]) -> impl FnMut() -> String + Send + 'static {
    let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    let mut next = 0;
    move || {
        let token = tokens[next.min(tokens.len() - 1)].clone();
        next += 1;
        token
    }
}

pub fn balance_of(service: &LedgerService, account_id: i64) -> i64 {
    service.find_account_by_id(account_id).unwrap().balance
}
