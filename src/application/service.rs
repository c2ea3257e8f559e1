use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::domain::{
    Account, AccountId, Favorite, FavoriteId, Money, Payment, PaymentId, PaymentStatus,
    TokenGenerator, UuidTokens,
};
use crate::io::{LedgerSnapshot, SnapshotError, decode_accounts, encode_accounts};

use super::AppError;

/// How many fresh tokens are drawn before giving up on a collision.
pub const MAX_TOKEN_ATTEMPTS: usize = 8;

/// In-memory ledger owning accounts, payments and favorites.
///
/// Every operation runs to completion and either applies all of its effect
/// or none of it. The service has no internal locking: callers sharing it
/// across threads must serialize access, e.g. behind a single `Mutex`.
pub struct LedgerService {
    last_account_id: AccountId,
    accounts: Vec<Account>,
    /// First position of each account ID. Imports may append duplicates,
    /// lookups keep resolving to the earliest one.
    account_index: HashMap<AccountId, usize>,
    phones: HashSet<String>,
    payments: Vec<Payment>,
    payment_index: HashMap<PaymentId, usize>,
    favorites: Vec<Favorite>,
    favorite_index: HashMap<FavoriteId, usize>,
    tokens: Box<dyn TokenGenerator + Send>,
}

impl std::fmt::Debug for LedgerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerService")
            .field("last_account_id", &self.last_account_id)
            .field("accounts", &self.accounts)
            .field("payments", &self.payments)
            .field("favorites", &self.favorites)
            .finish_non_exhaustive()
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerService {
    /// Create an empty ledger using random UUID tokens.
    pub fn new() -> Self {
        Self::with_generator(UuidTokens)
    }

    /// Create an empty ledger with a custom payment/favorite token source.
    pub fn with_generator(tokens: impl TokenGenerator + Send + 'static) -> Self {
        Self {
            last_account_id: 0,
            accounts: Vec::new(),
            account_index: HashMap::new(),
            phones: HashSet::new(),
            payments: Vec::new(),
            payment_index: HashMap::new(),
            favorites: Vec::new(),
            favorite_index: HashMap::new(),
            tokens: Box::new(tokens),
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    // ========================
    // Account operations
    // ========================

    /// Register a new account with a zero balance and the next sequential ID.
    pub fn register_account(&mut self, phone: &str) -> Result<Account, AppError> {
        if self.phones.contains(phone) {
            return Err(AppError::DuplicatePhone(phone.to_string()));
        }

        let id = self
            .last_account_id
            .checked_add(1)
            .ok_or(AppError::AccountIdsExhausted {
                last_id: self.last_account_id,
            })?;
        let account = Account::new(id, phone);
        self.last_account_id = account.id;
        self.push_account(account.clone());

        tracing::debug!(account_id = account.id, phone, "registered account");
        Ok(account)
    }

    pub fn find_account_by_id(&self, account_id: AccountId) -> Result<&Account, AppError> {
        self.account_position(account_id)
            .map(|pos| &self.accounts[pos])
    }

    /// Credit an account. Zero is accepted, negative amounts are not.
    pub fn deposit(&mut self, account_id: AccountId, amount: Money) -> Result<(), AppError> {
        if amount < 0 {
            return Err(AppError::InvalidAmount(amount));
        }

        let pos = self.account_position(account_id)?;
        let account = &mut self.accounts[pos];
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or(AppError::InvalidAmount(amount))?;

        tracing::debug!(account_id, amount, balance = account.balance, "deposit");
        Ok(())
    }

    // ========================
    // Payment operations
    // ========================

    /// Debit an account and record an in-progress payment.
    pub fn pay(
        &mut self,
        account_id: AccountId,
        amount: Money,
        category: &str,
    ) -> Result<Payment, AppError> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(amount));
        }

        let pos = self.account_position(account_id)?;
        let account = &self.accounts[pos];
        if !account.can_afford(amount) {
            return Err(AppError::InsufficientBalance {
                account_id,
                balance: account.balance,
                required: amount,
            });
        }

        // Draw the token before touching the balance so a collision leaves
        // nothing behind.
        let token = draw_unique_token(self.tokens.as_mut(), &self.payment_index)?;
        let payment = Payment::new(token, account_id, amount, category);

        self.accounts[pos].balance -= amount;
        self.payment_index
            .insert(payment.id.clone(), self.payments.len());
        self.payments.push(payment.clone());

        tracing::debug!(
            payment_id = %payment.id,
            account_id,
            amount,
            category,
            "payment recorded"
        );
        Ok(payment)
    }

    pub fn find_payment_by_id(&self, payment_id: &str) -> Result<&Payment, AppError> {
        self.payment_position(payment_id)
            .map(|pos| &self.payments[pos])
    }

    /// Mark a payment as failed and refund its amount.
    ///
    /// There is no guard against rejecting twice: a second rejection refunds
    /// the amount again. Callers must reject each payment at most once.
    pub fn reject(&mut self, payment_id: &str) -> Result<(), AppError> {
        let payment_pos = self.payment_position(payment_id)?;
        let payment = &self.payments[payment_pos];
        let account_pos = self.account_position(payment.account_id)?;

        let amount = payment.amount;
        let refunded = self.accounts[account_pos]
            .balance
            .checked_add(amount)
            .ok_or(AppError::InvalidAmount(amount))?;

        if payment.is_failed() {
            tracing::warn!(payment_id, amount, "payment already rejected, refunding again");
        }

        self.payments[payment_pos].status = PaymentStatus::Fail;
        self.accounts[account_pos].balance = refunded;

        tracing::debug!(payment_id, amount, "payment rejected");
        Ok(())
    }

    /// Pay again with the account, amount and category of an earlier payment.
    pub fn repeat(&mut self, payment_id: &str) -> Result<Payment, AppError> {
        let original = self.find_payment_by_id(payment_id)?;
        let (account_id, amount, category) = (
            original.account_id,
            original.amount,
            original.category.clone(),
        );
        self.pay(account_id, amount, &category)
    }

    // ========================
    // Favorite operations
    // ========================

    /// Save a payment as a named template.
    pub fn favorite_payment(&mut self, payment_id: &str, name: &str) -> Result<Favorite, AppError> {
        let pos = self.payment_position(payment_id)?;
        let token = draw_unique_token(self.tokens.as_mut(), &self.favorite_index)?;
        let favorite = Favorite::from_payment(token, &self.payments[pos], name);

        self.favorite_index
            .insert(favorite.id.clone(), self.favorites.len());
        self.favorites.push(favorite.clone());

        tracing::debug!(favorite_id = %favorite.id, payment_id, name, "favorite saved");
        Ok(favorite)
    }

    pub fn find_favorite_by_id(&self, favorite_id: &str) -> Result<&Favorite, AppError> {
        self.favorite_index
            .get(favorite_id)
            .map(|&pos| &self.favorites[pos])
            .ok_or_else(|| AppError::FavoriteNotFound(favorite_id.to_string()))
    }

    /// Create a new payment from a favorite's template.
    pub fn pay_from_favorite(&mut self, favorite_id: &str) -> Result<Payment, AppError> {
        let favorite = self.find_favorite_by_id(favorite_id)?;
        let (account_id, amount, category) = (
            favorite.account_id,
            favorite.amount,
            favorite.category.clone(),
        );
        self.pay(account_id, amount, &category)
    }

    // ========================
    // Snapshot file
    // ========================

    /// Write all accounts to `path` in the flat snapshot format, replacing
    /// any existing file. A failed write may leave a truncated file.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let path = path.as_ref();
        let encoded = encode_accounts(&self.accounts)?;

        fs::write(path, encoded).map_err(|source| {
            tracing::error!(path = %path.display(), error = %source, "snapshot export failed");
            AppError::FileAccess {
                path: path.to_path_buf(),
                source,
            }
        })?;

        tracing::debug!(path = %path.display(), accounts = self.accounts.len(), "snapshot exported");
        Ok(())
    }

    /// Read a snapshot from `path` and append its accounts to the ledger.
    ///
    /// Imported accounts are not checked against existing IDs or phones.
    /// The ID counter moves past the largest imported ID so that later
    /// registrations never hand out an imported ID. Returns the number of
    /// accounts appended. Nothing is appended if the file fails to decode.
    pub fn import_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize, AppError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| {
            tracing::error!(path = %path.display(), error = %source, "snapshot import failed");
            AppError::FileAccess {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let imported = decode_accounts(&data)?;
        let count = imported.len();
        for account in imported {
            self.last_account_id = self.last_account_id.max(account.id);
            self.push_account(account);
        }

        tracing::debug!(path = %path.display(), accounts = count, "snapshot imported");
        Ok(count)
    }

    // ========================
    // Full state snapshot
    // ========================

    /// Capture the complete ledger state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            last_account_id: self.last_account_id,
            accounts: self.accounts.clone(),
            payments: self.payments.clone(),
            favorites: self.favorites.clone(),
        }
    }

    /// Rebuild a ledger from a full snapshot, checking its invariants.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, AppError> {
        let mut service = Self::new();

        for account in snapshot.accounts {
            if service.account_index.contains_key(&account.id) {
                return Err(invalid(format!("duplicate account id {}", account.id)));
            }
            if service.phones.contains(&account.phone) {
                return Err(AppError::DuplicatePhone(account.phone));
            }
            if account.balance < 0 {
                return Err(invalid(format!(
                    "account {} has negative balance {}",
                    account.id, account.balance
                )));
            }
            service.last_account_id = service.last_account_id.max(account.id);
            service.push_account(account);
        }
        service.last_account_id = service.last_account_id.max(snapshot.last_account_id);

        for payment in snapshot.payments {
            if payment.amount <= 0 {
                return Err(invalid(format!(
                    "payment {} has non-positive amount {}",
                    payment.id, payment.amount
                )));
            }
            service.check_owner(payment.account_id, "payment", &payment.id)?;
            if service.payment_index.contains_key(&payment.id) {
                return Err(invalid(format!("duplicate payment id {}", payment.id)));
            }
            service
                .payment_index
                .insert(payment.id.clone(), service.payments.len());
            service.payments.push(payment);
        }

        for favorite in snapshot.favorites {
            service.check_owner(favorite.account_id, "favorite", &favorite.id)?;
            if service.favorite_index.contains_key(&favorite.id) {
                return Err(invalid(format!("duplicate favorite id {}", favorite.id)));
            }
            service
                .favorite_index
                .insert(favorite.id.clone(), service.favorites.len());
            service.favorites.push(favorite);
        }

        Ok(service)
    }

    // ========================
    // Internals
    // ========================

    fn push_account(&mut self, account: Account) {
        self.account_index
            .entry(account.id)
            .or_insert(self.accounts.len());
        self.phones.insert(account.phone.clone());
        self.accounts.push(account);
    }

    fn account_position(&self, account_id: AccountId) -> Result<usize, AppError> {
        self.account_index
            .get(&account_id)
            .copied()
            .ok_or(AppError::AccountNotFound(account_id))
    }

    fn payment_position(&self, payment_id: &str) -> Result<usize, AppError> {
        self.payment_index
            .get(payment_id)
            .copied()
            .ok_or_else(|| AppError::PaymentNotFound(payment_id.to_string()))
    }

    fn check_owner(&self, account_id: AccountId, kind: &str, id: &str) -> Result<(), AppError> {
        if self.account_index.contains_key(&account_id) {
            Ok(())
        } else {
            Err(invalid(format!(
                "{} {} references unknown account {}",
                kind, id, account_id
            )))
        }
    }
}

fn draw_unique_token<V>(
    tokens: &mut (dyn TokenGenerator + Send + 'static),
    taken: &HashMap<String, V>,
) -> Result<String, AppError> {
    for _ in 0..MAX_TOKEN_ATTEMPTS {
        let token = tokens.next_token();
        if !taken.contains_key(&token) {
            return Ok(token);
        }
        tracing::debug!(%token, "token already in use, drawing another");
    }
    Err(AppError::TokenCollision {
        attempts: MAX_TOKEN_ATTEMPTS,
    })
}

fn invalid(message: String) -> AppError {
    AppError::MalformedSnapshot(SnapshotError::Invalid(message))
}
