//! Accounts & Credits
//!
//! An account holds a password hash and a credit balance. One credit buys
//! one flashcard generation; a completed checkout adds a pack of credits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{PaymentError, Result};

/// Stable account identifier, safe to hand to Stripe as `client_reference_id`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Secret key the browser presents (formatted: XXXX-XXXX-XXXX-XXXX)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountKey(String);

impl AccountKey {
    /// Generate a new account key
    pub fn generate() -> Self {
        let hex = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
        Self(format!(
            "{}-{}-{}-{}",
            &hex[0..4],
            &hex[4..8],
            &hex[8..12],
            &hex[12..16]
        ))
    }

    /// Parse from string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An account record
#[derive(Clone, Debug)]
pub struct Account {
    pub id: AccountId,

    /// Session token carried in the login cookie
    pub key: AccountKey,

    pub username: String,

    /// Argon2 PHC string
    pub password_hash: String,

    /// Remaining generation credits
    pub credits: u32,

    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>, credits: u32) -> Self {
        Self {
            id: AccountId::generate(),
            key: AccountKey::generate(),
            username: username.into(),
            password_hash: password_hash.into(),
            credits,
            created_at: Utc::now(),
        }
    }

    pub const fn has_credits(&self) -> bool {
        self.credits > 0
    }
}

/// Account storage trait
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Register a new account; usernames are unique
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        starting_credits: u32,
    ) -> Result<Account>;

    async fn get(&self, id: &AccountId) -> Result<Option<Account>>;

    async fn get_by_key(&self, key: &AccountKey) -> Result<Option<Account>>;

    async fn get_by_username(&self, username: &str) -> Result<Option<Account>>;

    /// Add credits, returning the new balance
    async fn add_credits(&self, id: &AccountId, credits: u32) -> Result<u32>;

    /// Atomically take one credit, returning the remaining balance.
    ///
    /// Fails with `InsufficientCredits` at zero; the balance never goes negative.
    async fn try_spend(&self, id: &AccountId) -> Result<u32>;
}

#[derive(Default)]
struct Accounts {
    by_id: HashMap<AccountId, Account>,
    by_key: HashMap<AccountKey, AccountId>,
    by_username: HashMap<String, AccountId>,
}

/// In-memory account store (for development and tests)
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<Accounts>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> PaymentError {
    PaymentError::Storage(e.to_string())
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        starting_credits: u32,
    ) -> Result<Account> {
        let mut accounts = self.accounts.write().map_err(poisoned)?;

        if accounts.by_username.contains_key(username) {
            return Err(PaymentError::UsernameTaken(username.to_string()));
        }

        let account = Account::new(username, password_hash, starting_credits);
        accounts
            .by_key
            .insert(account.key.clone(), account.id.clone());
        accounts
            .by_username
            .insert(account.username.clone(), account.id.clone());
        accounts.by_id.insert(account.id.clone(), account.clone());

        Ok(account)
    }

    async fn get(&self, id: &AccountId) -> Result<Option<Account>> {
        let accounts = self.accounts.read().map_err(poisoned)?;
        Ok(accounts.by_id.get(id).cloned())
    }

    async fn get_by_key(&self, key: &AccountKey) -> Result<Option<Account>> {
        let accounts = self.accounts.read().map_err(poisoned)?;
        Ok(accounts
            .by_key
            .get(key)
            .and_then(|id| accounts.by_id.get(id))
            .cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().map_err(poisoned)?;
        Ok(accounts
            .by_username
            .get(username)
            .and_then(|id| accounts.by_id.get(id))
            .cloned())
    }

    async fn add_credits(&self, id: &AccountId, credits: u32) -> Result<u32> {
        let mut accounts = self.accounts.write().map_err(poisoned)?;
        let account = accounts
            .by_id
            .get_mut(id)
            .ok_or_else(|| PaymentError::AccountNotFound(id.to_string()))?;

        account.credits = account.credits.saturating_add(credits);
        Ok(account.credits)
    }

    async fn try_spend(&self, id: &AccountId) -> Result<u32> {
        let mut accounts = self.accounts.write().map_err(poisoned)?;
        let account = accounts
            .by_id
            .get_mut(id)
            .ok_or_else(|| PaymentError::AccountNotFound(id.to_string()))?;

        if !account.has_credits() {
            return Err(PaymentError::InsufficientCredits);
        }
        account.credits -= 1;
        Ok(account.credits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_key_generation() {
        let key = AccountKey::generate();
        assert_eq!(key.as_str().len(), 19); // XXXX-XXXX-XXXX-XXXX
        assert_eq!(key.as_str().matches('-').count(), 3);
    }

    #[test]
    fn test_account_key_parse_normalizes() {
        let key = AccountKey::from_string(" abcd-ef01-2345-6789 ");
        assert_eq!(key.as_str(), "ABCD-EF01-2345-6789");
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = MemoryAccountStore::new();
        let account = store.create("ada", "$argon2id$stub", 3).await.unwrap();

        assert_eq!(account.credits, 3);
        assert_eq!(account.password_hash, "$argon2id$stub");
        assert_eq!(store.get(&account.id).await.unwrap().unwrap().username, "ada");
        assert_eq!(store.get_by_key(&account.key).await.unwrap().unwrap().id, account.id);
        assert_eq!(store.get_by_username("ada").await.unwrap().unwrap().id, account.id);
        assert!(store.get_by_key(&AccountKey::generate()).await.unwrap().is_none());
        assert!(store.get_by_username("grace").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryAccountStore::new();
        store.create("ada", "h", 3).await.unwrap();

        let err = store.create("ada", "h", 3).await.unwrap_err();
        assert!(matches!(err, PaymentError::UsernameTaken(_)));
    }

    #[tokio::test]
    async fn test_spend_stops_at_zero() {
        let store = MemoryAccountStore::new();
        let account = store.create("ada", "h", 2).await.unwrap();

        assert_eq!(store.try_spend(&account.id).await.unwrap(), 1);
        assert_eq!(store.try_spend(&account.id).await.unwrap(), 0);
        assert!(matches!(
            store.try_spend(&account.id).await.unwrap_err(),
            PaymentError::InsufficientCredits
        ));
        assert_eq!(store.get(&account.id).await.unwrap().unwrap().credits, 0);
    }

    #[tokio::test]
    async fn test_add_credits() {
        let store = MemoryAccountStore::new();
        let account = store.create("ada", "h", 0).await.unwrap();

        assert_eq!(store.add_credits(&account.id, 10).await.unwrap(), 10);
        assert!(matches!(
            store.add_credits(&AccountId::generate(), 10).await.unwrap_err(),
            PaymentError::AccountNotFound(_)
        ));
    }
}
