use async_trait::async_trait;
use buddy_payments::{Account, AccountId, AccountKey, AccountStore, PaymentError, Result};
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteStore;

const ACCOUNT_COLUMNS: &str = "id, account_key, username, password_hash, credits, created_at";

fn storage<E: std::fmt::Display>(e: E) -> PaymentError {
    PaymentError::Storage(e.to_string())
}

fn balance(value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| storage(format!("credit balance out of range: {value}")))
}

fn account_from_row(row: &SqliteRow) -> Result<Account> {
    let id: String = row.try_get("id").map_err(storage)?;
    let key: String = row.try_get("account_key").map_err(storage)?;
    let credits: i64 = row.try_get("credits").map_err(storage)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(storage)?;

    Ok(Account {
        id: AccountId::from_string(id),
        key: AccountKey::from_string(key),
        username: row.try_get("username").map_err(storage)?,
        password_hash: row.try_get("password_hash").map_err(storage)?,
        credits: balance(credits)?,
        created_at,
    })
}

impl SqliteStore {
    async fn fetch_account(&self, column: &str, value: &str) -> Result<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {column} = ?1"
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn account_exists(&self, id: &AccountId) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM accounts WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl AccountStore for SqliteStore {
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        starting_credits: u32,
    ) -> Result<Account> {
        let account = Account::new(username, password_hash, starting_credits);

        let res = sqlx::query(
            r"
            INSERT INTO accounts (id, account_key, username, password_hash, credits, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(account.id.as_str())
        .bind(account.key.as_str())
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(i64::from(account.credits))
        .bind(account.created_at)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(account),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(PaymentError::UsernameTaken(username.to_string()))
            }
            Err(e) => Err(storage(e)),
        }
    }

    async fn get(&self, id: &AccountId) -> Result<Option<Account>> {
        self.fetch_account("id", id.as_str()).await
    }

    async fn get_by_key(&self, key: &AccountKey) -> Result<Option<Account>> {
        self.fetch_account("account_key", key.as_str()).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.fetch_account("username", username).await
    }

    async fn add_credits(&self, id: &AccountId, credits: u32) -> Result<u32> {
        let row = sqlx::query(
            "UPDATE accounts SET credits = credits + ?2 WHERE id = ?1 RETURNING credits",
        )
        .bind(id.as_str())
        .bind(i64::from(credits))
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        let row = row.ok_or_else(|| PaymentError::AccountNotFound(id.to_string()))?;
        balance(row.try_get("credits").map_err(storage)?)
    }

    async fn try_spend(&self, id: &AccountId) -> Result<u32> {
        // The guard and the decrement run as one statement, so concurrent
        // spends cannot take the balance below zero.
        let row = sqlx::query(
            "UPDATE accounts SET credits = credits - 1 WHERE id = ?1 AND credits > 0 RETURNING credits",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        match row {
            Some(row) => balance(row.try_get("credits").map_err(storage)?),
            None if self.account_exists(id).await? => Err(PaymentError::InsufficientCredits),
            None => Err(PaymentError::AccountNotFound(id.to_string())),
        }
    }
}
