use async_trait::async_trait;
use buddy_core::{BuddyError, Flashcard, FlashcardCache, Result};
use sqlx::Row;

use super::SqliteStore;

fn cache_err<E: std::fmt::Display>(e: E) -> BuddyError {
    BuddyError::Cache(e.to_string())
}

#[async_trait]
impl FlashcardCache for SqliteStore {
    async fn get(&self, context_hash: &str) -> Result<Option<Vec<Flashcard>>> {
        let rows = sqlx::query(
            r"
            SELECT question, answer
            FROM flashcards
            WHERE context_hash = ?1
            ORDER BY position ASC
            ",
        )
        .bind(context_hash)
        .fetch_all(&self.pool)
        .await
        .map_err(cache_err)?;

        if rows.is_empty() {
            return Ok(None);
        }

        let mut cards = Vec::with_capacity(rows.len());
        for row in rows {
            cards.push(Flashcard {
                question: row.try_get("question").map_err(cache_err)?,
                answer: row.try_get("answer").map_err(cache_err)?,
            });
        }
        Ok(Some(cards))
    }

    async fn put(&self, context_hash: &str, cards: &[Flashcard]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(cache_err)?;

        sqlx::query("DELETE FROM flashcards WHERE context_hash = ?1")
            .bind(context_hash)
            .execute(&mut *tx)
            .await
            .map_err(cache_err)?;

        for (position, card) in (0_i64..).zip(cards) {
            sqlx::query(
                r"
                INSERT INTO flashcards (context_hash, position, question, answer)
                VALUES (?1, ?2, ?3, ?4)
                ",
            )
            .bind(context_hash)
            .bind(position)
            .bind(&card.question)
            .bind(&card.answer)
            .execute(&mut *tx)
            .await
            .map_err(cache_err)?;
        }

        tx.commit().await.map_err(cache_err)?;
        Ok(())
    }
}
