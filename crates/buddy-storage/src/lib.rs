//! # buddy-storage
//!
//! `SQLite` persistence for Study Buddy. [`SqliteStore`] implements both the
//! account store and the flashcard cache, so one database file holds
//! balances and generated decks across restarts.
//!
//! ```rust,ignore
//! let store = SqliteStore::open("sqlite://study-buddy.db").await?;
//! let accounts: Arc<dyn AccountStore> = Arc::new(store.clone());
//! let cache: Arc<dyn FlashcardCache> = Arc::new(store);
//! ```

pub mod sqlite;

pub use sqlite::{SqliteInitError, SqliteStore};
