use buddy_core::{Flashcard, FlashcardCache};
use buddy_payments::{AccountId, AccountStore, PaymentError};
use buddy_storage::SqliteStore;

async fn store(name: &str) -> SqliteStore {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    SqliteStore::open(&url).await.expect("open")
}

#[tokio::test]
async fn sqlite_account_roundtrip() {
    let store = store("memdb_accounts").await;
    let created = store.create("ada", "$argon2id$hash", 3).await.unwrap();

    let by_id = AccountStore::get(&store, &created.id).await.unwrap().unwrap();
    assert_eq!(by_id.username, "ada");
    assert_eq!(by_id.password_hash, "$argon2id$hash");
    assert_eq!(by_id.credits, 3);
    assert_eq!(by_id.key, created.key);

    let by_key = store.get_by_key(&created.key).await.unwrap().unwrap();
    assert_eq!(by_key.id, created.id);

    let by_name = store.get_by_username("ada").await.unwrap().unwrap();
    assert_eq!(by_name.id, created.id);

    assert!(store.get_by_username("grace").await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_duplicate_username_rejected() {
    let store = store("memdb_duplicate").await;
    store.create("ada", "h", 3).await.unwrap();

    let err = store.create("ada", "h2", 3).await.unwrap_err();
    assert!(matches!(err, PaymentError::UsernameTaken(name) if name == "ada"));
}

#[tokio::test]
async fn sqlite_spend_stops_at_zero() {
    let store = store("memdb_spend").await;
    let account = store.create("ada", "h", 2).await.unwrap();

    assert_eq!(store.try_spend(&account.id).await.unwrap(), 1);
    assert_eq!(store.try_spend(&account.id).await.unwrap(), 0);
    assert!(matches!(
        store.try_spend(&account.id).await.unwrap_err(),
        PaymentError::InsufficientCredits
    ));
    assert_eq!(AccountStore::get(&store, &account.id).await.unwrap().unwrap().credits, 0);

    assert_eq!(store.add_credits(&account.id, 10).await.unwrap(), 10);
}

#[tokio::test]
async fn sqlite_unknown_account_is_not_found() {
    let store = store("memdb_unknown").await;
    let missing = AccountId::from_string("missing");

    assert!(matches!(
        store.try_spend(&missing).await.unwrap_err(),
        PaymentError::AccountNotFound(_)
    ));
    assert!(matches!(
        store.add_credits(&missing, 10).await.unwrap_err(),
        PaymentError::AccountNotFound(_)
    ));
}

#[tokio::test]
async fn sqlite_flashcard_cache_keeps_order_and_replaces() {
    let store = store("memdb_cache").await;
    assert!(FlashcardCache::get(&store, "h1").await.unwrap().is_none());

    let deck = vec![
        Flashcard::new("Q1", "A1"),
        Flashcard::new("Q2", "A2"),
        Flashcard::new("Q3", "A3"),
    ];
    store.put("h1", &deck).await.unwrap();
    assert_eq!(FlashcardCache::get(&store, "h1").await.unwrap().unwrap(), deck);

    store.put("h1", &[Flashcard::new("Q9", "A9")]).await.unwrap();
    assert_eq!(
        FlashcardCache::get(&store, "h1").await.unwrap().unwrap(),
        vec![Flashcard::new("Q9", "A9")]
    );
}

#[tokio::test]
async fn sqlite_migrate_is_idempotent() {
    let store = store("memdb_migrate").await;
    store.migrate().await.unwrap();
    store.create("ada", "h", 1).await.unwrap();
    store.migrate().await.unwrap();
    assert!(store.get_by_username("ada").await.unwrap().is_some());
}
