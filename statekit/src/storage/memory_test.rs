use super::*;

#[tokio::test]
async fn new_storage_is_empty() {
    let storage: MemoryStorage<String, String> = MemoryStorage::new();
    assert_eq!(storage.read_user().await.unwrap(), None);
    assert_eq!(storage.read_token().await.unwrap(), None);
}

#[tokio::test]
async fn save_then_read_each_slot() {
    let storage: MemoryStorage<String, String> = MemoryStorage::new();
    storage.save_user(&"alice".to_owned()).await.unwrap();
    storage.save_token(&"tok-1".to_owned()).await.unwrap();

    assert_eq!(storage.read_user().await.unwrap().as_deref(), Some("alice"));
    assert_eq!(storage.read_token().await.unwrap().as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn clear_empties_only_its_slot() {
    let storage = MemoryStorage::with_session("alice".to_owned(), "tok-1".to_owned());
    storage.clear_user().await.unwrap();

    assert_eq!(storage.read_user().await.unwrap(), None);
    assert_eq!(storage.read_token().await.unwrap().as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn clear_empty_slot_succeeds() {
    let storage: MemoryStorage<String, String> = MemoryStorage::default();
    assert!(storage.clear_token().await.is_ok());
}

#[tokio::test]
async fn clones_share_slots() {
    let storage: MemoryStorage<String, u64> = MemoryStorage::new();
    let other = storage.clone();
    storage.save_token(&7).await.unwrap();

    assert_eq!(other.read_token().await.unwrap(), Some(7));
}
