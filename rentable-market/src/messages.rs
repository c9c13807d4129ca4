use std::sync::Arc;

use crate::{MessageData, NewMessage, PrimaryKey, Result, Storage};

/// Per-item message threads between users and listing owners.
pub struct Messaging<S> {
    storage: Arc<S>,
}

impl<S> Messaging<S>
where
    S: Storage,
{
    pub fn new(storage: &Arc<S>) -> Self {
        Self {
            storage: storage.clone(),
        }
    }

    /// Posts a message to an item's thread. Empty or whitespace-only text is
    /// silently ignored and nothing is stored.
    pub async fn post(
        &self,
        item_id: PrimaryKey,
        sender: &str,
        text: &str,
    ) -> Result<Option<MessageData>> {
        let text = text.trim();

        if text.is_empty() {
            return Ok(None);
        }

        let message = self
            .storage
            .create_message(NewMessage {
                item_id,
                sender: sender.to_string(),
                text: text.to_string(),
            })
            .await?;

        Ok(Some(message))
    }

    /// The full thread for an item, in append order
    pub async fn thread(&self, item_id: PrimaryKey) -> Result<Vec<MessageData>> {
        self.storage.messages_for_item(item_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{listing, storage_in_temp_dir};
    use crate::StorageError;

    #[tokio::test]
    async fn empty_text_is_not_stored() {
        let (storage, _dir) = storage_in_temp_dir();
        let storage = Arc::new(storage);
        let item = storage.create_item(listing("Drill", "bob", 10)).await.unwrap();

        let messaging = Messaging::new(&storage);

        assert!(messaging.post(item.id, "alice", "").await.unwrap().is_none());
        assert!(messaging.post(item.id, "alice", "  \n ").await.unwrap().is_none());
        assert!(messaging.thread(item.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn messages_carry_item_snapshots_and_keep_append_order() {
        let (storage, _dir) = storage_in_temp_dir();
        let storage = Arc::new(storage);

        let drill = storage.create_item(listing("Drill", "bob", 10)).await.unwrap();
        let tent = storage.create_item(listing("Tent", "carol", 20)).await.unwrap();

        let messaging = Messaging::new(&storage);

        messaging.post(drill.id, "alice", "  is this still free? ").await.unwrap();
        messaging.post(tent.id, "alice", "hello").await.unwrap();
        messaging.post(drill.id, "bob", "it is").await.unwrap();

        let thread = messaging.thread(drill.id).await.unwrap();

        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].text, "is this still free?");
        assert_eq!(thread[0].item_name, "Drill");
        assert_eq!(thread[0].owner, "bob");
        assert_eq!(thread[1].sender, "bob");
    }

    #[tokio::test]
    async fn posting_to_a_missing_item_is_not_found() {
        let (storage, _dir) = storage_in_temp_dir();
        let storage = Arc::new(storage);
        let messaging = Messaging::new(&storage);

        let result = messaging.post(9, "alice", "anyone there?").await;
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }
}
