use std::{
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::Utc;
use log::warn;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{
    fs,
    sync::{Mutex, MutexGuard},
};

use crate::{
    ItemData, MessageData, NewItem, NewMessage, NewRental, NewUser, PrimaryKey, ReclaimItem,
    RentalData, Result, Storage, StorageError, UserData,
};

/// A flat-file JSON implementation of [Storage] for the marketplace.
///
/// Each document is a pretty-printed JSON array in the data directory.
/// Every operation loads the whole document, mutates it in memory, and
/// writes the whole document back, under that document's mutex. A missing
/// or malformed file reads as an empty sequence and is recreated on the
/// next write.
pub struct JsonStorage {
    items: Document<ItemData>,
    users: Document<UserData>,
    rentals: Document<RentalData>,
    messages: Document<MessageData>,
}

impl JsonStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();

        Self {
            items: Document::new(&dir, "items.json"),
            users: Document::new(&dir, "users.json"),
            rentals: Document::new(&dir, "rent_log.json"),
            messages: Document::new(&dir, "messages.json"),
        }
    }
}

#[async_trait]
impl Storage for JsonStorage {
    async fn user_by_username(&self, username: &str) -> Result<UserData> {
        let _guard = self.users.lock().await;

        self.users
            .load()
            .await?
            .into_iter()
            .find(|u| u.username == username)
            .ok_or(StorageError::NotFound {
                resource: "user",
                identifier: "username",
            })
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserData> {
        let _guard = self.users.lock().await;
        let mut users = self.users.load().await?;

        if users.iter().any(|u| u.username == new_user.username) {
            return Err(StorageError::Conflict {
                resource: "user",
                field: "username",
                value: new_user.username,
            });
        }

        let user = UserData {
            id: next_id(users.iter().map(|u| u.id)),
            username: new_user.username,
            password: new_user.password,
            phone: new_user.phone,
        };

        users.push(user.clone());
        self.users.store(&users).await?;

        Ok(user)
    }

    async fn list_items(&self) -> Result<Vec<ItemData>> {
        let _guard = self.items.lock().await;
        self.items.load().await
    }

    async fn item_by_id(&self, item_id: PrimaryKey) -> Result<ItemData> {
        let _guard = self.items.lock().await;

        self.items
            .load()
            .await?
            .into_iter()
            .find(|i| i.id == item_id)
            .ok_or(StorageError::NotFound {
                resource: "item",
                identifier: "id",
            })
    }

    async fn create_item(&self, new_item: NewItem) -> Result<ItemData> {
        let _guard = self.items.lock().await;
        let mut items = self.items.load().await?;

        let item = ItemData {
            id: next_id(items.iter().map(|i| i.id)),
            name: new_item.name,
            description: new_item.description,
            daily_price: new_item.daily_price,
            owner: new_item.owner,
            category: new_item.category,
            is_available: true,
        };

        items.push(item.clone());
        self.items.store(&items).await?;

        Ok(item)
    }

    async fn set_item_availability(&self, item_id: PrimaryKey, available: bool) -> Result<ItemData> {
        let _guard = self.items.lock().await;
        let mut items = self.items.load().await?;

        let item = items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or(StorageError::NotFound {
                resource: "item",
                identifier: "id",
            })?;

        item.is_available = available;
        let item = item.clone();

        self.items.store(&items).await?;

        Ok(item)
    }

    async fn rent_item(&self, new_rental: NewRental) -> Result<RentalData> {
        // The items document stays locked until the flip is written, so two
        // rents of the same item cannot both observe it as available.
        let _items_guard = self.items.lock().await;
        let mut items = self.items.load().await?;

        let item = items
            .iter_mut()
            .find(|i| i.id == new_rental.item_id)
            .ok_or(StorageError::NotFound {
                resource: "item",
                identifier: "id",
            })?;

        if !item.is_available {
            return Err(StorageError::Unavailable {
                item_id: new_rental.item_id,
            });
        }

        item.is_available = false;
        let snapshot = item.clone();

        self.items.store(&items).await?;

        let _rentals_guard = self.rentals.lock().await;
        let mut rentals = self.rentals.load().await?;

        let rental = RentalData {
            id: next_id(rentals.iter().map(|r| r.id)),
            item_id: snapshot.id,
            item_name: snapshot.name,
            description: snapshot.description,
            renter: new_rental.renter,
            days: new_rental.days,
            rented_at: Utc::now(),
        };

        rentals.push(rental.clone());
        self.rentals.store(&rentals).await?;

        Ok(rental)
    }

    async fn reclaim_item(&self, reclaim: ReclaimItem) -> Result<ItemData> {
        let _guard = self.items.lock().await;
        let mut items = self.items.load().await?;

        // First match wins. Listings sharing a name and description are
        // indistinguishable here.
        let matched = items
            .iter_mut()
            .find(|i| {
                i.name == reclaim.item_name
                    && i.description == reclaim.description
                    && !i.is_available
                    && i.owner != reclaim.confirmed_by
            })
            .ok_or(StorageError::NotFound {
                resource: "rented item",
                identifier: "name and description",
            })?;

        matched.is_available = true;
        let matched = matched.clone();

        self.items.store(&items).await?;

        Ok(matched)
    }

    async fn list_rentals(&self) -> Result<Vec<RentalData>> {
        let _guard = self.rentals.lock().await;
        self.rentals.load().await
    }

    async fn rentals_by_renter(&self, renter: &str) -> Result<Vec<RentalData>> {
        let _guard = self.rentals.lock().await;

        Ok(self
            .rentals
            .load()
            .await?
            .into_iter()
            .filter(|r| r.renter == renter)
            .collect())
    }

    async fn messages_for_item(&self, item_id: PrimaryKey) -> Result<Vec<MessageData>> {
        let _guard = self.messages.lock().await;

        Ok(self
            .messages
            .load()
            .await?
            .into_iter()
            .filter(|m| m.item_id == item_id)
            .collect())
    }

    async fn create_message(&self, new_message: NewMessage) -> Result<MessageData> {
        // Taken before the messages lock, and released again by then
        let item = self.item_by_id(new_message.item_id).await?;

        let _guard = self.messages.lock().await;
        let mut messages = self.messages.load().await?;

        let message = MessageData {
            id: next_id(messages.iter().map(|m| m.id)),
            item_id: item.id,
            item_name: item.name,
            owner: item.owner,
            sender: new_message.sender,
            text: new_message.text,
            sent_at: Utc::now(),
        };

        messages.push(message.clone());
        self.messages.store(&messages).await?;

        Ok(message)
    }
}

/// One persisted document and its mutex
struct Document<T> {
    path: PathBuf,
    mutex: Mutex<()>,
    _record: PhantomData<T>,
}

impl<T> Document<T>
where
    T: Serialize + DeserializeOwned,
{
    fn new(dir: &Path, file_name: &str) -> Self {
        Self {
            path: dir.join(file_name),
            mutex: Mutex::new(()),
            _record: PhantomData,
        }
    }

    async fn lock(&self) -> MutexGuard<'_, ()> {
        self.mutex.lock().await
    }

    /// Loads the whole document. The caller must hold the lock if the
    /// result will be written back.
    async fn load(&self) -> Result<Vec<T>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(internal(e)),
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(
                    "{} is malformed and reads as empty: {}",
                    self.path.display(),
                    e
                );
                Ok(vec![])
            }
        }
    }

    /// Writes the whole document back, pretty-printed.
    async fn store(&self, records: &[T]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(internal)?;
        }

        let bytes = serde_json::to_vec_pretty(records).map_err(internal)?;
        fs::write(&self.path, bytes).await.map_err(internal)
    }
}

fn next_id(ids: impl Iterator<Item = PrimaryKey>) -> PrimaryKey {
    ids.max().unwrap_or(0) + 1
}

fn internal<E>(e: E) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StorageError::Internal(Box::new(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{listing, storage_in_temp_dir};

    #[tokio::test]
    async fn missing_documents_read_as_empty() {
        let (storage, _dir) = storage_in_temp_dir();

        assert!(storage.list_items().await.unwrap().is_empty());
        assert!(storage.list_rentals().await.unwrap().is_empty());
        assert!(storage.messages_for_item(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_documents_read_as_empty_and_recover_on_write() {
        let (storage, dir) = storage_in_temp_dir();

        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("items.json"), b"{ this is not json").unwrap();

        assert!(storage.list_items().await.unwrap().is_empty());

        let item = storage.create_item(listing("Drill", "bob", 10)).await.unwrap();
        assert_eq!(item.id, 1);

        let items = storage.list_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_available);
    }

    #[tokio::test]
    async fn ids_are_stable_and_incrementing() {
        let (storage, _dir) = storage_in_temp_dir();

        for (n, name) in ["Drill", "Tent", "Bike"].into_iter().enumerate() {
            let item = storage.create_item(listing(name, "bob", 10)).await.unwrap();
            assert_eq!(item.id, n as PrimaryKey + 1);
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let (storage, _dir) = storage_in_temp_dir();

        let new_user = || NewUser {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
            phone: "010-1234".to_string(),
        };

        storage.create_user(new_user()).await.unwrap();
        let result = storage.create_user(new_user()).await;

        assert!(matches!(
            result,
            Err(StorageError::Conflict {
                resource: "user",
                field: "username",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn rent_rejects_an_already_rented_item() {
        let (storage, _dir) = storage_in_temp_dir();
        let item = storage.create_item(listing("Drill", "bob", 10)).await.unwrap();

        let rent = |renter: &str| NewRental {
            item_id: item.id,
            renter: renter.to_string(),
            days: 2,
        };

        storage.rent_item(rent("alice")).await.unwrap();
        let second = storage.rent_item(rent("carol")).await;

        assert!(matches!(second, Err(StorageError::Unavailable { .. })));
        assert_eq!(storage.list_rentals().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_rents_of_one_item_succeed_exactly_once() {
        let (storage, _dir) = storage_in_temp_dir();
        let item = storage.create_item(listing("Drill", "bob", 10)).await.unwrap();

        let rent = |renter: &str| NewRental {
            item_id: item.id,
            renter: renter.to_string(),
            days: 3,
        };

        let (first, second) = tokio::join!(
            storage.rent_item(rent("alice")),
            storage.rent_item(rent("carol"))
        );

        assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
        assert_eq!(storage.list_rentals().await.unwrap().len(), 1);
        assert!(!storage.item_by_id(item.id).await.unwrap().is_available);
    }

    #[tokio::test]
    async fn documents_are_written_pretty_printed() {
        let (storage, dir) = storage_in_temp_dir();
        storage.create_item(listing("Drill", "bob", 10)).await.unwrap();

        let raw = std::fs::read_to_string(dir.join("items.json")).unwrap();
        assert!(raw.contains('\n'));
        assert!(raw.contains("\"daily_price\": 10"));
    }
}
