use async_trait::async_trait;
use thiserror::Error;

mod data;
pub use data::*;

mod json;
pub use json::*;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// An unknown or internal error happened with the backing store
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// A record already exists
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        /// The record kind in question
        resource: &'static str,
        /// The field that is conflicting
        field: &'static str,
        /// The conflicting value
        value: String,
    },
    /// A record doesn't exist
    #[error("{resource}:{identifier} doesn't exist")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
    /// The item exists but is currently rented out
    #[error("item {item_id} is already rented")]
    Unavailable { item_id: PrimaryKey },
}

/// Represents a type that can persist marketplace data.
///
/// Every mutation on one document kind is mutually exclusive with other
/// mutations on the same kind, so a check-then-write sequence inside a single
/// call cannot interleave with another caller's.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    async fn user_by_username(&self, username: &str) -> Result<UserData>;
    /// Appends a user record. Duplicate usernames are a conflict, and a
    /// rejected signup leaves the document untouched.
    async fn create_user(&self, new_user: NewUser) -> Result<UserData>;

    async fn list_items(&self) -> Result<Vec<ItemData>>;
    async fn item_by_id(&self, item_id: PrimaryKey) -> Result<ItemData>;
    async fn create_item(&self, new_item: NewItem) -> Result<ItemData>;
    async fn set_item_availability(&self, item_id: PrimaryKey, available: bool) -> Result<ItemData>;

    /// Atomically checks that the item is available, marks it rented, and
    /// appends a ledger entry with name and description snapshots.
    async fn rent_item(&self, new_rental: NewRental) -> Result<RentalData>;
    /// Atomically finds the first rented item matching the descriptive
    /// fields that is not owned by the confirming user, and marks it
    /// available again.
    async fn reclaim_item(&self, reclaim: ReclaimItem) -> Result<ItemData>;
    async fn list_rentals(&self) -> Result<Vec<RentalData>>;
    async fn rentals_by_renter(&self, renter: &str) -> Result<Vec<RentalData>>;

    async fn messages_for_item(&self, item_id: PrimaryKey) -> Result<Vec<MessageData>>;
    async fn create_message(&self, new_message: NewMessage) -> Result<MessageData>;
}
