use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Category;

/// The type used for primary keys in the persisted documents.
pub type PrimaryKey = i64;

/// A marketplace account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub id: PrimaryKey,
    pub username: String,
    /// Stored and compared as plain text
    pub password: String,
    pub phone: String,
}

/// A rentable listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemData {
    pub id: PrimaryKey,
    pub name: String,
    pub description: String,
    /// Price per day, in the currency's minor unit
    pub daily_price: i64,
    /// Username of the listing owner
    pub owner: String,
    pub category: Category,
    /// True when no active rental exists for this item
    pub is_available: bool,
}

/// One rent transaction in the append-only ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalData {
    pub id: PrimaryKey,
    pub item_id: PrimaryKey,
    /// Name snapshot taken when the rental was made
    #[serde(rename = "item")]
    pub item_name: String,
    /// Description snapshot, used by the confirm-return match
    pub description: String,
    pub renter: String,
    pub days: u32,
    #[serde(rename = "date")]
    pub rented_at: DateTime<Utc>,
}

/// A message in an item's thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageData {
    pub id: PrimaryKey,
    pub item_id: PrimaryKey,
    pub item_name: String,
    pub owner: String,
    pub sender: String,
    pub text: String,
    #[serde(rename = "timestamp")]
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub phone: String,
}

#[derive(Debug)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub daily_price: i64,
    pub owner: String,
    pub category: Category,
}

#[derive(Debug)]
pub struct NewRental {
    pub item_id: PrimaryKey,
    pub renter: String,
    pub days: u32,
}

/// A confirm-return request, matched by descriptive fields rather than id
#[derive(Debug)]
pub struct ReclaimItem {
    pub item_name: String,
    pub description: String,
    /// The user confirming the return. Their own listings are never matched.
    pub confirmed_by: String,
}

#[derive(Debug)]
pub struct NewMessage {
    pub item_id: PrimaryKey,
    pub sender: String,
    pub text: String,
}
