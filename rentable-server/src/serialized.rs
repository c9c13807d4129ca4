//! All schemas that are exposed from endpoints are defined here
//! along with the conversions from the domain types

use chrono::{DateTime, Utc};
use rentable_market::{
    CartLine as MarketCartLine, CartView, ItemData, MessageData, PrimaryKey, RentalData,
    SessionData, UserData,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct User {
    id: PrimaryKey,
    username: String,
    phone: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResult {
    token: String,
    user: User,
}

#[derive(Debug, Serialize)]
pub struct Item {
    id: PrimaryKey,
    name: String,
    description: String,
    daily_price: i64,
    owner: String,
    category: String,
    is_available: bool,
}

#[derive(Debug, Serialize)]
pub struct CartLine {
    item_id: PrimaryKey,
    name: String,
    description: String,
    daily_price: i64,
    days: u32,
    subtotal: i64,
    is_available: bool,
    owner: String,
    category: String,
}

#[derive(Debug, Serialize)]
pub struct CartSummary {
    lines: Vec<CartLine>,
    total: i64,
}

#[derive(Debug, Serialize)]
pub struct Message {
    id: PrimaryKey,
    item_id: PrimaryKey,
    item_name: String,
    owner: String,
    sender: String,
    text: String,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct Rental {
    id: PrimaryKey,
    item_id: PrimaryKey,
    item: String,
    description: String,
    renter: String,
    days: u32,
    date: DateTime<Utc>,
}

/// The favorites page data: the session's selection and the items in it
#[derive(Debug, Serialize)]
pub struct Favorites {
    pub selected_category: Option<String>,
    pub items: Vec<Item>,
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl<I, O> ToSerialized<Vec<O>> for Vec<I>
where
    I: ToSerialized<O>,
    O: Serialize,
{
    fn to_serialized(&self) -> Vec<O> {
        self.iter().map(|x| x.to_serialized()).collect()
    }
}

impl ToSerialized<User> for UserData {
    fn to_serialized(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            phone: self.phone.clone(),
        }
    }
}

impl ToSerialized<LoginResult> for SessionData {
    fn to_serialized(&self) -> LoginResult {
        LoginResult {
            token: self.token.clone(),
            user: self.user.to_serialized(),
        }
    }
}

impl ToSerialized<Item> for ItemData {
    fn to_serialized(&self) -> Item {
        Item {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            daily_price: self.daily_price,
            owner: self.owner.clone(),
            category: self.category.to_string(),
            is_available: self.is_available,
        }
    }
}

impl ToSerialized<CartLine> for MarketCartLine {
    fn to_serialized(&self) -> CartLine {
        CartLine {
            item_id: self.item_id,
            name: self.name.clone(),
            description: self.description.clone(),
            daily_price: self.daily_price,
            days: self.days,
            subtotal: self.subtotal,
            is_available: self.is_available,
            owner: self.owner.clone(),
            category: self.category.to_string(),
        }
    }
}

impl ToSerialized<CartSummary> for CartView {
    fn to_serialized(&self) -> CartSummary {
        CartSummary {
            lines: self.lines.to_serialized(),
            total: self.total,
        }
    }
}

impl ToSerialized<Message> for MessageData {
    fn to_serialized(&self) -> Message {
        Message {
            id: self.id,
            item_id: self.item_id,
            item_name: self.item_name.clone(),
            owner: self.owner.clone(),
            sender: self.sender.clone(),
            text: self.text.clone(),
            timestamp: self.sent_at,
        }
    }
}

impl ToSerialized<Rental> for RentalData {
    fn to_serialized(&self) -> Rental {
        Rental {
            id: self.id,
            item_id: self.item_id,
            item: self.item_name.clone(),
            description: self.description.clone(),
            renter: self.renter.clone(),
            days: self.days,
            date: self.rented_at,
        }
    }
}
