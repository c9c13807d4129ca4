use std::collections::HashMap;

use crate::{Category, ItemData, PrimaryKey};

/// A session-scoped list of (item, day count) selections that are not yet a
/// rental. Created empty with the session and cleared only by explicit
/// action; rent and return actions never touch it.
#[derive(Debug, Default, Clone)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartEntry {
    pub item_id: PrimaryKey,
    pub days: u32,
}

/// A cart resolved against the current catalog
#[derive(Debug)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total: i64,
}

#[derive(Debug)]
pub struct CartLine {
    pub item_id: PrimaryKey,
    pub name: String,
    pub description: String,
    pub daily_price: i64,
    pub days: u32,
    pub subtotal: i64,
    pub is_available: bool,
    pub owner: String,
    pub category: Category,
}

/// Normalizes a user-supplied day count. Absent values and values below one
/// fall back to one.
pub fn clamp_days(raw: Option<i64>) -> u32 {
    raw.and_then(|days| u32::try_from(days).ok())
        .filter(|days| *days >= 1)
        .unwrap_or(1)
}

impl Cart {
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a selection. Selecting an item that is already in the cart adds
    /// the day counts together rather than replacing them.
    pub fn add(&mut self, item_id: PrimaryKey, days: u32) {
        let days = days.max(1);

        match self.entries.iter_mut().find(|e| e.item_id == item_id) {
            Some(entry) => entry.days += days,
            None => self.entries.push(CartEntry { item_id, days }),
        }
    }

    /// Removes a selection. Absent ids are a no-op.
    pub fn remove(&mut self, item_id: PrimaryKey) {
        self.entries.retain(|e| e.item_id != item_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Applies a batch of day-count changes. Entries missing from the batch
    /// or given a count below one keep their old value. No entry is ever
    /// dropped here.
    pub fn update_days(&mut self, changes: &HashMap<PrimaryKey, i64>) {
        for entry in &mut self.entries {
            let Some(&days) = changes.get(&entry.item_id) else {
                continue;
            };

            if let Ok(days) = u32::try_from(days) {
                if days >= 1 {
                    entry.days = days;
                }
            }
        }
    }

    /// Resolves the cart against the catalog. Selections whose item no
    /// longer resolves are left out of the view, but stay in the cart until
    /// removed explicitly.
    pub fn view(&self, items: &[ItemData]) -> CartView {
        let mut lines = Vec::new();
        let mut total = 0;

        for entry in &self.entries {
            let Some(item) = items.iter().find(|i| i.id == entry.item_id) else {
                continue;
            };

            let subtotal = item.daily_price * entry.days as i64;
            total += subtotal;

            lines.push(CartLine {
                item_id: item.id,
                name: item.name.clone(),
                description: item.description.clone(),
                daily_price: item.daily_price,
                days: entry.days,
                subtotal,
                is_available: item.is_available,
                owner: item.owner.clone(),
                category: item.category,
            });
        }

        CartView { lines, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    fn item(id: PrimaryKey, daily_price: i64) -> ItemData {
        ItemData {
            id,
            name: format!("item {}", id),
            description: "desc".to_string(),
            daily_price,
            owner: "bob".to_string(),
            category: Category::Sports,
            is_available: true,
        }
    }

    #[test]
    fn repeat_adds_merge_into_one_entry_with_summed_days() {
        let mut cart = Cart::default();

        cart.add(1, 2);
        cart.add(1, 3);

        assert_eq!(cart.entries(), &[CartEntry { item_id: 1, days: 5 }]);
    }

    #[test]
    fn day_counts_clamp_to_at_least_one() {
        assert_eq!(clamp_days(None), 1);
        assert_eq!(clamp_days(Some(0)), 1);
        assert_eq!(clamp_days(Some(-3)), 1);
        assert_eq!(clamp_days(Some(4)), 4);

        let mut cart = Cart::default();
        cart.add(1, 0);
        assert_eq!(cart.entries()[0].days, 1);
    }

    #[test]
    fn removing_an_absent_entry_is_a_noop() {
        let mut cart = Cart::default();
        cart.add(1, 2);

        cart.remove(9);
        assert_eq!(cart.entries().len(), 1);

        cart.remove(1);
        assert!(cart.is_empty());
    }

    #[test]
    fn batch_update_is_fail_soft() {
        let mut cart = Cart::default();
        cart.add(1, 2);
        cart.add(2, 3);
        cart.add(3, 4);

        // 1 gets a new count, 2 is out of range and keeps its old count,
        // 3 is missing from the batch and keeps its old count
        let changes = HashMap::from([(1, 7), (2, 0)]);
        cart.update_days(&changes);

        assert_eq!(
            cart.entries(),
            &[
                CartEntry { item_id: 1, days: 7 },
                CartEntry { item_id: 2, days: 3 },
                CartEntry { item_id: 3, days: 4 },
            ]
        );
    }

    #[test]
    fn view_totals_resolvable_entries_and_skips_stale_ones() {
        let items = vec![item(1, 10), item(2, 100)];

        let mut cart = Cart::default();
        cart.add(1, 3);
        cart.add(2, 2);
        cart.add(9, 5); // stale

        let view = cart.view(&items);

        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.lines[0].subtotal, 30);
        assert_eq!(view.lines[1].subtotal, 200);
        assert_eq!(view.total, 230);

        // the stale selection stays in the cart itself
        assert_eq!(cart.entries().len(), 3);
    }
}
