use std::sync::Arc;

use log::info;

use crate::{Category, ItemData, NewItem, PrimaryKey, Result, Storage};

/// Listing and browsing of rentable items.
pub struct Catalog<S> {
    storage: Arc<S>,
}

/// The owner-independent fields of a new listing
#[derive(Debug)]
pub struct NewListing {
    pub name: String,
    pub description: String,
    pub daily_price: i64,
    pub category: Category,
}

impl<S> Catalog<S>
where
    S: Storage,
{
    pub fn new(storage: &Arc<S>) -> Self {
        Self {
            storage: storage.clone(),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<ItemData>> {
        self.storage.list_items().await
    }

    /// Order-preserving filter over the full catalog
    pub async fn list_by_category(&self, category: Category) -> Result<Vec<ItemData>> {
        Ok(self
            .storage
            .list_items()
            .await?
            .into_iter()
            .filter(|i| i.category == category)
            .collect())
    }

    pub async fn item(&self, item_id: PrimaryKey) -> Result<ItemData> {
        self.storage.item_by_id(item_id).await
    }

    /// Adds a listing for the given owner. New listings always start out
    /// available.
    pub async fn add(&self, listing: NewListing, owner: &str) -> Result<ItemData> {
        let item = self
            .storage
            .create_item(NewItem {
                name: listing.name,
                description: listing.description,
                daily_price: listing.daily_price,
                owner: owner.to_string(),
                category: listing.category,
            })
            .await?;

        info!("{} listed {} ({})", owner, item.name, item.category);
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::storage_in_temp_dir;

    #[tokio::test]
    async fn category_filter_preserves_catalog_order() {
        let (storage, _dir) = storage_in_temp_dir();
        let storage = Arc::new(storage);
        let catalog = Catalog::new(&storage);

        let listings = [
            ("Drill", Category::Industrial),
            ("Tent", Category::Sports),
            ("Saw", Category::Industrial),
        ];

        for (name, category) in listings {
            catalog
                .add(
                    NewListing {
                        name: name.to_string(),
                        description: "desc".to_string(),
                        daily_price: 10,
                        category,
                    },
                    "bob",
                )
                .await
                .unwrap();
        }

        let industrial = catalog
            .list_by_category(Category::Industrial)
            .await
            .unwrap();

        let names: Vec<_> = industrial.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Drill", "Saw"]);
    }

    #[tokio::test]
    async fn new_listings_start_out_available() {
        let (storage, _dir) = storage_in_temp_dir();
        let storage = Arc::new(storage);
        let catalog = Catalog::new(&storage);

        let item = catalog
            .add(
                NewListing {
                    name: "Drill".to_string(),
                    description: "desc".to_string(),
                    daily_price: 10,
                    category: Category::Industrial,
                },
                "bob",
            )
            .await
            .unwrap();

        assert!(item.is_available);
        assert_eq!(item.owner, "bob");
        assert_eq!(catalog.item(item.id).await.unwrap().name, "Drill");
    }
}
