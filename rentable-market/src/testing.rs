use std::path::PathBuf;

use crate::{util::random_string, Category, JsonStorage, NewItem};

/// Creates a storage rooted in a throwaway directory under the system temp
/// dir. The directory only appears once something is written.
pub fn storage_in_temp_dir() -> (JsonStorage, PathBuf) {
    let dir = std::env::temp_dir().join(format!("rentable-test-{}", random_string(12)));
    (JsonStorage::new(dir.clone()), dir)
}

pub fn listing(name: &str, owner: &str, daily_price: i64) -> NewItem {
    NewItem {
        name: name.to_string(),
        description: format!("{} in good condition", name),
        daily_price,
        owner: owner.to_string(),
        category: Category::Household,
    }
}
