use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of categories a listing can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Fashion,
    Household,
    Computers,
    Appliances,
    Sports,
    CarsMotorbikes,
    Industrial,
}

#[derive(Debug, Error)]
#[error("{0} is not a known category")]
pub struct UnknownCategory(pub String);

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Fashion,
        Category::Household,
        Category::Computers,
        Category::Appliances,
        Category::Sports,
        Category::CarsMotorbikes,
        Category::Industrial,
    ];

    /// The identifier of the category, safe to use as a URL segment.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Fashion => "fashion",
            Category::Household => "household",
            Category::Computers => "computers",
            Category::Appliances => "appliances",
            Category::Sports => "sports",
            Category::CarsMotorbikes => "cars-motorbikes",
            Category::Industrial => "industrial",
        }
    }

    /// Parses a category from user input. Slashes are rewritten to dashes
    /// first, so "cars/motorbikes" resolves like its slug does.
    pub fn from_slug(raw: &str) -> Result<Self, UnknownCategory> {
        let slug = raw.trim().to_lowercase().replace('/', "-");

        Self::ALL
            .iter()
            .copied()
            .find(|c| c.slug() == slug)
            .ok_or_else(|| UnknownCategory(raw.to_string()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slashes_are_rewritten_to_dashes() {
        let category = Category::from_slug("cars/motorbikes").unwrap();
        assert_eq!(category, Category::CarsMotorbikes);
    }

    #[test]
    fn every_slug_parses_back_to_its_category() {
        for category in Category::ALL {
            assert_eq!(Category::from_slug(category.slug()).unwrap(), category);
        }
    }

    #[test]
    fn unknown_categories_are_rejected() {
        assert!(Category::from_slug("boats").is_err());
        assert!(Category::from_slug("").is_err());
    }

    #[test]
    fn serde_uses_the_slug() {
        let json = serde_json::to_string(&Category::CarsMotorbikes).unwrap();
        assert_eq!(json, "\"cars-motorbikes\"");
    }
}
