// shelfkeep-core/src/listing.rs
// Listing view options: category filter, price cap, sort, limit

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::catalog::Catalog;
use crate::entity::Entity;
use crate::error::{CatalogError, Result};
use crate::event::EventSink;

/// Category selector; `All` disables the filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    fn accepts(&self, entity: &Entity) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => entity.category == *category,
        }
    }
}

/// "all" (any case) maps to `All`, anything else is an exact category
impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(s.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Catalog iteration order
    #[default]
    Default,
    PriceLow,
    PriceHigh,
    /// Case-insensitive by name
    Name,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Default => "default",
            SortBy::PriceLow => "price-low",
            SortBy::PriceHigh => "price-high",
            SortBy::Name => "name",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(SortBy::Default),
            "price-low" => Ok(SortBy::PriceLow),
            "price-high" => Ok(SortBy::PriceHigh),
            "name" => Ok(SortBy::Name),
            other => Err(CatalogError::invalid("sort", other)),
        }
    }
}

/// Options for a filtered, sorted listing
#[derive(Debug, Clone, Default)]
pub struct ListingOptions {
    pub category: CategoryFilter,

    /// Inclusive upper bound on price
    pub max_price: Option<f64>,

    pub sort: SortBy,

    /// Maximum number of entities to return
    pub limit: Option<usize>,
}

impl ListingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    pub fn with_sort(mut self, sort: SortBy) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Filter by category, then price cap, then sort and truncate
    pub fn apply<'a, K: EventSink>(&self, catalog: &'a Catalog<K>) -> Vec<&'a Entity> {
        let mut view: Vec<&Entity> = catalog
            .iter()
            .filter(|e| self.category.accepts(e))
            .filter(|e| self.max_price.is_none_or(|max| e.price() <= max))
            .collect();

        apply_sort(&mut view, self.sort);

        if let Some(limit) = self.limit {
            view.truncate(limit);
        }
        view
    }
}

impl From<String> for CategoryFilter {
    fn from(s: String) -> Self {
        CategoryFilter::from(s.as_str())
    }
}

/// Stable sort of a listing in place
pub fn apply_sort(view: &mut [&Entity], sort: SortBy) {
    match sort {
        SortBy::Default => {}
        SortBy::PriceLow => view.sort_by(|a, b| compare_price(a, b)),
        SortBy::PriceHigh => view.sort_by(|a, b| compare_price(b, a)),
        SortBy::Name => view.sort_by_cached_key(|e| e.name.to_lowercase()),
    }
}

fn compare_price(a: &Entity, b: &Entity) -> Ordering {
    a.price().partial_cmp(&b.price()).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RecordingSink;
    use crate::seed::sample_products;

    fn catalog() -> Catalog<RecordingSink> {
        let mut catalog = Catalog::with_sink(RecordingSink::new());
        catalog.extend_from(sample_products());
        catalog
    }

    fn names(view: &[&Entity]) -> Vec<String> {
        view.iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn test_default_options_list_everything_in_order() {
        let catalog = catalog();
        let view = ListingOptions::new().apply(&catalog);
        assert_eq!(view.len(), 5);
        assert_eq!(view[0].name, "Smartphone X1");
    }

    #[test]
    fn test_price_high_with_cap() {
        let catalog = catalog();
        let view = ListingOptions::new()
            .with_max_price(80.0)
            .with_sort(SortBy::PriceHigh)
            .apply(&catalog);
        assert_eq!(
            names(&view),
            ["Coffee Maker", "JavaScript Guide", "Cotton T-Shirt"]
        );
    }

    #[test]
    fn test_category_and_name_sort() {
        let mut catalog = catalog();
        catalog.add(Entity::new(6, "anorak", "Clothing", 120.0, 3).unwrap());
        let view = ListingOptions::new()
            .with_category("Clothing")
            .with_sort(SortBy::Name)
            .apply(&catalog);
        assert_eq!(names(&view), ["anorak", "Cotton T-Shirt"]);
    }

    #[test]
    fn test_limit_after_sort() {
        let catalog = catalog();
        let view = ListingOptions::new()
            .with_sort(SortBy::PriceLow)
            .with_limit(2)
            .apply(&catalog);
        assert_eq!(names(&view), ["Cotton T-Shirt", "JavaScript Guide"]);
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!(CategoryFilter::from("ALL"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from("Sports"),
            CategoryFilter::Only("Sports".into())
        );
        assert_eq!("price-low".parse::<SortBy>().unwrap(), SortBy::PriceLow);
        assert!("cheapest".parse::<SortBy>().is_err());
    }
}
