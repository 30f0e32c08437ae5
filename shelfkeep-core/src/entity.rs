// shelfkeep-core/src/entity.rs
//! Catalog records: ids, categories and the product/book entity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{CatalogError, Result};

/// Entity key
///
/// Untagged so that records read naturally: `{"id": 2}` or `{"id": "b-17"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl EntityId {
    /// Random text id for records seeded without one
    pub fn new_object_id() -> Self {
        EntityId::Text(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(n) => write!(f, "{}", n),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Int(n)
    }
}

impl From<i32> for EntityId {
    fn from(n: i32) -> Self {
        EntityId::Int(n as i64)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::Text(s)
    }
}

/// Parses digits as `Int`, anything else as `Text`
impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(EntityId::Int)
            .unwrap_or_else(|_| EntityId::Text(s.to_string())))
    }
}

/// Store departments used by the product demo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductCategory {
    Electronics,
    Clothing,
    Home,
    Books,
    Sports,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 5] = [
        ProductCategory::Electronics,
        ProductCategory::Clothing,
        ProductCategory::Home,
        ProductCategory::Books,
        ProductCategory::Sports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Electronics => "Electronics",
            ProductCategory::Clothing => "Clothing",
            ProductCategory::Home => "Home & Kitchen",
            ProductCategory::Books => "Books",
            ProductCategory::Sports => "Sports",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        ProductCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CatalogError::invalid("category", s))
    }
}

impl From<ProductCategory> for String {
    fn from(c: ProductCategory) -> Self {
        c.as_str().to_string()
    }
}

/// A product (or a book projected into product shape)
///
/// `price` is the numeric attribute and `stock` the quantity attribute.
/// Book-shaped records (`title`, `genre`, `rating`, `ratingCount`) decode
/// into the same fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(alias = "_id")]
    pub(crate) id: EntityId,

    #[serde(alias = "title")]
    pub name: String,

    #[serde(alias = "genre")]
    pub category: String,

    #[serde(alias = "rating")]
    pub(crate) price: f64,

    #[serde(alias = "ratingCount", alias = "rating_count")]
    pub(crate) stock: i64,
}

impl Entity {
    /// Build a validated entity
    pub fn new(
        id: impl Into<EntityId>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        stock: i64,
    ) -> Result<Self> {
        let entity = Entity {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            price,
            stock,
        };
        entity.validate()?;
        Ok(entity)
    }

    /// Check the record invariants (used after decoding external records)
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::invalid("name", "\"\""));
        }
        check_price(self.price)?;
        check_stock(self.stock)?;
        Ok(())
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    /// One-line console rendering
    pub fn display_info(&self) -> String {
        format!(
            "[#{}] {} - {} - ${} (Stock: {})",
            self.id, self.name, self.category, self.price, self.stock
        )
    }

    /// Availability badge text
    pub fn stock_label(&self) -> String {
        if self.stock > 0 {
            format!("{} in stock", self.stock)
        } else {
            "Out of stock".to_string()
        }
    }
}

pub(crate) fn check_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(CatalogError::invalid("price", price));
    }
    Ok(())
}

pub(crate) fn check_stock(stock: i64) -> Result<()> {
    if stock < 0 {
        return Err(CatalogError::invalid("stock", stock));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_rejects_negative_values() {
        assert!(Entity::new(1, "Lamp", "Home & Kitchen", -0.01, 3).is_err());
        assert!(Entity::new(1, "Lamp", "Home & Kitchen", 10.0, -1).is_err());
        assert!(Entity::new(1, "Lamp", "Home & Kitchen", f64::NAN, 1).is_err());
        assert!(Entity::new(1, "  ", "Home & Kitchen", 1.0, 1).is_err());
        assert!(Entity::new(1, "Lamp", "Home & Kitchen", 0.0, 0).is_ok());
    }

    #[test]
    fn test_display_info() {
        let e = Entity::new(1, "Smartphone X1", ProductCategory::Electronics, 599.99, 15).unwrap();
        assert_eq!(
            e.display_info(),
            "[#1] Smartphone X1 - Electronics - $599.99 (Stock: 15)"
        );
    }

    #[test]
    fn test_stock_label() {
        let in_stock = Entity::new(2, "Mug", "Home & Kitchen", 4.5, 7).unwrap();
        let sold_out = Entity::new(3, "Kettle", "Home & Kitchen", 24.0, 0).unwrap();
        assert_eq!(in_stock.stock_label(), "7 in stock");
        assert_eq!(sold_out.stock_label(), "Out of stock");
    }

    #[test]
    fn test_decode_product_and_book_shapes() {
        let product: Entity = serde_json::from_value(json!({
            "id": 4, "name": "JavaScript Guide", "category": "Books",
            "price": 29.99, "stock": 25
        }))
        .unwrap();
        assert_eq!(product.id(), &EntityId::Int(4));
        assert_eq!(product.stock(), 25);

        let book: Entity = serde_json::from_value(json!({
            "_id": "b-1", "title": "Foundation", "genre": "Science Fiction",
            "rating": 5.0, "ratingCount": 1
        }))
        .unwrap();
        assert_eq!(book.id(), &EntityId::Text("b-1".into()));
        assert_eq!(book.name, "Foundation");
        assert_eq!(book.category, "Science Fiction");
        assert_eq!(book.stock(), 1);
    }

    #[test]
    fn test_id_untagged_and_parse() {
        assert_eq!(serde_json::to_value(EntityId::Int(2)).unwrap(), json!(2));
        assert_eq!(serde_json::to_value(EntityId::from("x")).unwrap(), json!("x"));
        assert_eq!("42".parse::<EntityId>().unwrap(), EntityId::Int(42));
        assert_eq!("sku-9".parse::<EntityId>().unwrap(), EntityId::from("sku-9"));
    }

    #[test]
    fn test_object_ids_are_unique() {
        assert_ne!(EntityId::new_object_id(), EntityId::new_object_id());
    }

    #[test]
    fn test_category_round_trip() {
        for c in ProductCategory::ALL {
            assert_eq!(c.as_str().parse::<ProductCategory>().unwrap(), c);
        }
        assert!("Garden".parse::<ProductCategory>().is_err());
    }
}
