// shelfkeep-core/src/seed.rs
//! Demo inventory

use crate::entity::{Entity, EntityId, ProductCategory};

/// The five demo products, ids 1 to 5
pub fn sample_products() -> Vec<Entity> {
    let rows: [(i64, &str, ProductCategory, f64, i64); 5] = [
        (1, "Smartphone X1", ProductCategory::Electronics, 599.99, 15),
        (2, "Cotton T-Shirt", ProductCategory::Clothing, 19.99, 45),
        (3, "Coffee Maker", ProductCategory::Home, 79.99, 12),
        (4, "JavaScript Guide", ProductCategory::Books, 29.99, 25),
        (5, "Running Shoes", ProductCategory::Sports, 89.99, 5),
    ];

    rows.into_iter()
        .map(|(id, name, category, price, stock)| Entity {
            id: EntityId::Int(id),
            name: name.to_string(),
            category: category.into(),
            price,
            stock,
        })
        .collect()
}
