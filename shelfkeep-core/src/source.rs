// shelfkeep-core/src/source.rs
//! Narrow interface to wherever catalog records live
//!
//! The catalog never talks to a database directly. Records arrive as plain
//! JSON objects grouped in named collections, through a [`RecordSource`].
//!
//! ```text
//! RecordSource
//!   ├── MemorySource   (HashMap, tests and demos)
//!   └── JsonFileSource ({"collection": [records...]} on disk)
//! ```

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::entity::Entity;
use crate::error::{CatalogError, Result};
use crate::{log_debug, log_info};

/// Collection name used when a file holds a bare array
pub const DEFAULT_COLLECTION: &str = "products";

pub trait RecordSource {
    /// All records of a collection, in stored order
    fn load(&self, collection: &str) -> Result<Vec<Value>>;

    /// Replace a collection's records (creates the collection)
    fn store(&mut self, collection: &str, records: &[Value]) -> Result<()>;

    /// Collection names, sorted
    fn collections(&self) -> Vec<String>;
}

/// In-memory record source
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    collections: HashMap<String, Vec<Value>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, name: &str, records: Vec<Value>) -> Self {
        self.collections.insert(name.to_string(), records);
        self
    }
}

impl RecordSource for MemorySource {
    fn load(&self, collection: &str) -> Result<Vec<Value>> {
        self.collections
            .get(collection)
            .cloned()
            .ok_or_else(|| CatalogError::CollectionNotFound(collection.to_string()))
    }

    fn store(&mut self, collection: &str, records: &[Value]) -> Result<()> {
        self.collections
            .insert(collection.to_string(), records.to_vec());
        Ok(())
    }

    fn collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.keys().cloned().collect();
        names.sort();
        names
    }
}

/// JSON file record source
///
/// Accepts `{"products": [...], "books": [...]}` or a bare array, which is
/// read as the `products` collection. The file is read on open and rewritten
/// in full on every `store`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    collections: Map<String, Value>,
}

impl JsonFileSource {
    /// Open an existing file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path)?;
        let collections = match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => map,
            Value::Array(records) => {
                let mut map = Map::new();
                map.insert(DEFAULT_COLLECTION.to_string(), Value::Array(records));
                map
            }
            other => {
                return Err(CatalogError::Serialization(format!(
                    "{}: expected an object or array at top level, found {}",
                    path.display(),
                    type_name(&other)
                )))
            }
        };
        log_debug!("opened {} ({} collections)", path.display(), collections.len());
        Ok(JsonFileSource { path, collections })
    }

    /// Open `path`, or start empty if the file does not exist yet
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path)
        } else {
            Ok(JsonFileSource {
                path: path.to_path_buf(),
                collections: Map::new(),
            })
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.collections)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl RecordSource for JsonFileSource {
    fn load(&self, collection: &str) -> Result<Vec<Value>> {
        match self.collections.get(collection) {
            Some(Value::Array(records)) => Ok(records.clone()),
            Some(other) => Err(CatalogError::Serialization(format!(
                "collection '{}' must be an array, found {}",
                collection,
                type_name(other)
            ))),
            None => Err(CatalogError::CollectionNotFound(collection.to_string())),
        }
    }

    fn store(&mut self, collection: &str, records: &[Value]) -> Result<()> {
        self.collections
            .insert(collection.to_string(), Value::Array(records.to_vec()));
        self.flush()
    }

    fn collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Decode and validate every record of a collection
///
/// One bad record fails the whole load; the error names its position.
pub fn load_entities<S: RecordSource + ?Sized>(source: &S, collection: &str) -> Result<Vec<Entity>> {
    source
        .load(collection)?
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let entity: Entity = serde_json::from_value(record).map_err(|e| {
                CatalogError::Serialization(format!("{}[{}]: {}", collection, index, e))
            })?;
            entity.validate()?;
            Ok(entity)
        })
        .collect()
}

/// Write `entities` only when the collection is missing or empty
///
/// Returns how many records were written (0 when data was already there).
pub fn seed_if_empty<S: RecordSource + ?Sized>(
    source: &mut S,
    collection: &str,
    entities: &[Entity],
) -> Result<usize> {
    let existing = match source.load(collection) {
        Ok(records) => records.len(),
        Err(CatalogError::CollectionNotFound(_)) => 0,
        Err(err) => return Err(err),
    };
    if existing > 0 {
        log_info!("Collection '{}' already has {} records", collection, existing);
        return Ok(0);
    }

    let records = entities
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    source.store(collection, &records)?;
    log_info!("Inserted {} records into '{}'", records.len(), collection);
    Ok(records.len())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_products;
    use serde_json::json;

    #[test]
    fn test_memory_source_missing_collection() {
        let source = MemorySource::new();
        assert!(matches!(
            source.load("products"),
            Err(CatalogError::CollectionNotFound(name)) if name == "products"
        ));
    }

    #[test]
    fn test_seed_if_empty_only_once() {
        let mut source = MemorySource::new();
        let products = sample_products();
        assert_eq!(seed_if_empty(&mut source, "products", &products).unwrap(), 5);
        assert_eq!(seed_if_empty(&mut source, "products", &products).unwrap(), 0);
        assert_eq!(load_entities(&source, "products").unwrap(), products);
    }

    #[test]
    fn test_load_entities_reports_bad_record() {
        let source = MemorySource::new().with_collection(
            "products",
            vec![
                json!({"id": 1, "name": "Fan", "category": "Home & Kitchen", "price": 15.0, "stock": 2}),
                json!({"id": 2, "name": "Heater", "category": "Home & Kitchen", "price": -3.0, "stock": 1}),
            ],
        );
        let err = load_entities(&source, "products").unwrap_err();
        assert!(err.is_invalid_value());

        let source = MemorySource::new()
            .with_collection("products", vec![json!({"id": 1, "name": "Fan"})]);
        let err = load_entities(&source, "products").unwrap_err();
        assert!(err.to_string().contains("products[0]"));
    }
}
