// shelfkeep-core/src/lib.rs
// In-memory catalog core - no database or rendering dependencies

pub mod catalog;
pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod library;
pub mod listing;
pub mod logging;
pub mod seed;
pub mod source;

// Public exports
pub use catalog::{Catalog, Direction};
pub use config::CatalogConfig;
pub use entity::{Entity, EntityId, ProductCategory};
pub use error::{CatalogError, Result};
pub use event::{
    AttrValue, Attribute, CatalogEvent, Change, EntityKind, EventSink, LogSink, RecordingSink,
};
pub use library::{Author, Book, Library, Member, Rating};
pub use listing::{CategoryFilter, ListingOptions, SortBy};
pub use logging::{get_log_level, set_log_level, LogLevel};
pub use source::{load_entities, seed_if_empty, JsonFileSource, MemorySource, RecordSource};
