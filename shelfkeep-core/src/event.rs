// shelfkeep-core/src/event.rs
//! Catalog events and the sinks that receive them
//!
//! Informational events (`Added`, `Changed`, `Removed`) and reports
//! (`NotFound`, `InvalidValue`) share one type so a sink sees the full
//! history of a run in order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::EntityId;
use crate::{log_info, log_warn};

/// Mutable numeric attribute of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Price,
    Stock,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Price => "price",
            Attribute::Stock => "stock",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Attribute::Price => "Price",
            Attribute::Stock => "Stock",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of record a catalog holds; only changes event wording
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Product,
    Book,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Book => "book",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            EntityKind::Product => "Product",
            EntityKind::Book => "Book",
        }
    }
}

/// A requested value for one attribute
///
/// Stock stays an exact integer end to end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "lowercase")]
pub enum AttrValue {
    Price(f64),
    Stock(i64),
}

impl AttrValue {
    pub fn field(&self) -> Attribute {
        match self {
            AttrValue::Price(_) => Attribute::Price,
            AttrValue::Stock(_) => Attribute::Stock,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Price(p) => write!(f, "${}", p),
            AttrValue::Stock(n) => write!(f, "{}", n),
        }
    }
}

/// Before and after values of an applied update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "lowercase")]
pub enum Change {
    Price { old: f64, new: f64 },
    Stock { old: i64, new: i64 },
}

impl Change {
    pub fn field(&self) -> Attribute {
        match self {
            Change::Price { .. } => Attribute::Price,
            Change::Stock { .. } => Attribute::Stock,
        }
    }

    pub fn before(&self) -> AttrValue {
        match *self {
            Change::Price { old, .. } => AttrValue::Price(old),
            Change::Stock { old, .. } => AttrValue::Stock(old),
        }
    }

    pub fn after(&self) -> AttrValue {
        match *self {
            Change::Price { new, .. } => AttrValue::Price(new),
            Change::Stock { new, .. } => AttrValue::Stock(new),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CatalogEvent {
    Added {
        #[serde(default)]
        kind: EntityKind,
        id: EntityId,
        name: String,
    },
    Changed {
        id: EntityId,
        name: String,
        change: Change,
    },
    Removed {
        #[serde(default)]
        kind: EntityKind,
        id: EntityId,
        name: String,
    },
    NotFound {
        #[serde(default)]
        kind: EntityKind,
        id: EntityId,
    },
    InvalidValue {
        id: EntityId,
        value: AttrValue,
    },
}

impl CatalogEvent {
    /// `NotFound` and `InvalidValue` are reports, the rest are informational
    pub fn is_report(&self) -> bool {
        matches!(
            self,
            CatalogEvent::NotFound { .. } | CatalogEvent::InvalidValue { .. }
        )
    }

    pub fn id(&self) -> &EntityId {
        match self {
            CatalogEvent::Added { id, .. }
            | CatalogEvent::Changed { id, .. }
            | CatalogEvent::Removed { id, .. }
            | CatalogEvent::NotFound { id, .. }
            | CatalogEvent::InvalidValue { id, .. } => id,
        }
    }
}

impl fmt::Display for CatalogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogEvent::Added { kind, name, .. } => {
                write!(f, "Added {}: {}", kind.as_str(), name)
            }
            CatalogEvent::Changed { name, change, .. } => write!(
                f,
                "{} changed for {}: {} -> {}",
                change.field().label(),
                name,
                change.before(),
                change.after()
            ),
            CatalogEvent::Removed { kind, name, .. } => {
                write!(f, "Removed {}: {}", kind.as_str(), name)
            }
            CatalogEvent::NotFound { kind, id } => {
                write!(f, "{} with ID {} not found", kind.label(), id)
            }
            CatalogEvent::InvalidValue { value, .. } => {
                write!(f, "{} cannot be negative", value.field().label())
            }
        }
    }
}

/// Receiver of catalog events
pub trait EventSink {
    fn emit(&mut self, event: &CatalogEvent);
}

/// Routes events to the leveled logger: reports at WARN, the rest at INFO
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: &CatalogEvent) {
        if event.is_report() {
            log_warn!("{}", event);
        } else {
            log_info!("{}", event);
        }
    }
}

/// Keeps every event in emission order
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<CatalogEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[CatalogEvent] {
        &self.events
    }

    /// Hand back everything recorded so far and start over
    pub fn drain(&mut self) -> Vec<CatalogEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn changes(&self) -> impl Iterator<Item = &CatalogEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, CatalogEvent::Changed { .. }))
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &CatalogEvent) {
        self.events.push(event.clone());
    }
}
