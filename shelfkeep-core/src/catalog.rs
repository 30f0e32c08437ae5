// shelfkeep-core/src/catalog.rs
//! In-memory keyed registry of entities
//!
//! `Catalog` exclusively owns its entities. Iteration follows insertion
//! order; overwriting an id keeps its slot and removal keeps the relative
//! order of the survivors, so every listing is deterministic within a run.
//!
//! Mutations are synchronous and atomic per call: a rejected update leaves
//! the stored value untouched, and a `Changed` event is emitted only after a
//! write that actually altered the value.

use indexmap::IndexMap;
use std::cmp::Ordering;

use crate::entity::{check_price, check_stock, Entity, EntityId};
use crate::error::{CatalogError, Result};
use crate::event::{AttrValue, Attribute, CatalogEvent, Change, EntityKind, EventSink, LogSink};
use crate::log_trace;

/// Side of the threshold kept by [`Catalog::rank_by_threshold`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `attr < threshold`
    Below,
    /// `attr > threshold`
    Above,
}

pub struct Catalog<K: EventSink = LogSink> {
    entities: IndexMap<EntityId, Entity>,
    kind: EntityKind,
    sink: K,
}

impl Catalog<LogSink> {
    /// Empty catalog that reports through the leveled logger
    pub fn new() -> Self {
        Catalog::with_sink(LogSink)
    }
}

impl Default for Catalog<LogSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EventSink> Catalog<K> {
    pub fn with_sink(sink: K) -> Self {
        Catalog {
            entities: IndexMap::new(),
            kind: EntityKind::default(),
            sink,
        }
    }

    /// Name the record kind used in event wording
    pub fn of_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }

    // ========== CRUD ==========

    /// Insert, or silently overwrite the entity already stored at its id
    pub fn add(&mut self, entity: Entity) {
        let event = CatalogEvent::Added {
            kind: self.kind,
            id: entity.id().clone(),
            name: entity.name.clone(),
        };
        self.entities.insert(entity.id().clone(), entity);
        self.sink.emit(&event);
    }

    /// Add every entity in order
    pub fn extend_from<I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = Entity>,
    {
        for entity in entities {
            self.add(entity);
        }
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Set the price of `id`
    ///
    /// Returns the `Changed` event when the value moved, `None` when the new
    /// price equals the stored one. A missing id or a negative price is
    /// reported to the sink and returned as an error.
    pub fn update_price(&mut self, id: &EntityId, new_price: f64) -> Result<Option<CatalogEvent>> {
        self.update_attribute(id, AttrValue::Price(new_price))
    }

    /// Set the stock of `id`; same contract as [`Catalog::update_price`]
    pub fn update_stock(&mut self, id: &EntityId, new_stock: i64) -> Result<Option<CatalogEvent>> {
        self.update_attribute(id, AttrValue::Stock(new_stock))
    }

    /// Shared write path; the value's variant picks the attribute
    pub fn update_attribute(
        &mut self,
        id: &EntityId,
        value: AttrValue,
    ) -> Result<Option<CatalogEvent>> {
        let Some(entity) = self.entities.get_mut(id) else {
            self.sink.emit(&CatalogEvent::NotFound {
                kind: self.kind,
                id: id.clone(),
            });
            return Err(CatalogError::NotFound(id.clone()));
        };

        let checked = match value {
            AttrValue::Price(price) => check_price(price),
            AttrValue::Stock(stock) => check_stock(stock),
        };
        if let Err(err) = checked {
            self.sink.emit(&CatalogEvent::InvalidValue {
                id: id.clone(),
                value,
            });
            return Err(err);
        }

        let change = match value {
            AttrValue::Price(new) => {
                let old = std::mem::replace(&mut entity.price, new);
                (old != new).then_some(Change::Price { old, new })
            }
            AttrValue::Stock(new) => {
                let old = std::mem::replace(&mut entity.stock, new);
                (old != new).then_some(Change::Stock { old, new })
            }
        };
        let Some(change) = change else {
            log_trace!("{} of {} unchanged at {}", value.field(), id, value);
            return Ok(None);
        };

        let event = CatalogEvent::Changed {
            id: id.clone(),
            name: entity.name.clone(),
            change,
        };
        self.sink.emit(&event);
        Ok(Some(event))
    }

    /// Delete `id`; false (and a `NotFound` report) when it is absent
    pub fn remove(&mut self, id: &EntityId) -> bool {
        match self.entities.shift_remove(id) {
            Some(entity) => {
                self.sink.emit(&CatalogEvent::Removed {
                    kind: self.kind,
                    id: id.clone(),
                    name: entity.name,
                });
                true
            }
            None => {
                self.sink.emit(&CatalogEvent::NotFound {
                    kind: self.kind,
                    id: id.clone(),
                });
                false
            }
        }
    }

    // ========== QUERIES ==========

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn list_all(&self) -> Vec<&Entity> {
        self.iter().collect()
    }

    /// Exact-match category filter
    pub fn filter_by_category(&self, category: &str) -> Vec<&Entity> {
        self.iter().filter(|e| e.category == category).collect()
    }

    /// Entities whose attribute lies strictly on `direction`'s side of `threshold`
    pub fn rank_by_threshold(
        &self,
        attribute: Attribute,
        threshold: f64,
        direction: Direction,
    ) -> Vec<&Entity> {
        self.iter()
            .filter(|e| {
                let value = attribute_of(e, attribute);
                match direction {
                    Direction::Below => value < threshold,
                    Direction::Above => value > threshold,
                }
            })
            .collect()
    }

    /// Entities with stock below `threshold`
    pub fn low_stock(&self, threshold: i64) -> Vec<&Entity> {
        self.iter().filter(|e| e.stock < threshold).collect()
    }

    /// The `limit` highest entities by a derived metric, descending
    ///
    /// The sort is stable: entities with equal metrics keep iteration order.
    pub fn top_by<F>(&self, metric: F, limit: usize) -> Vec<&Entity>
    where
        F: Fn(&Entity) -> f64,
    {
        let mut scored: Vec<(f64, &Entity)> = self.iter().map(|e| (metric(e), e)).collect();
        scored.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));
        scored.into_iter().take(limit).map(|(_, e)| e).collect()
    }
}

fn attribute_of(entity: &Entity, attribute: Attribute) -> f64 {
    match attribute {
        Attribute::Price => entity.price(),
        Attribute::Stock => entity.stock() as f64,
    }
}
