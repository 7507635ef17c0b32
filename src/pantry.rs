//! Effect-applying adapter between the reconciler and a record store.
//!
//! The reconciler only plans effects; this adapter applies them to storage
//! and commits them to the in-memory view afterwards. Because the view is
//! only touched once the store call has succeeded, a storage failure leaves
//! the view at its pre-operation state and it never diverges from storage.

use crate::error::{PantryError, Result};
use crate::normalize::normalize;
use crate::reconcile::{Effect, InventoryRecord, RecordId, View};

/// Boundary contract with the persistence layer.
///
/// `create_record` must return a fresh, never-reused identifier.
/// `update_record_quantity` fails with `NotFound` if the id no longer exists.
pub trait RecordStore {
    fn create_record(&mut self, name: &str, quantity: u32) -> Result<RecordId>;
    fn update_record_quantity(&mut self, id: RecordId, quantity: u32) -> Result<()>;
    fn delete_record(&mut self, id: RecordId) -> Result<()>;
    fn list_records(&mut self) -> Result<Vec<InventoryRecord>>;
}

/// Owns the in-memory view and the store it mirrors.
///
/// The store is injected at construction; nothing here depends on
/// process-wide state. Operations are synchronous and expect to be
/// serialized by the caller.
pub struct Pantry<S: RecordStore> {
    view: View,
    store: S,
}

impl<S: RecordStore> Pantry<S> {
    /// Creates the adapter and builds its view from `list_records`.
    pub fn load(mut store: S) -> Result<Self> {
        let records = store.list_records()?;
        log::info!("Loaded {} pantry records", records.len());
        Ok(Self {
            view: View::from_records(records),
            store,
        })
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Records an observation of `quantity` units of an item, merging into
    /// an existing record when the normalized name matches.
    ///
    /// Returns the id of the affected record.
    pub fn add(&mut self, raw_name: &str, quantity: u32) -> Result<RecordId> {
        let effect = self.view.plan_add(raw_name, quantity)?;
        self.apply(effect)
    }

    /// Consumes one unit of the record with this id. The record is deleted
    /// when its last unit is consumed.
    pub fn consume(&mut self, id: RecordId) -> Result<RecordId> {
        let effect = self.view.plan_consume(id)?;
        self.apply(effect)
    }

    /// Consumes one unit of the item with this raw name, resolving it to an
    /// id through the view. `UnknownItem` when no such item exists.
    pub fn consume_by_name(&mut self, raw_name: &str) -> Result<RecordId> {
        let name = normalize(raw_name);
        let id = self
            .view
            .find_by_name(&name)
            .map(|r| r.id)
            .ok_or(PantryError::UnknownItem(name))?;
        self.consume(id)
    }

    /// Applies one effect to the store, then commits it to the view.
    /// On a store error the view is left untouched.
    fn apply(&mut self, effect: Effect) -> Result<RecordId> {
        match effect {
            Effect::Create { name, quantity } => {
                let id = self.store.create_record(&name, quantity)?;
                self.view.insert(InventoryRecord { id, name, quantity });
                Ok(id)
            }
            Effect::Update { id, quantity } => {
                self.store.update_record_quantity(id, quantity)?;
                self.view.set_quantity(id, quantity);
                Ok(id)
            }
            Effect::Delete { id } => {
                self.store.delete_record(id)?;
                self.view.remove(id);
                Ok(id)
            }
        }
    }
}
