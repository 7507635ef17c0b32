//! Inventory reconciliation core.
//!
//! Pure decision logic: given the caller's in-memory view of all records and
//! an incoming operation, compute the single persistence effect needed to
//! realize it. No I/O happens here; applying the effect to storage (and only
//! then committing it to the view) is the adapter's job, see [`crate::pantry`].
//!
//! Invariants maintained:
//! - every live record has quantity >= 1 (consume of the last unit deletes)
//! - at most one live record per normalized name

use crate::error::{PantryError, Result};
use crate::normalize::normalize;
use serde::Serialize;
use std::collections::HashMap;

/// Identifier assigned by the persistence layer at creation time.
/// Fresh and never reused; immutable once assigned.
pub type RecordId = i64;

/// One pantry item as persisted: normalized display name plus a quantity
/// that is always >= 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRecord {
    pub id: RecordId,
    pub name: String,
    pub quantity: u32,
}

/// A single persistence mutation the caller must apply to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Insert a new record; storage assigns its id.
    Create { name: String, quantity: u32 },
    /// Overwrite the quantity of an existing record.
    Update { id: RecordId, quantity: u32 },
    /// Remove the record entirely.
    Delete { id: RecordId },
}

/// The caller's in-memory snapshot of all current records, assumed
/// consistent with storage at the start of each operation.
#[derive(Debug, Clone, Default)]
pub struct View {
    records: HashMap<RecordId, InventoryRecord>,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a view from freshly listed storage records (session start).
    pub fn from_records(records: impl IntoIterator<Item = InventoryRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    pub fn get(&self, id: RecordId) -> Option<&InventoryRecord> {
        self.records.get(&id)
    }

    /// Looks up a record by its normalized name. Exact string equality is
    /// the only matching rule; near-duplicates (extra internal spaces,
    /// trailing punctuation) are distinct items.
    pub fn find_by_name(&self, normalized: &str) -> Option<&InventoryRecord> {
        self.records.values().find(|r| r.name == normalized)
    }

    pub fn records(&self) -> impl Iterator<Item = &InventoryRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Plans an Add operation: merge into the matching record if one exists,
    /// otherwise create a new one.
    ///
    /// Emits exactly one effect. Rejects names that normalize to the empty
    /// string and zero quantities with `InvalidInput`; a merge that would
    /// overflow the quantity is rejected the same way.
    pub fn plan_add(&self, raw_name: &str, quantity: u32) -> Result<Effect> {
        let name = normalize(raw_name);
        if name.is_empty() {
            return Err(PantryError::InvalidInput(
                "item name must not be empty".to_string(),
            ));
        }
        if quantity == 0 {
            return Err(PantryError::InvalidInput(
                "quantity must be at least 1".to_string(),
            ));
        }

        match self.find_by_name(&name) {
            Some(existing) => {
                let merged = existing.quantity.checked_add(quantity).ok_or_else(|| {
                    PantryError::InvalidInput(format!("quantity overflow for {}", name))
                })?;
                Ok(Effect::Update {
                    id: existing.id,
                    quantity: merged,
                })
            }
            None => Ok(Effect::Create { name, quantity }),
        }
    }

    /// Plans a Consume operation: decrement the record's quantity, or delete
    /// the record when its last unit is consumed.
    ///
    /// Emits exactly one effect; `NotFound` if the id is absent.
    pub fn plan_consume(&self, id: RecordId) -> Result<Effect> {
        let record = self.records.get(&id).ok_or(PantryError::NotFound(id))?;
        if record.quantity > 1 {
            Ok(Effect::Update {
                id,
                quantity: record.quantity - 1,
            })
        } else {
            Ok(Effect::Delete { id })
        }
    }

    /// Commits a freshly created record to the view (storage has assigned
    /// its id). Only called after the Create effect succeeded.
    pub(crate) fn insert(&mut self, record: InventoryRecord) {
        self.records.insert(record.id, record);
    }

    /// Commits a quantity change to the view.
    pub(crate) fn set_quantity(&mut self, id: RecordId, quantity: u32) {
        if let Some(record) = self.records.get_mut(&id) {
            record.quantity = quantity;
        }
    }

    /// Commits a deletion to the view.
    pub(crate) fn remove(&mut self, id: RecordId) {
        self.records.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Applies a planned effect to the view the way the adapter would after
    /// a successful storage call, assigning ids from a counter.
    fn apply(view: &mut View, effect: Effect, next_id: &mut RecordId) {
        match effect {
            Effect::Create { name, quantity } => {
                *next_id += 1;
                view.insert(InventoryRecord {
                    id: *next_id,
                    name,
                    quantity,
                });
            }
            Effect::Update { id, quantity } => view.set_quantity(id, quantity),
            Effect::Delete { id } => view.remove(id),
        }
    }

    fn view_with(records: Vec<InventoryRecord>) -> View {
        View::from_records(records)
    }

    fn record(id: RecordId, name: &str, quantity: u32) -> InventoryRecord {
        InventoryRecord {
            id,
            name: name.to_string(),
            quantity,
        }
    }

    #[test]
    fn add_to_empty_view_plans_create() {
        let view = View::new();
        let effect = view.plan_add("milk", 2).unwrap();
        assert_eq!(
            effect,
            Effect::Create {
                name: "Milk".to_string(),
                quantity: 2
            }
        );
    }

    #[test]
    fn repeat_add_merges_quantities() {
        let mut view = View::new();
        let mut next_id = 0;

        let first = view.plan_add("milk", 2).unwrap();
        assert!(matches!(first, Effect::Create { .. }));
        apply(&mut view, first, &mut next_id);

        let second = view.plan_add("Milk", 3).unwrap();
        assert_eq!(second, Effect::Update { id: 1, quantity: 5 });
        apply(&mut view, second, &mut next_id);

        assert_eq!(view.len(), 1);
        let merged = view.find_by_name("Milk").unwrap();
        assert_eq!(merged.quantity, 5);
    }

    #[test]
    fn case_variants_never_duplicate() {
        let mut view = View::new();
        let mut next_id = 0;
        for raw in ["soup", "Soup", "SOUP", "  soup "] {
            let effect = view.plan_add(raw, 1).unwrap();
            apply(&mut view, effect, &mut next_id);
        }
        assert_eq!(view.len(), 1);
        assert_eq!(view.find_by_name("Soup").unwrap().quantity, 4);
    }

    #[test]
    fn consume_decrements_above_one() {
        let view = view_with(vec![record(7, "Eggs", 3)]);
        let effect = view.plan_consume(7).unwrap();
        assert_eq!(effect, Effect::Update { id: 7, quantity: 2 });
    }

    #[test]
    fn consume_last_unit_plans_delete() {
        let mut view = view_with(vec![record(7, "Eggs", 1)]);
        let effect = view.plan_consume(7).unwrap();
        assert_eq!(effect, Effect::Delete { id: 7 });

        let mut next_id = 7;
        apply(&mut view, effect, &mut next_id);
        assert!(view.get(7).is_none());
        assert!(view.is_empty());
    }

    #[test]
    fn blank_name_rejected_without_effect() {
        let view = View::new();
        let err = view.plan_add("   ", 5).unwrap_err();
        assert!(matches!(err, PantryError::InvalidInput(_)));
        assert!(view.is_empty());
    }

    #[test]
    fn zero_quantity_rejected() {
        let view = View::new();
        let err = view.plan_add("milk", 0).unwrap_err();
        assert!(matches!(err, PantryError::InvalidInput(_)));
    }

    #[test]
    fn merge_overflow_rejected() {
        let view = view_with(vec![record(1, "Rice", u32::MAX)]);
        let err = view.plan_add("rice", 1).unwrap_err();
        assert!(matches!(err, PantryError::InvalidInput(_)));
        // Existing record untouched
        assert_eq!(view.get(1).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn consume_unknown_id_is_not_found() {
        let view = view_with(vec![record(1, "Eggs", 2)]);
        let err = view.plan_consume(99).unwrap_err();
        assert!(matches!(err, PantryError::NotFound(99)));
    }

    #[test]
    fn near_duplicate_names_stay_distinct() {
        let mut view = View::new();
        let mut next_id = 0;
        let a = view.plan_add("olive oil", 1).unwrap();
        apply(&mut view, a, &mut next_id);
        let b = view.plan_add("olive  oil", 1).unwrap();
        assert!(matches!(b, Effect::Create { .. }));
        apply(&mut view, b, &mut next_id);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn quantity_stays_positive_across_sequences() {
        let mut view = View::new();
        let mut next_id = 0;

        // Build up and tear down a few items in mixed order
        for (raw, qty) in [("milk", 2), ("eggs", 1), ("Milk", 1), ("flour", 4)] {
            let effect = view.plan_add(raw, qty).unwrap();
            apply(&mut view, effect, &mut next_id);
            assert!(view.records().all(|r| r.quantity >= 1));
        }

        // Consume everything, checking the invariant at every step
        loop {
            let next = view.records().next().map(|r| r.id);
            let Some(id) = next else { break };
            let effect = view.plan_consume(id).unwrap();
            apply(&mut view, effect, &mut next_id);
            assert!(view.records().all(|r| r.quantity >= 1));
        }
        assert!(view.is_empty());
    }
}
