//! Pantry Tracker - Inventory Reconciliation & Storage
//!
//! Tracks pantry items by normalized name in a SQLite database. Repeat
//! entries of the same item merge quantities; consuming the last unit of an
//! item removes it entirely.

pub mod database;
pub mod error;
pub mod normalize;
pub mod pantry;
pub mod reconcile;
pub mod web;

pub use database::SqliteStore;
pub use error::{PantryError, Result};
pub use normalize::normalize;
pub use pantry::{Pantry, RecordStore};
pub use reconcile::{Effect, InventoryRecord, RecordId, View};
