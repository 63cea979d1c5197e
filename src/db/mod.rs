//! Persistence layer: the `EquipmentStore` seam plus its implementations.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{CreateEquipment, Equipment, EquipmentStats, NewEquipmentStats};

#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod schema;

pub use postgres::PgStore;

/// Storage operations the HTTP layer needs. Passed explicitly through
/// `AppState` so tests can swap in an isolated in-memory store.
#[async_trait]
pub trait EquipmentStore: Send + Sync {
    /// Insert unless an equipment row with the same name exists.
    /// Returns `None` on a name conflict; nothing is written in that case.
    async fn insert_equipment(&self, payload: &CreateEquipment) -> AppResult<Option<Equipment>>;

    async fn equipment_by_name(&self, name: &str) -> AppResult<Vec<Equipment>>;

    async fn equipment_by_id(&self, id: i32) -> AppResult<Vec<Equipment>>;

    /// Returns `None` when `stats.equipment_id` references no equipment.
    async fn insert_stats(&self, stats: &NewEquipmentStats) -> AppResult<Option<EquipmentStats>>;

    /// Up to `limit` records, newest `last_updated` first, ties by id descending.
    async fn recent_stats(&self, equipment_id: i32, limit: i64) -> AppResult<Vec<EquipmentStats>>;
}
