//! In-memory `EquipmentStore` used by router and handler tests.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::EquipmentStore;
use crate::error::AppResult;
use crate::models::*;

#[derive(Debug, Default)]
struct Tables {
    equipment: Vec<Equipment>,
    stats: Vec<EquipmentStats>,
    next_equipment_id: i32,
    next_stats_id: i32,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bypass the name check to reproduce a store that already violates
    /// name uniqueness.
    pub async fn insert_unchecked(&self, name: &str, category: &str) -> Equipment {
        let mut tables = self.tables.write().await;
        tables.next_equipment_id += 1;
        let equipment = Equipment {
            id: tables.next_equipment_id,
            name: name.to_string(),
            category: category.to_string(),
        };
        tables.equipment.push(equipment.clone());
        equipment
    }

    /// Reproduce two rows sharing one id, which only a corrupted store has.
    pub async fn clone_equipment_row(&self, id: i32, name: &str) {
        let mut tables = self.tables.write().await;
        tables.equipment.push(Equipment {
            id,
            name: name.to_string(),
            category: "misc".to_string(),
        });
    }

    pub async fn equipment_count(&self) -> usize {
        self.tables.read().await.equipment.len()
    }

    pub async fn stats_count(&self) -> usize {
        self.tables.read().await.stats.len()
    }
}

#[async_trait]
impl EquipmentStore for MemoryStore {
    async fn insert_equipment(&self, payload: &CreateEquipment) -> AppResult<Option<Equipment>> {
        let mut tables = self.tables.write().await;
        if tables.equipment.iter().any(|e| e.name == payload.name) {
            return Ok(None);
        }
        tables.next_equipment_id += 1;
        let equipment = Equipment {
            id: tables.next_equipment_id,
            name: payload.name.clone(),
            category: payload.category.clone(),
        };
        tables.equipment.push(equipment.clone());
        Ok(Some(equipment))
    }

    async fn equipment_by_name(&self, name: &str) -> AppResult<Vec<Equipment>> {
        let tables = self.tables.read().await;
        Ok(tables.equipment.iter().filter(|e| e.name == name).cloned().collect())
    }

    async fn equipment_by_id(&self, id: i32) -> AppResult<Vec<Equipment>> {
        let tables = self.tables.read().await;
        Ok(tables.equipment.iter().filter(|e| e.id == id).cloned().collect())
    }

    async fn insert_stats(&self, stats: &NewEquipmentStats) -> AppResult<Option<EquipmentStats>> {
        let mut tables = self.tables.write().await;
        if !tables.equipment.iter().any(|e| e.id == stats.equipment_id) {
            return Ok(None);
        }
        tables.next_stats_id += 1;
        let record = EquipmentStats {
            id: tables.next_stats_id,
            equipment_id: stats.equipment_id,
            quantity: stats.quantity,
            quantity_units: stats.quantity_units.clone(),
            expiration_date: stats.expiration_date,
            last_updated: stats.last_updated,
        };
        tables.stats.push(record.clone());
        Ok(Some(record))
    }

    async fn recent_stats(&self, equipment_id: i32, limit: i64) -> AppResult<Vec<EquipmentStats>> {
        let tables = self.tables.read().await;
        let mut records: Vec<EquipmentStats> = tables
            .stats
            .iter()
            .filter(|s| s.equipment_id == equipment_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.last_updated
                .cmp(&a.last_updated)
                .then_with(|| b.id.cmp(&a.id))
        });
        records.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(records)
    }
}
