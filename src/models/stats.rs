use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// One timestamped stock-level observation. Never modified once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EquipmentStats {
    pub id: i32,
    pub equipment_id: i32,
    pub quantity: Decimal,
    pub quantity_units: String,
    pub expiration_date: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
}

/// Response body of the recent-stats query.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsReport {
    pub equipment_id: i32,
    pub equipment_name: String,
    pub recent_stats: Vec<EquipmentStats>,
}

// ── Request payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEquipmentStats {
    pub quantity: Decimal,
    pub quantity_units: String,
    pub expiration_date: Option<DateTime<Utc>>,
    /// Defaults to the time the request is handled.
    pub last_updated: Option<DateTime<Utc>>,
}

/// A validated stats row ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEquipmentStats {
    pub equipment_id: i32,
    pub quantity: Decimal,
    pub quantity_units: String,
    pub expiration_date: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
}

impl CreateEquipmentStats {
    /// Validate the payload and bind it to `equipment_id`, stamping
    /// `last_updated` with `now` when the caller left it out.
    pub fn into_new(self, equipment_id: i32, now: DateTime<Utc>) -> AppResult<NewEquipmentStats> {
        if self.quantity < Decimal::ZERO {
            return Err(AppError::Validation("quantity must be >= 0".to_string()));
        }
        let quantity_units = self.quantity_units.trim();
        if quantity_units.is_empty() {
            return Err(AppError::Validation(
                "quantity_units must not be empty".to_string(),
            ));
        }

        Ok(NewEquipmentStats {
            equipment_id,
            quantity: self.quantity,
            quantity_units: quantity_units.to_string(),
            expiration_date: self.expiration_date,
            last_updated: self.last_updated.unwrap_or(now),
        })
    }
}
