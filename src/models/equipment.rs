use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A distinct trackable item. `name` is unique across the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    /// Informal taxonomy: trauma, airway, vitals, misc.
    pub category: String,
}

// ── Request payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEquipment {
    pub name: String,
    pub category: String,
}

impl CreateEquipment {
    /// Trim the name and reject it if nothing is left.
    pub fn validate(mut self) -> AppResult<Self> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }
        Ok(self)
    }
}
