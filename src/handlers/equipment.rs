use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::{info, warn};

use crate::{
    db::EquipmentStore,
    error::{AppError, AppResult},
    handlers::extract::{EquipmentIdPath, ValidJson},
    models::{CreateEquipment, CreateEquipmentStats, Equipment, StatsReport},
    AppState,
};

/// Most records returned by the recent-stats query.
pub const RECENT_STATS_LIMIT: i64 = 10;

/// Resolve an id to exactly one equipment row.
async fn single_equipment(store: &dyn EquipmentStore, id: i32) -> AppResult<Equipment> {
    let mut matches = store.equipment_by_id(id).await?;
    match matches.len() {
        0 => Err(AppError::NotFound(format!("Equipment {} is not in database.", id))),
        1 => Ok(matches.remove(0)),
        n => {
            warn!(id, matches = n, "Equipment id matches more than one row");
            Err(AppError::DuplicateEntries(format!("ID {}", id)))
        }
    }
}

// ── POST /api/add_equipment ───────────────────────────────────────────────────

pub async fn add_equipment(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateEquipment>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let payload = payload.validate()?;

    let start = Instant::now();
    let Some(equipment) = state.store.insert_equipment(&payload).await? else {
        let matches = state.store.equipment_by_name(&payload.name).await?;
        warn!(name = %payload.name, matches = matches.len(), "Equipment name already taken");
        return Err(if matches.len() > 1 {
            AppError::DuplicateEntries(payload.name)
        } else {
            AppError::AlreadyExists(payload.name)
        });
    };

    info!(
        id = equipment.id,
        name = %equipment.name,
        category = %equipment.category,
        elapsed_ms = start.elapsed().as_millis(),
        "Registered equipment"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": format!(
                "Equipment {} added to database with ID: {}!",
                equipment.name, equipment.id
            ),
            "id": equipment.id,
            "name": equipment.name,
        })),
    ))
}

// ── POST /api/add_equipment_stats/:equipment_id ───────────────────────────────

pub async fn add_equipment_stats(
    State(state): State<AppState>,
    EquipmentIdPath(equipment_id): EquipmentIdPath,
    ValidJson(payload): ValidJson<CreateEquipmentStats>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let new_stats = payload.into_new(equipment_id, Utc::now())?;

    let start = Instant::now();
    let equipment = single_equipment(state.store.as_ref(), equipment_id).await?;

    // The foreign key still guards against the row vanishing after the lookup
    let Some(stats) = state.store.insert_stats(&new_stats).await? else {
        return Err(AppError::NotFound(format!(
            "Equipment {} is not in database.",
            equipment_id
        )));
    };

    info!(
        id = stats.id,
        equipment_id,
        quantity = %stats.quantity,
        units = %stats.quantity_units,
        elapsed_ms = start.elapsed().as_millis(),
        "Recorded equipment stats"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": format!("Stats added for equipment: {}", equipment.name),
            "id": stats.id,
            "equipment_id": stats.equipment_id,
        })),
    ))
}

// ── GET /api/check_equipment_stats/:equipment_id ──────────────────────────────

pub async fn check_equipment_stats(
    State(state): State<AppState>,
    EquipmentIdPath(equipment_id): EquipmentIdPath,
) -> AppResult<Json<StatsReport>> {
    let start = Instant::now();
    let equipment = single_equipment(state.store.as_ref(), equipment_id).await?;
    let recent_stats = state
        .store
        .recent_stats(equipment_id, RECENT_STATS_LIMIT)
        .await?;

    if recent_stats.is_empty() {
        return Err(AppError::NotFound(format!(
            "Equipment stats for {} not in database.",
            equipment.name
        )));
    }

    info!(
        equipment_id,
        count = recent_stats.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Fetched recent equipment stats"
    );

    Ok(Json(StatsReport {
        equipment_id: equipment.id,
        equipment_name: equipment.name,
        recent_stats,
    }))
}
