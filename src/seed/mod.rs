use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::info;

use crate::db::EquipmentStore;
use crate::error::{AppError, AppResult};
use crate::models::{CreateEquipment, CreateEquipmentStats, Equipment};

/// (name, category, units) for the mock catalogue.
static CATALOGUE: &[(&str, &str, &str)] = &[
    ("Tourniquet", "trauma", "each"),
    ("Israeli Bandage", "trauma", "each"),
    ("Hemostatic Gauze", "trauma", "packs"),
    ("Trauma Shears", "trauma", "each"),
    ("OPA Kit", "airway", "kits"),
    ("NPA Kit", "airway", "kits"),
    ("BVM Adult", "airway", "each"),
    ("Suction Catheter", "airway", "boxes"),
    ("BP Cuff", "vitals", "each"),
    ("Pulse Oximeter", "vitals", "each"),
    ("Thermometer Probe Covers", "vitals", "boxes"),
    ("Nitrile Gloves", "misc", "boxes"),
    ("Saline Flush", "misc", "mL"),
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub equipment_created: usize,
    pub equipment_reused: usize,
    pub stats_created: usize,
}

/// Random stock observation for one catalogue entry.
fn random_stats(rng: &mut impl Rng, units: &str) -> CreateEquipmentStats {
    let now = Utc::now();
    let quantity = if units == "mL" {
        Decimal::new(rng.gen_range(0..=5_000_i64), 1) // 0.0 – 500.0 mL
    } else {
        Decimal::from(rng.gen_range(0..=200_i64))
    };

    CreateEquipmentStats {
        quantity,
        quantity_units: units.to_string(),
        expiration_date: rng
            .gen_bool(0.6)
            .then(|| now + Duration::days(rng.gen_range(30..=720))),
        last_updated: Some(now - Duration::hours(rng.gen_range(0..=24 * 30))),
    }
}

/// Register the mock catalogue and attach `stats_per_item` observations to
/// every entry. Names that already exist are reused, never duplicated.
pub async fn seed_equipment(
    store: &dyn EquipmentStore,
    stats_per_item: usize,
    rng: &mut StdRng,
) -> AppResult<SeedSummary> {
    info!("Seeding {} equipment items...", CATALOGUE.len());
    let mut summary = SeedSummary::default();

    for &(name, category, units) in CATALOGUE {
        let payload = CreateEquipment {
            name: name.to_string(),
            category: category.to_string(),
        };
        let equipment = match store.insert_equipment(&payload).await? {
            Some(equipment) => {
                summary.equipment_created += 1;
                equipment
            }
            None => {
                summary.equipment_reused += 1;
                existing(store, name).await?
            }
        };

        for _ in 0..stats_per_item {
            let stats = random_stats(rng, units).into_new(equipment.id, Utc::now())?;
            if store.insert_stats(&stats).await?.is_some() {
                summary.stats_created += 1;
            }
        }
    }

    info!(
        created = summary.equipment_created,
        reused = summary.equipment_reused,
        stats = summary.stats_created,
        "Seeding complete"
    );
    Ok(summary)
}

async fn existing(store: &dyn EquipmentStore, name: &str) -> AppResult<Equipment> {
    let mut matches = store.equipment_by_name(name).await?;
    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(AppError::NotFound(format!("Equipment {} is not in database.", name))),
        _ => Err(AppError::DuplicateEntries(name.to_string())),
    }
}
