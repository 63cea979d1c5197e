use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use super::EquipmentStore;
use crate::error::AppResult;
use crate::models::*;

/// Open a pool with the given connect options.
pub async fn connect(options: PgConnectOptions, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EquipmentStore for PgStore {
    async fn insert_equipment(&self, payload: &CreateEquipment) -> AppResult<Option<Equipment>> {
        // Single statement: the UNIQUE(name) constraint arbitrates concurrent inserts
        let equipment = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (name, category)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name, category
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.category)
        .fetch_optional(&self.pool)
        .await?;

        Ok(equipment)
    }

    async fn equipment_by_name(&self, name: &str) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, Equipment>(
            "SELECT id, name, category FROM equipment WHERE name = $1 ORDER BY id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn equipment_by_id(&self, id: i32) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, Equipment>(
            "SELECT id, name, category FROM equipment WHERE id = $1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert_stats(&self, stats: &NewEquipmentStats) -> AppResult<Option<EquipmentStats>> {
        let result = sqlx::query_as::<_, EquipmentStats>(
            r#"
            INSERT INTO equipment_stats
                (equipment_id, quantity, quantity_units, expiration_date, last_updated)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, equipment_id, quantity, quantity_units, expiration_date, last_updated
            "#,
        )
        .bind(stats.equipment_id)
        .bind(stats.quantity)
        .bind(&stats.quantity_units)
        .bind(stats.expiration_date)
        .bind(stats.last_updated)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(Some(row)),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn recent_stats(&self, equipment_id: i32, limit: i64) -> AppResult<Vec<EquipmentStats>> {
        let rows = sqlx::query_as::<_, EquipmentStats>(
            r#"
            SELECT id, equipment_id, quantity, quantity_units, expiration_date, last_updated
            FROM equipment_stats
            WHERE equipment_id = $1
            ORDER BY last_updated DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(equipment_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::schema;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    // Integration tests - run with DATABASE_URL set
    // cargo test -- --ignored

    async fn store() -> PgStore {
        let config = Config::from_env().expect("DATABASE_URL required");
        let pool = connect(config.database, 8).await.expect("pool creation failed");
        schema::create_all(&pool).await.expect("schema creation failed");
        PgStore::new(pool)
    }

    fn unique_name(prefix: &str) -> String {
        format!("{} {}", prefix, Utc::now().timestamp_nanos_opt().unwrap_or_default())
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_name_is_not_inserted() {
        let store = store().await;
        let payload = CreateEquipment {
            name: unique_name("Tourniquet"),
            category: "trauma".to_string(),
        };

        let first = store.insert_equipment(&payload).await.unwrap();
        assert!(first.is_some());
        let second = store.insert_equipment(&payload).await.unwrap();
        assert!(second.is_none());
        assert_eq!(store.equipment_by_name(&payload.name).await.unwrap().len(), 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn stats_for_unknown_equipment_is_rejected() {
        let store = store().await;
        let stats = NewEquipmentStats {
            equipment_id: i32::MAX,
            quantity: Decimal::from(5),
            quantity_units: "boxes".to_string(),
            expiration_date: None,
            last_updated: Utc::now(),
        };

        assert!(store.insert_stats(&stats).await.unwrap().is_none());
        assert!(store.recent_stats(i32::MAX, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn recent_stats_newest_first_and_limited() {
        let store = store().await;
        let equipment = store
            .insert_equipment(&CreateEquipment {
                name: unique_name("Saline Flush"),
                category: "misc".to_string(),
            })
            .await
            .unwrap()
            .unwrap();

        let base = Utc::now();
        for hours in 0..12 {
            store
                .insert_stats(&NewEquipmentStats {
                    equipment_id: equipment.id,
                    quantity: Decimal::new(105, 1),
                    quantity_units: "mL".to_string(),
                    expiration_date: Some(base + Duration::days(90)),
                    last_updated: base - Duration::hours(hours),
                })
                .await
                .unwrap()
                .unwrap();
        }

        let recent = store.recent_stats(equipment.id, 10).await.unwrap();
        assert_eq!(recent.len(), 10);
        assert!(recent.windows(2).all(|w| w[0].last_updated >= w[1].last_updated));
        assert_eq!(recent[0].quantity, Decimal::new(105, 1));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_inserts_of_one_name_store_one_row() {
        let store = std::sync::Arc::new(store().await);
        let payload = CreateEquipment {
            name: unique_name("Hemostatic Gauze"),
            category: "trauma".to_string(),
        };

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                let payload = payload.clone();
                tokio::spawn(async move { store.insert_equipment(&payload).await })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if handle.await.expect("task panicked").unwrap().is_some() {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(store.equipment_by_name(&payload.name).await.unwrap().len(), 1);
    }
}
