//! Wholesale schema management. There is no migration history: tables are
//! created when missing and dropped together by the reset command.

use sqlx::PgPool;
use tracing::info;

const CREATE_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS equipment (
        id       SERIAL PRIMARY KEY,
        name     TEXT NOT NULL,
        category TEXT NOT NULL,
        CONSTRAINT equipment_name_key UNIQUE (name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS equipment_stats (
        id              SERIAL PRIMARY KEY,
        equipment_id    INTEGER NOT NULL REFERENCES equipment (id),
        quantity        NUMERIC NOT NULL,
        quantity_units  TEXT NOT NULL,
        expiration_date TIMESTAMPTZ,
        last_updated    TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS equipment_stats_recent_idx
        ON equipment_stats (equipment_id, last_updated DESC)
    "#,
];

// Children first so the foreign key never blocks the drop
const DROP_STATEMENTS: &[&str] = &[
    "DROP TABLE IF EXISTS equipment_stats",
    "DROP TABLE IF EXISTS equipment",
];

pub async fn create_all(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in CREATE_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Drop every table and recreate them empty, in one transaction.
pub async fn reset(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in DROP_STATEMENTS.iter().chain(CREATE_STATEMENTS) {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("Dropped and recreated equipment tables");
    Ok(())
}
