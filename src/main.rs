use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod seed;

use crate::config::Config;
use crate::db::{schema, EquipmentStore, PgStore};

/// Shared application state; cheap to clone (storage behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EquipmentStore>,
}

#[derive(Parser, Debug)]
#[command(
    name = "equipment-inventory",
    version,
    about = "Medical equipment inventory backend: equipment items and their stock-level history"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Drop every table and recreate them empty (development only)
    ResetDb,
    /// Populate mock medical equipment with random stock observations
    Seed {
        /// Stats records to add per equipment item
        #[arg(long, default_value_t = 5)]
        stats_per_item: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,equipment_inventory=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    info!("Connecting to PostgreSQL...");
    let pool = db::postgres::connect(config.database.clone(), config.max_connections)
        .await
        .context("Failed to create database pool")?;
    info!("Database connection pool established.");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(pool, &config).await,
        Command::ResetDb => {
            schema::reset(&pool).await.context("Failed to reset database")?;
            println!("✅ All equipment tables have been reset.");
            Ok(())
        }
        Command::Seed { stats_per_item } => {
            schema::create_all(&pool).await.context("Failed to create schema")?;
            let store = PgStore::new(pool);
            let mut rng = StdRng::from_entropy();
            let summary = seed::seed_equipment(&store, stats_per_item, &mut rng).await?;
            println!(
                "Seeded {} new equipment items ({} already present) and {} stats records.",
                summary.equipment_created, summary.equipment_reused, summary.stats_created
            );
            Ok(())
        }
    }
}

async fn serve(pool: sqlx::PgPool, config: &Config) -> anyhow::Result<()> {
    info!("╔══════════════════════════════════════╗");
    info!("║  Equipment Inventory — Rust + Axum   ║");
    info!("╚══════════════════════════════════════╝");

    info!("Creating tables if missing...");
    schema::create_all(&pool).await.context("Failed to create schema")?;

    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
    };
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))

        // ── Equipment ───────────────────────────────────────────────────────
        .route("/api/add_equipment", post(handlers::equipment::add_equipment))
        .route(
            "/api/add_equipment_stats/:equipment_id",
            post(handlers::equipment::add_equipment_stats),
        )
        .route(
            "/api/check_equipment_stats/:equipment_id",
            get(handlers::equipment::check_equipment_stats),
        )

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
