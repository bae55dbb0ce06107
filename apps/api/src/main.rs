mod config;
mod db;
mod errors;
mod learning;
mod models;
mod profile;
mod reference;
mod routes;
mod scoring;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::learning::artifacts::ArtifactStore;
use crate::learning::classifier::NaiveBayesTrainer;
use crate::learning::retrainer::{RetrainContext, Retrainer};
use crate::routes::build_router;
use crate::scoring::confidence::WeightedCareerScorer;
use crate::state::AppState;
use crate::store::memory::MemoryStore;
use crate::store::postgres::PgStore;
use crate::store::EngineStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerLens API v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn EngineStore> = match &config.database_url {
        Some(url) => Arc::new(PgStore::new(create_pool(url, config.db_max_connections).await?)),
        None => {
            info!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let artifacts = Arc::new(ArtifactStore::open(&config.model_dir)?);
    info!(
        "Model directory: {} (live version: {:?})",
        config.model_dir.display(),
        artifacts.version()
    );

    let retrainer = Retrainer::spawn(RetrainContext {
        store: Arc::clone(&store),
        artifacts: Arc::clone(&artifacts),
        trainer: Arc::new(NaiveBayesTrainer::default()),
        baseline_path: config.baseline_dataset.clone(),
    });

    let state = AppState {
        store,
        scorer: Arc::new(WeightedCareerScorer::default()),
        risk_config: config.risk_config(),
        artifacts,
        retrainer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
