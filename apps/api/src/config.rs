use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::scoring::risk::RiskConfig;

/// Application configuration loaded from environment variables.
/// Every variable has a default; startup fails only on unparsable values.
#[derive(Debug, Clone)]
pub struct Config {
    /// In-memory store when unset.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub model_dir: PathBuf,
    pub baseline_dataset: PathBuf,
    pub port: u16,
    pub rust_log: String,
    pub reality_gap_severity: f64,
    pub reality_gap_threshold: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = RiskConfig::default();

        Ok(Config {
            database_url: std::env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty()),
            db_max_connections: parse_pool_size(&env_or("DATABASE_MAX_CONNECTIONS", "10"))?,
            model_dir: env_or("MODEL_DIR", "models").into(),
            baseline_dataset: env_or("BASELINE_DATASET", "data/stud.csv").into(),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            reality_gap_severity: parse_fraction("REALITY_GAP_SEVERITY", defaults.reality_gap_severity)?,
            reality_gap_threshold: parse_fraction("REALITY_GAP_THRESHOLD", defaults.reality_gap_threshold)?,
        })
    }

    pub fn risk_config(&self) -> RiskConfig {
        RiskConfig {
            reality_gap_severity: self.reality_gap_severity,
            reality_gap_threshold: self.reality_gap_threshold,
            ..RiskConfig::default()
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_pool_size(raw: &str) -> Result<u32> {
    let size = raw
        .trim()
        .parse::<u32>()
        .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;
    anyhow::ensure!(size > 0, "DATABASE_MAX_CONNECTIONS must be at least 1");
    Ok(size)
}

/// Reads a severity-scale value in [0, 1].
fn parse_fraction(key: &str, default: f64) -> Result<f64> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<f64>()
        .with_context(|| format!("{key} must be a number"))?;
    anyhow::ensure!((0.0..=1.0).contains(&value), "{key} must be within 0 and 1, got {value}");
    Ok(value)
}
