// ==================== CONFIGURATION ====================
// Lida do ambiente (após dotenv). Valores inválidos abortam o startup.

use crate::utils::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_INTERVAL_MS: u64 = 1000;
/// Intervalo mínimo para evitar martelar o store
const MIN_INTERVAL_MS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDB { database_url: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub simulation_enabled: bool,
    pub simulation_interval: Duration,
    pub leader_stream_interval: Duration,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or("PORT", lookup("PORT"), 8080u16)?;

        let backend = lookup("STORE_BACKEND").unwrap_or_else(|| "mongodb".to_string());
        let store = match backend.to_lowercase().as_str() {
            "mongodb" | "mongo" => StoreBackend::MongoDB {
                database_url: lookup("DATABASE_URL")
                    .ok_or_else(|| AppError::Config("DATABASE_URL must be set".to_string()))?,
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(AppError::Config(format!("unknown STORE_BACKEND '{}'", other)));
            }
        };

        let simulation_enabled = match lookup("SIMULATION_ENABLED") {
            None => true,
            Some(v) => match v.to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(AppError::Config(format!("invalid SIMULATION_ENABLED '{}'", v)));
                }
            },
        };

        let simulation_interval = interval_from("SIMULATION_INTERVAL_MS", lookup("SIMULATION_INTERVAL_MS"))?;
        let leader_stream_interval =
            interval_from("LEADER_STREAM_INTERVAL_MS", lookup("LEADER_STREAM_INTERVAL_MS"))?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            store,
            simulation_enabled,
            simulation_interval,
            leader_stream_interval,
            cors_allowed_origins,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, AppError> {
    match raw {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("invalid {} '{}'", key, v))),
    }
}

fn interval_from(key: &str, raw: Option<String>) -> Result<Duration, AppError> {
    let ms = parse_or(key, raw, DEFAULT_INTERVAL_MS)?.max(MIN_INTERVAL_MS);
    Ok(Duration::from_millis(ms))
}
