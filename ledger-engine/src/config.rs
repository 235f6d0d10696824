//! Engine configuration loaded from the environment

/// Runtime configuration for a ledger engine instance
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Path to the redb database file
    pub db_path: String,
    /// Default log level when RUST_LOG is unset
    pub log_level: String,
    /// JSON log output (production) vs human-readable (development)
    pub json_logs: bool,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self {
            db_path: std::env::var("LEDGER_DB_PATH")
                .unwrap_or_else(|_| "./work_dir/ledger.redb".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            json_logs: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: "./work_dir/ledger.redb".into(),
            log_level: "info".into(),
            json_logs: false,
        }
    }
}
