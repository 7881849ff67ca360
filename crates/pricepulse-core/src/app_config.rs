use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Base URL of the remote Catalog Service, e.g. `http://localhost:8000`.
    pub catalog_url: String,
    pub catalog_timeout_secs: u64,
    pub catalog_max_retries: u32,
    pub catalog_retry_backoff_base_ms: u64,
    pub user_agent: String,
    /// Sessions untouched for this long are evicted from the session store.
    pub session_idle_secs: u64,
    pub stores_path: PathBuf,
}
