// src/config.rs

use std::env;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use url::Url;

/// Default public Piston endpoint used by the practice client.
pub const DEFAULT_EXECUTION_SERVICE_URL: &str = "https://emkc.org/api/v2/piston/execute";

/// Pause between Execution Service calls while running public cases.
pub const DEFAULT_RUN_CASE_DELAY_MS: u64 = 100;

/// Elapsed milliseconds per reported "MB" in the synthetic memory figure.
pub const MEMORY_ESTIMATE_DIVISOR_MS: u64 = 200;

/// Reward for questions authored without an explicit point value.
pub const DEFAULT_QUESTION_POINTS: u32 = 10;

/// Where drafts, submissions and progress live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMode {
    /// Everything goes through the Backend API.
    Remote,
    /// Self-contained SQLite store plus a JSON catalog file.
    Local,
}

impl FromStr for StoreMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(StoreMode::Remote),
            "local" => Ok(StoreMode::Local),
            other => Err(format!("unknown STORE_MODE '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub execution_service_url: String,
    pub store_mode: StoreMode,
    pub backend_api_url: Option<String>,
    pub database_url: String,
    pub catalog_path: Option<String>,
    pub run_case_delay_ms: u64,
    pub execution_timeout_secs: u64,
    pub execution_max_attempts: u32,
    pub execution_retry_backoff_ms: u64,
    pub submission_write_attempts: u32,
    pub bind_addr: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let execution_service_url = env::var("EXECUTION_SERVICE_URL")
            .unwrap_or_else(|_| DEFAULT_EXECUTION_SERVICE_URL.to_string());
        validate_url("EXECUTION_SERVICE_URL", &execution_service_url);

        let store_mode = env::var("STORE_MODE")
            .unwrap_or_else(|_| "remote".to_string())
            .parse::<StoreMode>()
            .unwrap_or_else(|e| panic!("{}", e));

        let backend_api_url = env::var("BACKEND_API_URL").ok();
        match (&store_mode, &backend_api_url) {
            (StoreMode::Remote, None) => panic!("BACKEND_API_URL must be set when STORE_MODE=remote"),
            (_, Some(url)) => validate_url("BACKEND_API_URL", url),
            _ => {}
        }

        let catalog_path = env::var("CATALOG_PATH").ok();
        if store_mode == StoreMode::Local && catalog_path.is_none() {
            panic!("CATALOG_PATH must be set when STORE_MODE=local");
        }

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://judge.db?mode=rwc".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            jwt_secret,
            execution_service_url,
            store_mode,
            backend_api_url,
            database_url,
            catalog_path,
            run_case_delay_ms: parse_or("RUN_CASE_DELAY_MS", DEFAULT_RUN_CASE_DELAY_MS),
            execution_timeout_secs: parse_or("EXECUTION_TIMEOUT_SECS", 15),
            execution_max_attempts: parse_or("EXECUTION_MAX_ATTEMPTS", 1).max(1),
            execution_retry_backoff_ms: parse_or("EXECUTION_RETRY_BACKOFF_MS", 250),
            submission_write_attempts: parse_or("SUBMISSION_WRITE_ATTEMPTS", 2).max(1),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            rust_log,
        }
    }

    pub fn run_case_delay(&self) -> Duration {
        Duration::from_millis(self.run_case_delay_ms)
    }

    pub fn execution_timeout(&self) -> Duration {
        Duration::from_secs(self.execution_timeout_secs)
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{} must be a number, got '{}'", key, raw)),
        Err(_) => default,
    }
}

fn validate_url(key: &str, value: &str) {
    if Url::parse(value).is_err() {
        panic!("{} is not a valid URL: {}", key, value);
    }
}
