use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`). Archive builds are slow.
    pub request_timeout_secs: u64,
    /// Maximum multipart request body in bytes (default: 50 MiB).
    pub max_upload_bytes: usize,
    /// Root directory for uploaded TDRs and applicant documents.
    pub files_dir: PathBuf,
    /// Directory where archive bundles are written.
    pub archives_dir: PathBuf,
    /// Whether `main` spawns the daily expiration sweep.
    pub expiration_sweep_enabled: bool,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                                         |
    /// |----------------------------|-------------------------------------------------|
    /// | `HOST`                     | `0.0.0.0`                                       |
    /// | `PORT`                     | `8000`                                          |
    /// | `CORS_ORIGINS`             | `http://localhost:5173,http://127.0.0.1:5173`   |
    /// | `REQUEST_TIMEOUT_SECS`     | `120`                                           |
    /// | `MAX_UPLOAD_BYTES`         | `52428800`                                      |
    /// | `FILES_DIR`                | `files`                                         |
    /// | `ARCHIVES_DIR`             | `archives`                                      |
    /// | `EXPIRATION_SWEEP_ENABLED` | `true`                                          |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "52428800".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let files_dir = PathBuf::from(std::env::var("FILES_DIR").unwrap_or_else(|_| "files".into()));
        let archives_dir =
            PathBuf::from(std::env::var("ARCHIVES_DIR").unwrap_or_else(|_| "archives".into()));

        let expiration_sweep_enabled = std::env::var("EXPIRATION_SWEEP_ENABLED")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            files_dir,
            archives_dir,
            expiration_sweep_enabled,
            jwt,
        }
    }
}
