//! Configuration module
//!
//! Environment-driven configuration for the upload service: HTTP, database,
//! blob storage, staging, transcoding, registry TTL, and event delivery.

use std::env;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_MB: usize = 500;
const DEFAULT_REGISTRY_TTL_SECS: i64 = 600;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;
const DEFAULT_HLS_SEGMENT_DURATION: u64 = 6;
const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 30;

/// Blob storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Local,
}

/// Application configuration, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,

    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,

    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_public_base_url: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,

    pub staging_root: String,
    pub max_upload_bytes: usize,
    pub video_allowed_extensions: Vec<String>,

    pub ffmpeg_path: String,
    pub hls_segment_duration: u64,
    pub hls_variants: Vec<String>,

    pub registry_ttl_secs: i64,
    /// Interval for the background registry sweep. 0 = disabled.
    pub sweep_interval_secs: u64,

    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub webhook_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .to_lowercase()
            .as_str()
        {
            "s3" => StorageBackend::S3,
            "local" => StorageBackend::Local,
            other => {
                return Err(anyhow::anyhow!(
                    "STORAGE_BACKEND must be 's3' or 'local', got '{}'",
                    other
                ))
            }
        };

        let max_upload_mb = env::var("MAX_UPLOAD_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_MB.to_string())
            .parse::<usize>()
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB);

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| DEFAULT_CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_CONNECTION_TIMEOUT_SECS),
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok().or(env::var("AWS_REGION").ok()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            s3_public_base_url: env::var("S3_PUBLIC_BASE_URL").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            staging_root: env::var("STAGING_ROOT")
                .unwrap_or_else(|_| "/tmp/vodflow/staging".to_string()),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            video_allowed_extensions: env::var("VIDEO_ALLOWED_EXTENSIONS")
                .unwrap_or_else(|_| "mp4,mov,m4v,webm,mkv,avi".to_string())
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .collect(),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            hls_segment_duration: env::var("HLS_SEGMENT_DURATION")
                .unwrap_or_else(|_| DEFAULT_HLS_SEGMENT_DURATION.to_string())
                .parse()
                .unwrap_or(DEFAULT_HLS_SEGMENT_DURATION),
            hls_variants: env::var("HLS_VARIANTS")
                .unwrap_or_else(|_| "480p,720p".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            registry_ttl_secs: env::var("REGISTRY_TTL_SECS")
                .unwrap_or_else(|_| DEFAULT_REGISTRY_TTL_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_REGISTRY_TTL_SECS),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| DEFAULT_SWEEP_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
            webhook_url: env::var("WEBHOOK_URL").ok().filter(|s| !s.is_empty()),
            webhook_secret: env::var("WEBHOOK_SECRET").ok().filter(|s| !s.is_empty()),
            webhook_timeout_seconds: env::var("WEBHOOK_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| DEFAULT_WEBHOOK_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_WEBHOOK_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.registry_ttl_secs < 0 {
            return Err(anyhow::anyhow!("REGISTRY_TTL_SECS must not be negative"));
        }

        if self.video_allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "VIDEO_ALLOWED_EXTENSIONS must name at least one extension"
            ));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using the S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using the S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using the local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using the local storage backend"
                    ));
                }
            }
        }

        if self.webhook_url.is_some() && self.webhook_secret.is_none() {
            return Err(anyhow::anyhow!(
                "WEBHOOK_SECRET must be set when WEBHOOK_URL is configured"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 4000,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            database_url: "postgresql://localhost/vodflow".to_string(),
            db_max_connections: 20,
            db_timeout_seconds: 30,
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            s3_public_base_url: None,
            local_storage_path: Some("/tmp/vodflow/media".to_string()),
            local_storage_base_url: Some("http://localhost:4000/media".to_string()),
            staging_root: "/tmp/vodflow/staging".to_string(),
            max_upload_bytes: 500 * 1024 * 1024,
            video_allowed_extensions: vec!["mp4".to_string()],
            ffmpeg_path: "ffmpeg".to_string(),
            hls_segment_duration: 6,
            hls_variants: vec!["480p".to_string(), "720p".to_string()],
            registry_ttl_secs: 600,
            sweep_interval_secs: 300,
            webhook_url: None,
            webhook_secret: None,
            webhook_timeout_seconds: 30,
        }
    }

    #[test]
    fn test_validate_accepts_local_backend() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_s3_without_bucket() {
        let mut config = base_config();
        config.storage_backend = StorageBackend::S3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wildcard_cors_in_production() {
        let mut config = base_config();
        config.environment = "production".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_webhook_url_without_secret() {
        let mut config = base_config();
        config.webhook_url = Some("https://hooks.example.com/video".to_string());
        assert!(config.validate().is_err());

        config.webhook_secret = Some("s3cret".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_database_url() {
        let mut config = base_config();
        config.database_url = "mysql://localhost/vodflow".to_string();
        assert!(config.validate().is_err());
    }
}
