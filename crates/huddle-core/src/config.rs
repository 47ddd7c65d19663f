//! Configuration module
//!
//! Environment-driven configuration for the photo services: metadata store
//! connection, blob storage backend, and the pipeline's size/quality bounds.

use std::env;

use crate::constants::{
    DEFAULT_PHOTO_BUCKET, JPEG_QUALITY, MAX_FILE_SIZE_BYTES, MAX_PHOTO_DIMENSION,
};
use crate::storage_types::StorageBackend;

const MAX_CONNECTIONS: u32 = 5;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_FILE_SIZE_CEILING_MB: usize = 100;

/// Bounds applied by the photo pipeline to every entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhotoSettings {
    /// Source files larger than this are rejected before decoding.
    pub max_file_size_bytes: usize,
    /// Longest side of the recompressed image.
    pub max_dimension: u32,
    /// JPEG quality on the 1-100 scale.
    pub jpeg_quality: u8,
}

impl Default for PhotoSettings {
    fn default() -> Self {
        Self {
            max_file_size_bytes: MAX_FILE_SIZE_BYTES,
            max_dimension: MAX_PHOTO_DIMENSION,
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

/// Settings shared by every binary.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
}

/// Photo service configuration
#[derive(Clone, Debug)]
pub struct PhotoServiceConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub photo_bucket: String,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, Supabase, etc.)
    pub aws_region: Option<String>,
    pub public_base_url: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Pipeline bounds
    pub photos: PhotoSettings,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<PhotoServiceConfig>);

impl Config {
    fn inner(&self) -> &PhotoServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = PhotoServiceConfig::from_lookup(|name| env::var(name).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn database_url(&self) -> Option<&str> {
        self.inner().base.database_url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.inner().storage_backend
    }

    pub fn photo_bucket(&self) -> &str {
        &self.inner().photo_bucket
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn public_base_url(&self) -> Option<&str> {
        self.inner().public_base_url.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn photo_settings(&self) -> PhotoSettings {
        self.inner().photos
    }
}

impl PhotoServiceConfig {
    /// Build the configuration from a variable lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PhotoSettings::default();

        let storage_backend = lookup("STORAGE_BACKEND")
            .map(|s| s.parse::<StorageBackend>())
            .transpose()?;

        let max_file_size_mb = lookup("MAX_FILE_SIZE_MB")
            .map(|s| {
                s.trim()
                    .parse::<usize>()
                    .map_err(|_| anyhow::anyhow!("MAX_FILE_SIZE_MB must be a valid number"))
            })
            .transpose()?;

        let max_dimension = lookup("MAX_PHOTO_DIMENSION")
            .map(|s| {
                s.trim()
                    .parse::<u32>()
                    .map_err(|_| anyhow::anyhow!("MAX_PHOTO_DIMENSION must be a valid number"))
            })
            .transpose()?
            .unwrap_or(defaults.max_dimension);

        let jpeg_quality = lookup("JPEG_QUALITY")
            .map(|s| {
                s.trim()
                    .parse::<u8>()
                    .map_err(|_| anyhow::anyhow!("JPEG_QUALITY must be a number between 1 and 100"))
            })
            .transpose()?
            .unwrap_or(defaults.jpeg_quality);

        let max_file_size_bytes = match max_file_size_mb {
            Some(mb) => mb.checked_mul(1024 * 1024).ok_or_else(|| {
                anyhow::anyhow!("MAX_FILE_SIZE_MB is too large: {}", mb)
            })?,
            None => defaults.max_file_size_bytes,
        };

        let base = BaseConfig {
            database_url: lookup("DATABASE_URL"),
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
        };

        Ok(PhotoServiceConfig {
            base,
            storage_backend,
            photo_bucket: lookup("PHOTO_BUCKET").unwrap_or_else(|| DEFAULT_PHOTO_BUCKET.to_string()),
            s3_region: lookup("S3_REGION"),
            s3_endpoint: lookup("S3_ENDPOINT"),
            aws_region: lookup("AWS_REGION"),
            public_base_url: lookup("PUBLIC_BASE_URL"),
            local_storage_path: lookup("LOCAL_STORAGE_PATH"),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL"),
            photos: PhotoSettings {
                max_file_size_bytes,
                max_dimension,
                jpeg_quality,
            },
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if let Some(url) = &self.base.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        if self.photos.max_file_size_bytes == 0
            || self.photos.max_file_size_bytes > MAX_FILE_SIZE_CEILING_MB * 1024 * 1024
        {
            return Err(anyhow::anyhow!(
                "MAX_FILE_SIZE_MB must be between 1 and {}",
                MAX_FILE_SIZE_CEILING_MB
            ));
        }

        if self.photos.max_dimension == 0 {
            return Err(anyhow::anyhow!("MAX_PHOTO_DIMENSION must be greater than 0"));
        }

        if !(1..=100).contains(&self.photos.jpeg_quality) {
            return Err(anyhow::anyhow!("JPEG_QUALITY must be between 1 and 100"));
        }

        if self.photo_bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("PHOTO_BUCKET must not be empty"));
        }

        let backend = self.storage_backend.unwrap_or(StorageBackend::S3);
        match backend {
            StorageBackend::S3 => {
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
