use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    public_base_url: Option<String>,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `public_base_url` - Optional prefix for public URLs when objects are served
    ///   from somewhere other than the endpoint (CDN, storage gateway)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
            public_base_url,
        })
    }

    /// Generate public URL for S3 object
    ///
    /// Precedence: explicit public base URL, then the custom endpoint (path-style
    /// `{endpoint}/{bucket}/{key}`), then the standard AWS virtual-hosted form.
    fn generate_url(&self, key: &str) -> String {
        if let Some(ref base) = self.public_base_url {
            format!("{}/{}", base.trim_end_matches('/'), key)
        } else if let Some(ref endpoint) = self.endpoint_url {
            format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }
}

/// Objects carry their media type so the public URL serves them inline.
fn put_options(content_type: &str) -> PutOptions {
    PutOptions {
        attributes: Attributes::from_iter([(Attribute::ContentType, content_type.to_string())]),
        ..Default::default()
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put(&self, storage_key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()> {
        validate_key(storage_key)?;
        let size = data.len() as u64;
        let location = Path::from(storage_key.to_string());
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(
                &location,
                PutPayload::from(Bytes::from(data)),
                put_options(content_type),
            )
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 put failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 put successful"
        );

        Ok(())
    }

    fn public_url(&self, storage_key: &str) -> String {
        self.generate_url(storage_key)
    }

    async fn remove(&self, storage_keys: &[String]) -> StorageResult<()> {
        for storage_key in storage_keys {
            validate_key(storage_key)?;
            let start = std::time::Instant::now();
            let location = Path::from(storage_key.to_string());

            let result: ObjectResult<_> = self.store.delete(&location).await;

            match result {
                Ok(_) | Err(ObjectStoreError::NotFound { .. }) => {}
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        key = %storage_key,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "S3 delete failed"
                    );
                    return Err(StorageError::DeleteFailed(e.to_string()));
                }
            }

            tracing::info!(
                bucket = %self.bucket,
                key = %storage_key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete successful"
            );
        }

        Ok(())
    }
}

#[cfg(all(test, feature = "storage-s3"))]
mod tests {
    use super::*;
    use crate::keys::storage_key_from_url;

    async fn storage(endpoint: Option<&str>, public_base: Option<&str>) -> S3Storage {
        S3Storage::new(
            "meeting-photos".to_string(),
            "eu-west-1".to_string(),
            endpoint.map(String::from),
            public_base.map(String::from),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_aws_public_url() {
        let s3 = storage(None, None).await;
        assert_eq!(
            s3.public_url("m/1.jpg"),
            "https://meeting-photos.s3.eu-west-1.amazonaws.com/m/1.jpg"
        );
    }

    #[tokio::test]
    async fn test_endpoint_public_url_is_path_style() {
        let s3 = storage(Some("http://localhost:9000/"), None).await;
        assert_eq!(
            s3.public_url("m/1.jpg"),
            "http://localhost:9000/meeting-photos/m/1.jpg"
        );
    }

    #[tokio::test]
    async fn test_public_base_url_wins_and_keeps_key_suffix() {
        let s3 = storage(
            Some("http://localhost:9000"),
            Some("https://abc.supabase.co/storage/v1/object/public/meeting-photos"),
        )
        .await;
        let url = s3.public_url("m/1.jpg");
        assert!(url.starts_with("https://abc.supabase.co/"));
        assert_eq!(storage_key_from_url(&url).as_deref(), Some("m/1.jpg"));
    }

    #[test]
    fn test_put_options_carry_content_type() {
        let opts = put_options("image/jpeg");
        let value = opts
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| AsRef::<str>::as_ref(v).to_string());
        assert_eq!(value.as_deref(), Some("image/jpeg"));
        assert_eq!(opts.attributes.len(), 1);
    }
}
