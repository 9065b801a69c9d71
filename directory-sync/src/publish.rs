//! Upload of the envelope and edge-cache invalidation.
//!
//! [`publish`] serializes the [`ResultEnvelope`], writes it through a
//! [`BlobStore`], and only after the store acknowledges the write asks the
//! [`CdnInvalidator`] to drop cached copies. The AWS implementations are
//! [`S3Store`] and [`CloudFrontInvalidator`].

use std::time::{SystemTime, UNIX_EPOCH};

use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;

use crate::config::PublishConfig;
use crate::error::Error;
use crate::record::ResultEnvelope;

/// Object key of the published document.
pub const OBJECT_KEY: &str = "cosmos-directory-cache/graz-chains.json";

/// Edge-cache path invalidated after each upload.
pub const INVALIDATION_PATH: &str = "/cosmos-directory-cache/*";

const CONTENT_TYPE: &str = "application/json";

/// Single-object store with public-read uploads.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads `body` under `key`, overwriting any existing object.
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), Error>;
}

/// Edge cache in front of the blob store.
#[async_trait::async_trait]
pub trait CdnInvalidator: Send + Sync {
    /// Requests invalidation of the given path patterns.
    async fn invalidate(&self, paths: &[&str]) -> Result<(), Error>;
}

/// Serializes, uploads and invalidates, strictly in that order.
///
/// # Errors
///
/// Returns the first failure; invalidation is not attempted if the upload
/// fails.
#[tracing::instrument(skip_all)]
pub async fn publish<S, C>(envelope: &ResultEnvelope, store: &S, cdn: &C) -> Result<(), Error>
where
    S: BlobStore + ?Sized,
    C: CdnInvalidator + ?Sized,
{
    let body = envelope.to_json()?;
    let size = body.len();
    store.put_object(OBJECT_KEY, body, CONTENT_TYPE).await?;
    tracing::info!(key = OBJECT_KEY, bytes = size, "uploaded envelope");

    cdn.invalidate(&[INVALIDATION_PATH]).await?;
    tracing::info!(path = INVALIDATION_PATH, "requested cache invalidation");
    Ok(())
}

/// Loads the shared AWS configuration from explicit credentials.
pub async fn load_sdk_config(config: &PublishConfig) -> aws_config::SdkConfig {
    let credentials = aws_sdk_s3::config::Credentials::new(
        config.access_key_id.clone(),
        config.secret_access_key.expose().to_owned(),
        None,
        None,
        "directory-sync",
    );
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()))
        .credentials_provider(credentials)
        .load()
        .await
}

/// [`BlobStore`] backed by an S3 bucket.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    #[must_use]
    pub fn new(sdk: &aws_config::SdkConfig, bucket: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(sdk),
            bucket: bucket.into(),
        }
    }
}

#[async_trait::async_trait]
impl BlobStore for S3Store {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), Error> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| {
                Error::Upload(format!("s3://{}/{key}: {}", self.bucket, DisplayErrorContext(&e)))
            })?;
        Ok(())
    }
}

/// [`CdnInvalidator`] backed by a CloudFront distribution.
#[derive(Debug, Clone)]
pub struct CloudFrontInvalidator {
    client: aws_sdk_cloudfront::Client,
    distribution_id: String,
}

impl CloudFrontInvalidator {
    #[must_use]
    pub fn new(sdk: &aws_config::SdkConfig, distribution_id: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_cloudfront::Client::new(sdk),
            distribution_id: distribution_id.into(),
        }
    }
}

/// Caller reference for an invalidation; must differ between calls.
fn caller_reference() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    now.as_millis().to_string()
}

#[async_trait::async_trait]
impl CdnInvalidator for CloudFrontInvalidator {
    async fn invalidate(&self, paths: &[&str]) -> Result<(), Error> {
        let quantity = i32::try_from(paths.len())
            .map_err(|_| Error::Invalidate(format!("too many paths: {}", paths.len())))?;
        let paths = paths
            .iter()
            .fold(Paths::builder().quantity(quantity), |builder, path| {
                builder.items(*path)
            })
            .build()
            .map_err(|e| Error::Invalidate(e.to_string()))?;
        let batch = InvalidationBatch::builder()
            .paths(paths)
            .caller_reference(caller_reference())
            .build()
            .map_err(|e| Error::Invalidate(e.to_string()))?;

        let output = self
            .client
            .create_invalidation()
            .distribution_id(&self.distribution_id)
            .invalidation_batch(batch)
            .send()
            .await
            .map_err(|e| {
                Error::Invalidate(format!(
                    "distribution {}: {}",
                    self.distribution_id,
                    aws_sdk_cloudfront::error::DisplayErrorContext(&e)
                ))
            })?;
        if let Some(invalidation) = output.invalidation() {
            tracing::debug!(
                id = invalidation.id(),
                status = invalidation.status(),
                "invalidation created"
            );
        }
        Ok(())
    }
}
