//! Run configuration and the `.env` template.
//!
//! - [`DirectoryArgs`]: which directories to read and which networks to
//!   keep; shared by `build` and `publish`.
//! - [`PublishArgs`] / [`PublishConfig`]: cloud credentials and targets.
//!   The raw arguments are validated once into a [`PublishConfig`], which is
//!   then passed by value to the publisher.
//! - [`generate_env_template`]: a commented `.env` listing every variable.
//!
//! Every option can come from the environment; a `.env` file in the working
//! directory is loaded first.

use std::fmt;

use clap::Args;
use url::Url;

use crate::directory::{MAINNET_DIRECTORY_URL, TESTNET_DIRECTORY_URL};
use crate::error::Error;

/// Directory endpoints and network filters.
#[derive(Debug, Clone, Args)]
pub struct DirectoryArgs {
    /// Production network directory.
    #[arg(long, env = "MAINNET_DIRECTORY_URL", default_value = MAINNET_DIRECTORY_URL)]
    pub mainnet_directory: Url,

    /// Test network directory.
    #[arg(long, env = "TESTNET_DIRECTORY_URL", default_value = TESTNET_DIRECTORY_URL)]
    pub testnet_directory: Url,

    /// Comma-separated mainnet identifiers to publish (default: all).
    #[arg(long, env = "MAINNET_NETWORKS")]
    pub mainnet_networks: Option<String>,

    /// Comma-separated testnet identifiers to publish (default: all).
    #[arg(long, env = "TESTNET_NETWORKS")]
    pub testnet_networks: Option<String>,
}

/// Cloud credentials and publication targets, as given.
#[derive(Clone, Default, Args)]
pub struct PublishArgs {
    /// AWS access key identifier.
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key_id: Option<String>,

    /// AWS secret access key.
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_access_key: Option<String>,

    /// AWS region of the bucket.
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// S3 bucket receiving the envelope.
    #[arg(long, env = "AWS_S3_BUCKET")]
    pub bucket: Option<String>,

    /// CloudFront distribution serving the bucket.
    #[arg(long, env = "AWS_CLOUDFRONT_DISTRIBUTION_ID")]
    pub distribution_id: Option<String>,
}

impl fmt::Debug for PublishArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishArgs")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("distribution_id", &self.distribution_id)
            .finish()
    }
}

/// A string that is never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// The wrapped value, for handing to the credential provider.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Validated publication settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    /// AWS access key identifier.
    pub access_key_id: String,
    /// AWS secret access key.
    pub secret_access_key: Secret,
    /// Region of the bucket and of the SDK clients.
    pub region: String,
    /// Bucket receiving the envelope.
    pub bucket: String,
    /// Distribution invalidated after upload.
    pub distribution_id: String,
}

impl TryFrom<PublishArgs> for PublishConfig {
    type Error = Error;

    /// Fails with every missing variable named at once.
    fn try_from(args: PublishArgs) -> Result<Self, Self::Error> {
        let mut missing = Vec::new();
        let mut require = |value: Option<String>, name: &'static str| {
            let value = value.filter(|v| !v.trim().is_empty());
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };

        let access_key_id = require(args.access_key_id, "AWS_ACCESS_KEY_ID");
        let secret_access_key = require(args.secret_access_key, "AWS_SECRET_ACCESS_KEY");
        let region = require(args.region, "AWS_REGION");
        let bucket = require(args.bucket, "AWS_S3_BUCKET");
        let distribution_id = require(args.distribution_id, "AWS_CLOUDFRONT_DISTRIBUTION_ID");

        if !missing.is_empty() {
            return Err(Error::config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }
        Ok(Self {
            access_key_id,
            secret_access_key: Secret(secret_access_key),
            region,
            bucket,
            distribution_id,
        })
    }
}

/// Generate a commented `.env` template.
#[must_use]
pub fn generate_env_template() -> String {
    format!(
        r"# directory-sync configuration
# Loaded from .env in the working directory; real environment variables win.

# ── Directories ──────────────────────────────────────────────────────
MAINNET_DIRECTORY_URL={MAINNET_DIRECTORY_URL}
TESTNET_DIRECTORY_URL={TESTNET_DIRECTORY_URL}

# Comma-separated network identifiers; leave empty to publish everything.
MAINNET_NETWORKS=
TESTNET_NETWORKS=

# ── Publication (required by `publish`) ─────────────────────────────
AWS_ACCESS_KEY_ID=
AWS_SECRET_ACCESS_KEY=
AWS_REGION=us-east-1
AWS_S3_BUCKET=
AWS_CLOUDFRONT_DISTRIBUTION_ID=

# ── Logging ──────────────────────────────────────────────────────────
# RUST_LOG=directory_sync=debug
"
    )
}
