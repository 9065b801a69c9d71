//! `directory-sync publish` command — harvest, upload, invalidate.
//!
//! Configuration is validated before any network activity, and nothing is
//! uploaded unless both directories were harvested completely.

use crate::config::{DirectoryArgs, PublishArgs, PublishConfig};
use crate::error::Error;
use crate::harvest::harvest_directories;
use crate::publish::{CloudFrontInvalidator, S3Store, load_sdk_config, publish};

/// Execute the `publish` command.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or any step fails.
pub async fn run(directories: &DirectoryArgs, target: PublishArgs) -> Result<(), Error> {
    let config = PublishConfig::try_from(target)?;

    let envelope = harvest_directories(directories).await?;
    tracing::info!(
        mainnet = envelope.mainnet.len(),
        testnet = envelope.testnet.len(),
        "harvest complete"
    );

    let sdk = load_sdk_config(&config).await;
    let store = S3Store::new(&sdk, config.bucket);
    let cdn = CloudFrontInvalidator::new(&sdk, config.distribution_id);
    publish(&envelope, &store, &cdn).await
}
