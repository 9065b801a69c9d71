//! Bounded fan-out over a directory.
//!
//! [`aggregate`] resolves the target network identifiers, fetches their
//! descriptors with at most [`FETCH_CONCURRENCY`] requests in flight, and
//! merges every publishable record into a [`NetworkMap`] in completion order.
//! Skipped networks are logged once each. A failed fetch aborts the batch.

use futures::{StreamExt, TryStreamExt, stream};

use crate::directory::DirectoryClient;
use crate::error::Error;
use crate::pipeline::{Outcome, transform};
use crate::record::NetworkMap;

/// Maximum concurrent descriptor fetches per directory.
pub const FETCH_CONCURRENCY: usize = 4;

/// Splits a comma-separated filter into identifiers.
///
/// Returns `None` when the filter is absent or names nothing, meaning the
/// whole directory should be enumerated. Duplicates are dropped.
#[must_use]
pub fn parse_filter(filter: Option<&str>) -> Option<Vec<String>> {
    let mut ids: Vec<String> = Vec::new();
    for id in filter?.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        if !ids.iter().any(|known| known == id) {
            ids.push(id.to_owned());
        }
    }
    (!ids.is_empty()).then_some(ids)
}

/// Builds the record map for one directory.
///
/// # Errors
///
/// Returns [`Error::Directory`] if enumeration or any descriptor fetch fails.
#[tracing::instrument(skip(client))]
pub async fn aggregate<C>(client: &C, filter: Option<&str>) -> Result<NetworkMap, Error>
where
    C: DirectoryClient + ?Sized,
{
    let ids = match parse_filter(filter) {
        Some(ids) => ids,
        None => client.list_networks().await?,
    };
    tracing::info!(count = ids.len(), "fetching network descriptors");

    let mut descriptors = stream::iter(ids)
        .map(|id| async move { client.fetch_network(&id).await })
        .buffer_unordered(FETCH_CONCURRENCY);

    let mut networks = NetworkMap::new();
    let mut skipped = 0_usize;
    while let Some(descriptor) = descriptors.try_next().await? {
        match transform(&descriptor) {
            Outcome::Record { id, record } => networks.insert(id, *record),
            Outcome::Skipped(reason) => {
                skipped += 1;
                tracing::warn!(network = descriptor.network_id(), "skipping {reason}");
            }
        }
    }

    tracing::info!(published = networks.len(), skipped, "aggregated networks");
    tracing::debug!(networks = ?networks.ids().collect::<Vec<_>>());
    Ok(networks)
}
