//! Builds the full [`ResultEnvelope`] from both directories.

use crate::aggregate::aggregate;
use crate::config::DirectoryArgs;
use crate::directory::{DirectoryClient, HttpDirectory};
use crate::error::Error;
use crate::record::ResultEnvelope;

/// One directory and the networks to take from it.
#[derive(Debug)]
pub struct Source<'a, C: ?Sized> {
    pub client: &'a C,
    pub filter: Option<&'a str>,
}

/// Aggregates mainnet and testnet concurrently.
///
/// # Errors
///
/// Returns the first directory error from either side.
pub async fn harvest<M, T>(
    mainnet: Source<'_, M>,
    testnet: Source<'_, T>,
) -> Result<ResultEnvelope, Error>
where
    M: DirectoryClient + ?Sized,
    T: DirectoryClient + ?Sized,
{
    let (mainnet, testnet) = tokio::try_join!(
        aggregate(mainnet.client, mainnet.filter),
        aggregate(testnet.client, testnet.filter),
    )?;
    Ok(ResultEnvelope { mainnet, testnet })
}

/// Harvests from the HTTP directories named in `args`.
///
/// # Errors
///
/// Returns an error if a client cannot be built or any fetch fails.
pub async fn harvest_directories(args: &DirectoryArgs) -> Result<ResultEnvelope, Error> {
    let mainnet = HttpDirectory::new(args.mainnet_directory.clone())?;
    let testnet = HttpDirectory::new(args.testnet_directory.clone())?;
    harvest(
        Source {
            client: &mainnet,
            filter: args.mainnet_networks.as_deref(),
        },
        Source {
            client: &testnet,
            filter: args.testnet_networks.as_deref(),
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::NetworkDescriptor;
    use crate::directory::descriptor::{Apis, AssetDefinition, DenomUnit, Endpoint, FeeConfig};

    struct StaticDirectory {
        prefix: &'static str,
        ids: &'static [&'static str],
    }

    #[async_trait::async_trait]
    impl DirectoryClient for StaticDirectory {
        async fn list_networks(&self) -> Result<Vec<String>, Error> {
            Ok(self.ids.iter().map(|id| (*id).to_owned()).collect())
        }

        async fn fetch_network(&self, id: &str) -> Result<NetworkDescriptor, Error> {
            if !self.ids.contains(&id) {
                return Err(Error::directory(format!("GET /{id}"), "404 Not Found"));
            }
            let endpoint = Endpoint {
                address: format!("https://{}.{id}", self.prefix),
            };
            Ok(NetworkDescriptor {
                name: id.to_owned(),
                chain_id: format!("{id}-{}", self.prefix),
                bech32_prefix: id.to_owned(),
                fees: Some(FeeConfig {
                    fee_tokens: Some(Vec::new()),
                }),
                apis: Apis {
                    rest: vec![endpoint.clone()],
                    rpc: vec![endpoint],
                },
                assets: Some(vec![AssetDefinition {
                    denom: format!("u{id}"),
                    denom_units: vec![DenomUnit {
                        denom: format!("u{id}"),
                        exponent: 0,
                    }],
                    ..AssetDefinition::default()
                }]),
                ..NetworkDescriptor::default()
            })
        }
    }

    const MAINNET: StaticDirectory = StaticDirectory {
        prefix: "main",
        ids: &["cosmoshub", "osmosis", "juno"],
    };
    const TESTNET: StaticDirectory = StaticDirectory {
        prefix: "test",
        ids: &["theta"],
    };

    #[tokio::test]
    async fn wraps_both_maps() {
        let envelope = harvest(
            Source {
                client: &MAINNET,
                filter: Some("cosmoshub,osmosis"),
            },
            Source {
                client: &TESTNET,
                filter: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(envelope.mainnet.len(), 2);
        assert!(envelope.mainnet.get("juno").is_none());
        assert_eq!(
            envelope.testnet.get("theta").map(|r| r.chain_id.as_str()),
            Some("theta-test")
        );
    }

    #[tokio::test]
    async fn either_side_failing_fails_the_harvest() {
        let result = harvest(
            Source {
                client: &MAINNET,
                filter: None,
            },
            Source {
                client: &TESTNET,
                filter: Some("theta,unknown"),
            },
        )
        .await;

        assert!(matches!(result, Err(Error::Directory(_))));
    }
}
