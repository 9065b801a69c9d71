//! Network directory access.
//!
//! - [`DirectoryClient`]: the two calls the aggregator needs, enumerating
//!   network identifiers and fetching one descriptor.
//! - [`HttpDirectory`]: `reqwest` implementation against a
//!   cosmos.directory-style HTTP API.
//! - [`descriptor`]: wire types for the fetched descriptors.

pub mod descriptor;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

pub use descriptor::NetworkDescriptor;

use crate::error::Error;

/// Production directory endpoint.
pub const MAINNET_DIRECTORY_URL: &str = "https://chains.cosmos.directory";

/// Test-network directory endpoint.
pub const TESTNET_DIRECTORY_URL: &str = "https://chains.testcosmos.directory";

/// Source of network descriptors.
#[async_trait::async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Lists every network identifier the directory knows about.
    async fn list_networks(&self) -> Result<Vec<String>, Error>;

    /// Fetches the descriptor for a single network.
    async fn fetch_network(&self, id: &str) -> Result<NetworkDescriptor, Error>;
}

/// Directory client backed by the cosmos.directory HTTP API.
///
/// `GET <base>/` returns `{"chains": [{"path": ..}, ..]}` and
/// `GET <base>/<id>` returns `{"chain": <descriptor>}`.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: Client,
    base: Url,
}

#[derive(Deserialize)]
struct ListResponse {
    chains: Vec<ListedNetwork>,
}

#[derive(Deserialize)]
struct ListedNetwork {
    name: String,
    #[serde(default)]
    path: Option<String>,
}

#[derive(Deserialize)]
struct ChainResponse {
    chain: NetworkDescriptor,
}

impl HttpDirectory {
    /// Creates a client for the directory rooted at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Directory`] if the HTTP client cannot be built.
    pub fn new(base: Url) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::directory("failed to build HTTP client", e))?;
        Ok(Self::with_client(client, base))
    }

    /// Creates a client reusing an existing [`Client`].
    #[must_use]
    pub fn with_client(client: Client, mut base: Url) -> Self {
        // Url::join replaces the last segment unless the base ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    /// Directory root this client talks to.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// URL of one descriptor. The identifier must be a single path segment
    /// so that it cannot address anything outside the directory root.
    fn network_url(&self, id: &str) -> Result<Url, Error> {
        let single_segment = !matches!(id, "" | "." | "..")
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !single_segment {
            return Err(Error::directory(
                format!("invalid network identifier '{id}'"),
                "expected a single path segment",
            ));
        }
        self.base
            .join(id)
            .map_err(|e| Error::directory(format!("invalid network identifier '{id}'"), e))
    }

    async fn get_json<T>(&self, url: Url) -> Result<T, Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::directory(format!("GET {url}"), e))?;
        response
            .json::<T>()
            .await
            .map_err(|e| Error::directory(format!("decode {url}"), e))
    }
}

#[async_trait::async_trait]
impl DirectoryClient for HttpDirectory {
    #[tracing::instrument(skip(self), fields(directory = %self.base()))]
    async fn list_networks(&self) -> Result<Vec<String>, Error> {
        let listing: ListResponse = self.get_json(self.base.clone()).await?;
        let ids: Vec<String> = listing
            .chains
            .into_iter()
            .map(|network| network.path.unwrap_or(network.name))
            .collect();
        tracing::debug!(count = ids.len(), "enumerated networks");
        Ok(ids)
    }

    #[tracing::instrument(skip(self), fields(directory = %self.base()))]
    async fn fetch_network(&self, id: &str) -> Result<NetworkDescriptor, Error> {
        let url = self.network_url(id)?;
        let response: ChainResponse = self.get_json(url).await?;
        Ok(response.chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn directory(server: &MockServer) -> HttpDirectory {
        HttpDirectory::new(Url::parse(&server.uri()).unwrap()).unwrap()
    }

    #[test]
    fn base_gains_trailing_slash() {
        let client = HttpDirectory::with_client(
            Client::new(),
            Url::parse("https://example.com/registry").unwrap(),
        );
        assert_eq!(client.base().as_str(), "https://example.com/registry/");
        assert_eq!(
            client.base().join("osmosis").unwrap().as_str(),
            "https://example.com/registry/osmosis"
        );
    }

    #[tokio::test]
    async fn lists_paths_falling_back_to_names() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "repository": {"url": "https://github.com/cosmos/chain-registry"},
                "chains": [
                    {"name": "cosmoshub", "path": "cosmoshub"},
                    {"name": "osmosis"}
                ]
            })))
            .mount(&server)
            .await;

        let ids = directory(&server).await.list_networks().await.unwrap();
        assert_eq!(ids, vec!["cosmoshub".to_owned(), "osmosis".to_owned()]);
    }

    #[tokio::test]
    async fn fetches_chain_descriptor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/juno"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "chain": {
                    "name": "juno",
                    "path": "juno",
                    "pretty_name": "Juno",
                    "chain_id": "juno-1",
                    "bech32_prefix": "juno"
                }
            })))
            .mount(&server)
            .await;

        let descriptor = directory(&server).await.fetch_network("juno").await.unwrap();
        assert_eq!(descriptor.chain_id, "juno-1");
        assert_eq!(descriptor.display_name(), "Juno");
    }

    #[tokio::test]
    async fn identifiers_outside_the_directory_are_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"chain": {}})))
            .mount(&server)
            .await;
        let client = directory(&server).await;

        for id in ["https://other.host/x", "../secret", "a/b", "%2e%2e", "..", "", "juno?x=1"] {
            let err = client.fetch_network(id).await.unwrap_err();
            assert!(
                matches!(err, Error::Directory(ref msg) if msg.contains("single path segment")),
                "{id}: {err}"
            );
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn null_fields_still_decode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sparse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "chain": {
                    "name": "sparse",
                    "chain_id": "sparse-1",
                    "apis": {"rest": null, "rpc": [{"provider": "anon"}]},
                    "assets": [{"denom": "usparse", "denom_units": null}]
                }
            })))
            .mount(&server)
            .await;

        let descriptor = directory(&server).await.fetch_network("sparse").await.unwrap();
        assert_eq!(descriptor.chain_id, "sparse-1");
        assert!(descriptor.endpoints().is_none());
    }

    #[tokio::test]
    async fn error_status_is_a_directory_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = directory(&server)
            .await
            .fetch_network("missing")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Directory(ref msg) if msg.contains("/missing")));
    }
}
