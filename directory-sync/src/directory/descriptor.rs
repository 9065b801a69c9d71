//! Wire types returned by the network directory.
//!
//! Only the fields the pipeline reads are modelled; everything else in the
//! directory payload is ignored. Absent and `null` fields both default to
//! empty so that a sparse descriptor still deserializes and is judged by the
//! pipeline instead of failing the fetch.

use serde::{Deserialize, Deserializer};

/// Treats an explicit `null` like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw metadata for one network.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkDescriptor {
    /// Registry name of the network.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Directory path; the identifier used to fetch this descriptor.
    #[serde(default)]
    pub path: Option<String>,
    /// Chain registry name.
    #[serde(default)]
    pub chain_name: Option<String>,
    /// Display name, preferred over every other name.
    #[serde(default)]
    pub pretty_name: Option<String>,
    /// Chain id used when signing.
    #[serde(default, deserialize_with = "null_as_default")]
    pub chain_id: String,
    /// Account address prefix.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bech32_prefix: String,
    /// SLIP-44 coin type.
    #[serde(default)]
    pub slip44: Option<u32>,
    /// Fee section; absent on some registry entries.
    #[serde(default)]
    pub fees: Option<FeeConfig>,
    /// Public endpoints.
    #[serde(default, deserialize_with = "null_as_default")]
    pub apis: Apis,
    /// Known currencies; the first one is the staking currency.
    #[serde(default)]
    pub assets: Option<Vec<AssetDefinition>>,
}

impl NetworkDescriptor {
    /// First usable REST and RPC addresses, or `None` if either is missing.
    #[must_use]
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        fn usable(endpoints: &[Endpoint]) -> Option<&str> {
            endpoints
                .iter()
                .map(|endpoint| endpoint.address.trim())
                .find(|address| !address.is_empty())
        }
        Some((usable(&self.apis.rest)?, usable(&self.apis.rpc)?))
    }

    /// Identifier this network is published under.
    #[must_use]
    pub fn network_id(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }

    /// Human-readable name, used in record output and skip warnings.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.pretty_name
            .as_deref()
            .or(self.chain_name.as_deref())
            .unwrap_or(&self.name)
    }

    /// Fee tokens, or `None` when the descriptor carries no fee-token list.
    #[must_use]
    pub fn fee_tokens(&self) -> Option<&[FeeTokenDefinition]> {
        self.fees.as_ref()?.fee_tokens.as_deref()
    }
}

/// Public API endpoints grouped by protocol.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Apis {
    /// REST (LCD) endpoints, preferred first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rest: Vec<Endpoint>,
    /// Tendermint RPC endpoints, preferred first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rpc: Vec<Endpoint>,
}

/// One public endpoint. An empty address means the entry is unusable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Endpoint {
    /// Endpoint URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
}

/// Fee section of a descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeeConfig {
    /// Tokens accepted for fees.
    #[serde(default)]
    pub fee_tokens: Option<Vec<FeeTokenDefinition>>,
}

/// A fee token, referencing an asset by its base denomination.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeeTokenDefinition {
    /// Base denomination of the token.
    #[serde(default, deserialize_with = "null_as_default")]
    pub denom: String,
    /// Slow gas price.
    #[serde(default)]
    pub low_gas_price: Option<GasPrice>,
    /// Typical gas price.
    #[serde(default)]
    pub average_gas_price: Option<GasPrice>,
    /// Fast gas price.
    #[serde(default)]
    pub high_gas_price: Option<GasPrice>,
}

/// Gas price as published; registries mix JSON numbers and numeric strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GasPrice {
    /// A JSON number.
    Number(f64),
    /// A JSON string, parsed on use.
    Text(String),
}

impl GasPrice {
    /// Numeric value, or `None` if the text form does not parse.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// A currency known to the network.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetDefinition {
    /// Base denomination; fee tokens reference assets by this name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub denom: String,
    /// Units ordered from the base unit to the display unit.
    #[serde(default, deserialize_with = "null_as_default")]
    pub denom_units: Vec<DenomUnit>,
    /// CoinGecko price-index id.
    #[serde(default)]
    pub coingecko_id: Option<String>,
    /// Display exponent as stated by the directory.
    #[serde(default)]
    pub decimals: Option<u32>,
}

/// A named representation of an asset at a given decimal exponent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DenomUnit {
    /// Unit name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub denom: String,
    /// Decimal exponent relative to the base unit.
    #[serde(default, deserialize_with = "null_as_default")]
    pub exponent: u32,
}
