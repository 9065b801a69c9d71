//! Published record types.
//!
//! [`NormalizedRecord`] is the wallet-facing chain description emitted for
//! each surviving network; [`ResultEnvelope`] is the document uploaded to the
//! blob store. Both serialize in camelCase.

use serde::Serialize;
use std::ops::Deref;

/// A currency as consumed by wallets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    /// Display denomination, e.g. `atom`.
    pub coin_denom: String,
    /// Base denomination used on chain, e.g. `uatom`.
    pub coin_minimal_denom: String,
    /// Exponent between the two denominations.
    pub coin_decimals: u32,
    /// CoinGecko price-index id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin_gecko_id: Option<String>,
}

/// Three-point gas price schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GasPriceStep {
    /// Price per gas unit for a slow transaction.
    pub low: f64,
    /// Price per gas unit for a typical transaction.
    pub average: f64,
    /// Price per gas unit for a fast transaction.
    pub high: f64,
}

/// A currency accepted for fees.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeCurrency {
    /// The currency itself, flattened into the fee entry.
    #[serde(flatten)]
    pub currency: Currency,
    /// Suggested gas prices, when the directory publishes all three.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price_step: Option<GasPriceStep>,
}

/// Address prefixes for every bech32 address kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bech32Config {
    /// Account address prefix.
    pub bech32_prefix_acc_addr: String,
    /// Account public key prefix.
    pub bech32_prefix_acc_pub: String,
    /// Validator operator address prefix.
    pub bech32_prefix_val_addr: String,
    /// Validator operator public key prefix.
    pub bech32_prefix_val_pub: String,
    /// Consensus node address prefix.
    pub bech32_prefix_cons_addr: String,
    /// Consensus node public key prefix.
    pub bech32_prefix_cons_pub: String,
}

impl Bech32Config {
    /// Standard Cosmos SDK derivation: one prefix with the conventional
    /// `pub`, `valoper` and `valcons` suffixes.
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            bech32_prefix_acc_addr: prefix.to_owned(),
            bech32_prefix_acc_pub: format!("{prefix}pub"),
            bech32_prefix_val_addr: format!("{prefix}valoper"),
            bech32_prefix_val_pub: format!("{prefix}valoperpub"),
            bech32_prefix_cons_addr: format!("{prefix}valcons"),
            bech32_prefix_cons_pub: format!("{prefix}valconspub"),
        }
    }
}

/// BIP-44 wrapper around the coin type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bip44 {
    /// SLIP-44 coin type.
    pub coin_type: u32,
}

/// Normalized description of one network.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    /// Chain id used when signing.
    pub chain_id: String,
    /// One currency per asset, in asset order.
    pub currencies: Vec<Currency>,
    /// REST (LCD) endpoint.
    pub rest: String,
    /// Tendermint RPC endpoint.
    pub rpc: String,
    /// Address prefixes.
    pub bech32_config: Bech32Config,
    /// Human-readable network name.
    pub chain_name: String,
    /// Currencies accepted for fees.
    pub fee_currencies: Vec<FeeCurrency>,
    /// Staking currency; the first entry of `currencies`.
    pub stake_currency: Currency,
    /// Key derivation settings.
    pub bip44: Bip44,
}

/// Records keyed by network identifier, in insertion order.
///
/// Serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkMap(Vec<(String, NormalizedRecord)>);

impl NetworkMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Inserts a record, replacing any earlier record under the same key in
    /// place.
    pub fn insert(&mut self, id: String, record: NormalizedRecord) {
        if let Some(slot) = self.0.iter_mut().find(|(key, _)| *key == id) {
            slot.1 = record;
        } else {
            self.0.push((id, record));
        }
    }

    /// Looks up a record by network identifier.
    #[cfg(test)]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&NormalizedRecord> {
        self.0.iter().find(|(key, _)| key == id).map(|(_, record)| record)
    }

    /// Network identifiers in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }
}

impl Deref for NetworkMap {
    type Target = [(String, NormalizedRecord)];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for NetworkMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, record) in &self.0 {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

/// The published document: one map per network class.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultEnvelope {
    /// Production networks.
    pub mainnet: NetworkMap,
    /// Test networks.
    pub testnet: NetworkMap,
}

impl ResultEnvelope {
    /// Serializes the envelope as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(chain_id: &str) -> NormalizedRecord {
        let atom = Currency {
            coin_denom: "atom".into(),
            coin_minimal_denom: "uatom".into(),
            coin_decimals: 6,
            coin_gecko_id: None,
        };
        NormalizedRecord {
            chain_id: chain_id.into(),
            currencies: vec![atom.clone()],
            rest: "https://rest.example".into(),
            rpc: "https://rpc.example".into(),
            bech32_config: Bech32Config::from_prefix("cosmos"),
            chain_name: "Cosmos Hub".into(),
            fee_currencies: vec![FeeCurrency {
                currency: atom.clone(),
                gas_price_step: Some(GasPriceStep {
                    low: 0.01,
                    average: 0.025,
                    high: 0.04,
                }),
            }],
            stake_currency: atom,
            bip44: Bip44 { coin_type: 118 },
        }
    }

    #[test]
    fn bech32_config_uses_standard_suffixes() {
        let config = Bech32Config::from_prefix("osmo");
        assert_eq!(config.bech32_prefix_acc_addr, "osmo");
        assert_eq!(config.bech32_prefix_acc_pub, "osmopub");
        assert_eq!(config.bech32_prefix_val_addr, "osmovaloper");
        assert_eq!(config.bech32_prefix_val_pub, "osmovaloperpub");
        assert_eq!(config.bech32_prefix_cons_addr, "osmovalcons");
        assert_eq!(config.bech32_prefix_cons_pub, "osmovalconspub");
    }

    #[test]
    fn record_serializes_in_wallet_shape() {
        let value = serde_json::to_value(record("cosmoshub-4")).unwrap();
        assert_eq!(value["chainId"], "cosmoshub-4");
        assert_eq!(value["bip44"], json!({"coinType": 118}));
        assert_eq!(value["bech32Config"]["bech32PrefixValAddr"], "cosmosvaloper");
        assert_eq!(
            value["stakeCurrency"],
            json!({"coinDenom": "atom", "coinMinimalDenom": "uatom", "coinDecimals": 6})
        );
        assert_eq!(
            value["feeCurrencies"][0]["gasPriceStep"],
            json!({"low": 0.01, "average": 0.025, "high": 0.04})
        );
        assert_eq!(value["feeCurrencies"][0]["coinDenom"], "atom");
    }

    #[test]
    fn envelope_keeps_insertion_order() {
        let mut mainnet = NetworkMap::new();
        mainnet.insert("osmosis".into(), record("osmosis-1"));
        mainnet.insert("cosmoshub".into(), record("cosmoshub-4"));
        mainnet.insert("osmosis".into(), record("osmosis-2"));
        let envelope = ResultEnvelope {
            mainnet,
            testnet: NetworkMap::new(),
        };

        let text = String::from_utf8(envelope.to_json().unwrap()).unwrap();
        assert!(text.starts_with(r#"{"mainnet":{"osmosis":{"chainId":"osmosis-2""#));
        assert!(text.find("\"osmosis\"").unwrap() < text.find("\"cosmoshub\"").unwrap());
        assert!(text.ends_with(r#""testnet":{}}"#));
        assert_eq!(envelope.mainnet.len(), 2);
    }
}
