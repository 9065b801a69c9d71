//! Descriptor to record transformation.
//!
//! [`transform`] never fails: a descriptor that cannot be published becomes
//! [`Outcome::Skipped`] with a [`SkipReason`] naming the network, and the
//! caller decides how to report it.
//!
//! # Field resolution
//!
//! | Field | Source, in fallback order |
//! |-------|---------------------------|
//! | `coinDenom` | last denom unit of the asset; raw fee-token denom |
//! | `coinMinimalDenom` | first denom unit of the asset; raw fee-token denom |
//! | `coinDecimals` | exponent of the last unit; asset `decimals`; `0` |
//! | `coinGeckoId` | asset `coingecko_id`; `""` for fee currencies |
//! | `gasPriceStep` | all three gas prices as numbers; omitted |
//! | `bip44.coinType` | `slip44`; `0` |

use thiserror::Error;

use crate::directory::descriptor::{AssetDefinition, FeeTokenDefinition, NetworkDescriptor};
use crate::record::{Bech32Config, Bip44, Currency, FeeCurrency, GasPriceStep, NormalizedRecord};

/// Result of transforming one descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The network is publishable under `id`.
    Record {
        /// Network identifier the record is keyed by.
        id: String,
        /// The publishable record.
        record: Box<NormalizedRecord>,
    },
    /// The network was left out of the output.
    Skipped(SkipReason),
}

/// Why a network was left out of the output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// No usable REST address or no usable RPC address.
    #[error("{network}: no REST/RPC endpoints")]
    NoEndpoints {
        /// Display name of the network.
        network: String,
    },

    /// The asset list is absent or empty.
    #[error("{network}: no assets")]
    NoAssets {
        /// Display name of the network.
        network: String,
    },

    /// An asset lists no denomination units, so it has no currency.
    #[error("{network}: asset '{asset}' has no denom units")]
    NoDenomUnits {
        /// Display name of the network.
        network: String,
        /// Base denomination of the offending asset.
        asset: String,
    },

    /// The descriptor carries no fee-token list.
    #[error("{network}: no fee currencies")]
    NoFeeCurrencies {
        /// Display name of the network.
        network: String,
    },
}

/// Transforms one descriptor into a publishable record, or the reason it is
/// not publishable.
#[must_use]
pub fn transform(descriptor: &NetworkDescriptor) -> Outcome {
    match build_record(descriptor) {
        Ok(record) => Outcome::Record {
            id: descriptor.network_id().to_owned(),
            record: Box::new(record),
        },
        Err(reason) => Outcome::Skipped(reason),
    }
}

fn build_record(descriptor: &NetworkDescriptor) -> Result<NormalizedRecord, SkipReason> {
    let network = || descriptor.display_name().to_owned();

    let (rest, rpc) = descriptor
        .endpoints()
        .ok_or_else(|| SkipReason::NoEndpoints { network: network() })?;

    let assets = match descriptor.assets.as_deref() {
        Some(assets) if !assets.is_empty() => assets,
        _ => return Err(SkipReason::NoAssets { network: network() }),
    };

    let currencies = assets
        .iter()
        .map(|asset| {
            asset_currency(asset).ok_or_else(|| SkipReason::NoDenomUnits {
                network: network(),
                asset: asset.denom.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let stake_currency = currencies[0].clone();

    let fee_tokens = descriptor
        .fee_tokens()
        .ok_or_else(|| SkipReason::NoFeeCurrencies { network: network() })?;
    let fee_currencies = fee_tokens
        .iter()
        .map(|token| fee_currency(token, assets))
        .collect();

    Ok(NormalizedRecord {
        chain_id: descriptor.chain_id.clone(),
        currencies,
        rest: rest.to_owned(),
        rpc: rpc.to_owned(),
        bech32_config: Bech32Config::from_prefix(&descriptor.bech32_prefix),
        chain_name: descriptor.display_name().to_owned(),
        fee_currencies,
        stake_currency,
        bip44: Bip44 {
            coin_type: descriptor.slip44.unwrap_or(0),
        },
    })
}

/// Currency for an asset: display unit is the last denom unit, minimal unit
/// the first. `None` when the asset lists no units.
fn asset_currency(asset: &AssetDefinition) -> Option<Currency> {
    let first = asset.denom_units.first()?;
    let last = asset.denom_units.last()?;
    Some(Currency {
        coin_denom: last.denom.clone(),
        coin_minimal_denom: first.denom.clone(),
        coin_decimals: last.exponent,
        coin_gecko_id: asset.coingecko_id.clone(),
    })
}

/// Fee currency for a token, resolved against the asset of the same denom.
fn fee_currency(token: &FeeTokenDefinition, assets: &[AssetDefinition]) -> FeeCurrency {
    let asset = assets.iter().find(|asset| asset.denom == token.denom);
    let resolved = asset.and_then(asset_currency);

    let currency = Currency {
        coin_denom: resolved
            .as_ref()
            .map_or_else(|| token.denom.clone(), |c| c.coin_denom.clone()),
        coin_minimal_denom: resolved
            .as_ref()
            .map_or_else(|| token.denom.clone(), |c| c.coin_minimal_denom.clone()),
        coin_decimals: resolved
            .as_ref()
            .map(|c| c.coin_decimals)
            .or_else(|| asset.and_then(|a| a.decimals))
            .unwrap_or(0),
        coin_gecko_id: Some(
            asset
                .and_then(|a| a.coingecko_id.clone())
                .unwrap_or_default(),
        ),
    };

    FeeCurrency {
        currency,
        gas_price_step: gas_price_step(token),
    }
}

/// Gas price schedule, present only when all three points are numeric.
fn gas_price_step(token: &FeeTokenDefinition) -> Option<GasPriceStep> {
    Some(GasPriceStep {
        low: token.low_gas_price.as_ref()?.to_f64()?,
        average: token.average_gas_price.as_ref()?.to_f64()?,
        high: token.high_gas_price.as_ref()?.to_f64()?,
    })
}
