//! Configuration of the attestation engine.

use serde::{Deserialize, Serialize};

use crate::{BridgeError, Result, coin::validate_denom, constants};

/// Which metadata field an ERC20's `symbol` is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolSource {
    /// Compare against `Metadata::display` (deployed behaviour).
    #[default]
    Display,
    /// Compare against `Metadata::symbol`.
    Symbol,
}

/// Rules applied when an ERC20 deployment is matched to host metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetadataPolicy {
    #[serde(default)]
    pub symbol_source: SymbolSource,
}

/// Bridge configuration shared by every replica.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Module holding that escrows host-native coins bridged to Ethereum.
    pub escrow_account: String,
    /// Module holding that mints vouchers for Ethereum-originated tokens.
    pub issuance_account: String,
    /// Prefix of synthesized voucher denoms.
    pub voucher_prefix: String,
    pub metadata: MetadataPolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            escrow_account: constants::DEFAULT_ESCROW_ACCOUNT.to_string(),
            issuance_account: constants::DEFAULT_ISSUANCE_ACCOUNT.to_string(),
            voucher_prefix: constants::DEFAULT_VOUCHER_PREFIX.to_string(),
            metadata: MetadataPolicy::default(),
        }
    }
}

impl BridgeConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| BridgeError::Serialization(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configs that could never produce valid state.
    pub fn validate(&self) -> Result<()> {
        if self.escrow_account.trim().is_empty() {
            return Err(BridgeError::Configuration("escrow_account is empty".into()));
        }
        if self.issuance_account.trim().is_empty() {
            return Err(BridgeError::Configuration("issuance_account is empty".into()));
        }
        // A voucher denom is the prefix followed by a 42-char hex address.
        let sample = format!("{}0x{}", self.voucher_prefix, "0".repeat(40));
        validate_denom(&sample).map_err(|_| {
            BridgeError::Configuration(format!(
                "voucher_prefix {:?} does not form valid denoms",
                self.voucher_prefix
            ))
        })
    }
}
