//! Addresses on both sides of the bridge.
//!
//! [`EthAddress`] is the fixed-width 20-byte identifier of an Ethereum
//! contract or account. It always renders as lowercase `0x`-prefixed hex so
//! that every replica synthesizes the same voucher denom for it.
//!
//! [`AccAddress`] is a host-ledger account. Its textual encoding belongs to
//! the host chain, so decoding goes through an injected [`AddressCodec`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::constants::{ACC_ADDRESS_LEN, ETH_ADDRESS_LEN};

/// Why an address string could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("empty address")]
    Empty,

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], AddressError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(AddressError::Empty);
    }
    let bytes = hex::decode(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| AddressError::InvalidLength {
        expected: N,
        actual,
    })
}

// ---------------------------------------------------------------------------
// EthAddress
// ---------------------------------------------------------------------------

/// An Ethereum address (token contract, sender).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct EthAddress(pub [u8; ETH_ADDRESS_LEN]);

impl EthAddress {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; ETH_ADDRESS_LEN] {
        &self.0
    }

    /// Random address for tests.
    #[cfg(feature = "test-helpers")]
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random())
    }
}

impl FromStr for EthAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<ETH_ADDRESS_LEN>(s).map(Self)
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for EthAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// AccAddress
// ---------------------------------------------------------------------------

/// A host-ledger account address (raw bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccAddress(pub [u8; ACC_ADDRESS_LEN]);

impl AccAddress {
    /// Random address for tests.
    #[cfg(feature = "test-helpers")]
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random())
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Decodes the receiver string carried by deposit events into an account.
pub trait AddressCodec {
    fn decode(&self, encoded: &str) -> Result<AccAddress, AddressError>;
}

/// Plain hex codec (`0x` prefix optional).
#[derive(Debug, Clone, Copy, Default)]
pub struct HexAddressCodec;

impl AddressCodec for HexAddressCodec {
    fn decode(&self, encoded: &str) -> Result<AccAddress, AddressError> {
        decode_fixed::<ACC_ADDRESS_LEN>(encoded).map(AccAddress)
    }
}
