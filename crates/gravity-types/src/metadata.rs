//! Denomination metadata published by the bank subsystem.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coin::validate_denom;

/// One unit of a denomination, e.g. `atom` with exponent 6 over `uatom`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenomUnit {
    pub denom: String,
    pub exponent: u32,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl DenomUnit {
    #[must_use]
    pub fn new(denom: impl Into<String>, exponent: u32) -> Self {
        Self {
            denom: denom.into(),
            exponent,
            aliases: Vec::new(),
        }
    }
}

/// Display metadata of a host denomination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub description: String,
    /// Units sorted by ascending exponent. The first is `base` at exponent 0.
    pub denom_units: Vec<DenomUnit>,
    pub base: String,
    pub display: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

/// Why metadata is not well formed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("no metadata registered")]
    Missing,

    #[error("base denom {0:?} is invalid")]
    InvalidBase(String),

    #[error("display denom {0:?} is invalid")]
    InvalidDisplay(String),

    #[error("denomination units cannot be empty")]
    NoUnits,

    #[error("first denomination unit {denom:?} must be the base denom with exponent 0")]
    BadFirstUnit { denom: String },

    #[error("denomination unit {denom:?} is invalid")]
    InvalidUnit { denom: String },

    #[error("duplicate denomination unit {0:?}")]
    DuplicateUnit(String),

    #[error("denomination units must be sorted by strictly ascending exponent ({denom:?} at {exponent})")]
    UnsortedUnits { denom: String, exponent: u32 },

    #[error("display denom {0:?} is not one of the denomination units")]
    DisplayNotInUnits(String),
}

impl Metadata {
    /// Stateless well-formedness check.
    pub fn validate(&self) -> Result<(), MetadataError> {
        validate_denom(&self.base).map_err(|_| MetadataError::InvalidBase(self.base.clone()))?;
        validate_denom(&self.display)
            .map_err(|_| MetadataError::InvalidDisplay(self.display.clone()))?;

        let first = self.denom_units.first().ok_or(MetadataError::NoUnits)?;
        if first.denom != self.base || first.exponent != 0 {
            return Err(MetadataError::BadFirstUnit {
                denom: first.denom.clone(),
            });
        }

        let mut seen: Vec<&str> = Vec::with_capacity(self.denom_units.len());
        let mut previous: Option<u32> = None;
        for unit in &self.denom_units {
            validate_denom(&unit.denom).map_err(|_| MetadataError::InvalidUnit {
                denom: unit.denom.clone(),
            })?;
            if seen.contains(&unit.denom.as_str()) {
                return Err(MetadataError::DuplicateUnit(unit.denom.clone()));
            }
            if previous.is_some_and(|p| unit.exponent <= p) {
                return Err(MetadataError::UnsortedUnits {
                    denom: unit.denom.clone(),
                    exponent: unit.exponent,
                });
            }
            seen.push(&unit.denom);
            previous = Some(unit.exponent);
        }

        if !seen.contains(&self.display.as_str()) {
            return Err(MetadataError::DisplayNotInUnits(self.display.clone()));
        }
        Ok(())
    }

    /// Exponent of the highest unit: the decimals compared against ERC20s.
    #[must_use]
    pub fn decimals(&self) -> Option<u32> {
        self.denom_units.last().map(|u| u.exponent)
    }
}
