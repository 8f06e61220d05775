//! Cross-chain metadata validation for ERC20 registration.
//!
//! An ERC20 deployed for a host denom must describe that denom the same way
//! the bank does. The check is a pure function of the event and metadata.

use gravity_types::{
    BridgeError, Erc20DeployedEvent, Metadata, MetadataError, Result, SymbolSource,
};

/// Validate with the deployed comparison rules (symbol vs. display name).
pub fn validate_metadata(event: &Erc20DeployedEvent, metadata: &Metadata) -> Result<()> {
    validate_metadata_with(event, metadata, SymbolSource::Display)
}

/// Validate, comparing the ERC20 symbol against `symbol_source`.
///
/// Checks run in order and the first failure is returned:
/// 1. metadata well-formedness
/// 2. name vs. display
/// 3. symbol vs. display (or symbol)
/// 4. decimals vs. exponent of the highest unit
pub fn validate_metadata_with(
    event: &Erc20DeployedEvent,
    metadata: &Metadata,
    symbol_source: SymbolSource,
) -> Result<()> {
    let invalid = |source| BridgeError::InvalidMetadata {
        denom: event.cosmos_denom.clone(),
        source,
    };

    metadata.validate().map_err(invalid)?;

    if event.name != metadata.display {
        return Err(BridgeError::NameMismatch {
            name: event.name.clone(),
            display: metadata.display.clone(),
        });
    }

    let expected_symbol = match symbol_source {
        SymbolSource::Display => &metadata.display,
        SymbolSource::Symbol => &metadata.symbol,
    };
    if &event.symbol != expected_symbol {
        return Err(BridgeError::SymbolMismatch {
            symbol: event.symbol.clone(),
            expected: expected_symbol.clone(),
        });
    }

    let decimals = metadata.decimals().ok_or_else(|| invalid(MetadataError::NoUnits))?;
    if u64::from(decimals) != event.decimals {
        return Err(BridgeError::DecimalsMismatch {
            erc20: event.decimals,
            denom: decimals,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gravity_types::{DenomUnit, EthAddress};

    fn event(name: &str, symbol: &str, decimals: u64) -> Erc20DeployedEvent {
        Erc20DeployedEvent {
            token_contract: EthAddress([1; 20]),
            cosmos_denom: "uatom".into(),
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    fn metadata(top_exponent: u32) -> Metadata {
        Metadata {
            description: String::new(),
            denom_units: vec![DenomUnit::new("uatom", 0), DenomUnit::new("Atom", top_exponent)],
            base: "uatom".into(),
            display: "Atom".into(),
            name: "Cosmos Hub Atom".into(),
            symbol: "ATOM".into(),
        }
    }

    #[test]
    fn matching_attributes_pass() {
        assert!(validate_metadata(&event("Atom", "Atom", 6), &metadata(6)).is_ok());
    }

    #[test]
    fn wrong_decimals_rejected() {
        let err = validate_metadata(&event("Atom", "Atom", 6), &metadata(8)).unwrap_err();
        assert!(matches!(err, BridgeError::DecimalsMismatch { erc20: 6, denom: 8 }));
    }

    #[test]
    fn wrong_name_rejected() {
        let err = validate_metadata(&event("Cosmos", "Atom", 6), &metadata(6)).unwrap_err();
        assert!(matches!(err, BridgeError::NameMismatch { .. }));
    }

    #[test]
    fn symbol_compared_against_display_by_default() {
        let err = validate_metadata(&event("Atom", "ATOM", 6), &metadata(6)).unwrap_err();
        assert!(
            matches!(&err, BridgeError::SymbolMismatch { symbol, expected } if symbol == "ATOM" && expected == "Atom")
        );
    }

    #[test]
    fn symbol_policy_compares_against_symbol() {
        let md = metadata(6);
        assert!(validate_metadata_with(&event("Atom", "ATOM", 6), &md, SymbolSource::Symbol).is_ok());
        let err =
            validate_metadata_with(&event("Atom", "Atom", 6), &md, SymbolSource::Symbol).unwrap_err();
        assert!(matches!(err, BridgeError::SymbolMismatch { .. }));
    }

    #[test]
    fn malformed_metadata_rejected_first() {
        let mut md = metadata(6);
        md.denom_units.clear();
        // Every other check would also fail; well-formedness is reported.
        let err = validate_metadata(&event("x", "y", 1), &md).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::InvalidMetadata {
                source: MetadataError::NoUnits,
                ..
            }
        ));
    }

    #[test]
    fn validation_is_pure() {
        let e = event("Atom", "Atom", 6);
        let md = metadata(8);
        let first = validate_metadata(&e, &md).unwrap_err().to_string();
        let second = validate_metadata(&e, &md).unwrap_err().to_string();
        assert_eq!(first, second);
        assert!(validate_metadata(&e, &metadata(6)).is_ok());
        assert!(validate_metadata(&e, &metadata(6)).is_ok());
    }
}
