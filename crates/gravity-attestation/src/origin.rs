//! Token-origin resolution: is a deposited ERC20 a host coin coming home,
//! or an Ethereum token that needs vouchers?

use gravity_types::{Denom, EthAddress, TokenRegistry, voucher_denom};

/// Where the asset behind an ERC20 contract was first issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOrigin {
    /// A host denom previously exported through a registered ERC20.
    /// Deposits release it from escrow.
    HostNative { denom: Denom },
    /// An Ethereum-issued token. Deposits mint vouchers of `denom`.
    Foreign { denom: Denom },
}

impl TokenOrigin {
    #[must_use]
    pub fn is_host_native(&self) -> bool {
        matches!(self, Self::HostNative { .. })
    }

    #[must_use]
    pub fn denom(&self) -> &str {
        match self {
            Self::HostNative { denom } | Self::Foreign { denom } => denom,
        }
    }
}

/// Classify `contract`. A missing binding is not an error: the token is
/// foreign and its denom is synthesized from the contract address.
#[must_use]
pub fn resolve(tokens: &dyn TokenRegistry, voucher_prefix: &str, contract: &EthAddress) -> TokenOrigin {
    match tokens.denom_for_contract(contract) {
        Some(denom) => TokenOrigin::HostNative {
            denom: denom.to_string(),
        },
        None => TokenOrigin::Foreign {
            denom: voucher_denom(voucher_prefix, contract),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use gravity_ledger::Erc20DenomMap;
    use gravity_types::Erc20Registration;

    #[test]
    fn registered_contract_is_host_native() {
        let contract = EthAddress([0x11; 20]);
        let mut map = Erc20DenomMap::new();
        map.bind(Erc20Registration {
            denom: "uatom".into(),
            contract,
            height: 1,
            registered_at: Utc.timestamp_opt(0, 0).unwrap(),
        });

        let origin = resolve(&map, "gravity", &contract);
        assert!(origin.is_host_native());
        assert_eq!(origin.denom(), "uatom");
    }

    #[test]
    fn unknown_contract_gets_voucher_denom() {
        let contract = EthAddress([0xAB; 20]);
        let origin = resolve(&Erc20DenomMap::new(), "gravity", &contract);
        assert!(!origin.is_host_native());
        assert_eq!(origin.denom(), format!("gravity0x{}", "ab".repeat(20)));
    }

    #[test]
    fn resolution_is_deterministic() {
        let contract = EthAddress([0x42; 20]);
        let map = Erc20DenomMap::new();
        assert_eq!(resolve(&map, "gravity", &contract), resolve(&map, "gravity", &contract));
    }
}
