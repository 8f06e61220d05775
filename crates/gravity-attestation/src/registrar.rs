//! Registration of ERC20 contracts deployed for host denoms.

use gravity_types::{
    BankKeeper, BlockHeader, BridgeError, Erc20DeployedEvent, Erc20Registration, MetadataError,
    MetadataPolicy, Result, TokenRegistry,
};

use crate::metadata_check::validate_metadata_with;

/// Binds a deployed ERC20 to the host denom it represents.
pub struct Erc20Registrar<'a> {
    bank: &'a dyn BankKeeper,
    tokens: &'a mut dyn TokenRegistry,
    header: &'a BlockHeader,
    policy: MetadataPolicy,
}

impl<'a> Erc20Registrar<'a> {
    pub fn new(
        bank: &'a dyn BankKeeper,
        tokens: &'a mut dyn TokenRegistry,
        header: &'a BlockHeader,
        policy: MetadataPolicy,
    ) -> Self {
        Self {
            bank,
            tokens,
            header,
            policy,
        }
    }

    /// Validate the deployment against the denom's metadata and record the
    /// binding at the current block.
    ///
    /// # Errors
    /// - [`BridgeError::AlreadyRegistered`] if the denom or the contract is bound
    /// - [`BridgeError::InvalidMetadata`] if the denom has no (valid) metadata
    /// - [`BridgeError::NameMismatch`], [`BridgeError::SymbolMismatch`] or
    ///   [`BridgeError::DecimalsMismatch`] if the ERC20 disagrees with it
    ///
    /// The map is unchanged on every error.
    pub fn register(&mut self, event: &Erc20DeployedEvent) -> Result<()> {
        let denom = &event.cosmos_denom;

        if let Some(contract) = self.tokens.contract_for_denom(denom) {
            return Err(BridgeError::AlreadyRegistered {
                denom: denom.clone(),
                contract,
            });
        }
        if let Some(existing) = self.tokens.denom_for_contract(&event.token_contract) {
            return Err(BridgeError::AlreadyRegistered {
                denom: existing.to_string(),
                contract: event.token_contract,
            });
        }

        let metadata =
            self.bank
                .denom_metadata(denom)
                .ok_or_else(|| BridgeError::InvalidMetadata {
                    denom: denom.clone(),
                    source: MetadataError::Missing,
                })?;
        validate_metadata_with(event, metadata, self.policy.symbol_source)?;

        let registration = Erc20Registration {
            denom: denom.clone(),
            contract: event.token_contract,
            height: self.header.height,
            registered_at: self.header.time,
        };
        if !self.tokens.bind(registration) {
            return Err(BridgeError::Internal(format!(
                "binding {denom} to {} refused after availability check",
                event.token_contract
            )));
        }

        tracing::debug!(
            denom = %denom,
            contract = %event.token_contract,
            height = self.header.height,
            "erc20 registered"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use gravity_ledger::{Bank, Erc20DenomMap};
    use gravity_types::{DenomUnit, EthAddress, Metadata, SymbolSource};

    fn header() -> BlockHeader {
        BlockHeader::new("gravity-test-1", 42, Utc.timestamp_opt(1_700_000_000, 0).unwrap())
    }

    fn atom_metadata() -> Metadata {
        Metadata {
            description: "The native staking token".into(),
            denom_units: vec![DenomUnit::new("uatom", 0), DenomUnit::new("Atom", 6)],
            base: "uatom".into(),
            display: "Atom".into(),
            name: "Cosmos Hub Atom".into(),
            symbol: "ATOM".into(),
        }
    }

    fn deployed(contract: EthAddress) -> Erc20DeployedEvent {
        Erc20DeployedEvent {
            token_contract: contract,
            cosmos_denom: "uatom".into(),
            name: "Atom".into(),
            symbol: "Atom".into(),
            decimals: 6,
        }
    }

    fn bank_with_atom() -> Bank {
        let mut bank = Bank::new();
        bank.set_denom_metadata(atom_metadata());
        bank
    }

    fn register(bank: &Bank, tokens: &mut Erc20DenomMap, event: &Erc20DeployedEvent) -> Result<()> {
        let header = header();
        Erc20Registrar::new(bank, tokens, &header, MetadataPolicy::default()).register(event)
    }

    #[test]
    fn registers_with_block_height_and_time() {
        let bank = bank_with_atom();
        let mut tokens = Erc20DenomMap::new();
        let contract = EthAddress([0xC0; 20]);

        register(&bank, &mut tokens, &deployed(contract)).unwrap();

        assert_eq!(tokens.denom_for_contract(&contract), Some("uatom"));
        assert_eq!(tokens.contract_for_denom("uatom"), Some(contract));
        let reg = tokens.registration("uatom").unwrap();
        assert_eq!(reg.height, 42);
        assert_eq!(reg.registered_at, header().time);
    }

    #[test]
    fn second_registration_of_denom_fails() {
        let bank = bank_with_atom();
        let mut tokens = Erc20DenomMap::new();
        let first = EthAddress([0xC0; 20]);
        register(&bank, &mut tokens, &deployed(first)).unwrap();
        let before = tokens.clone();

        let err = register(&bank, &mut tokens, &deployed(EthAddress([0xC1; 20]))).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::AlreadyRegistered { ref denom, contract } if denom == "uatom" && contract == first
        ));
        assert_eq!(tokens, before);
    }

    #[test]
    fn contract_bound_to_other_denom_fails() {
        let mut bank = bank_with_atom();
        bank.set_denom_metadata(Metadata {
            denom_units: vec![DenomUnit::new("uosmo", 0), DenomUnit::new("Osmo", 6)],
            base: "uosmo".into(),
            display: "Osmo".into(),
            ..atom_metadata()
        });
        let mut tokens = Erc20DenomMap::new();
        let contract = EthAddress([0xC0; 20]);
        register(&bank, &mut tokens, &deployed(contract)).unwrap();

        let osmo = Erc20DeployedEvent {
            cosmos_denom: "uosmo".into(),
            name: "Osmo".into(),
            symbol: "Osmo".into(),
            ..deployed(contract)
        };
        let err = register(&bank, &mut tokens, &osmo).unwrap_err();
        assert!(matches!(err, BridgeError::AlreadyRegistered { ref denom, .. } if denom == "uatom"));
        assert!(tokens.contract_for_denom("uosmo").is_none());
    }

    #[test]
    fn missing_metadata_rejected() {
        let bank = Bank::new();
        let mut tokens = Erc20DenomMap::new();
        let err = register(&bank, &mut tokens, &deployed(EthAddress([1; 20]))).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::InvalidMetadata {
                source: MetadataError::Missing,
                ..
            }
        ));
        assert!(tokens.is_empty());
    }

    #[test]
    fn validation_failure_binds_nothing() {
        let bank = bank_with_atom();
        let mut tokens = Erc20DenomMap::new();
        let event = Erc20DeployedEvent {
            decimals: 18,
            ..deployed(EthAddress([1; 20]))
        };
        let err = register(&bank, &mut tokens, &event).unwrap_err();
        assert!(matches!(err, BridgeError::DecimalsMismatch { erc20: 18, denom: 6 }));
        assert!(tokens.is_empty());
    }

    #[test]
    fn policy_selects_symbol_field() {
        let bank = bank_with_atom();
        let mut tokens = Erc20DenomMap::new();
        let header = header();
        let event = Erc20DeployedEvent {
            symbol: "ATOM".into(),
            ..deployed(EthAddress([1; 20]))
        };
        let policy = MetadataPolicy {
            symbol_source: SymbolSource::Symbol,
        };

        Erc20Registrar::new(&bank, &mut tokens, &header, policy)
            .register(&event)
            .unwrap();
        assert_eq!(tokens.len(), 1);
    }
}
