//! Custody settlement for deposits arriving from Ethereum.
//!
//! A deposit either brings a host-native coin home (release from escrow) or
//! brings in an Ethereum token (mint vouchers, then credit them). The two
//! paths never mix for one deposit.
//!
//! Settlement is not deduplicated here. Exactly-once delivery belongs to the
//! quorum subsystem; applying the same deposit twice credits twice.

use gravity_types::{
    AccAddress, AddressCodec, BankError, BankKeeper, BridgeConfig, BridgeError, Coin, DepositEvent,
    Result, TokenRegistry,
};

use crate::origin::{self, TokenOrigin};

/// Applies deposit events to the bank.
pub struct CustodySettlement<'a> {
    bank: &'a mut dyn BankKeeper,
    tokens: &'a dyn TokenRegistry,
    codec: &'a dyn AddressCodec,
    config: &'a BridgeConfig,
}

impl<'a> CustodySettlement<'a> {
    pub fn new(
        bank: &'a mut dyn BankKeeper,
        tokens: &'a dyn TokenRegistry,
        codec: &'a dyn AddressCodec,
        config: &'a BridgeConfig,
    ) -> Self {
        Self {
            bank,
            tokens,
            codec,
            config,
        }
    }

    /// Credit the deposit's receiver.
    ///
    /// # Errors
    /// - [`BridgeError::InvalidCoin`] for a negative or fractional amount
    /// - [`BridgeError::InvalidAddress`] if the receiver does not decode
    /// - [`BridgeError::MintFailed`] if vouchers cannot be minted
    /// - [`BridgeError::TransferFailed`] if the escrow or issuance holding
    ///   cannot pay the receiver
    ///
    /// On error the bank may hold partial writes (a mint without its
    /// transfer); the caller's transaction must be discarded.
    pub fn settle(&mut self, deposit: &DepositEvent) -> Result<()> {
        let origin = origin::resolve(
            self.tokens,
            &self.config.voucher_prefix,
            &deposit.token_contract,
        );
        let coin = Coin::new(origin.denom(), deposit.amount)?;
        let receiver = self
            .codec
            .decode(&deposit.cosmos_receiver)
            .map_err(|source| BridgeError::InvalidAddress {
                address: deposit.cosmos_receiver.clone(),
                source,
            })?;

        match origin {
            TokenOrigin::HostNative { .. } => self.release(&receiver, &coin)?,
            TokenOrigin::Foreign { .. } => self.mint_and_credit(&receiver, &coin)?,
        }

        tracing::debug!(
            contract = %deposit.token_contract,
            denom = %coin.denom,
            amount = %coin.amount,
            receiver = %receiver,
            host_native = origin.is_host_native(),
            "deposit settled"
        );
        Ok(())
    }

    fn release(&mut self, receiver: &AccAddress, coin: &Coin) -> Result<()> {
        self.bank
            .release_from_escrow(&self.config.escrow_account, receiver, coin)
            .map_err(|source| transfer_failed(coin, receiver, source))
    }

    fn mint_and_credit(&mut self, receiver: &AccAddress, coin: &Coin) -> Result<()> {
        let issuer = &self.config.issuance_account;
        self.bank
            .mint_coins(issuer, coin)
            .map_err(|source| BridgeError::MintFailed {
                coin: coin.to_string(),
                source,
            })?;
        self.bank
            .send_from_module(issuer, receiver, coin)
            .map_err(|source| transfer_failed(coin, receiver, source))
    }
}

fn transfer_failed(coin: &Coin, receiver: &AccAddress, source: BankError) -> BridgeError {
    BridgeError::TransferFailed {
        coin: coin.to_string(),
        recipient: receiver.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use gravity_ledger::{Bank, Erc20DenomMap};
    use gravity_types::{CoinError, Erc20Registration, EthAddress, HexAddressCodec, voucher_denom};
    use rust_decimal::Decimal;

    const RECEIVER: &str = "0x0101010101010101010101010101010101010101";

    fn receiver() -> AccAddress {
        AccAddress([1; 20])
    }

    fn deposit(contract: EthAddress, amount: i64) -> DepositEvent {
        DepositEvent {
            token_contract: contract,
            amount: Decimal::new(amount, 0),
            cosmos_receiver: RECEIVER.into(),
            ethereum_sender: EthAddress([9; 20]),
        }
    }

    fn registered(contract: EthAddress, denom: &str) -> Erc20DenomMap {
        let mut map = Erc20DenomMap::new();
        assert!(map.bind(Erc20Registration {
            denom: denom.into(),
            contract,
            height: 1,
            registered_at: Utc.timestamp_opt(0, 0).unwrap(),
        }));
        map
    }

    fn settle(bank: &mut Bank, tokens: &Erc20DenomMap, event: &DepositEvent) -> Result<()> {
        let config = BridgeConfig::default();
        CustodySettlement::new(bank, tokens, &HexAddressCodec, &config).settle(event)
    }

    #[test]
    fn host_native_deposit_releases_escrow() {
        let contract = EthAddress([0x11; 20]);
        let tokens = registered(contract, "uatom");
        let mut bank = Bank::new();
        bank.fund_module("gravity", &Coin::new("uatom", Decimal::new(500, 0)).unwrap())
            .unwrap();

        settle(&mut bank, &tokens, &deposit(contract, 200)).unwrap();

        assert_eq!(bank.module_balance("gravity", "uatom"), Decimal::new(300, 0));
        assert_eq!(bank.account_balance(&receiver(), "uatom"), Decimal::new(200, 0));
        assert_eq!(bank.total_supply("uatom"), Decimal::new(500, 0));
        assert_eq!(bank.total_minted("uatom"), Decimal::ZERO);
    }

    #[test]
    fn foreign_deposit_mints_vouchers() {
        let contract = EthAddress([0xAB; 20]);
        let mut bank = Bank::new();
        bank.grant_mint_permission("gravity");

        settle(&mut bank, &Erc20DenomMap::new(), &deposit(contract, 75)).unwrap();

        let denom = voucher_denom("gravity", &contract);
        assert_eq!(bank.total_minted(&denom), Decimal::new(75, 0));
        assert_eq!(bank.account_balance(&receiver(), &denom), Decimal::new(75, 0));
        assert_eq!(bank.module_balance("gravity", &denom), Decimal::ZERO);
        bank.verify_all_supply().unwrap();
    }

    #[test]
    fn deposits_are_not_deduplicated() {
        let contract = EthAddress([0xAB; 20]);
        let mut bank = Bank::new();
        bank.grant_mint_permission("gravity");
        let event = deposit(contract, 10);

        settle(&mut bank, &Erc20DenomMap::new(), &event).unwrap();
        settle(&mut bank, &Erc20DenomMap::new(), &event).unwrap();

        let denom = voucher_denom("gravity", &contract);
        assert_eq!(bank.account_balance(&receiver(), &denom), Decimal::new(20, 0));
    }

    #[test]
    fn insufficient_escrow_is_transfer_failure() {
        let contract = EthAddress([0x11; 20]);
        let tokens = registered(contract, "uatom");
        let mut bank = Bank::new();
        bank.fund_module("gravity", &Coin::new("uatom", Decimal::new(5, 0)).unwrap())
            .unwrap();

        let err = settle(&mut bank, &tokens, &deposit(contract, 6)).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::TransferFailed {
                source: BankError::InsufficientFunds { .. },
                ..
            }
        ));
    }

    #[test]
    fn mint_without_permission_fails() {
        let mut bank = Bank::new();
        let err = settle(&mut bank, &Erc20DenomMap::new(), &deposit(EthAddress([2; 20]), 1))
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::MintFailed {
                source: BankError::MintNotPermitted { .. },
                ..
            }
        ));
    }

    #[test]
    fn bad_receiver_is_invalid_address() {
        let mut bank = Bank::new();
        bank.grant_mint_permission("gravity");
        let mut event = deposit(EthAddress([2; 20]), 1);
        event.cosmos_receiver = "not-an-address".into();

        let err = settle(&mut bank, &Erc20DenomMap::new(), &event).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAddress { ref address, .. } if address == "not-an-address"));
        assert_eq!(bank, {
            let mut fresh = Bank::new();
            fresh.grant_mint_permission("gravity");
            fresh
        });
    }

    /// Bank whose module sends always fail.
    struct RejectingSends(Bank);

    impl BankKeeper for RejectingSends {
        fn denom_metadata(&self, denom: &str) -> Option<&gravity_types::Metadata> {
            self.0.denom_metadata(denom)
        }

        fn mint_coins(&mut self, module: &str, coin: &Coin) -> std::result::Result<(), BankError> {
            self.0.mint_coins(module, coin)
        }

        fn send_from_module(
            &mut self,
            module: &str,
            _recipient: &AccAddress,
            coin: &Coin,
        ) -> std::result::Result<(), BankError> {
            Err(BankError::InsufficientFunds {
                holder: format!("module:{module}"),
                denom: coin.denom.clone(),
                needed: coin.amount,
                available: Decimal::ZERO,
            })
        }
    }

    #[test]
    fn transfer_failure_after_mint_is_reported() {
        let contract = EthAddress([0x01; 20]);
        let mut bank = RejectingSends(Bank::new());
        bank.0.grant_mint_permission("gravity");
        let config = BridgeConfig::default();

        let err = CustodySettlement::new(
            &mut bank,
            &Erc20DenomMap::new(),
            &HexAddressCodec,
            &config,
        )
        .settle(&deposit(contract, 5))
        .unwrap_err();

        let denom = voucher_denom("gravity", &contract);
        assert!(matches!(
            &err,
            BridgeError::TransferFailed {
                coin,
                source: BankError::InsufficientFunds { .. },
                ..
            } if *coin == format!("5{denom}")
        ));
        // The mint stays in the bank; discarding the transaction undoes it.
        assert_eq!(bank.0.total_minted(&denom), Decimal::new(5, 0));
        assert_eq!(bank.0.account_balance(&receiver(), &denom), Decimal::ZERO);
    }

    #[test]
    fn negative_amount_is_invalid_coin() {
        let mut bank = Bank::new();
        let err = settle(&mut bank, &Erc20DenomMap::new(), &deposit(EthAddress([2; 20]), -3))
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidCoin(CoinError::NegativeAmount(_))));
    }
}
