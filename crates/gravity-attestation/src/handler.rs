//! Attestation dispatch: route a finalized event to the component that
//! applies its effect.

use gravity_types::{
    AddressCodec, Attestation, AttestationContext, BridgeConfig, BridgeError, BridgeEvent,
    HexAddressCodec, Keepers, Result,
};

use crate::{BatchAcknowledger, CustodySettlement, Erc20Registrar};

/// Applies the effect of a finalized attestation.
///
/// Quorum is not re-checked: every attestation handed in is final. An error
/// means nothing of the attestation may be committed; the caller discards
/// `ctx` as a whole.
pub trait AttestationHandler {
    fn on_attestation(
        &self,
        ctx: &mut dyn AttestationContext,
        attestation: &Attestation,
    ) -> Result<()>;
}

/// The bridge's attestation handler.
#[derive(Debug, Clone)]
pub struct DefaultAttestationHandler<C: AddressCodec = HexAddressCodec> {
    config: BridgeConfig,
    codec: C,
}

impl DefaultAttestationHandler {
    #[must_use]
    pub fn new(config: BridgeConfig) -> Self {
        Self::with_codec(config, HexAddressCodec)
    }
}

impl<C: AddressCodec> DefaultAttestationHandler<C> {
    /// Use `codec` to decode deposit receivers.
    #[must_use]
    pub fn with_codec(config: BridgeConfig, codec: C) -> Self {
        Self { config, codec }
    }
}

impl<C: AddressCodec> AttestationHandler for DefaultAttestationHandler<C> {
    fn on_attestation(
        &self,
        ctx: &mut dyn AttestationContext,
        attestation: &Attestation,
    ) -> Result<()> {
        let Keepers {
            header,
            events,
            bank,
            tokens,
            batches,
        } = ctx.keepers();

        let Some(event) = events.event(&attestation.event_id) else {
            tracing::warn!(
                event_id = %attestation.event_id,
                event_nonce = attestation.event_nonce,
                "attested event not found"
            );
            return Err(BridgeError::EventNotFound(attestation.event_id));
        };
        let kind = event.kind();

        let applied = match event {
            BridgeEvent::Deposit(deposit) => {
                CustodySettlement::new(bank, &*tokens, &self.codec, &self.config).settle(deposit)
            }
            BridgeEvent::Withdraw(withdraw) => {
                BatchAcknowledger::new(batches)
                    .acknowledge(&withdraw.token_contract, withdraw.batch_nonce);
                Ok(())
            }
            BridgeEvent::Erc20Deployed(deployed) => {
                Erc20Registrar::new(&*bank, tokens, header, self.config.metadata).register(deployed)
            }
            BridgeEvent::LogicCallExecuted(_) => Err(BridgeError::UnsupportedEventType {
                kind,
                type_name: event.type_name(),
            }),
        };

        match applied {
            Ok(()) => {
                tracing::debug!(
                    event_nonce = attestation.event_nonce,
                    kind,
                    height = header.height,
                    "attestation applied"
                );
                Ok(())
            }
            Err(err @ BridgeError::UnsupportedEventType { .. }) => {
                tracing::warn!(event_nonce = attestation.event_nonce, kind, error = %err, "attestation rejected");
                Err(err)
            }
            Err(source) => {
                let err = BridgeError::AttestationFailed {
                    event_nonce: attestation.event_nonce,
                    kind,
                    source: Box::new(source),
                };
                tracing::warn!(
                    event_nonce = attestation.event_nonce,
                    kind,
                    height = header.height,
                    error = %err,
                    cause = %err.root_cause(),
                    "attestation failed"
                );
                Err(err)
            }
        }
    }
}
