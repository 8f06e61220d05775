//! Finalized Ethereum events, keyed by [`EventId`].
//!
//! Written by the voting subsystem when a claim reaches quorum; the
//! attestation engine only reads it.

use std::collections::BTreeMap;

use gravity_types::{Attestation, BridgeEvent, EventId, EventStore};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: BTreeMap<EventId, BridgeEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a finalized event and return the attestation that references it.
    pub fn record(&mut self, event_nonce: u64, event: impl Into<BridgeEvent>) -> Attestation {
        let event = event.into();
        let id = EventId::derive(event_nonce, &event);
        self.events.insert(id, event);
        Attestation::new(id, event_nonce)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub(crate) fn hash_into(&self, hasher: &mut Sha256) {
        hasher.update((self.events.len() as u64).to_le_bytes());
        for (id, event) in &self.events {
            hasher.update(id.0);
            event.hash_into(hasher);
        }
    }
}

impl EventStore for EventLog {
    fn event(&self, id: &EventId) -> Option<&BridgeEvent> {
        self.events.get(id)
    }
}
