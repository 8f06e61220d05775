//! Ledger state and the transactional context attestations run against.
//!
//! The runtime opens a [`StateTx`] on the committed [`LedgerState`], hands it
//! to the attestation handler, and then either commits it or drops it. A
//! transaction works on its own copy of the state, so a failed attestation
//! leaves nothing behind no matter how far it got.

use gravity_types::{AttestationContext, BlockHeader, BridgeError, Keepers, Result, constants};
use sha2::{Digest, Sha256};

use crate::{Bank, BatchPool, Erc20DenomMap, EventLog};

/// Length-prefixed write, so adjacent variable-length fields never collide.
pub(crate) fn put_bytes(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

/// Committed host-ledger state touched by the attestation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    /// Number of transactions committed so far.
    version: u64,
    pub events: EventLog,
    pub bank: Bank,
    pub tokens: Erc20DenomMap,
    pub batches: BatchPool,
}

impl LedgerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// SHA-256 commitment to the full state (excluding the version counter).
    ///
    /// Replicas that applied the same attestations in the same order have
    /// the same root.
    #[must_use]
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(constants::STATE_ROOT_DOMAIN);
        self.events.hash_into(&mut hasher);
        self.bank.hash_into(&mut hasher);
        self.tokens.hash_into(&mut hasher);
        self.batches.hash_into(&mut hasher);

        let result = hasher.finalize();
        let mut root = [0u8; 32];
        root.copy_from_slice(&result);
        root
    }

    /// Open a transaction for the block described by `header`.
    #[must_use]
    pub fn begin(&self, header: BlockHeader) -> StateTx {
        StateTx {
            base_version: self.version,
            header,
            working: self.clone(),
        }
    }

    /// Make a transaction's writes the new committed state.
    ///
    /// # Errors
    /// Returns [`BridgeError::StaleTransaction`] if another transaction was
    /// committed after `tx` was opened.
    pub fn commit(&mut self, tx: StateTx) -> Result<[u8; 32]> {
        if tx.base_version != self.version {
            return Err(BridgeError::StaleTransaction {
                base: tx.base_version,
                current: self.version,
            });
        }
        let height = tx.header.height;
        *self = tx.working;
        self.version = tx.base_version + 1;

        let root = self.state_root();
        tracing::debug!(
            height,
            version = self.version,
            root = %hex::encode(&root[..8]),
            "ledger transaction committed"
        );
        Ok(root)
    }

    /// Run `f` in a fresh transaction: commit on `Ok`, discard on `Err`.
    pub fn apply<T, F>(&mut self, header: BlockHeader, f: F) -> Result<T>
    where
        F: FnOnce(&mut StateTx) -> Result<T>,
    {
        let mut tx = self.begin(header);
        match f(&mut tx) {
            Ok(value) => {
                self.commit(tx)?;
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(
                    height = tx.header.height,
                    error = %err,
                    "ledger transaction discarded"
                );
                Err(err)
            }
        }
    }
}

/// An open transaction: a working copy of the state plus its block header.
#[derive(Debug)]
pub struct StateTx {
    base_version: u64,
    header: BlockHeader,
    working: LedgerState,
}

impl StateTx {
    #[must_use]
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    /// The uncommitted state as seen by this transaction.
    #[must_use]
    pub fn state(&self) -> &LedgerState {
        &self.working
    }

    /// Direct write access for runtime-side setup (genesis, batch submission).
    pub fn state_mut(&mut self) -> &mut LedgerState {
        &mut self.working
    }
}

impl AttestationContext for StateTx {
    fn keepers(&mut self) -> Keepers<'_> {
        Keepers {
            header: &self.header,
            events: &self.working.events,
            bank: &mut self.working.bank,
            tokens: &mut self.working.tokens,
            batches: &mut self.working.batches,
        }
    }
}
