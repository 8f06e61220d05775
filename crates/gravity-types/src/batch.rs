//! Outgoing transfer batches awaiting execution on Ethereum.

use serde::{Deserialize, Serialize};

use crate::EthAddress;

/// A batch of withdrawals for one token contract, submitted to Ethereum.
///
/// Batches are built and relayed elsewhere; the attestation engine only
/// learns that a batch was executed and acknowledges it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingBatch {
    pub batch_nonce: u64,
    pub token_contract: EthAddress,
    /// Ids of the pooled transfers included in this batch.
    pub transfer_ids: Vec<u64>,
    /// Host-ledger height at which the batch was created.
    pub block_created: u64,
}

impl OutgoingBatch {
    #[must_use]
    pub fn new(token_contract: EthAddress, batch_nonce: u64, block_created: u64) -> Self {
        Self {
            batch_nonce,
            token_contract,
            transfer_ids: Vec::new(),
            block_created,
        }
    }

    #[must_use]
    pub fn with_transfers(mut self, transfer_ids: Vec<u64>) -> Self {
        self.transfer_ids = transfer_ids;
        self
    }
}
