//! Acknowledgment of outgoing batches executed on Ethereum.

use gravity_types::{BatchLedger, EthAddress};

pub struct BatchAcknowledger<'a> {
    batches: &'a mut dyn BatchLedger,
}

impl<'a> BatchAcknowledger<'a> {
    pub fn new(batches: &'a mut dyn BatchLedger) -> Self {
        Self { batches }
    }

    /// Mark batch `batch_nonce` of `contract` executed.
    ///
    /// Infallible. A batch that is already executed, or was never pending,
    /// is left alone.
    pub fn acknowledge(&mut self, contract: &EthAddress, batch_nonce: u64) {
        if self.batches.mark_executed(contract, batch_nonce) {
            tracing::debug!(%contract, batch_nonce, "outgoing batch executed");
        } else {
            tracing::debug!(%contract, batch_nonce, "batch not pending, acknowledgment ignored");
        }
    }
}
