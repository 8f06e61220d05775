//! Outgoing batches: pending until Ethereum reports their execution.
//!
//! Only pending batches and the highest executed nonce per contract are
//! kept. A batch at or below the watermark that is no longer pending has
//! been settled, and no new batch may be submitted at or below it.

use std::collections::BTreeMap;

use gravity_types::{BatchLedger, EthAddress, OutgoingBatch};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchPool {
    pending: BTreeMap<(EthAddress, u64), OutgoingBatch>,
    last_executed: BTreeMap<EthAddress, u64>,
}

impl BatchPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a batch that was submitted to Ethereum. Returns `false` if a
    /// batch with the same contract and nonce is pending, or the nonce is at
    /// or below the contract's executed watermark.
    pub fn submit(&mut self, batch: OutgoingBatch) -> bool {
        let key = (batch.token_contract, batch.batch_nonce);
        if self.pending.contains_key(&key) || self.is_settled(&key.0, key.1) {
            return false;
        }
        self.pending.insert(key, batch);
        true
    }

    #[must_use]
    pub fn pending(&self, contract: &EthAddress, batch_nonce: u64) -> Option<&OutgoingBatch> {
        self.pending.get(&(*contract, batch_nonce))
    }

    /// Whether batch `batch_nonce` of `contract` has been settled.
    #[must_use]
    pub fn is_executed(&self, contract: &EthAddress, batch_nonce: u64) -> bool {
        !self.pending.contains_key(&(*contract, batch_nonce)) && self.is_settled(contract, batch_nonce)
    }

    /// Highest executed nonce for a contract.
    #[must_use]
    pub fn last_executed_nonce(&self, contract: &EthAddress) -> Option<u64> {
        self.last_executed.get(contract).copied()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn is_settled(&self, contract: &EthAddress, batch_nonce: u64) -> bool {
        self.last_executed_nonce(contract)
            .is_some_and(|watermark| batch_nonce <= watermark)
    }

    pub(crate) fn hash_into(&self, hasher: &mut Sha256) {
        hasher.update((self.pending.len() as u64).to_le_bytes());
        for ((contract, nonce), batch) in &self.pending {
            hasher.update(contract.as_bytes());
            hasher.update(nonce.to_le_bytes());
            hasher.update(batch.block_created.to_le_bytes());
            hasher.update((batch.transfer_ids.len() as u64).to_le_bytes());
            for id in &batch.transfer_ids {
                hasher.update(id.to_le_bytes());
            }
        }
        hasher.update((self.last_executed.len() as u64).to_le_bytes());
        for (contract, nonce) in &self.last_executed {
            hasher.update(contract.as_bytes());
            hasher.update(nonce.to_le_bytes());
        }
    }
}

impl BatchLedger for BatchPool {
    fn mark_executed(&mut self, contract: &EthAddress, batch_nonce: u64) -> bool {
        if self.pending.remove(&(*contract, batch_nonce)).is_none() {
            return false;
        }
        let watermark = self.last_executed.entry(*contract).or_insert(batch_nonce);
        *watermark = (*watermark).max(batch_nonce);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: EthAddress = EthAddress([0xab; 20]);

    #[test]
    fn submit_then_execute() {
        let mut pool = BatchPool::new();
        assert!(pool.submit(OutgoingBatch::new(TOKEN, 7, 100).with_transfers(vec![1, 2])));
        assert_eq!(pool.pending(&TOKEN, 7).unwrap().transfer_ids, vec![1, 2]);

        assert!(pool.mark_executed(&TOKEN, 7));
        assert!(pool.pending(&TOKEN, 7).is_none());
        assert!(pool.is_executed(&TOKEN, 7));
        assert_eq!(pool.last_executed_nonce(&TOKEN), Some(7));
    }

    #[test]
    fn re_executing_is_a_no_op() {
        let mut pool = BatchPool::new();
        pool.submit(OutgoingBatch::new(TOKEN, 7, 100));
        assert!(pool.mark_executed(&TOKEN, 7));
        let before = pool.clone();
        assert!(!pool.mark_executed(&TOKEN, 7));
        assert_eq!(pool, before);
    }

    #[test]
    fn unknown_batch_is_a_no_op() {
        let mut pool = BatchPool::new();
        assert!(!pool.mark_executed(&TOKEN, 1));
        assert!(!pool.is_executed(&TOKEN, 1));
        assert_eq!(pool, BatchPool::new());
    }

    #[test]
    fn duplicate_submit_rejected() {
        let mut pool = BatchPool::new();
        assert!(pool.submit(OutgoingBatch::new(TOKEN, 1, 1)));
        assert!(!pool.submit(OutgoingBatch::new(TOKEN, 1, 2)));
        pool.mark_executed(&TOKEN, 1);
        assert!(!pool.submit(OutgoingBatch::new(TOKEN, 1, 3)));
        assert_eq!(pool.pending_count(), 0);
    }

    #[test]
    fn executed_state_is_a_watermark_not_a_log() {
        let mut a = BatchPool::new();
        for nonce in 1..=5 {
            a.submit(OutgoingBatch::new(TOKEN, nonce, 1));
            a.mark_executed(&TOKEN, nonce);
        }
        let mut b = BatchPool::new();
        b.submit(OutgoingBatch::new(TOKEN, 5, 1));
        b.mark_executed(&TOKEN, 5);

        assert_eq!(a, b);
        assert!(a.is_executed(&TOKEN, 3));
        assert!(!a.submit(OutgoingBatch::new(TOKEN, 4, 1)));
    }

    #[test]
    fn out_of_order_execution_keeps_highest() {
        let mut pool = BatchPool::new();
        for nonce in [3, 4] {
            pool.submit(OutgoingBatch::new(TOKEN, nonce, 1));
        }
        assert!(pool.mark_executed(&TOKEN, 4));
        assert!(!pool.is_executed(&TOKEN, 3));
        assert!(pool.mark_executed(&TOKEN, 3));
        assert_eq!(pool.last_executed_nonce(&TOKEN), Some(4));
        assert!(pool.is_executed(&TOKEN, 3));
    }

    #[test]
    fn last_executed_is_per_contract() {
        let other = EthAddress([0xcd; 20]);
        let mut pool = BatchPool::new();
        for nonce in [3, 5] {
            pool.submit(OutgoingBatch::new(TOKEN, nonce, 1));
            pool.mark_executed(&TOKEN, nonce);
        }
        pool.submit(OutgoingBatch::new(other, 9, 1));
        pool.mark_executed(&other, 9);
        assert_eq!(pool.last_executed_nonce(&TOKEN), Some(5));
        assert_eq!(pool.last_executed_nonce(&other), Some(9));
        assert_eq!(pool.last_executed_nonce(&EthAddress([0; 20])), None);
    }
}
