//! Block context supplied by the enclosing state-transition runtime.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Header of the block whose state transition is in progress.
///
/// The only source of time and height for this engine; wall clocks are
/// never read so that replicas agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub chain_id: String,
    pub height: u64,
    pub time: DateTime<Utc>,
}

impl BlockHeader {
    #[must_use]
    pub fn new(chain_id: impl Into<String>, height: u64, time: DateTime<Utc>) -> Self {
        Self {
            chain_id: chain_id.into(),
            height,
            time,
        }
    }

    /// Header of the following block, `block_time_secs` later.
    #[must_use]
    pub fn next(&self, block_time_secs: i64) -> Self {
        Self {
            chain_id: self.chain_id.clone(),
            height: self.height + 1,
            time: self.time + chrono::Duration::seconds(block_time_secs),
        }
    }
}

impl fmt::Display for BlockHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.chain_id, self.height)
    }
}
