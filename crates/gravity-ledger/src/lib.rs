//! # gravity-ledger
//!
//! Deterministic in-memory host-ledger state that the attestation engine
//! runs against, and the transaction wrapper the runtime uses to apply an
//! attestation all-or-nothing.
//!
//! ## Components
//!
//! 1. **Bank**: account and module holdings, supply, denom metadata, mint permissions
//! 2. **Erc20DenomMap**: create-once ERC20 <-> denom bindings
//! 3. **BatchPool**: outgoing batches pending execution on Ethereum
//! 4. **EventLog**: finalized Ethereum events by id
//! 5. **LedgerState / StateTx**: committed state, working-copy transactions, state root
//!
//! Every map is ordered, so iteration and the state root are identical on
//! every replica.
//!
//! ```text
//! runtime: state.begin(header) → handler.on_attestation(&mut tx, att)
//!        → Ok: state.commit(tx)   Err: drop(tx)
//! ```

pub mod bank;
pub mod batch_pool;
pub mod event_log;
pub mod state;
pub mod supply;
pub mod token_map;

pub use bank::{Bank, Holder};
pub use batch_pool::BatchPool;
pub use event_log::EventLog;
pub use state::{LedgerState, StateTx};
pub use supply::{SupplyConservation, SupplyViolation};
pub use token_map::Erc20DenomMap;
