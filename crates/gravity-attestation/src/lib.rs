//! # gravity-attestation
//!
//! Applies the effects of finalized Ethereum attestations to host-ledger state.
//!
//! ## Components
//!
//! 1. **DefaultAttestationHandler**: loads the attested event and dispatches by kind
//! 2. **origin**: ERC20 contract → host-native denom or voucher denom
//! 3. **CustodySettlement**: escrow release or voucher mint for deposits
//! 4. **BatchAcknowledger**: marks outgoing batches executed
//! 5. **Erc20Registrar**: binds a deployed ERC20 to its host denom
//! 6. **metadata_check**: ERC20 attributes vs. denom metadata
//!
//! ```text
//! Attestation ─► handler ─► EventStore
//!                   ├─ Deposit ──────► CustodySettlement ─► origin::resolve
//!                   ├─ Withdraw ─────► BatchAcknowledger
//!                   ├─ Erc20Deployed ► Erc20Registrar ─► metadata_check
//!                   └─ LogicCallExecuted ─► UnsupportedEventType
//! ```
//!
//! Every component receives only the keepers it needs. The handler never
//! commits; the runtime commits or discards the transaction it passed in.

pub mod batch_ack;
pub mod custody;
pub mod handler;
pub mod metadata_check;
pub mod origin;
pub mod registrar;

pub use batch_ack::BatchAcknowledger;
pub use custody::CustodySettlement;
pub use handler::{AttestationHandler, DefaultAttestationHandler};
pub use metadata_check::{validate_metadata, validate_metadata_with};
pub use origin::{TokenOrigin, resolve};
pub use registrar::Erc20Registrar;
