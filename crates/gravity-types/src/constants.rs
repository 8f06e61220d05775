//! System-wide constants for the Gravity attestation engine.

/// Module name of the bridge on the host ledger.
pub const MODULE_NAME: &str = "gravity";

/// Default module holding that escrows host-native coins while they live on Ethereum.
pub const DEFAULT_ESCROW_ACCOUNT: &str = MODULE_NAME;

/// Default module holding that mints vouchers for Ethereum-originated tokens.
pub const DEFAULT_ISSUANCE_ACCOUNT: &str = MODULE_NAME;

/// Default prefix of synthesized voucher denoms (`gravity0x...`).
pub const DEFAULT_VOUCHER_PREFIX: &str = "gravity";

/// Length in bytes of an Ethereum contract address.
pub const ETH_ADDRESS_LEN: usize = 20;

/// Length in bytes of a host-ledger account address.
pub const ACC_ADDRESS_LEN: usize = 20;

/// Minimum length of a coin denom.
pub const MIN_DENOM_LEN: usize = 3;

/// Maximum length of a coin denom.
pub const MAX_DENOM_LEN: usize = 128;

/// Domain tag for event identifiers.
pub const EVENT_ID_DOMAIN: &[u8] = b"gravity:event_id:v1:";

/// Domain tag for ledger state roots.
pub const STATE_ROOT_DOMAIN: &[u8] = b"gravity:state_root:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
