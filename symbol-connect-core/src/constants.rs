//! Protocol constants for Symbol Connect.
//!
//! Event names are part of the page-level contract with wallet extensions and
//! must not change without coordinating with wallet implementations.

// ═══════════════════════════════════════════════════════════════════════════════
// DISCOVERY EVENT NAMES
// ═══════════════════════════════════════════════════════════════════════════════

/// Event a wallet dispatches to announce its provider.
pub const ANNOUNCE_PROVIDER_EVENT: &str = "symbol:announceProvider";

/// Event a dapp dispatches to ask wallets to (re-)announce.
pub const REQUEST_PROVIDER_EVENT: &str = "symbol:requestProvider";

/// Reserved event name. Declared by the protocol, not dispatched by anyone yet.
pub const INITIALIZED_EVENT: &str = "symbol:initialized";

// ═══════════════════════════════════════════════════════════════════════════════
// IDENTITY FORMAT
// ═══════════════════════════════════════════════════════════════════════════════

/// Prefix every provider icon must start with (an image data URI).
pub const ICON_DATA_URI_PREFIX: &str = "data:image";

/// All-zero UUID accepted in place of a v4 UUID.
pub const NIL_UUID: &str = "00000000-0000-0000-0000-000000000000";

/// Length of a hyphenated UUID.
pub const UUID_LENGTH: usize = 36;

/// Minimum total length of an rdns identifier.
pub const RDNS_MIN_LENGTH: usize = 4;

/// Maximum total length of an rdns identifier.
pub const RDNS_MAX_LENGTH: usize = 253;

/// Maximum length of a single rdns label.
pub const RDNS_LABEL_MAX_LENGTH: usize = 63;

/// Minimum length of the final (alphabetic) rdns label.
pub const RDNS_TLD_MIN_LENGTH: usize = 2;
