//! Error types for Symbol Connect.
//!
//! This module provides the error hierarchy using `thiserror`. Discovery and
//! binding errors are detected locally; transport errors carry the provider's
//! own [`RpcError`] untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{InfoField, ProviderMethod};

/// Result type alias using `ConnectError`.
pub type Result<T> = std::result::Result<T, ConnectError>;

/// Error reported by a wallet provider for a failed RPC call.
///
/// Mirrors the EIP-1193 `ProviderRpcError` shape.
#[derive(Clone, Debug, PartialEq, Error, Serialize, Deserialize)]
#[error("RPC error {code}: {message}")]
pub struct RpcError {
    /// Numeric error code chosen by the wallet
    pub code: i64,
    /// Human-readable message
    pub message: String,
    /// Optional wallet-specific payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    /// Creates an RPC error without extra data.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Main error type for all Symbol Connect operations.
#[derive(Debug, Error)]
pub enum ConnectError {
    // ═══════════════════════════════════════════════════════════════════════════
    // DISCOVERY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// An announce signal failed the kind, frozen, or identity checks.
    #[error("Invalid AnnounceProviderEvent object received from {event} event.")]
    MalformedAnnouncement {
        /// Event name of the offending signal kind
        event: &'static str,
    },

    /// An identity field failed its format rule.
    #[error("Invalid provider info field '{field}': {reason}")]
    InvalidProviderInfo {
        /// The field that failed
        field: InfoField,
        /// Why it failed
        reason: String,
    },

    /// A provider detail record is not well formed.
    #[error("Invalid provider detail: {0}")]
    InvalidProviderDetail(String),

    /// The bus dropped a discovery listener before any provider answered.
    #[error("Discovery listener was closed before a provider was announced")]
    DiscoveryClosed,

    // ═══════════════════════════════════════════════════════════════════════════
    // BINDING ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A facade operation needs a bound provider and none is registered.
    #[error("Provider is not registered.")]
    ProviderNotRegistered,

    // ═══════════════════════════════════════════════════════════════════════════
    // TRANSPORT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The bound provider rejected an RPC call.
    #[error("Transport failure: {0}")]
    Transport(#[from] RpcError),

    /// The provider answered with a value that does not decode.
    #[error("Invalid response to {method}: {reason}")]
    InvalidResponse {
        /// The RPC method that was called
        method: ProviderMethod,
        /// Decoding failure
        reason: String,
    },
}

impl ConnectError {
    /// Returns true if retrying the same operation could succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ConnectError::Transport(_) | ConnectError::DiscoveryClosed
        )
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ConnectError::MalformedAnnouncement { .. }
                | ConnectError::InvalidProviderInfo { .. }
                | ConnectError::InvalidProviderDetail(_)
        )
    }
}
