//! RPC vocabulary shared by the dapp facade and wallet providers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Methods a bound provider accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProviderMethod {
    /// Ask the user to grant a permission
    RequestPermission,
    /// Ask the user to sign and announce a transaction
    RequestTransaction,
    /// Currently selected account
    GetAccountInfo,
    /// Currently connected chain
    GetChainInfo,
    /// Permissions granted to the dapp
    GetPermissions,
}

impl ProviderMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderMethod::RequestPermission => "requestPermission",
            ProviderMethod::RequestTransaction => "requestTransaction",
            ProviderMethod::GetAccountInfo => "getAccountInfo",
            ProviderMethod::GetChainInfo => "getChainInfo",
            ProviderMethod::GetPermissions => "getPermissions",
        }
    }
}

impl fmt::Display for ProviderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single RPC call: `{ "method": .., "params"?: [..] }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Method to invoke
    pub method: ProviderMethod,
    /// Ordered arguments, omitted when the method takes none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Value>>,
}

impl RpcRequest {
    /// A call without parameters.
    pub fn new(method: ProviderMethod) -> Self {
        Self {
            method,
            params: None,
        }
    }

    /// A call with ordered parameters.
    pub fn with_params(method: ProviderMethod, params: Vec<Value>) -> Self {
        Self {
            method,
            params: Some(params),
        }
    }
}

/// Events a provider emits to subscribed listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProviderEvent {
    /// The user switched accounts
    AccountChanged,
    /// The wallet switched networks
    ChainChanged,
    /// The provider connected to the wallet
    Connect,
    /// The provider lost its wallet connection
    Disconnect,
    /// Free-form wallet message
    Message,
}

impl ProviderEvent {
    /// Wire name of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderEvent::AccountChanged => "accountChanged",
            ProviderEvent::ChainChanged => "chainChanged",
            ProviderEvent::Connect => "connect",
            ProviderEvent::Disconnect => "disconnect",
            ProviderEvent::Message => "message",
        }
    }
}

impl fmt::Display for ProviderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permissions a dapp may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    /// Read access to the selected account
    AccountInfo,
}

impl Permission {
    /// Wire name of the permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::AccountInfo => "accountInfo",
        }
    }
}

/// The account currently selected in the wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Account public key (hex)
    pub public_key: String,
    /// Symbol network type byte
    pub network_type: u8,
}

/// Symbol network the wallet is connected to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkIdentifier {
    /// Public main network
    Mainnet,
    /// Public test network
    Testnet,
}

/// The chain currently connected in the wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    /// Symbol network type byte
    pub network_type: u8,
    /// Network name
    pub network_identifier: NetworkIdentifier,
    /// Nemesis block generation hash (hex)
    pub generation_hash: String,
}

/// Truthiness of a JSON value: `null`, `false`, `0`, and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
