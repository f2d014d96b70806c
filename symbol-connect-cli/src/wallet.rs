//! In-process demo wallet used by `simulate`.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use symbol_connect_core::error::RpcError;
use symbol_connect_core::traits::{same_listener, EventListener, WalletProvider};
use symbol_connect_core::types::{
    AccountInfo, ChainInfo, NetworkIdentifier, Permission, ProviderEvent, ProviderInfo,
    ProviderMethod, RpcRequest,
};

const DEMO_ICON: &str = "data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg'/>";

/// Symbol testnet network type byte.
const TESTNET_NETWORK_TYPE: u8 = 152;

/// Testnet generation hash.
const TESTNET_GENERATION_HASH: &str =
    "49D6E1CE276A85B70EAFE52349AACCA389302E7A9754BCF1221E79494FC665A4";

/// JSON-RPC error codes.
const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;

/// A wallet that keeps one account on testnet and grants every permission it
/// is asked for.
pub struct DemoWallet {
    account: AccountInfo,
    permissions: Mutex<Vec<Permission>>,
    listeners: DashMap<ProviderEvent, Vec<EventListener>>,
    connected: AtomicBool,
}

impl DemoWallet {
    /// Creates a connected wallet with a fresh random account.
    pub fn new() -> Self {
        Self {
            account: AccountInfo {
                public_key: random_public_key(),
                network_type: TESTNET_NETWORK_TYPE,
            },
            permissions: Mutex::new(Vec::new()),
            listeners: DashMap::new(),
            connected: AtomicBool::new(true),
        }
    }

    /// Identity record for the `index`-th demo wallet.
    pub fn info(index: usize) -> ProviderInfo {
        ProviderInfo {
            uuid: Uuid::new_v4().to_string(),
            name: format!("Demo Wallet {index}"),
            icon: DEMO_ICON.to_string(),
            rdns: format!("com.example.demo{index}"),
        }
    }

    /// Drops the wallet connection and notifies disconnect listeners.
    pub fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            self.emit(ProviderEvent::Disconnect, &Value::Null);
        }
    }

    fn emit(&self, event: ProviderEvent, payload: &Value) {
        let listeners = self
            .listeners
            .get(&event)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        debug!(%event, listeners = listeners.len(), "Wallet event");
        for listener in listeners {
            listener(payload);
        }
    }

    fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.lock().contains(&permission)
    }

    fn grant(&self, params: Option<&[Value]>) -> Result<Value, RpcError> {
        let permission = params
            .and_then(|params| params.first())
            .cloned()
            .and_then(|value| serde_json::from_value::<Permission>(value).ok())
            .ok_or_else(|| RpcError::new(INVALID_PARAMS, "Unknown permission"))?;

        let newly_granted = {
            let mut permissions = self.permissions.lock();
            if permissions.contains(&permission) {
                false
            } else {
                permissions.push(permission);
                true
            }
        };

        if newly_granted && permission == Permission::AccountInfo {
            self.emit(ProviderEvent::AccountChanged, &to_json(&self.account)?);
        }
        Ok(Value::Null)
    }

    fn account_info(&self) -> Result<Value, RpcError> {
        if self.has_permission(Permission::AccountInfo) {
            to_json(&self.account)
        } else {
            Ok(json!({ "publicKey": null, "networkType": null }))
        }
    }

    fn chain_info(&self) -> Result<Value, RpcError> {
        if !self.is_connected() {
            return Ok(json!({
                "networkType": null,
                "networkIdentifier": null,
                "generationHash": null,
            }));
        }
        to_json(&ChainInfo {
            network_type: TESTNET_NETWORK_TYPE,
            network_identifier: NetworkIdentifier::Testnet,
            generation_hash: TESTNET_GENERATION_HASH.to_string(),
        })
    }
}

impl Default for DemoWallet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletProvider for DemoWallet {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn request(&self, request: RpcRequest) -> Result<Value, RpcError> {
        debug!(method = %request.method, "Wallet request");
        match request.method {
            ProviderMethod::RequestPermission => self.grant(request.params.as_deref()),
            ProviderMethod::RequestTransaction => match request.params.as_deref() {
                Some([Value::String(payload)]) if !payload.is_empty() => Ok(Value::Null),
                _ => Err(RpcError::new(INVALID_PARAMS, "Expected one transaction payload")),
            },
            ProviderMethod::GetAccountInfo => self.account_info(),
            ProviderMethod::GetChainInfo => self.chain_info(),
            ProviderMethod::GetPermissions => to_json(&*self.permissions.lock()),
        }
    }

    fn on(&self, event: ProviderEvent, listener: EventListener) {
        self.listeners.entry(event).or_default().push(listener);
    }

    fn remove_listener(&self, event: ProviderEvent, listener: &EventListener) {
        if let Some(mut entry) = self.listeners.get_mut(&event) {
            entry.retain(|existing| !same_listener(existing, listener));
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|err| RpcError::new(INTERNAL_ERROR, err.to_string()))
}

fn random_public_key() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()).to_uppercase()
}
