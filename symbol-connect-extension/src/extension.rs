//! Dapp-facing facade over a bound wallet provider.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use symbol_connect_core::error::{ConnectError, Result};
use symbol_connect_core::traits::{EventListener, SignalBus};
use symbol_connect_core::types::{
    is_truthy, AccountInfo, ChainInfo, Permission, ProviderEvent, ProviderHandle, ProviderMethod,
    RpcRequest,
};
use symbol_connect_discovery::first_provider;

use crate::binding::Binding;

/// Facade a dapp uses to talk to a Symbol wallet.
///
/// Every operation except [`is_connected`](Self::is_connected) and
/// [`register_provider`](Self::register_provider) requires a bound provider
/// and fails with [`ConnectError::ProviderNotRegistered`] otherwise, without
/// attempting any RPC call. RPC failures are returned as
/// [`ConnectError::Transport`] carrying the wallet's error unchanged.
pub struct SymbolExtension {
    bus: Arc<dyn SignalBus>,
    binding: Binding,
}

impl SymbolExtension {
    /// Creates an unbound facade that discovers providers on `bus`.
    pub fn new(bus: Arc<dyn SignalBus>) -> Self {
        Self {
            bus,
            binding: Binding::Unbound,
        }
    }

    /// Creates a facade already bound to `provider`.
    pub fn with_provider(bus: Arc<dyn SignalBus>, provider: ProviderHandle) -> Self {
        Self {
            bus,
            binding: Binding::Bound(provider),
        }
    }

    /// Current binding.
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Requests a wallet provider and binds to the first one announced.
    ///
    /// Suspends until a wallet answers; there is no built-in timeout. Later
    /// announcements never replace the binding.
    #[instrument(skip(self))]
    pub async fn register_provider(&mut self) -> Result<ProviderHandle> {
        let detail = first_provider(&self.bus).await?;
        info!(wallet = %detail.info().name, rdns = %detail.info().rdns, "Provider registered");

        let provider = detail.into_provider();
        self.binding = Binding::Bound(Arc::clone(&provider));
        Ok(provider)
    }

    /// Whether the wallet is reachable through the bound provider.
    ///
    /// `false` while unbound. A disconnected provider needs a page reload to
    /// reconnect.
    pub fn is_connected(&self) -> bool {
        match &self.binding {
            Binding::Bound(provider) => provider.is_connected(),
            Binding::Unbound => false,
        }
    }

    /// Asks the user to sign and announce a serialized transaction.
    #[instrument(skip(self, transaction_payload))]
    pub async fn request_transaction(&self, transaction_payload: &str) -> Result<()> {
        self.call(RpcRequest::with_params(
            ProviderMethod::RequestTransaction,
            vec![json!(transaction_payload)],
        ))
        .await?;
        Ok(())
    }

    /// Asks the user for permission to read the selected account.
    #[instrument(skip(self))]
    pub async fn request_account_permission(&self) -> Result<()> {
        self.call(RpcRequest::with_params(
            ProviderMethod::RequestPermission,
            vec![json!(Permission::AccountInfo.as_str())],
        ))
        .await?;
        Ok(())
    }

    /// The selected account, or `None` if the wallet reports no public key
    /// (permission not granted, or no account).
    #[instrument(skip(self))]
    pub async fn get_account_info(&self) -> Result<Option<AccountInfo>> {
        self.read_optional(ProviderMethod::GetAccountInfo, "publicKey")
            .await
    }

    /// The connected chain, or `None` if the wallet reports no generation hash
    /// (not connected, or switching networks).
    #[instrument(skip(self))]
    pub async fn get_chain_info(&self) -> Result<Option<ChainInfo>> {
        self.read_optional(ProviderMethod::GetChainInfo, "generationHash")
            .await
    }

    /// Permissions granted to the dapp. A null answer means none.
    ///
    /// Entries this crate does not know are skipped.
    #[instrument(skip(self))]
    pub async fn get_permissions(&self) -> Result<Vec<Permission>> {
        let method = ProviderMethod::GetPermissions;
        let entries: Vec<Value> = match self.call(RpcRequest::new(method)).await? {
            Value::Null => return Ok(Vec::new()),
            value => decode(method, value)?,
        };

        Ok(entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Permission>(entry.clone()) {
                Ok(permission) => Some(permission),
                Err(_) => {
                    debug!(%entry, "Skipping unknown permission");
                    None
                }
            })
            .collect())
    }

    /// Calls `listener` whenever the user switches accounts.
    pub fn add_account_info_listener(&self, listener: EventListener) -> Result<()> {
        self.subscribe(ProviderEvent::AccountChanged, listener)
    }

    /// Removes a listener added with
    /// [`add_account_info_listener`](Self::add_account_info_listener).
    pub fn remove_account_info_listener(&self, listener: &EventListener) -> Result<()> {
        self.unsubscribe(ProviderEvent::AccountChanged, listener)
    }

    /// Calls `listener` whenever the wallet switches networks.
    pub fn add_chain_info_listener(&self, listener: EventListener) -> Result<()> {
        self.subscribe(ProviderEvent::ChainChanged, listener)
    }

    /// Removes a listener added with
    /// [`add_chain_info_listener`](Self::add_chain_info_listener).
    pub fn remove_chain_info_listener(&self, listener: &EventListener) -> Result<()> {
        self.unsubscribe(ProviderEvent::ChainChanged, listener)
    }

    /// Calls `listener` when the wallet connects.
    pub fn add_connect_listener(&self, listener: EventListener) -> Result<()> {
        self.subscribe(ProviderEvent::Connect, listener)
    }

    /// Removes a listener added with
    /// [`add_connect_listener`](Self::add_connect_listener).
    pub fn remove_connect_listener(&self, listener: &EventListener) -> Result<()> {
        self.unsubscribe(ProviderEvent::Connect, listener)
    }

    /// Calls `listener` when the wallet disconnects.
    pub fn add_disconnect_listener(&self, listener: EventListener) -> Result<()> {
        self.subscribe(ProviderEvent::Disconnect, listener)
    }

    /// Removes a listener added with
    /// [`add_disconnect_listener`](Self::add_disconnect_listener).
    pub fn remove_disconnect_listener(&self, listener: &EventListener) -> Result<()> {
        self.unsubscribe(ProviderEvent::Disconnect, listener)
    }

    async fn call(&self, request: RpcRequest) -> Result<Value> {
        let provider = self.binding.provider()?;
        debug!(method = %request.method, "Calling provider");
        Ok(provider.request(request).await?)
    }

    async fn read_optional<T: DeserializeOwned>(
        &self,
        method: ProviderMethod,
        identity_field: &str,
    ) -> Result<Option<T>> {
        let value = self.call(RpcRequest::new(method)).await?;

        if !value.get(identity_field).is_some_and(is_truthy) {
            debug!(%method, identity_field, "Wallet reported no value");
            return Ok(None);
        }
        decode(method, value).map(Some)
    }

    fn subscribe(&self, event: ProviderEvent, listener: EventListener) -> Result<()> {
        self.binding.provider()?.on(event, listener);
        debug!(%event, "Listener subscribed");
        Ok(())
    }

    fn unsubscribe(&self, event: ProviderEvent, listener: &EventListener) -> Result<()> {
        self.binding.provider()?.remove_listener(event, listener);
        debug!(%event, "Listener unsubscribed");
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(method: ProviderMethod, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|err| ConnectError::InvalidResponse {
        method,
        reason: err.to_string(),
    })
}

impl std::fmt::Debug for SymbolExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolExtension")
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use symbol_connect_bus::InMemorySignalBus;
    use symbol_connect_core::error::RpcError;
    use symbol_connect_core::traits::{same_listener, WalletProvider};
    use symbol_connect_core::types::{
        same_provider, Announcement, NetworkIdentifier, ProviderDetail, ProviderInfo,
        ProviderSlot, RawProviderDetail, Signal, SignalKind,
    };
    use symbol_connect_discovery::announce_provider;
    use tokio_test::assert_ready;

    type Responder = Box<dyn Fn(&RpcRequest) -> std::result::Result<Value, RpcError> + Send + Sync>;

    /// Provider that answers from a script and records every interaction.
    struct MockProvider {
        responder: Responder,
        requests: Mutex<Vec<RpcRequest>>,
        subscribed: Mutex<Vec<(ProviderEvent, EventListener)>>,
        unsubscribed: Mutex<Vec<(ProviderEvent, EventListener)>>,
    }

    impl MockProvider {
        fn answering(value: Value) -> Arc<Self> {
            Self::with_responder(Box::new(move |_: &RpcRequest| Ok(value.clone())))
        }

        fn with_responder(responder: Responder) -> Arc<Self> {
            Arc::new(Self {
                responder,
                requests: Mutex::new(Vec::new()),
                subscribed: Mutex::new(Vec::new()),
                unsubscribed: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<RpcRequest> {
            self.requests.lock().clone()
        }
    }

    #[async_trait]
    impl WalletProvider for MockProvider {
        fn is_connected(&self) -> bool {
            true
        }

        async fn request(&self, request: RpcRequest) -> std::result::Result<Value, RpcError> {
            let answer = (self.responder)(&request);
            self.requests.lock().push(request);
            answer
        }

        fn on(&self, event: ProviderEvent, listener: EventListener) {
            self.subscribed.lock().push((event, listener));
        }

        fn remove_listener(&self, event: ProviderEvent, listener: &EventListener) {
            self.unsubscribed.lock().push((event, listener.clone()));
        }
    }

    fn bus() -> Arc<dyn SignalBus> {
        Arc::new(InMemorySignalBus::new())
    }

    fn bound(provider: &Arc<MockProvider>) -> SymbolExtension {
        SymbolExtension::with_provider(bus(), provider.clone())
    }

    fn wallet_info(name: &str) -> ProviderInfo {
        ProviderInfo::new(
            "350670db-19fa-4704-a166-e52e178b59d2",
            name,
            "data:image/svg+xml,<svg/>",
            "com.example.wallet",
        )
        .unwrap()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PROVIDER REGISTRATION
    // ═══════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn test_unregistered_provider_rejects_rpc() {
        let extension = SymbolExtension::new(bus());

        let err = extension.get_permissions().await.unwrap_err();

        assert!(matches!(err, ConnectError::ProviderNotRegistered));
        assert_eq!(err.to_string(), "Provider is not registered.");
        assert!(!extension.is_connected());
    }

    #[tokio::test]
    async fn test_every_domain_operation_requires_binding() {
        let extension = SymbolExtension::new(bus());
        let listener: EventListener = Arc::new(|_: &Value| {});

        let outcomes = vec![
            extension.request_transaction("abc").await.err(),
            extension.request_account_permission().await.err(),
            extension.get_account_info().await.err(),
            extension.get_chain_info().await.err(),
            extension.get_permissions().await.err(),
            extension.add_account_info_listener(listener.clone()).err(),
            extension.remove_account_info_listener(&listener).err(),
            extension.add_chain_info_listener(listener.clone()).err(),
            extension.remove_chain_info_listener(&listener).err(),
            extension.add_connect_listener(listener.clone()).err(),
            extension.remove_connect_listener(&listener).err(),
            extension.add_disconnect_listener(listener.clone()).err(),
            extension.remove_disconnect_listener(&listener).err(),
        ];

        for outcome in outcomes {
            assert!(matches!(outcome, Some(ConnectError::ProviderNotRegistered)));
        }
    }

    #[tokio::test]
    async fn test_register_provider_binds_announced_wallet() {
        let bus = bus();
        let provider = MockProvider::answering(Value::Null);
        let _wallet = announce_provider(
            &bus,
            ProviderDetail::new(wallet_info("Example Wallet"), provider.clone()),
        )
        .unwrap();

        let mut extension = SymbolExtension::new(bus);
        let registered = extension.register_provider().await.unwrap();

        let provider_handle: ProviderHandle = provider.clone();
        assert!(same_provider(&registered, &provider_handle));
        assert!(extension.binding().is_bound());
        assert!(extension.is_connected());
        assert!(extension.get_permissions().await.unwrap().is_empty());
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_register_provider_waits_for_late_wallet() {
        let bus = bus();
        let provider = MockProvider::answering(Value::Null);
        let mut extension = SymbolExtension::new(bus.clone());

        let registered = {
            let mut pending = tokio_test::task::spawn(extension.register_provider());
            assert!(pending.poll().is_pending());

            let _wallet = announce_provider(
                &bus,
                ProviderDetail::new(wallet_info("Late Wallet"), provider.clone()),
            )
            .unwrap();

            assert_ready!(pending.poll()).unwrap()
        };

        let provider_handle: ProviderHandle = provider;
        assert!(same_provider(&registered, &provider_handle));
        assert!(extension.is_connected());
    }

    #[tokio::test]
    async fn test_register_provider_skips_malformed_announcement() {
        let bus = bus();
        let provider = MockProvider::answering(Value::Null);
        let mut extension = SymbolExtension::new(bus.clone());

        let registered = {
            let mut pending = tokio_test::task::spawn(extension.register_provider());
            assert!(pending.poll().is_pending());

            let broken = RawProviderDetail {
                info: wallet_info("Broken Wallet").to_value(),
                provider: ProviderSlot::Value(Value::Null),
            };
            assert!(bus.dispatch(Signal::Announce(Announcement::frozen(broken))).is_err());
            assert!(pending.poll().is_pending());

            let _wallet = announce_provider(
                &bus,
                ProviderDetail::new(wallet_info("Example Wallet"), provider.clone()),
            )
            .unwrap();

            assert_ready!(pending.poll()).unwrap()
        };

        let provider_handle: ProviderHandle = provider;
        assert!(same_provider(&registered, &provider_handle));
        assert!(extension.binding().is_bound());
    }

    #[tokio::test]
    async fn test_later_announcements_do_not_rebind() {
        let bus = bus();
        let first = MockProvider::answering(Value::Null);
        let second = MockProvider::answering(Value::Null);

        let _a = announce_provider(&bus, ProviderDetail::new(wallet_info("First"), first.clone())).unwrap();
        let mut extension = SymbolExtension::new(bus.clone());
        extension.register_provider().await.unwrap();

        let _b = announce_provider(&bus, ProviderDetail::new(wallet_info("Second"), second.clone())).unwrap();
        bus.dispatch(Signal::Request).unwrap();

        extension.get_permissions().await.unwrap();
        assert_eq!(first.requests().len(), 1);
        assert!(second.requests().is_empty());
    }

    #[tokio::test]
    async fn test_registration_leaves_no_listener_behind() {
        let bus = Arc::new(InMemorySignalBus::new());
        let shared: Arc<dyn SignalBus> = bus.clone();
        let _wallet = announce_provider(
            &shared,
            ProviderDetail::new(wallet_info("Example Wallet"), MockProvider::answering(Value::Null)),
        )
        .unwrap();

        let mut extension = SymbolExtension::new(shared);
        extension.register_provider().await.unwrap();

        assert_eq!(bus.listener_count(SignalKind::Announce), 0);
        assert_eq!(bus.dispatch_count(SignalKind::Request), 1);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // RPC OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn test_request_transaction() {
        let provider = MockProvider::answering(Value::Null);
        let extension = bound(&provider);

        extension.request_transaction("abc").await.unwrap();

        assert_eq!(
            provider.requests(),
            vec![RpcRequest::with_params(
                ProviderMethod::RequestTransaction,
                vec![json!("abc")]
            )]
        );
    }

    #[tokio::test]
    async fn test_request_account_permission() {
        let provider = MockProvider::answering(Value::Null);
        let extension = bound(&provider);

        extension.request_account_permission().await.unwrap();

        assert_eq!(
            provider.requests(),
            vec![RpcRequest::with_params(
                ProviderMethod::RequestPermission,
                vec![json!("accountInfo")]
            )]
        );
    }

    #[tokio::test]
    async fn test_account_info_with_public_key() {
        let provider = MockProvider::answering(json!({ "publicKey": "abc", "networkType": 123 }));
        let extension = bound(&provider);

        let account = extension.get_account_info().await.unwrap();

        assert_eq!(
            account,
            Some(AccountInfo {
                public_key: "abc".into(),
                network_type: 123,
            })
        );
        assert_eq!(
            provider.requests(),
            vec![RpcRequest::new(ProviderMethod::GetAccountInfo)]
        );
    }

    #[tokio::test]
    async fn test_account_info_without_public_key() {
        for answer in [
            json!({ "publicKey": null, "networkType": null }),
            json!({ "publicKey": "", "networkType": 104 }),
            json!({}),
            Value::Null,
        ] {
            let provider = MockProvider::answering(answer);
            let extension = bound(&provider);

            assert_eq!(extension.get_account_info().await.unwrap(), None);
            assert_eq!(provider.requests().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_chain_info_with_generation_hash() {
        let provider = MockProvider::answering(json!({
            "networkType": 123,
            "networkIdentifier": "mainnet",
            "generationHash": "abc",
        }));
        let extension = bound(&provider);

        let chain = extension.get_chain_info().await.unwrap();

        assert_eq!(
            chain,
            Some(ChainInfo {
                network_type: 123,
                network_identifier: NetworkIdentifier::Mainnet,
                generation_hash: "abc".into(),
            })
        );
        assert_eq!(
            provider.requests(),
            vec![RpcRequest::new(ProviderMethod::GetChainInfo)]
        );
    }

    #[tokio::test]
    async fn test_chain_info_without_generation_hash() {
        let provider = MockProvider::answering(json!({
            "networkType": null,
            "networkIdentifier": null,
            "generationHash": null,
        }));
        let extension = bound(&provider);

        assert_eq!(extension.get_chain_info().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_permissions() {
        let provider = MockProvider::answering(json!(["accountInfo"]));
        let extension = bound(&provider);

        assert_eq!(
            extension.get_permissions().await.unwrap(),
            vec![Permission::AccountInfo]
        );
        assert_eq!(
            provider.requests(),
            vec![RpcRequest::new(ProviderMethod::GetPermissions)]
        );
    }

    #[tokio::test]
    async fn test_unknown_permissions_are_skipped() {
        let provider = MockProvider::answering(json!(["signTransactions", "accountInfo", 7]));
        let extension = bound(&provider);

        assert_eq!(
            extension.get_permissions().await.unwrap(),
            vec![Permission::AccountInfo]
        );
    }

    #[tokio::test]
    async fn test_permissions_must_be_a_list() {
        let provider = MockProvider::answering(json!({ "accountInfo": true }));
        let extension = bound(&provider);

        let err = extension.get_permissions().await.unwrap_err();
        assert!(matches!(
            err,
            ConnectError::InvalidResponse { method: ProviderMethod::GetPermissions, .. }
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_passes_through() {
        let rpc_error = RpcError {
            code: 4001,
            message: "User rejected the request.".into(),
            data: Some(json!({ "origin": "popup" })),
        };
        let expected = rpc_error.clone();
        let provider = MockProvider::with_responder(Box::new(move |_: &RpcRequest| Err(rpc_error.clone())));
        let extension = bound(&provider);

        let err = extension.request_transaction("abc").await.unwrap_err();

        match err {
            ConnectError::Transport(inner) => assert_eq!(inner, expected),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_answer() {
        let provider = MockProvider::answering(json!({ "publicKey": "abc", "networkType": "main" }));
        let extension = bound(&provider);

        let err = extension.get_account_info().await.unwrap_err();

        assert!(matches!(
            err,
            ConnectError::InvalidResponse { method: ProviderMethod::GetAccountInfo, .. }
        ));
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // LISTENERS
    // ═══════════════════════════════════════════════════════════════════════════

    type Add = fn(&SymbolExtension, EventListener) -> Result<()>;
    type Remove = fn(&SymbolExtension, &EventListener) -> Result<()>;

    fn listener_table() -> Vec<(ProviderEvent, Add, Remove)> {
        vec![
            (
                ProviderEvent::AccountChanged,
                SymbolExtension::add_account_info_listener,
                SymbolExtension::remove_account_info_listener,
            ),
            (
                ProviderEvent::ChainChanged,
                SymbolExtension::add_chain_info_listener,
                SymbolExtension::remove_chain_info_listener,
            ),
            (
                ProviderEvent::Connect,
                SymbolExtension::add_connect_listener,
                SymbolExtension::remove_connect_listener,
            ),
            (
                ProviderEvent::Disconnect,
                SymbolExtension::add_disconnect_listener,
                SymbolExtension::remove_disconnect_listener,
            ),
        ]
    }

    #[test]
    fn test_listeners_pass_through() {
        for (event, add, remove) in listener_table() {
            let provider = MockProvider::answering(Value::Null);
            let extension = bound(&provider);
            let listener: EventListener = Arc::new(|_: &Value| {});

            add(&extension, listener.clone()).unwrap();
            remove(&extension, &listener).unwrap();

            let subscribed = provider.subscribed.lock();
            assert_eq!(subscribed.len(), 1);
            assert_eq!(subscribed[0].0, event);
            assert!(same_listener(&subscribed[0].1, &listener));

            let unsubscribed = provider.unsubscribed.lock();
            assert_eq!(unsubscribed.len(), 1);
            assert_eq!(unsubscribed[0].0, event);
            assert!(same_listener(&unsubscribed[0].1, &listener));
            assert!(provider.requests().is_empty());
        }
    }
}
