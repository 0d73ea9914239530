//! Resource store seam.
//!
//! The resolver only reads records. [`ResourceStore`] is the narrow interface
//! it consumes: list a kind in a scope (optionally by label selector) and get
//! a CA by name. [`KubeStore`] talks to the API server; [`MemoryStore`] keeps
//! records in memory for tests and offline use.

use crate::crd::{FabricCA, FabricOrdererNode, FabricOrderingService, FabricPeer};
use crate::error::{TopologyError, TopologyResult};
use k8s_openapi::NamespaceResourceScope;
use kube::api::ListParams;
use kube::{Api, Resource, ResourceExt};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Type alias for async store futures.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = TopologyResult<T>> + Send + 'a>>;

/// Namespace scope of a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// A single namespace.
    Namespace(String),
    /// Every namespace in the cluster.
    AllNamespaces,
}

impl Scope {
    /// Scope from a namespace flag; an empty string means all namespaces.
    pub fn from_namespace(namespace: &str) -> Self {
        if namespace.is_empty() {
            Self::AllNamespaces
        } else {
            Self::Namespace(namespace.to_string())
        }
    }

    /// The namespace, if the scope is a single one.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::Namespace(ns) => Some(ns),
            Self::AllNamespaces => None,
        }
    }

    /// Whether a record in `namespace` falls inside this scope.
    pub fn contains(&self, namespace: Option<&str>) -> bool {
        match self {
            Self::Namespace(ns) => namespace == Some(ns.as_str()),
            Self::AllNamespaces => true,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Namespace(ns) => f.write_str(ns),
            Self::AllNamespaces => f.write_str("<all namespaces>"),
        }
    }
}

/// An equality label selector (`key=value`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelSelector {
    /// Label key.
    pub key: String,
    /// Required value.
    pub value: String,
}

impl LabelSelector {
    /// Create a selector.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Selector for nodes released as part of the named ordering service.
    pub fn release(service_name: impl Into<String>) -> Self {
        Self::new(crate::crd::RELEASE_LABEL, service_name)
    }

    /// Whether a label set satisfies the selector.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        labels.get(&self.key) == Some(&self.value)
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Read access to Fabric resource records.
///
/// Failures are returned unchanged; the store is never retried here.
pub trait ResourceStore: Send + Sync {
    /// List certificate authorities.
    fn list_cas<'a>(&'a self, scope: &'a Scope) -> StoreFuture<'a, Vec<FabricCA>>;

    /// Get a certificate authority by name.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such CA exists
    fn get_ca<'a>(&'a self, namespace: &'a str, name: &'a str) -> StoreFuture<'a, FabricCA>;

    /// List peers.
    fn list_peers<'a>(&'a self, scope: &'a Scope) -> StoreFuture<'a, Vec<FabricPeer>>;

    /// List orderer nodes, optionally filtered by a label selector.
    fn list_orderer_nodes<'a>(
        &'a self,
        scope: &'a Scope,
        selector: Option<&'a LabelSelector>,
    ) -> StoreFuture<'a, Vec<FabricOrdererNode>>;

    /// List ordering services.
    fn list_ordering_services<'a>(
        &'a self,
        scope: &'a Scope,
    ) -> StoreFuture<'a, Vec<FabricOrderingService>>;
}

/// Store backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeStore {
    client: kube::Client,
}

impl KubeStore {
    /// Create a new store.
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    fn api<K>(&self, scope: &Scope) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        match scope {
            Scope::Namespace(ns) => Api::namespaced(self.client.clone(), ns),
            Scope::AllNamespaces => Api::all(self.client.clone()),
        }
    }

    async fn list<K>(
        &self,
        scope: &Scope,
        selector: Option<&LabelSelector>,
    ) -> TopologyResult<Vec<K>>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + fmt::Debug,
        K::DynamicType: Default,
    {
        let mut params = ListParams::default();
        if let Some(selector) = selector {
            params = params.labels(&selector.to_string());
        }

        let list = self.api::<K>(scope).list(&params).await?;
        tracing::trace!(
            kind = %K::kind(&K::DynamicType::default()),
            scope = %scope,
            count = list.items.len(),
            "Listed resources"
        );
        Ok(list.items)
    }
}

impl ResourceStore for KubeStore {
    fn list_cas<'a>(&'a self, scope: &'a Scope) -> StoreFuture<'a, Vec<FabricCA>> {
        Box::pin(self.list::<FabricCA>(scope, None))
    }

    fn get_ca<'a>(&'a self, namespace: &'a str, name: &'a str) -> StoreFuture<'a, FabricCA> {
        Box::pin(async move {
            let cas: Api<FabricCA> = Api::namespaced(self.client.clone(), namespace);
            cas.get(name).await.map_err(|e| match &e {
                kube::Error::Api(api_err) if api_err.code == 404 => {
                    TopologyError::not_found("FabricCA", format!("{}.{}", name, namespace))
                }
                _ => TopologyError::KubeError(e),
            })
        })
    }

    fn list_peers<'a>(&'a self, scope: &'a Scope) -> StoreFuture<'a, Vec<FabricPeer>> {
        Box::pin(self.list::<FabricPeer>(scope, None))
    }

    fn list_orderer_nodes<'a>(
        &'a self,
        scope: &'a Scope,
        selector: Option<&'a LabelSelector>,
    ) -> StoreFuture<'a, Vec<FabricOrdererNode>> {
        Box::pin(self.list::<FabricOrdererNode>(scope, selector))
    }

    fn list_ordering_services<'a>(
        &'a self,
        scope: &'a Scope,
    ) -> StoreFuture<'a, Vec<FabricOrderingService>> {
        Box::pin(self.list::<FabricOrderingService>(scope, None))
    }
}

/// In-memory store for testing and development.
///
/// Records are returned in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cas: RwLock<Vec<FabricCA>>,
    peers: RwLock<Vec<FabricPeer>>,
    orderer_nodes: RwLock<Vec<FabricOrdererNode>>,
    ordering_services: RwLock<Vec<FabricOrderingService>>,
    /// When set, every call fails with this message.
    failure: RwLock<Option<String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a certificate authority.
    pub fn add_ca(&self, ca: FabricCA) {
        self.cas.write().push(ca);
    }

    /// Add a peer.
    pub fn add_peer(&self, peer: FabricPeer) {
        self.peers.write().push(peer);
    }

    /// Add an orderer node.
    pub fn add_orderer_node(&self, node: FabricOrdererNode) {
        self.orderer_nodes.write().push(node);
    }

    /// Add an ordering service.
    pub fn add_ordering_service(&self, service: FabricOrderingService) {
        self.ordering_services.write().push(service);
    }

    /// Make every subsequent call fail with a store error.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write() = Some(message.into());
    }

    fn check(&self, kind: &str) -> TopologyResult<()> {
        match self.failure.read().as_ref() {
            Some(message) => Err(TopologyError::StoreError {
                kind: kind.to_string(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn select<K: ResourceExt + Clone>(
    records: &[K],
    scope: &Scope,
    selector: Option<&LabelSelector>,
) -> Vec<K> {
    records
        .iter()
        .filter(|r| scope.contains(r.namespace().as_deref()))
        .filter(|r| selector.is_none_or(|s| s.matches(r.labels())))
        .cloned()
        .collect()
}

impl ResourceStore for MemoryStore {
    fn list_cas<'a>(&'a self, scope: &'a Scope) -> StoreFuture<'a, Vec<FabricCA>> {
        let result = self
            .check("FabricCA")
            .map(|_| select(&self.cas.read(), scope, None));
        Box::pin(async move { result })
    }

    fn get_ca<'a>(&'a self, namespace: &'a str, name: &'a str) -> StoreFuture<'a, FabricCA> {
        let result = self.check("FabricCA").and_then(|_| {
            self.cas
                .read()
                .iter()
                .find(|ca| ca.name_any() == name && ca.namespace().as_deref() == Some(namespace))
                .cloned()
                .ok_or_else(|| {
                    TopologyError::not_found("FabricCA", format!("{}.{}", name, namespace))
                })
        });
        Box::pin(async move { result })
    }

    fn list_peers<'a>(&'a self, scope: &'a Scope) -> StoreFuture<'a, Vec<FabricPeer>> {
        let result = self
            .check("FabricPeer")
            .map(|_| select(&self.peers.read(), scope, None));
        Box::pin(async move { result })
    }

    fn list_orderer_nodes<'a>(
        &'a self,
        scope: &'a Scope,
        selector: Option<&'a LabelSelector>,
    ) -> StoreFuture<'a, Vec<FabricOrdererNode>> {
        let result = self
            .check("FabricOrdererNode")
            .map(|_| select(&self.orderer_nodes.read(), scope, selector));
        Box::pin(async move { result })
    }

    fn list_ordering_services<'a>(
        &'a self,
        scope: &'a Scope,
    ) -> StoreFuture<'a, Vec<FabricOrderingService>> {
        let result = self
            .check("FabricOrderingService")
            .map(|_| select(&self.ordering_services.read(), scope, None));
        Box::pin(async move { result })
    }
}
