//! Public IP discovery for the node-port fallback.
//!
//! When a component has no ingress configured it is only reachable through a
//! node port on some cluster node, so the resolver needs an externally
//! routable node address. Discovery is injected as a [`PublicIpDiscovery`]
//! capability rather than looked up globally.

use crate::error::{TopologyError, TopologyResult};
use k8s_openapi::api::core::v1::Node;
use kube::Api;
use kube::api::ListParams;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Type alias for async discovery futures.
pub type DiscoveryFuture<'a> = Pin<Box<dyn Future<Output = TopologyResult<String>> + Send + 'a>>;

/// Capability that returns an externally routable address of the cluster.
pub trait PublicIpDiscovery: Send + Sync {
    /// Discover the public IP.
    ///
    /// # Errors
    ///
    /// - `Discovery` if no address can be determined
    fn discover(&self) -> DiscoveryFuture<'_>;
}

impl<T: PublicIpDiscovery + ?Sized> PublicIpDiscovery for std::sync::Arc<T> {
    fn discover(&self) -> DiscoveryFuture<'_> {
        (**self).discover()
    }
}

/// Default timeout applied to node discovery.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Discovers the public IP from the addresses of cluster nodes.
///
/// The first `ExternalIP` of any node wins; otherwise the first `InternalIP`.
#[derive(Clone)]
pub struct KubeNodeDiscovery {
    client: kube::Client,
    timeout: Duration,
}

impl KubeNodeDiscovery {
    /// Create a node discovery with the default 30 second timeout.
    pub fn new(client: kube::Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_DISCOVERY_TIMEOUT,
        }
    }

    /// Create with a custom timeout.
    pub fn with_timeout(client: kube::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl PublicIpDiscovery for KubeNodeDiscovery {
    fn discover(&self) -> DiscoveryFuture<'_> {
        Box::pin(async move {
            let nodes: Api<Node> = Api::all(self.client.clone());

            let node_list = tokio::time::timeout(self.timeout, nodes.list(&ListParams::default()))
                .await
                .map_err(|_| {
                    TopologyError::Discovery(format!(
                        "listing nodes timed out after {}s",
                        self.timeout.as_secs()
                    ))
                })?
                .map_err(|e| TopologyError::Discovery(format!("failed to list nodes: {}", e)))?;

            let ip = select_public_ip(&node_list.items).ok_or_else(|| {
                TopologyError::Discovery(format!(
                    "none of the {} nodes reports an ExternalIP or InternalIP address",
                    node_list.items.len()
                ))
            })?;

            tracing::debug!(ip = %ip, "Discovered cluster public IP");
            Ok(ip)
        })
    }
}

/// Pick the public address from a node listing.
pub fn select_public_ip(nodes: &[Node]) -> Option<String> {
    let addresses = || {
        nodes
            .iter()
            .filter_map(|node| node.status.as_ref())
            .filter_map(|status| status.addresses.as_ref())
            .flatten()
    };

    addresses()
        .find(|a| a.type_ == "ExternalIP")
        .or_else(|| addresses().find(|a| a.type_ == "InternalIP"))
        .map(|a| a.address.clone())
}

/// Discovery returning a fixed address.
#[derive(Debug, Clone)]
pub struct StaticPublicIp(String);

impl StaticPublicIp {
    /// Create a fixed discovery.
    pub fn new(ip: impl Into<String>) -> Self {
        Self(ip.into())
    }
}

impl PublicIpDiscovery for StaticPublicIp {
    fn discover(&self) -> DiscoveryFuture<'_> {
        let ip = self.0.clone();
        Box::pin(async move { Ok(ip) })
    }
}
