//! Address resolution for Fabric components.
//!
//! A component can be exposed through several optional ingress mechanisms
//! plus a node-port fallback. [`ExposureConfig`] lists them in the precedence
//! order of the component kind and [`resolve`] picks the first one that is
//! configured with at least one host.
//!
//! | Kind             | Precedence                                        |
//! |------------------|---------------------------------------------------|
//! | CA, peer         | Istio, Gateway API, Traefik, node port            |
//! | Orderer          | Istio, Traefik, node port                         |
//! | Orderer admin    | admin Istio, admin Traefik, admin node port       |
//!
//! Only the first host of a mechanism is used. Public IP discovery is only
//! invoked when the node-port fallback is reached.

use crate::crd::{
    FabricCASpec, FabricCAStatus, FabricGatewayApi, FabricIstio, FabricOrdererNodeSpec,
    FabricOrdererNodeStatus, FabricPeerSpec, FabricPeerStatus, FabricTraefik,
};
use crate::discovery::PublicIpDiscovery;
use crate::error::TopologyResult;
use std::fmt;

/// In-cluster port of a certificate authority.
pub const CA_PORT: i32 = 7054;

/// In-cluster port of a peer.
pub const PEER_PORT: i32 = 7051;

/// In-cluster port of an orderer.
pub const ORDERER_PORT: i32 = 7050;

/// Port Traefik routes are served on.
pub const REVERSE_PROXY_PORT: i32 = 443;

/// A resolved network address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostPort {
    /// Host name or IP.
    pub host: String,
    /// Port.
    pub port: i32,
}

impl HostPort {
    /// Create a new address.
    pub fn new(host: impl Into<String>, port: i32) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Render as an `https://host:port` URL.
    pub fn https_url(&self) -> String {
        format!("https://{}", self)
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// One way a component can be reached from outside the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExposureMechanism {
    /// Istio ingress gateway.
    Mesh {
        /// Routed hosts.
        hosts: Vec<String>,
        /// Gateway port.
        port: i32,
    },
    /// Traefik ingress, served on 443.
    ReverseProxy {
        /// Routed hosts.
        hosts: Vec<String>,
    },
    /// Gateway API listener.
    Gateway {
        /// Routed hosts.
        hosts: Vec<String>,
        /// Listener port.
        port: i32,
    },
    /// Node port on any cluster node.
    NodePort {
        /// Port from the component status.
        port: i32,
    },
}

impl ExposureMechanism {
    /// Short name, logged when the mechanism wins resolution.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mesh { .. } => "istio",
            Self::ReverseProxy { .. } => "traefik",
            Self::Gateway { .. } => "gateway-api",
            Self::NodePort { .. } => "node-port",
        }
    }

    /// Address served by this mechanism if it is an ingress with hosts.
    ///
    /// An ingress with an empty host list counts as absent. The node-port
    /// fallback has no static address.
    pub fn ingress_address(&self) -> Option<HostPort> {
        match self {
            Self::Mesh { hosts, port } | Self::Gateway { hosts, port } => {
                hosts.first().map(|host| HostPort::new(host.clone(), *port))
            }
            Self::ReverseProxy { hosts } => hosts
                .first()
                .map(|host| HostPort::new(host.clone(), REVERSE_PROXY_PORT)),
            Self::NodePort { .. } => None,
        }
    }
}

/// Outcome of applying precedence to an [`ExposureConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// An ingress won.
    Ingress(HostPort),
    /// No ingress is configured; the public IP must be discovered.
    NodePort(i32),
}

/// Ordered exposure mechanisms of one endpoint, always ending in a node port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposureConfig {
    mechanisms: Vec<ExposureMechanism>,
}

impl ExposureConfig {
    /// Create a new builder.
    pub fn builder() -> ExposureConfigBuilder {
        ExposureConfigBuilder::default()
    }

    /// Mechanisms in precedence order.
    pub fn mechanisms(&self) -> &[ExposureMechanism] {
        &self.mechanisms
    }

    /// The mechanism that wins precedence.
    pub fn winner(&self) -> Option<&ExposureMechanism> {
        self.mechanisms.iter().find(|m| {
            matches!(m, ExposureMechanism::NodePort { .. }) || m.ingress_address().is_some()
        })
    }

    /// Apply precedence without touching the network.
    pub fn select(&self) -> Selection {
        for mechanism in &self.mechanisms {
            if let ExposureMechanism::NodePort { port } = mechanism {
                return Selection::NodePort(*port);
            }
            if let Some(address) = mechanism.ingress_address() {
                return Selection::Ingress(address);
            }
        }
        // The builder always terminates with a node port.
        Selection::NodePort(0)
    }
}

/// Builder for [`ExposureConfig`]. Mechanisms are ranked in call order.
#[derive(Debug, Clone, Default)]
pub struct ExposureConfigBuilder {
    mechanisms: Vec<ExposureMechanism>,
}

impl ExposureConfigBuilder {
    /// Add an Istio ingress, if configured.
    pub fn mesh(mut self, istio: Option<&FabricIstio>) -> Self {
        if let Some(istio) = istio {
            self.mechanisms.push(ExposureMechanism::Mesh {
                hosts: istio.hosts.clone(),
                port: istio.port,
            });
        }
        self
    }

    /// Add a Traefik ingress, if configured.
    pub fn reverse_proxy(mut self, traefik: Option<&FabricTraefik>) -> Self {
        if let Some(traefik) = traefik {
            self.mechanisms.push(ExposureMechanism::ReverseProxy {
                hosts: traefik.hosts.clone(),
            });
        }
        self
    }

    /// Add a Gateway API ingress, if configured.
    pub fn gateway(mut self, gateway: Option<&FabricGatewayApi>) -> Self {
        if let Some(gateway) = gateway {
            self.mechanisms.push(ExposureMechanism::Gateway {
                hosts: gateway.hosts.clone(),
                port: gateway.port,
            });
        }
        self
    }

    /// Terminate with the node-port fallback.
    pub fn node_port(mut self, port: i32) -> ExposureConfig {
        self.mechanisms.push(ExposureMechanism::NodePort { port });
        ExposureConfig {
            mechanisms: self.mechanisms,
        }
    }
}

/// Exposure of a certificate authority.
pub fn ca_exposure(spec: &FabricCASpec, status: Option<&FabricCAStatus>) -> ExposureConfig {
    ExposureConfig::builder()
        .mesh(spec.istio.as_ref())
        .gateway(spec.gateway_api.as_ref())
        .reverse_proxy(spec.traefik.as_ref())
        .node_port(status.map(|s| s.node_port).unwrap_or_default())
}

/// Exposure of a peer.
pub fn peer_exposure(spec: &FabricPeerSpec, status: Option<&FabricPeerStatus>) -> ExposureConfig {
    ExposureConfig::builder()
        .mesh(spec.istio.as_ref())
        .gateway(spec.gateway_api.as_ref())
        .reverse_proxy(spec.traefik.as_ref())
        .node_port(status.map(|s| s.node_port).unwrap_or_default())
}

/// Exposure of an orderer's client endpoint.
pub fn orderer_exposure(
    spec: &FabricOrdererNodeSpec,
    status: Option<&FabricOrdererNodeStatus>,
) -> ExposureConfig {
    ExposureConfig::builder()
        .mesh(spec.istio.as_ref())
        .reverse_proxy(spec.traefik.as_ref())
        .node_port(status.map(|s| s.node_port).unwrap_or_default())
}

/// Exposure of an orderer's admin endpoint.
pub fn orderer_admin_exposure(
    spec: &FabricOrdererNodeSpec,
    status: Option<&FabricOrdererNodeStatus>,
) -> ExposureConfig {
    ExposureConfig::builder()
        .mesh(spec.admin_istio.as_ref())
        .reverse_proxy(spec.admin_traefik.as_ref())
        .node_port(status.map(|s| s.admin_port).unwrap_or_default())
}

/// Resolve the public address of an endpoint.
///
/// # Errors
///
/// - `Discovery` if the node-port fallback is reached and discovery fails
pub async fn resolve<D>(config: &ExposureConfig, discovery: &D) -> TopologyResult<HostPort>
where
    D: PublicIpDiscovery + ?Sized,
{
    tracing::trace!(
        mechanism = config.winner().map_or("node-port", ExposureMechanism::kind),
        "Selected exposure mechanism"
    );
    match config.select() {
        Selection::Ingress(address) => Ok(address),
        Selection::NodePort(port) => {
            let host = discovery.discover().await?;
            Ok(HostPort::new(host, port))
        }
    }
}

/// In-cluster URL of a certificate authority.
pub fn ca_private_url(name: &str, namespace: &str) -> String {
    private_url(name, namespace, CA_PORT)
}

/// In-cluster URL of a peer.
pub fn peer_private_url(name: &str, namespace: &str) -> String {
    private_url(name, namespace, PEER_PORT)
}

/// In-cluster URL of an orderer.
pub fn orderer_private_url(name: &str, namespace: &str) -> String {
    private_url(name, namespace, ORDERER_PORT)
}

fn private_url(name: &str, namespace: &str, port: i32) -> String {
    format!("{}.{}:{}", name, namespace, port)
}
