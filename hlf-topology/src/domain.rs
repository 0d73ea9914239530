//! Denormalized views of Fabric components.
//!
//! The `map_*` functions turn a raw record into a value object carrying its
//! resolved public and private URLs, so downstream code never has to query
//! the store again. Domain objects own their data; a record is treated as an
//! immutable snapshot.

use crate::crd::{
    FabricCA, FabricCASpec, FabricCAStatus, FabricOrdererNode, FabricOrdererNodeSpec,
    FabricOrdererNodeStatus, FabricOrderingService, FabricPeer, FabricPeerSpec, FabricPeerStatus,
    RELEASE_LABEL,
};
use crate::discovery::PublicIpDiscovery;
use crate::error::{TopologyError, TopologyResult};
use crate::resolver::{self, HostPort};
use kube::{Resource, ResourceExt};
use std::fmt;

/// Qualified `name.namespace` identifier used as the lookup key everywhere.
pub fn full_name(name: &str, namespace: &str) -> String {
    format!("{}.{}", name, namespace)
}

/// Name and namespace of a record, or `MalformedRecord` when it has no namespace.
pub(crate) fn record_identity<K>(record: &K) -> TopologyResult<(String, String)>
where
    K: Resource<DynamicType = ()>,
{
    let name = record.name_any();
    let namespace = record
        .namespace()
        .ok_or_else(|| TopologyError::MalformedRecord {
            kind: K::kind(&()).to_string(),
            name: name.clone(),
            reason: "record has no namespace".to_string(),
        })?;
    Ok((name, namespace))
}

/// A certificate authority with resolved addresses.
#[derive(Debug, Clone)]
pub struct ClusterCA {
    /// Record name.
    pub name: String,
    /// Record namespace.
    pub namespace: String,
    /// `name.namespace`.
    pub full_name: String,
    /// The record as read from the store.
    pub object: FabricCA,
    /// Resolved public address.
    pub public_address: HostPort,
    /// `https://host:port`.
    pub public_url: String,
    /// `name.namespace:7054`.
    pub private_url: String,
    /// Enroll ID of the first registered identity, or empty.
    pub enroll_id: String,
    /// Enroll secret of the first registered identity, or empty.
    pub enroll_secret: String,
}

impl ClusterCA {
    /// The CA spec.
    pub fn spec(&self) -> &FabricCASpec {
        &self.object.spec
    }

    /// The CA status, if reported.
    pub fn status(&self) -> Option<&FabricCAStatus> {
        self.object.status.as_ref()
    }

    /// TLS certificate of the CA server, or empty if not yet reported.
    pub fn tls_cert(&self) -> &str {
        self.status().map(|s| s.tls_cert.as_str()).unwrap_or_default()
    }
}

/// Certificate and key of an identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerIdentity {
    /// Private key (PEM).
    pub key: String,
    /// Certificate (PEM).
    pub cert: String,
}

/// A peer with resolved addresses.
#[derive(Debug, Clone)]
pub struct ClusterPeer {
    /// Record name.
    pub name: String,
    /// Record namespace.
    pub namespace: String,
    /// `name.namespace`.
    pub full_name: String,
    /// The record as read from the store.
    pub object: FabricPeer,
    /// Resolved public address.
    pub public_address: HostPort,
    /// `host:port`.
    pub public_url: String,
    /// `name.namespace:7051`.
    pub private_url: String,
    /// MSP ID of the peer's organization.
    pub msp_id: String,
    /// TLS CA certificate. Empty until enrollment material is attached.
    pub tls_ca_cert: String,
    /// Root certificate. Empty until enrollment material is attached.
    pub root_cert: String,
    /// Identity used to talk to the peer. Empty until enrollment material is attached.
    pub identity: PeerIdentity,
}

impl ClusterPeer {
    /// The peer spec.
    pub fn spec(&self) -> &FabricPeerSpec {
        &self.object.spec
    }

    /// The peer status, if reported.
    pub fn status(&self) -> Option<&FabricPeerStatus> {
        self.object.status.as_ref()
    }
}

/// An orderer node with resolved client and admin addresses.
#[derive(Debug, Clone)]
pub struct ClusterOrdererNode {
    /// Record name.
    pub name: String,
    /// Record namespace.
    pub namespace: String,
    /// `name.namespace`.
    pub full_name: String,
    /// The record as read from the store.
    pub object: FabricOrdererNode,
    /// Resolved public address of the orderer endpoint.
    pub public_address: HostPort,
    /// `host:port`.
    pub public_url: String,
    /// `name.namespace:7050`.
    pub private_url: String,
    /// Resolved public address of the admin endpoint.
    pub admin_address: HostPort,
    /// `https://host:port` of the admin endpoint.
    pub admin_url: String,
    /// MSP ID of the ordering organization.
    pub msp_id: String,
}

impl ClusterOrdererNode {
    /// The orderer node spec.
    pub fn spec(&self) -> &FabricOrdererNodeSpec {
        &self.object.spec
    }

    /// The orderer node status, if reported.
    pub fn status(&self) -> Option<&FabricOrdererNodeStatus> {
        self.object.status.as_ref()
    }

    /// Name of the ordering service that released this node, if labelled.
    pub fn release(&self) -> Option<&str> {
        self.object.labels().get(RELEASE_LABEL).map(String::as_str)
    }
}

/// Kind of organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrganizationType {
    /// Peer organization.
    Peer,
    /// Ordering organization.
    Orderer,
}

impl fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Peer => f.write_str("PEER"),
            Self::Orderer => f.write_str("ORDERER"),
        }
    }
}

/// Components sharing one MSP ID. Rebuilt on every aggregation call.
#[derive(Debug, Clone)]
pub struct Organization {
    /// Peer or orderer organization.
    pub org_type: OrganizationType,
    /// MSP ID.
    pub msp_id: String,
    /// Member peers.
    pub peers: Vec<ClusterPeer>,
    /// Member orderer nodes.
    pub orderer_nodes: Vec<ClusterOrdererNode>,
}

impl Organization {
    /// Create an empty organization.
    pub fn new(org_type: OrganizationType, msp_id: impl Into<String>) -> Self {
        Self {
            org_type,
            msp_id: msp_id.into(),
            peers: Vec::new(),
            orderer_nodes: Vec::new(),
        }
    }
}

/// An ordering service and its member nodes.
#[derive(Debug, Clone)]
pub struct ClusterOrderingService {
    /// Full name of the service record, or of the first node for an implicit service.
    pub name: String,
    /// MSP ID of the service.
    pub msp_id: String,
    /// The service record; `None` when inferred from unowned nodes.
    pub object: Option<FabricOrderingService>,
    /// Member nodes.
    pub orderer_nodes: Vec<ClusterOrdererNode>,
}

impl ClusterOrderingService {
    /// Whether this service was inferred rather than declared.
    pub fn is_implicit(&self) -> bool {
        self.object.is_none()
    }
}

/// Map a CA record.
///
/// # Errors
///
/// - `MalformedRecord` if the record has no namespace
/// - `Discovery` if the node-port fallback is needed and discovery fails
pub async fn map_ca<D>(ca: FabricCA, discovery: &D) -> TopologyResult<ClusterCA>
where
    D: PublicIpDiscovery + ?Sized,
{
    let (name, namespace) = record_identity(&ca)?;
    let exposure = resolver::ca_exposure(&ca.spec, ca.status.as_ref());
    let public_address = resolver::resolve(&exposure, discovery).await?;

    let (enroll_id, enroll_secret) = ca
        .spec
        .ca
        .registry
        .identities
        .first()
        .map(|identity| (identity.name.clone(), identity.pass.clone()))
        .unwrap_or_default();

    tracing::trace!(ca = %full_name(&name, &namespace), address = %public_address, "Mapped CA");

    Ok(ClusterCA {
        full_name: full_name(&name, &namespace),
        private_url: resolver::ca_private_url(&name, &namespace),
        public_url: public_address.https_url(),
        public_address,
        enroll_id,
        enroll_secret,
        object: ca,
        name,
        namespace,
    })
}

/// Map a peer record.
///
/// # Errors
///
/// - `MalformedRecord` if the record has no namespace
/// - `Discovery` if the node-port fallback is needed and discovery fails
pub async fn map_peer<D>(peer: FabricPeer, discovery: &D) -> TopologyResult<ClusterPeer>
where
    D: PublicIpDiscovery + ?Sized,
{
    let (name, namespace) = record_identity(&peer)?;
    let exposure = resolver::peer_exposure(&peer.spec, peer.status.as_ref());
    let public_address = resolver::resolve(&exposure, discovery).await?;

    tracing::trace!(peer = %full_name(&name, &namespace), address = %public_address, "Mapped peer");

    Ok(ClusterPeer {
        full_name: full_name(&name, &namespace),
        private_url: resolver::peer_private_url(&name, &namespace),
        public_url: public_address.to_string(),
        public_address,
        msp_id: peer.spec.msp_id.clone(),
        tls_ca_cert: String::new(),
        root_cert: String::new(),
        identity: PeerIdentity::default(),
        object: peer,
        name,
        namespace,
    })
}

/// Map an orderer node record, resolving both the orderer and admin endpoints.
///
/// # Errors
///
/// - `MalformedRecord` if the record has no namespace
/// - `Discovery` if a node-port fallback is needed and discovery fails
pub async fn map_orderer_node<D>(
    node: FabricOrdererNode,
    discovery: &D,
) -> TopologyResult<ClusterOrdererNode>
where
    D: PublicIpDiscovery + ?Sized,
{
    let (name, namespace) = record_identity(&node)?;
    let status = node.status.as_ref();
    let public_address =
        resolver::resolve(&resolver::orderer_exposure(&node.spec, status), discovery).await?;
    let admin_address =
        resolver::resolve(&resolver::orderer_admin_exposure(&node.spec, status), discovery).await?;

    tracing::trace!(
        orderer = %full_name(&name, &namespace),
        address = %public_address,
        admin = %admin_address,
        "Mapped orderer node"
    );

    Ok(ClusterOrdererNode {
        full_name: full_name(&name, &namespace),
        private_url: resolver::orderer_private_url(&name, &namespace),
        public_url: public_address.to_string(),
        public_address,
        admin_url: admin_address.https_url(),
        admin_address,
        msp_id: node.spec.msp_id.clone(),
        object: node,
        name,
        namespace,
    })
}
