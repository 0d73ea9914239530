//! Topology aggregation.
//!
//! [`Topology`] lists every record of a kind in a scope, maps each one and
//! groups peers and orderer nodes into [`Organization`]s keyed by MSP ID.
//!
//! Ordering services come from two sources that are merged into one list:
//!
//! 1. Orderer nodes not owned by any ordering service record are gathered
//!    into a single implicit service named after the first such node.
//! 2. Each `FabricOrderingService` record becomes a service whose members are
//!    the nodes in its namespace labelled `release=<service name>`.
//!
//! Nothing is cached; every call re-reads the store.

use crate::crd::{FabricOrdererNode, FabricOrderingService, RELEASE_LABEL};
use crate::discovery::PublicIpDiscovery;
use crate::domain::{
    self, ClusterCA, ClusterOrdererNode, ClusterOrderingService, ClusterPeer, Organization,
    OrganizationType,
};
use crate::error::{TopologyError, TopologyResult};
use crate::resolver::CA_PORT;
use crate::store::{LabelSelector, ResourceStore, Scope};
use kube::ResourceExt;
use std::collections::{BTreeSet, HashMap};

/// Peers in a scope and the organizations they form.
#[derive(Debug, Clone, Default)]
pub struct PeerTopology {
    /// One organization per distinct MSP ID, in order of first appearance.
    pub organizations: Vec<Organization>,
    /// Every peer in the scope.
    pub peers: Vec<ClusterPeer>,
}

/// Ordering services in a scope and the organizations they form.
#[derive(Debug, Clone, Default)]
pub struct OrdererTopology {
    /// One organization per distinct orderer MSP ID.
    pub organizations: Vec<Organization>,
    /// Implicit service first (if any), then explicit services.
    pub ordering_services: Vec<ClusterOrderingService>,
}

impl OrdererTopology {
    /// Whether the scope contains no orderers at all.
    pub fn is_empty(&self) -> bool {
        self.ordering_services.is_empty()
    }
}

/// Read-only aggregator over a resource store.
#[derive(Debug, Clone)]
pub struct Topology<S, D> {
    store: S,
    discovery: D,
}

impl<S, D> Topology<S, D>
where
    S: ResourceStore,
    D: PublicIpDiscovery,
{
    /// Create a new aggregator.
    pub fn new(store: S, discovery: D) -> Self {
        Self { store, discovery }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// List certificate authorities.
    pub async fn list_cas(&self, scope: &Scope) -> TopologyResult<Vec<ClusterCA>> {
        let records = self.store.list_cas(scope).await?;

        let mut cas = Vec::with_capacity(records.len());
        for record in records {
            cas.push(domain::map_ca(record, &self.discovery).await?);
        }

        tracing::debug!(scope = %scope, count = cas.len(), "Listed certificate authorities");
        Ok(cas)
    }

    /// List peers grouped into organizations.
    pub async fn list_peers(&self, scope: &Scope) -> TopologyResult<PeerTopology> {
        let records = self.store.list_peers(scope).await?;

        let mut peers = Vec::with_capacity(records.len());
        for record in records {
            peers.push(domain::map_peer(record, &self.discovery).await?);
        }

        let mut organizations = Organizations::new(OrganizationType::Peer);
        for peer in &peers {
            organizations.entry(&peer.msp_id).peers.push(peer.clone());
        }
        let organizations = organizations.into_vec();

        tracing::debug!(
            scope = %scope,
            peers = peers.len(),
            organizations = organizations.len(),
            "Listed peers"
        );
        Ok(PeerTopology {
            organizations,
            peers,
        })
    }

    /// List every orderer node, regardless of ownership.
    pub async fn list_orderer_nodes(
        &self,
        scope: &Scope,
    ) -> TopologyResult<Vec<ClusterOrdererNode>> {
        let records = self.store.list_orderer_nodes(scope, None).await?;
        let nodes = self.map_orderer_nodes(records).await?;

        tracing::debug!(scope = %scope, count = nodes.len(), "Listed orderer nodes");
        Ok(nodes)
    }

    /// List ordering services and the orderer organizations they form.
    ///
    /// An empty scope yields an empty [`OrdererTopology`], not an error.
    pub async fn list_orderers(&self, scope: &Scope) -> TopologyResult<OrdererTopology> {
        let nodes = self.store.list_orderer_nodes(scope, None).await?;
        let services = self.store.list_ordering_services(scope).await?;

        let mut ordering_services = Vec::new();

        let unowned: Vec<FabricOrdererNode> = nodes
            .into_iter()
            .filter(|node| owning_service(node, &services).is_none())
            .collect();
        if let Some(implicit) = self.implicit_service(unowned).await? {
            ordering_services.push(implicit);
        }

        for service in services {
            ordering_services.push(self.explicit_service(service).await?);
        }

        if ordering_services.is_empty() {
            tracing::debug!(scope = %scope, "No orderers found");
            return Ok(OrdererTopology::default());
        }

        let mut organizations = Organizations::new(OrganizationType::Orderer);
        for service in &ordering_services {
            organizations.entry(&service.msp_id);
            for node in &service.orderer_nodes {
                organizations
                    .entry(&node.msp_id)
                    .orderer_nodes
                    .push(node.clone());
            }
        }
        let organizations = organizations.into_vec();

        tracing::debug!(
            scope = %scope,
            services = ordering_services.len(),
            organizations = organizations.len(),
            "Listed ordering services"
        );
        Ok(OrdererTopology {
            organizations,
            ordering_services,
        })
    }

    /// Gather unowned nodes into one service named after the first of them.
    ///
    /// This assumes at most one unowned ordering cluster per scope; several
    /// independent ones are merged.
    async fn implicit_service(
        &self,
        unowned: Vec<FabricOrdererNode>,
    ) -> TopologyResult<Option<ClusterOrderingService>> {
        let Some(first) = unowned.first() else {
            return Ok(None);
        };
        let namespace = first.namespace().unwrap_or_default();
        let name = domain::full_name(&first.name_any(), &namespace);
        let msp_id = first.spec.msp_id.clone();

        let msp_ids: BTreeSet<&str> = unowned
            .iter()
            .map(|n| n.spec.msp_id.as_str())
            .collect();
        if msp_ids.len() > 1 {
            tracing::warn!(
                service = %name,
                msp_ids = ?msp_ids,
                "Unowned orderer nodes span several MSP IDs but are merged into one ordering service"
            );
        }

        let orderer_nodes = self.map_orderer_nodes(unowned).await?;
        Ok(Some(ClusterOrderingService {
            name,
            msp_id,
            object: None,
            orderer_nodes,
        }))
    }

    /// Wrap an ordering service record with the nodes released under its name.
    async fn explicit_service(
        &self,
        service: FabricOrderingService,
    ) -> TopologyResult<ClusterOrderingService> {
        let (name, namespace) = domain::record_identity(&service)?;

        let selector = LabelSelector::release(&name);
        let members = self
            .store
            .list_orderer_nodes(&Scope::Namespace(namespace.clone()), Some(&selector))
            .await?;
        let orderer_nodes = self.map_orderer_nodes(members).await?;

        Ok(ClusterOrderingService {
            name: domain::full_name(&name, &namespace),
            msp_id: service.spec.msp_id.clone(),
            object: Some(service),
            orderer_nodes,
        })
    }

    async fn map_orderer_nodes(
        &self,
        records: Vec<FabricOrdererNode>,
    ) -> TopologyResult<Vec<ClusterOrdererNode>> {
        let mut nodes = Vec::with_capacity(records.len());
        for record in records {
            nodes.push(domain::map_orderer_node(record, &self.discovery).await?);
        }
        Ok(nodes)
    }

    /// Find a certificate authority by `name.namespace`.
    pub async fn find_ca_by_full_name(
        &self,
        scope: &Scope,
        full_name: &str,
    ) -> TopologyResult<ClusterCA> {
        self.list_cas(scope)
            .await?
            .into_iter()
            .find(|ca| ca.full_name == full_name)
            .ok_or_else(|| TopologyError::not_found("FabricCA", full_name))
    }

    /// Get a certificate authority by name and namespace.
    pub async fn find_ca_by_name(&self, name: &str, namespace: &str) -> TopologyResult<ClusterCA> {
        let record = self.store.get_ca(namespace, name).await?;
        domain::map_ca(record, &self.discovery).await
    }

    /// Find the certificate authority serving `host:port`.
    ///
    /// A CA matches when `host` is one of its configured hosts, when `host`
    /// is `name.namespace` for it (only that namespace is listed), or when
    /// `port` is its node port. The node-port rule is skipped for CAs whose
    /// node port is the in-cluster CA port, which would otherwise match any
    /// lookup that passed the default port.
    pub async fn find_ca_by_url(&self, host: &str, port: i32) -> TopologyResult<ClusterCA> {
        let (ca_name, scope) = match host.split('.').collect::<Vec<_>>().as_slice() {
            [name, namespace] => (*name, Scope::Namespace(namespace.to_string())),
            _ => (host, Scope::AllNamespaces),
        };

        self.list_cas(&scope)
            .await?
            .into_iter()
            .find(|ca| {
                ca.spec().hosts.iter().any(|h| h == host)
                    || ca.name == ca_name
                    || ca.status().is_some_and(|s| {
                        s.node_port != CA_PORT && s.node_port > 0 && s.node_port == port
                    })
            })
            .ok_or_else(|| {
                TopologyError::not_found("FabricCA", format!("host={} port={}", host, port))
            })
    }

    /// Find a peer by `name.namespace`.
    pub async fn find_peer_by_full_name(
        &self,
        scope: &Scope,
        full_name: &str,
    ) -> TopologyResult<ClusterPeer> {
        self.list_peers(scope)
            .await?
            .peers
            .into_iter()
            .find(|peer| peer.full_name == full_name)
            .ok_or_else(|| TopologyError::not_found("FabricPeer", full_name))
    }

    /// MSP ID of the peer named `name.namespace`.
    pub async fn peer_msp_id(&self, scope: &Scope, full_name: &str) -> TopologyResult<String> {
        Ok(self.find_peer_by_full_name(scope, full_name).await?.msp_id)
    }

    /// Find an orderer node by `name.namespace`.
    pub async fn find_orderer_node_by_full_name(
        &self,
        scope: &Scope,
        full_name: &str,
    ) -> TopologyResult<ClusterOrdererNode> {
        self.list_orderer_nodes(scope)
            .await?
            .into_iter()
            .find(|node| node.full_name == full_name)
            .ok_or_else(|| TopologyError::not_found("FabricOrdererNode", full_name))
    }

    /// Find an ordering service (implicit or explicit) by full name.
    pub async fn find_ordering_service_by_full_name(
        &self,
        scope: &Scope,
        full_name: &str,
    ) -> TopologyResult<ClusterOrderingService> {
        self.list_orderers(scope)
            .await?
            .ordering_services
            .into_iter()
            .find(|service| service.name == full_name)
            .ok_or_else(|| TopologyError::not_found("FabricOrderingService", full_name))
    }
}

/// The ordering service record owning `node`, if any.
///
/// A node is owned when its `release` label names a service in its namespace.
/// A label naming a service that does not exist leaves the node unowned, so it
/// is listed in the implicit service instead of being dropped.
fn owning_service<'a>(
    node: &FabricOrdererNode,
    services: &'a [FabricOrderingService],
) -> Option<&'a FabricOrderingService> {
    let release = node.labels().get(RELEASE_LABEL)?;
    let namespace = node.namespace();
    services
        .iter()
        .find(|s| &s.name_any() == release && s.namespace() == namespace)
}

/// Organizations keyed by MSP ID, kept in order of first appearance.
struct Organizations {
    org_type: OrganizationType,
    index: HashMap<String, usize>,
    organizations: Vec<Organization>,
}

impl Organizations {
    fn new(org_type: OrganizationType) -> Self {
        Self {
            org_type,
            index: HashMap::new(),
            organizations: Vec::new(),
        }
    }

    fn entry(&mut self, msp_id: &str) -> &mut Organization {
        let slot = match self.index.get(msp_id) {
            Some(&slot) => slot,
            None => {
                self.organizations
                    .push(Organization::new(self.org_type, msp_id));
                self.index
                    .insert(msp_id.to_string(), self.organizations.len() - 1);
                self.organizations.len() - 1
            }
        };
        &mut self.organizations[slot]
    }

    fn into_vec(self) -> Vec<Organization> {
        self.organizations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organizations_preserve_first_appearance() {
        let mut orgs = Organizations::new(OrganizationType::Peer);
        orgs.entry("Org2MSP");
        orgs.entry("Org1MSP");
        orgs.entry("Org2MSP");

        let orgs = orgs.into_vec();
        let ids: Vec<_> = orgs.iter().map(|o| o.msp_id.as_str()).collect();
        assert_eq!(ids, vec!["Org2MSP", "Org1MSP"]);
        assert!(orgs.iter().all(|o| o.org_type == OrganizationType::Peer));
    }

    #[test]
    fn node_owned_only_by_service_in_same_namespace() {
        use crate::crd::{FabricOrdererNodeSpec, FabricOrderingServiceSpec};

        let mut service =
            FabricOrderingService::new("ord-svc", FabricOrderingServiceSpec::default());
        service.metadata.namespace = Some("orderers".to_string());
        let services = vec![service];

        let mut node = FabricOrdererNode::new("ord-node1", FabricOrdererNodeSpec::default());
        node.metadata.namespace = Some("orderers".to_string());
        assert!(owning_service(&node, &services).is_none());

        node.labels_mut()
            .insert(RELEASE_LABEL.to_string(), "ord-svc".to_string());
        assert!(owning_service(&node, &services).is_some());

        node.metadata.namespace = Some("other".to_string());
        assert!(owning_service(&node, &services).is_none());
    }
}
