//! Integration tests for the topology aggregator over an in-memory store.

mod common;

use common::{CountingDiscovery, ca, mesh_peer, ordering_service, orderer_node, peer};
use hlf_topology::{
    MemoryStore, OrganizationType, Scope, StaticPublicIp, Topology, TopologyError,
};
use std::collections::HashSet;
use std::sync::Arc;

fn topology(store: MemoryStore) -> Topology<MemoryStore, StaticPublicIp> {
    Topology::new(store, StaticPublicIp::new("34.1.2.3"))
}

#[tokio::test]
async fn peers_partition_completely_into_organizations() {
    let store = MemoryStore::new();
    store.add_peer(peer("peer0", "org1", "Org1MSP"));
    store.add_peer(peer("peer0", "org2", "Org2MSP"));
    store.add_peer(peer("peer1", "org1", "Org1MSP"));
    store.add_peer(peer("peer1", "org2", "Org2MSP"));
    store.add_peer(peer("peer0", "org3", "Org3MSP"));

    let result = topology(store)
        .list_peers(&Scope::AllNamespaces)
        .await
        .unwrap();

    assert_eq!(result.peers.len(), 5);
    assert_eq!(result.organizations.len(), 3);

    let mut seen = HashSet::new();
    for org in &result.organizations {
        assert_eq!(org.org_type, OrganizationType::Peer);
        for p in &org.peers {
            assert_eq!(p.msp_id, org.msp_id);
            assert!(seen.insert(p.full_name.clone()), "{} grouped twice", p.full_name);
        }
    }
    let all: HashSet<_> = result.peers.iter().map(|p| p.full_name.clone()).collect();
    assert_eq!(seen, all);
}

#[tokio::test]
async fn peer_listing_honors_namespace_scope() {
    let store = MemoryStore::new();
    store.add_peer(peer("peer0", "org1", "Org1MSP"));
    store.add_peer(peer("peer0", "org2", "Org2MSP"));

    let result = topology(store)
        .list_peers(&Scope::Namespace("org2".to_string()))
        .await
        .unwrap();

    assert_eq!(result.peers.len(), 1);
    assert_eq!(result.peers[0].full_name, "peer0.org2");
    assert_eq!(result.organizations.len(), 1);
}

#[tokio::test]
async fn mesh_peer_skips_discovery() {
    let store = MemoryStore::new();
    store.add_peer(mesh_peer(
        "peer0",
        "org1",
        "Org1MSP",
        "peer0.example.com",
        443,
    ));
    let discovery = Arc::new(CountingDiscovery::new("34.1.2.3"));
    let topology = Topology::new(store, discovery.clone());

    let peer = topology
        .find_peer_by_full_name(&Scope::AllNamespaces, "peer0.org1")
        .await
        .unwrap();

    assert_eq!(peer.public_url, "peer0.example.com:443");
    assert_eq!(peer.private_url, "peer0.org1:7051");
    assert_eq!(discovery.calls(), 0);
}

#[tokio::test]
async fn node_port_peer_uses_discovered_ip() {
    let store = MemoryStore::new();
    store.add_peer(peer("peer0", "org1", "Org1MSP"));
    let discovery = Arc::new(CountingDiscovery::new("10.1.1.1"));
    let topology = Topology::new(store, discovery.clone());

    let result = topology.list_peers(&Scope::AllNamespaces).await.unwrap();

    assert_eq!(result.peers[0].public_url, "10.1.1.1:30051");
    assert_eq!(discovery.calls(), 1);
}

#[tokio::test]
async fn find_by_full_name_reports_missing_key() {
    let store = MemoryStore::new();
    store.add_ca(ca("org1-ca", "default", 30054));
    let topology = topology(store);

    let found = topology
        .find_ca_by_full_name(&Scope::AllNamespaces, "org1-ca.default")
        .await
        .unwrap();
    assert_eq!(found.name, "org1-ca");
    assert_eq!(found.namespace, "default");
    assert_eq!(found.public_url, "https://34.1.2.3:30054");
    assert_eq!(found.enroll_id, "enroll");

    let err = topology
        .find_ca_by_full_name(&Scope::AllNamespaces, "x.ns")
        .await
        .unwrap_err();
    match err {
        TopologyError::NotFound { kind, key } => {
            assert_eq!(kind, "FabricCA");
            assert_eq!(key, "x.ns");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn find_ca_by_name_uses_direct_get() {
    let store = MemoryStore::new();
    store.add_ca(ca("org1-ca", "org1", 30054));
    let topology = topology(store);

    let found = topology.find_ca_by_name("org1-ca", "org1").await.unwrap();
    assert_eq!(found.private_url, "org1-ca.org1:7054");

    let err = topology.find_ca_by_name("org1-ca", "org2").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn find_ca_by_url_matches_host_name_or_node_port() {
    let store = MemoryStore::new();
    let mut hosted = ca("org1-ca", "org1", 30054);
    hosted.spec.hosts = vec!["ca.org1.example.com".to_string()];
    store.add_ca(hosted);
    store.add_ca(ca("org2-ca", "org2", 30154));
    let topology = topology(store);

    let by_host = topology
        .find_ca_by_url("ca.org1.example.com", 443)
        .await
        .unwrap();
    assert_eq!(by_host.full_name, "org1-ca.org1");

    let by_name = topology.find_ca_by_url("org2-ca.org2", 7054).await.unwrap();
    assert_eq!(by_name.full_name, "org2-ca.org2");

    let by_port = topology.find_ca_by_url("34.1.2.3", 30154).await.unwrap();
    assert_eq!(by_port.full_name, "org2-ca.org2");
}

#[tokio::test]
async fn find_ca_by_url_ignores_default_ca_node_port() {
    let store = MemoryStore::new();
    store.add_ca(ca("org1-ca", "org1", 7054));
    let topology = topology(store);

    let err = topology.find_ca_by_url("34.1.2.3", 7054).await.unwrap_err();
    match err {
        TopologyError::NotFound { key, .. } => assert_eq!(key, "host=34.1.2.3 port=7054"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn unowned_orderer_nodes_form_one_implicit_service() {
    let store = MemoryStore::new();
    store.add_orderer_node(orderer_node("ord-node1", "orderers", "OrdererMSP", None));
    store.add_orderer_node(orderer_node("ord-node2", "orderers", "OrdererMSP", None));

    let result = topology(store)
        .list_orderers(&Scope::AllNamespaces)
        .await
        .unwrap();

    assert_eq!(result.ordering_services.len(), 1);
    let service = &result.ordering_services[0];
    assert!(service.is_implicit());
    assert_eq!(service.name, "ord-node1.orderers");
    assert_eq!(service.msp_id, "OrdererMSP");
    let names: Vec<_> = service.orderer_nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["ord-node1", "ord-node2"]);

    assert_eq!(result.organizations.len(), 1);
    assert_eq!(result.organizations[0].org_type, OrganizationType::Orderer);
    assert_eq!(result.organizations[0].orderer_nodes.len(), 2);
}

#[tokio::test]
async fn explicit_service_collects_released_nodes() {
    let store = MemoryStore::new();
    store.add_ordering_service(ordering_service("ord-svc", "orderers", "OrdererMSP"));
    store.add_orderer_node(orderer_node("ord-svc-0", "orderers", "OrdererMSP", Some("ord-svc")));
    store.add_orderer_node(orderer_node("ord-svc-1", "orderers", "OrdererMSP", Some("ord-svc")));
    store.add_orderer_node(orderer_node("legacy", "orderers", "LegacyMSP", None));
    // Same release label in another namespace does not belong to ord-svc.
    store.add_orderer_node(orderer_node("stray", "other", "StrayMSP", Some("ord-svc")));

    let result = topology(store)
        .list_orderers(&Scope::AllNamespaces)
        .await
        .unwrap();

    assert_eq!(result.ordering_services.len(), 2);

    let implicit = &result.ordering_services[0];
    assert!(implicit.is_implicit());
    assert_eq!(implicit.name, "legacy.orderers");
    let implicit_names: Vec<_> = implicit.orderer_nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(implicit_names, vec!["legacy", "stray"]);

    let explicit = &result.ordering_services[1];
    assert!(!explicit.is_implicit());
    assert_eq!(explicit.name, "ord-svc.orderers");
    let explicit_names: Vec<_> = explicit.orderer_nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(explicit_names, vec!["ord-svc-0", "ord-svc-1"]);

    let msp_ids: HashSet<_> = result.organizations.iter().map(|o| o.msp_id.as_str()).collect();
    assert_eq!(msp_ids, HashSet::from(["LegacyMSP", "OrdererMSP", "StrayMSP"]));
}

#[tokio::test]
async fn service_without_nodes_still_yields_organization() {
    let store = MemoryStore::new();
    store.add_ordering_service(ordering_service("ord-svc", "orderers", "OrdererMSP"));

    let result = topology(store)
        .list_orderers(&Scope::AllNamespaces)
        .await
        .unwrap();

    assert_eq!(result.ordering_services.len(), 1);
    assert!(result.ordering_services[0].orderer_nodes.is_empty());
    assert_eq!(result.organizations.len(), 1);
    assert_eq!(result.organizations[0].msp_id, "OrdererMSP");
}

#[tokio::test]
async fn zero_orderers_is_empty_not_error() {
    let result = topology(MemoryStore::new())
        .list_orderers(&Scope::AllNamespaces)
        .await
        .unwrap();

    assert!(result.is_empty());
    assert!(result.organizations.is_empty());
    assert!(result.ordering_services.is_empty());
}

#[tokio::test]
async fn orderer_node_resolves_client_and_admin_endpoints() {
    let store = MemoryStore::new();
    store.add_orderer_node(orderer_node("ord-node1", "orderers", "OrdererMSP", None));
    let topology = topology(store);

    let node = topology
        .find_orderer_node_by_full_name(&Scope::AllNamespaces, "ord-node1.orderers")
        .await
        .unwrap();

    assert_eq!(node.public_url, "34.1.2.3:30050");
    assert_eq!(node.admin_url, "https://34.1.2.3:30053");
    assert_eq!(node.private_url, "ord-node1.orderers:7050");

    let service = topology
        .find_ordering_service_by_full_name(&Scope::AllNamespaces, "ord-node1.orderers")
        .await
        .unwrap();
    assert_eq!(service.orderer_nodes.len(), 1);
}

#[tokio::test]
async fn dangling_release_label_joins_implicit_service() {
    let store = MemoryStore::new();
    store.add_orderer_node(orderer_node("ghosted", "orderers", "OrdererMSP", Some("gone")));

    let result = topology(store)
        .list_orderers(&Scope::AllNamespaces)
        .await
        .unwrap();

    assert_eq!(result.ordering_services.len(), 1);
    let service = &result.ordering_services[0];
    assert!(service.is_implicit());
    assert_eq!(service.name, "ghosted.orderers");
    assert_eq!(service.orderer_nodes.len(), 1);
    assert_eq!(service.orderer_nodes[0].release(), Some("gone"));
}

#[tokio::test]
async fn orderer_lookups_report_missing_key() {
    let store = MemoryStore::new();
    store.add_orderer_node(orderer_node("ord-node1", "orderers", "OrdererMSP", None));
    let topology = topology(store);

    match topology
        .find_orderer_node_by_full_name(&Scope::AllNamespaces, "ord-node9.orderers")
        .await
        .unwrap_err()
    {
        TopologyError::NotFound { kind, key } => {
            assert_eq!(kind, "FabricOrdererNode");
            assert_eq!(key, "ord-node9.orderers");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }

    match topology
        .find_ordering_service_by_full_name(&Scope::AllNamespaces, "ord-svc.orderers")
        .await
        .unwrap_err()
    {
        TopologyError::NotFound { kind, key } => {
            assert_eq!(kind, "FabricOrderingService");
            assert_eq!(key, "ord-svc.orderers");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn peer_msp_id_lookup() {
    let store = MemoryStore::new();
    store.add_peer(peer("peer0", "org1", "Org1MSP"));
    let topology = topology(store);

    assert_eq!(
        topology
            .peer_msp_id(&Scope::AllNamespaces, "peer0.org1")
            .await
            .unwrap(),
        "Org1MSP"
    );
    assert!(
        topology
            .peer_msp_id(&Scope::AllNamespaces, "peer9.org1")
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn store_failure_propagates_unchanged() {
    let store = MemoryStore::new();
    store.add_peer(peer("peer0", "org1", "Org1MSP"));
    let topology = topology(store);
    topology.store().fail_with("connection refused");

    let err = topology.list_peers(&Scope::AllNamespaces).await.unwrap_err();
    match err {
        TopologyError::StoreError { kind, message } => {
            assert_eq!(kind, "FabricPeer");
            assert_eq!(message, "connection refused");
        }
        other => panic!("expected StoreError, got {other:?}"),
    }

    assert!(matches!(
        topology.list_orderers(&Scope::AllNamespaces).await,
        Err(TopologyError::StoreError { .. })
    ));
}
