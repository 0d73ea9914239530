//! Common fixtures for topology integration tests.

#![allow(dead_code)]

use hlf_topology::crd::{
    FabricCA, FabricCAIdentity, FabricCASpec, FabricCAStatus, FabricIstio, FabricOrdererNode,
    FabricOrdererNodeSpec, FabricOrdererNodeStatus, FabricOrderingService,
    FabricOrderingServiceSpec, FabricPeer, FabricPeerSpec, FabricPeerStatus, RELEASE_LABEL,
};
use hlf_topology::discovery::{DiscoveryFuture, PublicIpDiscovery};
use kube::ResourceExt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Discovery double that counts calls.
pub struct CountingDiscovery {
    ip: String,
    calls: AtomicUsize,
}

impl CountingDiscovery {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PublicIpDiscovery for CountingDiscovery {
    fn discover(&self) -> DiscoveryFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let ip = self.ip.clone();
        Box::pin(async move { Ok(ip) })
    }
}

/// A CA exposed only through its node port.
pub fn ca(name: &str, namespace: &str, node_port: i32) -> FabricCA {
    let mut ca = FabricCA::new(name, FabricCASpec::default());
    ca.metadata.namespace = Some(namespace.to_string());
    ca.spec.ca.registry.identities.push(FabricCAIdentity {
        name: "enroll".to_string(),
        pass: "enrollpw".to_string(),
        identity_type: "client".to_string(),
        affiliation: String::new(),
    });
    ca.status = Some(FabricCAStatus {
        node_port,
        tls_cert: "ca-tls-cert".to_string(),
        ..Default::default()
    });
    ca
}

/// A peer exposed only through its node port.
pub fn peer(name: &str, namespace: &str, msp_id: &str) -> FabricPeer {
    let mut peer = FabricPeer::new(
        name,
        FabricPeerSpec {
            msp_id: msp_id.to_string(),
            ..Default::default()
        },
    );
    peer.metadata.namespace = Some(namespace.to_string());
    peer.status = Some(FabricPeerStatus {
        node_port: 30051,
        ..Default::default()
    });
    peer
}

/// A peer behind the service mesh.
pub fn mesh_peer(name: &str, namespace: &str, msp_id: &str, host: &str, port: i32) -> FabricPeer {
    let mut peer = peer(name, namespace, msp_id);
    peer.spec.istio = Some(FabricIstio {
        port,
        hosts: vec![host.to_string()],
        ingress_gateway: "ingressgateway".to_string(),
    });
    peer
}

/// An orderer node, owned by `release` when given.
pub fn orderer_node(
    name: &str,
    namespace: &str,
    msp_id: &str,
    release: Option<&str>,
) -> FabricOrdererNode {
    let mut node = FabricOrdererNode::new(
        name,
        FabricOrdererNodeSpec {
            msp_id: msp_id.to_string(),
            ..Default::default()
        },
    );
    node.metadata.namespace = Some(namespace.to_string());
    if let Some(release) = release {
        node.labels_mut()
            .insert(RELEASE_LABEL.to_string(), release.to_string());
    }
    node.status = Some(FabricOrdererNodeStatus {
        node_port: 30050,
        admin_port: 30053,
        ..Default::default()
    });
    node
}

/// An explicit ordering service record.
pub fn ordering_service(name: &str, namespace: &str, msp_id: &str) -> FabricOrderingService {
    let mut service = FabricOrderingService::new(
        name,
        FabricOrderingServiceSpec {
            msp_id: msp_id.to_string(),
        },
    );
    service.metadata.namespace = Some(namespace.to_string());
    service
}
