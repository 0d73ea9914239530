//! CLI command implementations.

pub mod ca;
pub mod crds;
pub mod identity;
pub mod network;
pub mod orderer;
pub mod peer;

use hlf_topology::{KubeStore, PublicIpDiscovery, Topology};
use std::sync::Arc;

/// Topology over the live cluster with the configured discovery.
pub type ClusterTopology = Topology<KubeStore, Arc<dyn PublicIpDiscovery>>;
