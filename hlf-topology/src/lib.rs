//! Hyperledger Fabric topology resolver
//!
//! This crate reads the Fabric resources an operator has persisted in a
//! Kubernetes cluster and turns them into a connection-ready view of the
//! network: certificate authorities, peers grouped by organization, and
//! ordering services with their orderer nodes.
//!
//! # Layers
//!
//! - **resolver**: Picks the reachable address of a component from its
//!   exposure settings (service mesh, gateway, reverse proxy, node port)
//! - **domain**: Maps raw records to [`ClusterCA`], [`ClusterPeer`] and
//!   [`ClusterOrdererNode`] with public and private URLs
//! - **topology**: Lists records through a [`ResourceStore`] and groups
//!   them into [`Organization`]s and [`ClusterOrderingService`]s
//!
//! # Example
//!
//! ```no_run
//! use hlf_topology::{KubeNodeDiscovery, KubeStore, Scope, Topology};
//!
//! # async fn run() -> hlf_topology::TopologyResult<()> {
//! let client = kube::Client::try_default().await?;
//! let topology = Topology::new(KubeStore::new(client.clone()), KubeNodeDiscovery::new(client));
//!
//! let peers = topology.list_peers(&Scope::AllNamespaces).await?;
//! for org in &peers.organizations {
//!     println!("{}: {} peers", org.msp_id, org.peers.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod crd;
pub mod discovery;
pub mod domain;
pub mod error;
pub mod identity;
pub mod resolver;
pub mod store;
pub mod topology;

pub use discovery::{KubeNodeDiscovery, PublicIpDiscovery, StaticPublicIp};
pub use domain::{
    ClusterCA, ClusterOrdererNode, ClusterOrderingService, ClusterPeer, Organization,
    OrganizationType, PeerIdentity,
};
pub use error::{TopologyError, TopologyResult};
pub use identity::{IdentityRequest, Registrar};
pub use resolver::{ExposureConfig, ExposureMechanism, HostPort, Selection};
pub use store::{KubeStore, LabelSelector, MemoryStore, ResourceStore, Scope};
pub use topology::{OrdererTopology, PeerTopology, Topology};
