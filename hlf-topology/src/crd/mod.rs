//! Custom Resource Definitions read by the topology resolver.
//!
//! These mirror the records the Fabric operator persists under
//! `hlf.kungfusoftware.es/v1alpha1`:
//!
//! - [`FabricCA`]: A certificate authority
//! - [`FabricPeer`]: A peer node
//! - [`FabricOrdererNode`]: A single orderer node
//! - [`FabricOrderingService`]: An explicit ordering service grouping orderer nodes
//! - [`FabricIdentity`]: An enrolled identity (only produced, never read)
//!
//! Only the fields the resolver needs are modelled; unknown fields are ignored on read.

mod ca;
mod exposure;
mod identity;
mod orderer;
mod peer;

pub use ca::{
    FabricCA, FabricCAIdentity, FabricCAItemConf, FabricCARegistry, FabricCASpec, FabricCAStatus,
};
pub use exposure::{FabricGatewayApi, FabricIstio, FabricTraefik};
pub use identity::{Catls, FabricIdentity, FabricIdentityRegister, FabricIdentitySpec};
pub use orderer::{
    FabricOrdererNode, FabricOrdererNodeSpec, FabricOrdererNodeStatus, FabricOrderingService,
    FabricOrderingServiceSpec, FabricOrderingServiceStatus,
};
pub use peer::{FabricPeer, FabricPeerSpec, FabricPeerStatus};

/// Label linking an orderer node to the ordering service that owns it.
pub const RELEASE_LABEL: &str = "release";
