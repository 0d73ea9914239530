//! FabricOrdererNode and FabricOrderingService Custom Resource Definitions.

use super::exposure::{FabricGatewayApi, FabricIstio, FabricTraefik};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// FabricOrdererNode is the Schema for the fabricorderernodes API.
///
/// An orderer node exposes two listeners: the client-facing orderer endpoint
/// and the channel participation admin endpoint, each with its own ingress.
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "hlf.kungfusoftware.es",
    version = "v1alpha1",
    kind = "FabricOrdererNode",
    plural = "fabricorderernodes",
    shortname = "orderernode",
    namespaced,
    status = "FabricOrdererNodeStatus",
    printcolumn = r#"{"name":"MSP", "type":"string", "jsonPath":".spec.mspID"}"#,
    printcolumn = r#"{"name":"State", "type":"string", "jsonPath":".status.status"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase", default)]
pub struct FabricOrdererNodeSpec {
    /// Membership service provider ID of the ordering organization.
    #[serde(rename = "mspID")]
    pub msp_id: String,

    /// Istio ingress for the orderer endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub istio: Option<FabricIstio>,

    /// Traefik ingress for the orderer endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traefik: Option<FabricTraefik>,

    /// Gateway API ingress. Not consulted when resolving the client endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_api: Option<FabricGatewayApi>,

    /// Istio ingress for the admin endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_istio: Option<FabricIstio>,

    /// Traefik ingress for the admin endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_traefik: Option<FabricTraefik>,
}

/// FabricOrdererNode status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FabricOrdererNodeStatus {
    /// Deployment state.
    pub status: String,

    /// Human-readable message about current state.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// Node port of the orderer endpoint.
    pub node_port: i32,

    /// Node port of the admin endpoint.
    pub admin_port: i32,

    /// Node port of the operations endpoint.
    pub operations_port: i32,

    /// TLS certificate (PEM).
    pub tls_cert: String,

    /// Signing certificate (PEM).
    pub sign_cert: String,
}

/// FabricOrderingService is the Schema for the fabricorderingservices API.
///
/// Member nodes are the orderer nodes whose `release` label equals the
/// service name.
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "hlf.kungfusoftware.es",
    version = "v1alpha1",
    kind = "FabricOrderingService",
    plural = "fabricorderingservices",
    shortname = "orderingservice",
    namespaced,
    status = "FabricOrderingServiceStatus",
    printcolumn = r#"{"name":"MSP", "type":"string", "jsonPath":".spec.mspID"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase", default)]
pub struct FabricOrderingServiceSpec {
    /// Membership service provider ID of the ordering organization.
    #[serde(rename = "mspID")]
    pub msp_id: String,
}

/// FabricOrderingService status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FabricOrderingServiceStatus {
    /// Deployment state.
    pub status: String,

    /// Human-readable message about current state.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}
