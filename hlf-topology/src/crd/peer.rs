//! FabricPeer Custom Resource Definition.

use super::exposure::{FabricGatewayApi, FabricIstio, FabricTraefik};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// FabricPeer is the Schema for the fabricpeers API.
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "hlf.kungfusoftware.es",
    version = "v1alpha1",
    kind = "FabricPeer",
    plural = "fabricpeers",
    shortname = "peer",
    namespaced,
    status = "FabricPeerStatus",
    printcolumn = r#"{"name":"MSP", "type":"string", "jsonPath":".spec.mspID"}"#,
    printcolumn = r#"{"name":"State", "type":"string", "jsonPath":".status.status"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase", default)]
pub struct FabricPeerSpec {
    /// Membership service provider ID the peer belongs to.
    #[serde(rename = "mspID")]
    pub msp_id: String,

    /// Hosts the peer TLS certificate is valid for.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,

    /// Istio ingress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub istio: Option<FabricIstio>,

    /// Traefik ingress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traefik: Option<FabricTraefik>,

    /// Gateway API ingress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_api: Option<FabricGatewayApi>,
}

/// FabricPeer status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FabricPeerStatus {
    /// Deployment state.
    pub status: String,

    /// Human-readable message about current state.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// Node port assigned to the peer service.
    pub node_port: i32,

    /// TLS certificate (PEM).
    pub tls_cert: String,

    /// Signing certificate (PEM).
    pub sign_cert: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_msp_id_uses_operator_casing() {
        let spec = FabricPeerSpec {
            msp_id: "Org1MSP".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_string(&spec).expect("Failed to serialize FabricPeerSpec");
        assert!(json.contains(r#""mspID":"Org1MSP""#));
        assert!(!json.contains("istio"));
    }
}
