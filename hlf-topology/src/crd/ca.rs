//! FabricCA Custom Resource Definition.

use super::exposure::{FabricGatewayApi, FabricIstio, FabricTraefik};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// FabricCA is the Schema for the fabriccas API.
///
/// A FabricCA represents a Fabric certificate authority serving both the
/// enrollment CA and the TLS CA.
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "hlf.kungfusoftware.es",
    version = "v1alpha1",
    kind = "FabricCA",
    plural = "fabriccas",
    shortname = "ca",
    namespaced,
    status = "FabricCAStatus",
    printcolumn = r#"{"name":"State", "type":"string", "jsonPath":".status.status"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase", default)]
pub struct FabricCASpec {
    /// Hosts the CA certificate is valid for.
    pub hosts: Vec<String>,

    /// Istio ingress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub istio: Option<FabricIstio>,

    /// Gateway API ingress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_api: Option<FabricGatewayApi>,

    /// Traefik ingress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traefik: Option<FabricTraefik>,

    /// Enrollment CA configuration.
    pub ca: FabricCAItemConf,

    /// TLS CA configuration.
    pub tlsca: FabricCAItemConf,
}

/// Configuration of one CA inside the server (enrollment or TLS).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FabricCAItemConf {
    /// CA name.
    pub name: String,

    /// Identity registry.
    pub registry: FabricCARegistry,
}

/// Identity registry of a CA.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FabricCARegistry {
    /// Maximum enrollments per identity (-1 for unlimited).
    pub max_enrollments: i32,

    /// Registered identities.
    pub identities: Vec<FabricCAIdentity>,
}

/// A registered CA identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct FabricCAIdentity {
    /// Enroll ID.
    pub name: String,

    /// Enroll secret.
    pub pass: String,

    /// Identity type (client, peer, orderer, admin).
    #[serde(rename = "type")]
    pub identity_type: String,

    /// Affiliation.
    pub affiliation: String,
}

/// FabricCA status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FabricCAStatus {
    /// Deployment state (PENDING, RUNNING, FAILED, ...).
    pub status: String,

    /// Human-readable message about current state.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// Node port assigned to the CA service.
    pub node_port: i32,

    /// TLS certificate of the CA server (PEM).
    #[serde(rename = "tls_cert")]
    pub tls_cert: String,

    /// Enrollment CA root certificate (PEM).
    #[serde(rename = "ca_cert")]
    pub ca_cert: String,

    /// TLS CA root certificate (PEM).
    #[serde(rename = "tlsca_cert")]
    pub tlsca_cert: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ca_deserializes_operator_json() {
        let json = r#"{
            "apiVersion": "hlf.kungfusoftware.es/v1alpha1",
            "kind": "FabricCA",
            "metadata": {"name": "org1-ca", "namespace": "default"},
            "spec": {
                "hosts": ["localhost", "org1-ca"],
                "istio": {"port": 443, "hosts": ["org1-ca.example.com"], "ingressGateway": "ingressgateway"},
                "ca": {"name": "ca", "registry": {"max_enrollments": -1, "identities": [
                    {"name": "enroll", "pass": "enrollpw", "type": "client", "affiliation": ""}
                ]}},
                "image": "hyperledger/fabric-ca"
            },
            "status": {"status": "RUNNING", "nodePort": 30054, "tls_cert": "-----BEGIN CERTIFICATE-----"}
        }"#;

        let ca: FabricCA = serde_json::from_str(json).expect("Failed to parse FabricCA JSON");
        assert_eq!(ca.spec.istio.as_ref().map(|i| i.port), Some(443));
        assert_eq!(ca.spec.ca.registry.max_enrollments, -1);
        assert_eq!(ca.spec.ca.registry.identities[0].name, "enroll");
        assert!(ca.spec.traefik.is_none());
        let status = ca.status.expect("status should be present");
        assert_eq!(status.node_port, 30054);
        assert!(status.tls_cert.starts_with("-----BEGIN"));
    }

    #[test]
    fn ca_spec_tolerates_missing_fields() {
        let spec: FabricCASpec = serde_json::from_str("{}").expect("Failed to parse empty spec");
        assert!(spec.hosts.is_empty());
        assert!(spec.ca.registry.identities.is_empty());
    }
}
