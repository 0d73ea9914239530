//! Ingress configuration shared by CA, peer and orderer specs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Istio service-mesh ingress.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FabricIstio {
    /// Port exposed on the ingress gateway.
    pub port: i32,

    /// Hosts routed to the component.
    pub hosts: Vec<String>,

    /// Name of the Istio ingress gateway.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ingress_gateway: String,
}

/// Traefik reverse-proxy ingress. Always served on 443.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FabricTraefik {
    /// Traefik entry points.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_points: Vec<String>,

    /// Middlewares applied to the route.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub middlewares: Vec<String>,

    /// Hosts routed to the component.
    pub hosts: Vec<String>,
}

/// Gateway API ingress.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FabricGatewayApi {
    /// Listener port on the gateway.
    pub port: i32,

    /// Hosts routed to the component.
    pub hosts: Vec<String>,

    /// Gateway name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gateway_name: String,

    /// Gateway namespace.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gateway_namespace: String,
}
