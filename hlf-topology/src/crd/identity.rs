//! FabricIdentity Custom Resource Definition.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// FabricIdentity is the Schema for the fabricidentities API.
///
/// The operator enrolls the identity against the referenced CA and stores
/// the resulting certificate and key in a secret.
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "hlf.kungfusoftware.es",
    version = "v1alpha1",
    kind = "FabricIdentity",
    plural = "fabricidentities",
    shortname = "identity",
    namespaced
)]
#[serde(rename_all = "lowercase")]
pub struct FabricIdentitySpec {
    /// Host of the CA, in `name.namespace` form.
    pub cahost: String,

    /// Name of the CA inside the server (`ca` or `tlsca`).
    pub caname: String,

    /// Port of the CA service.
    pub caport: i32,

    /// TLS material for connecting to the CA.
    pub catls: Catls,

    /// Enroll ID.
    pub enrollid: String,

    /// Enroll secret.
    pub enrollsecret: String,

    /// MSP ID of the identity.
    pub mspid: String,

    /// Registration performed before enrollment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register: Option<FabricIdentityRegister>,
}

/// CA TLS settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Catls {
    /// Base64-encoded TLS certificate of the CA.
    pub cacert: String,
}

/// Registration request for a new identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "lowercase")]
pub struct FabricIdentityRegister {
    /// Registrar enroll ID.
    pub enrollid: String,

    /// Registrar enroll secret.
    pub enrollsecret: String,

    /// Identity type to register.
    #[serde(rename = "type")]
    pub identity_type: String,

    /// Affiliation.
    pub affiliation: String,

    /// Maximum enrollments (-1 for unlimited).
    pub maxenrollments: i32,

    /// Attributes to attach.
    pub attrs: Vec<String>,
}
