//! Build `FabricIdentity` objects against a resolved CA.
//!
//! Nothing here writes to the cluster; callers decide what to do with the
//! returned object (print it, apply it, ...).

use crate::crd::{Catls, FabricIdentity, FabricIdentityRegister, FabricIdentitySpec};
use crate::domain::ClusterCA;
use crate::error::{TopologyError, TopologyResult};
use crate::resolver::CA_PORT;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Registrar credentials used to register the identity before enrolling it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registrar {
    /// Registrar enroll ID.
    pub enroll_id: String,
    /// Registrar enroll secret.
    pub enroll_secret: String,
    /// Identity type to register (`client`, `admin`, `peer`, `orderer`).
    pub identity_type: String,
    /// Affiliation, empty for none.
    pub affiliation: String,
}

/// Request for a new identity.
#[derive(Debug, Clone, Default)]
pub struct IdentityRequest {
    /// Name of the identity object.
    pub name: String,
    /// Namespace of the identity object.
    pub namespace: String,
    /// CA name inside the server: `ca` or `tlsca`.
    pub ca_name: String,
    /// MSP ID of the identity.
    pub msp_id: String,
    /// Enroll ID.
    pub enroll_id: String,
    /// Enroll secret.
    pub enroll_secret: String,
    /// Registration to perform first, if any.
    pub registrar: Option<Registrar>,
}

impl IdentityRequest {
    /// Check required fields.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` naming the first missing field
    pub fn validate(&self) -> TopologyResult<()> {
        let required = [
            ("name", &self.name),
            ("namespace", &self.namespace),
            ("msp id", &self.msp_id),
            ("enroll id", &self.enroll_id),
            ("enroll secret", &self.enroll_secret),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(TopologyError::InvalidConfig(format!("{} is required", field)));
            }
        }

        if !self.ca_name.is_empty() && self.ca_name != "ca" && self.ca_name != "tlsca" {
            return Err(TopologyError::InvalidConfig(format!(
                "ca name must be 'ca' or 'tlsca', got '{}'",
                self.ca_name
            )));
        }
        Ok(())
    }

    /// Build the identity object for enrollment against `ca`.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the request fails [`validate`](Self::validate)
    pub fn build(&self, ca: &ClusterCA) -> TopologyResult<FabricIdentity> {
        self.validate()?;

        let register = self
            .registrar
            .as_ref()
            .filter(|r| !r.enroll_id.is_empty() && !r.enroll_secret.is_empty())
            .map(|r| FabricIdentityRegister {
                enrollid: r.enroll_id.clone(),
                enrollsecret: r.enroll_secret.clone(),
                identity_type: r.identity_type.clone(),
                affiliation: r.affiliation.clone(),
                maxenrollments: -1,
                attrs: Vec::new(),
            });

        let ca_name = if self.ca_name.is_empty() {
            "ca"
        } else {
            self.ca_name.as_str()
        };

        let spec = FabricIdentitySpec {
            cahost: ca.full_name.clone(),
            caname: ca_name.to_string(),
            caport: CA_PORT,
            catls: Catls {
                cacert: STANDARD.encode(ca.tls_cert()),
            },
            enrollid: self.enroll_id.clone(),
            enrollsecret: self.enroll_secret.clone(),
            mspid: self.msp_id.clone(),
            register,
        };

        let mut identity = FabricIdentity::new(&self.name, spec);
        identity.metadata.namespace = Some(self.namespace.clone());

        tracing::debug!(
            identity = %crate::domain::full_name(&self.name, &self.namespace),
            ca = %ca.full_name,
            registers = identity.spec.register.is_some(),
            "Built identity"
        );
        Ok(identity)
    }
}
