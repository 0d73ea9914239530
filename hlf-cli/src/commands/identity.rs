//! Identity commands.

use super::ClusterTopology;
use anyhow::{Context, Result};
use hlf_topology::{IdentityRequest, Scope};

/// Print a FabricIdentity manifest enrolling against the given CA.
pub async fn spec(
    topology: &ClusterTopology,
    ca_full_name: &str,
    request: IdentityRequest,
) -> Result<()> {
    request.validate()?;

    let ca = topology
        .find_ca_by_full_name(&Scope::AllNamespaces, ca_full_name)
        .await
        .with_context(|| format!("resolving CA {}", ca_full_name))?;
    let identity = request.build(&ca)?;

    print!("{}", serde_yaml::to_string(&identity)?);
    Ok(())
}
