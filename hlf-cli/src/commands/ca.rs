//! Certificate authority commands.

use super::ClusterTopology;
use anyhow::Result;
use hlf_topology::{ClusterCA, Scope};

/// List certificate authorities.
pub async fn list(topology: &ClusterTopology, scope: &Scope) -> Result<()> {
    let cas = topology.list_cas(scope).await?;
    tracing::info!(scope = %scope, count = cas.len(), "Listing certificate authorities");

    if cas.is_empty() {
        println!("No certificate authorities found in {}", scope);
        return Ok(());
    }

    println!(
        "{:<32} {:<40} {:<32} {}",
        "NAME", "PUBLIC URL", "PRIVATE URL", "STATUS"
    );
    for ca in &cas {
        println!(
            "{:<32} {:<40} {:<32} {}",
            ca.full_name,
            ca.public_url,
            ca.private_url,
            ca.status().map(|s| s.status.as_str()).unwrap_or("-")
        );
    }
    Ok(())
}

/// Show one certificate authority by `name.namespace`.
pub async fn get(topology: &ClusterTopology, scope: &Scope, full_name: &str) -> Result<()> {
    let ca = topology.find_ca_by_full_name(scope, full_name).await?;
    print_details(&ca);
    Ok(())
}

/// Find the certificate authority serving `host:port`.
pub async fn find(topology: &ClusterTopology, host: &str, port: i32) -> Result<()> {
    let ca = topology.find_ca_by_url(host, port).await?;
    print_details(&ca);
    Ok(())
}

fn print_details(ca: &ClusterCA) {
    println!("Name:         {}", ca.full_name);
    println!("Public URL:   {}", ca.public_url);
    println!("Private URL:  {}", ca.private_url);
    println!("Enroll ID:    {}", ca.enroll_id);
    if let Some(status) = ca.status() {
        println!("Status:       {}", status.status);
        println!("Node port:    {}", status.node_port);
    }
}
