//! Peer commands.

use super::ClusterTopology;
use anyhow::Result;
use hlf_topology::Scope;

/// List peers grouped by organization.
pub async fn list(topology: &ClusterTopology, scope: &Scope) -> Result<()> {
    let result = topology.list_peers(scope).await?;
    tracing::info!(
        scope = %scope,
        peers = result.peers.len(),
        organizations = result.organizations.len(),
        "Listing peers"
    );

    if result.peers.is_empty() {
        println!("No peers found in {}", scope);
        return Ok(());
    }

    for org in &result.organizations {
        println!("{} ({} peers)", org.msp_id, org.peers.len());
        for peer in &org.peers {
            println!(
                "  {:<32} {:<40} {}",
                peer.full_name, peer.public_url, peer.private_url
            );
        }
    }
    Ok(())
}

/// Show one peer by `name.namespace`.
pub async fn get(topology: &ClusterTopology, scope: &Scope, full_name: &str) -> Result<()> {
    let peer = topology.find_peer_by_full_name(scope, full_name).await?;

    println!("Name:         {}", peer.full_name);
    println!("MSP ID:       {}", peer.msp_id);
    println!("Public URL:   {}", peer.public_url);
    println!("Private URL:  {}", peer.private_url);
    if let Some(status) = peer.status() {
        println!("Status:       {}", status.status);
    }
    Ok(())
}
