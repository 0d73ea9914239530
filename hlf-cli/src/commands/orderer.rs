//! Orderer commands.

use super::ClusterTopology;
use anyhow::Result;
use hlf_topology::{ClusterOrdererNode, Scope};

/// List ordering services with their nodes.
pub async fn list(topology: &ClusterTopology, scope: &Scope) -> Result<()> {
    let result = topology.list_orderers(scope).await?;
    tracing::info!(
        scope = %scope,
        services = result.ordering_services.len(),
        "Listing ordering services"
    );

    if result.is_empty() {
        println!("No orderers found in {}", scope);
        return Ok(());
    }

    for service in &result.ordering_services {
        let origin = if service.is_implicit() { "implicit" } else { "explicit" };
        println!(
            "{} [{}] MSP {} ({} nodes)",
            service.name,
            origin,
            service.msp_id,
            service.orderer_nodes.len()
        );
        for node in &service.orderer_nodes {
            print_node_row(node);
        }
    }
    Ok(())
}

/// List every orderer node.
pub async fn nodes(topology: &ClusterTopology, scope: &Scope) -> Result<()> {
    let nodes = topology.list_orderer_nodes(scope).await?;

    if nodes.is_empty() {
        println!("No orderer nodes found in {}", scope);
        return Ok(());
    }

    for node in &nodes {
        print_node_row(node);
    }
    Ok(())
}

/// Show one orderer node by `name.namespace`.
pub async fn get(topology: &ClusterTopology, scope: &Scope, full_name: &str) -> Result<()> {
    let node = topology
        .find_orderer_node_by_full_name(scope, full_name)
        .await?;

    println!("Name:         {}", node.full_name);
    println!("MSP ID:       {}", node.msp_id);
    println!("Public URL:   {}", node.public_url);
    println!("Admin URL:    {}", node.admin_url);
    println!("Private URL:  {}", node.private_url);
    if let Some(release) = node.release() {
        println!("Release:      {}", release);
    }
    Ok(())
}

fn print_node_row(node: &ClusterOrdererNode) {
    println!(
        "  {:<32} {:<16} {:<32} {}",
        node.full_name, node.msp_id, node.public_url, node.admin_url
    );
}
