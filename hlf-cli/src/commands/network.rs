//! Network summary across all component kinds.

use super::ClusterTopology;
use anyhow::Result;
use hlf_topology::Scope;

/// Print counts of CAs, peer organizations and ordering services.
pub async fn run(topology: &ClusterTopology, scope: &Scope) -> Result<()> {
    let (cas, peers, orderers) = futures::try_join!(
        topology.list_cas(scope),
        topology.list_peers(scope),
        topology.list_orderers(scope),
    )?;

    println!("Network in {}", scope);
    println!("  Certificate authorities: {}", cas.len());
    println!(
        "  Peers:                   {} in {} organizations",
        peers.peers.len(),
        peers.organizations.len()
    );
    let orderer_nodes: usize = orderers
        .ordering_services
        .iter()
        .map(|s| s.orderer_nodes.len())
        .sum();
    println!(
        "  Ordering services:       {} with {} nodes",
        orderers.ordering_services.len(),
        orderer_nodes
    );

    for org in peers.organizations.iter().chain(&orderers.organizations) {
        println!(
            "    {:<8} {:<24} peers={} orderers={}",
            org.org_type.to_string(),
            org.msp_id,
            org.peers.len(),
            org.orderer_nodes.len()
        );
    }
    Ok(())
}
