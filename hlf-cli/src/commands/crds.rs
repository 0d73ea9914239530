//! Print the CustomResourceDefinitions the resolver reads.

use anyhow::Result;
use hlf_topology::crd::{
    FabricCA, FabricIdentity, FabricOrdererNode, FabricOrderingService, FabricPeer,
};
use kube::CustomResourceExt;

/// Print every CRD as a multi-document YAML stream.
pub fn run() -> Result<()> {
    let documents = [
        serde_yaml::to_string(&FabricCA::crd())?,
        serde_yaml::to_string(&FabricPeer::crd())?,
        serde_yaml::to_string(&FabricOrdererNode::crd())?,
        serde_yaml::to_string(&FabricOrderingService::crd())?,
        serde_yaml::to_string(&FabricIdentity::crd())?,
    ];

    for document in documents {
        println!("---");
        print!("{}", document);
    }
    Ok(())
}
