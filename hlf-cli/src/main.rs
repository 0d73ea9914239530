//! kubectl-hlf - inspect the Hyperledger Fabric network running in a cluster.

mod commands;
mod config;
mod observability;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::ClusterTopology;
use config::CliConfig;
use hlf_topology::{
    IdentityRequest, KubeNodeDiscovery, KubeStore, PublicIpDiscovery, Registrar, StaticPublicIp,
    Topology,
};
use observability::{LogFormat, TracingConfig, init_tracing};
use std::sync::Arc;

/// Resolve Fabric CAs, peers and orderers into connection-ready addresses.
#[derive(Parser)]
#[command(name = "kubectl-hlf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Namespace to query (all namespaces when omitted)
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Use this public IP instead of discovering one from cluster nodes
    #[arg(long, global = true)]
    public_ip: Option<String>,

    /// Log format (json, pretty, compact)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Certificate authority commands
    Ca {
        #[command(subcommand)]
        action: CaAction,
    },

    /// Peer commands
    Peer {
        #[command(subcommand)]
        action: PeerAction,
    },

    /// Orderer commands
    Orderer {
        #[command(subcommand)]
        action: OrdererAction,
    },

    /// Identity commands
    Identity {
        #[command(subcommand)]
        action: IdentityAction,
    },

    /// Summarize the whole network
    Network,

    /// Print the CustomResourceDefinitions as YAML
    Crds,
}

#[derive(Subcommand)]
enum CaAction {
    /// List certificate authorities
    List,

    /// Show a certificate authority
    Get {
        /// Full name (name.namespace)
        full_name: String,
    },

    /// Find the certificate authority serving a host and port
    Find {
        /// Host (configured host, name.namespace, or node IP)
        #[arg(long)]
        host: String,

        /// Port
        #[arg(long, default_value = "7054")]
        port: i32,
    },
}

#[derive(Subcommand)]
enum PeerAction {
    /// List peers grouped by organization
    List,

    /// Show a peer
    Get {
        /// Full name (name.namespace)
        full_name: String,
    },
}

#[derive(Subcommand)]
enum OrdererAction {
    /// List ordering services
    List,

    /// List every orderer node
    Nodes,

    /// Show an orderer node
    Get {
        /// Full name (name.namespace)
        full_name: String,
    },
}

#[derive(Subcommand)]
enum IdentityAction {
    /// Print a FabricIdentity manifest
    Spec {
        /// Identity name
        #[arg(long)]
        name: String,

        /// CA full name (name.namespace)
        #[arg(long)]
        ca: String,

        /// CA name inside the server (ca or tlsca)
        #[arg(long, default_value = "ca")]
        ca_name: String,

        /// MSP ID
        #[arg(long)]
        mspid: String,

        /// Enroll ID
        #[arg(long)]
        enroll_id: String,

        /// Enroll secret
        #[arg(long)]
        enroll_secret: String,

        /// Registrar enroll ID
        #[arg(long)]
        ca_enroll_id: Option<String>,

        /// Registrar enroll secret
        #[arg(long)]
        ca_enroll_secret: Option<String>,

        /// Identity type to register
        #[arg(long, default_value = "client")]
        ca_type: String,

        /// Affiliation to register under
        #[arg(long, default_value = "")]
        affiliation: String,
    },
}

fn setup_logging(verbosity: u8, format: Option<LogFormat>) -> Result<observability::TracingGuard> {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env = TracingConfig::from_env(filter);
    let config = TracingConfig::builder()
        .log_format(format.unwrap_or(env.log_format()))
        .log_filter(env.log_filter())
        .include_location(env.include_location())
        .build();

    init_tracing(config)
}

async fn connect(config: &CliConfig) -> Result<ClusterTopology> {
    let client = kube::Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;

    let discovery: Arc<dyn PublicIpDiscovery> = match config.public_ip() {
        Some(ip) => {
            tracing::debug!(ip = %ip, "Using configured public IP");
            Arc::new(StaticPublicIp::new(ip))
        }
        None => Arc::new(KubeNodeDiscovery::with_timeout(
            client.clone(),
            config.discovery_timeout(),
        )),
    };

    Ok(Topology::new(KubeStore::new(client), discovery))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _tracing_guard = setup_logging(cli.verbose, cli.log_format)?;

    let config = CliConfig::from_env()
        .with_namespace(cli.namespace)
        .with_public_ip(cli.public_ip);
    let scope = config.scope();

    if let Commands::Crds = cli.command {
        return commands::crds::run();
    }

    let topology = connect(&config).await?;

    match cli.command {
        Commands::Ca { action } => match action {
            CaAction::List => commands::ca::list(&topology, &scope).await,
            CaAction::Get { full_name } => commands::ca::get(&topology, &scope, &full_name).await,
            CaAction::Find { host, port } => commands::ca::find(&topology, &host, port).await,
        },
        Commands::Peer { action } => match action {
            PeerAction::List => commands::peer::list(&topology, &scope).await,
            PeerAction::Get { full_name } => {
                commands::peer::get(&topology, &scope, &full_name).await
            }
        },
        Commands::Orderer { action } => match action {
            OrdererAction::List => commands::orderer::list(&topology, &scope).await,
            OrdererAction::Nodes => commands::orderer::nodes(&topology, &scope).await,
            OrdererAction::Get { full_name } => {
                commands::orderer::get(&topology, &scope, &full_name).await
            }
        },
        Commands::Identity { action } => match action {
            IdentityAction::Spec {
                name,
                ca,
                ca_name,
                mspid,
                enroll_id,
                enroll_secret,
                ca_enroll_id,
                ca_enroll_secret,
                ca_type,
                affiliation,
            } => {
                let registrar = match (ca_enroll_id, ca_enroll_secret) {
                    (Some(enroll_id), Some(enroll_secret)) => Some(Registrar {
                        enroll_id,
                        enroll_secret,
                        identity_type: ca_type,
                        affiliation,
                    }),
                    _ => None,
                };
                let request = IdentityRequest {
                    name,
                    namespace: config.target_namespace().to_string(),
                    ca_name,
                    msp_id: mspid,
                    enroll_id,
                    enroll_secret,
                    registrar,
                };
                commands::identity::spec(&topology, &ca, request).await
            }
        },
        Commands::Network => commands::network::run(&topology, &scope).await,
        Commands::Crds => commands::crds::run(),
    }
}
