//! bvc: OpenFlow flow document tool
//!
//! - `summary`: one `ovs-ofctl`-style line per flow
//! - `payload`: controller PUT body and URL for a flow
//! - `normalize`: decoded flow re-encoded with underscore keys

use std::path::PathBuf;

use anyhow::{Context, Result};
use bvc_controller::{BvcConfig, InventoryUrls};
use clap::Parser;
use tracing::info;

mod input;

use input::{parse_flows, parse_single_flow, read_input};

#[derive(Parser, Debug)]
#[command(name = "bvc")]
#[command(about = "Inspect and convert OpenFlow flow documents")]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (TOML); falls back to BVC_CONFIG_FILE
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Inventory node id, overrides the configured one
    #[arg(long, global = true)]
    node: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print a compact summary of every flow in a document
    Summary {
        /// Flow, payload or table document ("-" for stdin)
        path: PathBuf,
    },
    /// Print the controller payload and PUT URL of a flow
    Payload {
        /// Flow document ("-" for stdin)
        path: PathBuf,
    },
    /// Print flows re-encoded in underscore form
    Normalize {
        /// Flow, payload or table document ("-" for stdin)
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bvc=info".parse()?)
                .add_directive("bvc_openflow=warn".parse()?)
                .add_directive("bvc_controller=info".parse()?),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Summary { path } => {
            let flows = parse_flows(&read_input(&path)?)?;
            for flow in &flows {
                println!("{}", flow.compact_summary());
            }
        }
        Commands::Payload { path } => {
            let mut config = BvcConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
            if let Some(node) = args.node {
                config.node = node;
            }

            let flow = parse_single_flow(&read_input(&path)?)?;
            let (table_id, flow_id) = flow.identity().context("Flow cannot be installed")?;
            let url = format!(
                "{}/table/{}/flow/{}",
                InventoryUrls::from(&config.controller).node_config(&config.node),
                table_id,
                flow_id
            );
            info!("Flow {} targets node {}", flow_id, config.node);

            let payload = flow.payload().context("Failed to encode payload")?;
            println!("PUT {}", url);
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::Normalize { path } => {
            for flow in parse_flows(&read_input(&path)?)? {
                println!("{}", flow.to_json()?);
            }
        }
    }

    Ok(())
}
