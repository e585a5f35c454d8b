use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use table_viewer::config::DEFAULT_HOST;
use table_viewer::graphic::default_asset_root;
use table_viewer::scene::SceneParams;
use table_viewer::server::{run_render_process, RenderProcessConfig};
use table_viewer::tokio_tools::cancel_on_ctrl_c;

const LOG_TARGET: &str = "bin::table_viewer_server";

#[derive(Debug, Parser)]
#[command(name = "table_viewer_server")]
#[command(about = "Serve the live table view and relay snapshots from the state channel", long_about = None)]
struct Args {
    /// Interface to bind the page and the state channel to
    #[arg(long, env = "TABLE_VIEWER_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// HTTP port; the state channel listens one port above (0 = any free port)
    #[arg(long, env = "TABLE_VIEWER_PORT", default_value_t = 0)]
    port: u16,

    /// Number of seats at the table
    #[arg(long, env = "TABLE_VIEWER_NUM_PLAYERS")]
    num_players: usize,

    /// Hole cards dealt to each seat
    #[arg(long, env = "TABLE_VIEWER_NUM_HOLE_CARDS", default_value_t = 2)]
    num_hole_cards: usize,

    /// Community cards on the board
    #[arg(long, env = "TABLE_VIEWER_NUM_COMMUNITY_CARDS", default_value_t = 5)]
    num_community_cards: usize,

    /// Directory holding images/, templates/ and static/
    #[arg(long, env = "TABLE_VIEWER_ASSETS")]
    assets: Option<PathBuf>,

    /// Toggle structured (JSON) logs
    #[arg(long, env = "TABLE_VIEWER_LOG_JSON", default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json)?;

    let scene = SceneParams::new(
        args.num_players,
        args.num_hole_cards,
        args.num_community_cards,
    );
    scene.validate().context("invalid table dimensions")?;
    let config = RenderProcessConfig {
        host: args.host,
        port: args.port,
        scene,
        asset_root: args.assets.unwrap_or_else(default_asset_root),
    };
    info!(
        target = LOG_TARGET,
        assets = %config.asset_root.display(),
        "starting table viewer"
    );

    let shutdown = CancellationToken::new();
    cancel_on_ctrl_c(shutdown.clone());
    run_render_process(config, shutdown).await
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder
            .json()
            .flatten_event(true)
            .try_init()
            .map_err(|err| anyhow!(err))
    } else {
        builder.compact().try_init().map_err(|err| anyhow!(err))
    }
}
