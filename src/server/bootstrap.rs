use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::channel_port;
use crate::graphic::AssetStore;
use crate::scene::{SceneBuilder, SceneParams};
use crate::tokio_tools::spawn_named_task;

use super::feed::{accept_and_drain, table_feed};
use super::page::load_page;
use super::routes::ViewerServer;

const LOG_TARGET: &str = "server::bootstrap";

#[derive(Clone, Debug)]
pub struct RenderProcessConfig {
    pub host: String,
    /// HTTP port; 0 lets the OS choose. The channel binds the next port up.
    pub port: u16,
    pub scene: SceneParams,
    pub asset_root: PathBuf,
}

/// Build the scene, bind both listeners and serve until the producer closes
/// the channel or `shutdown` is cancelled.
pub async fn run_render_process(
    config: RenderProcessConfig,
    shutdown: CancellationToken,
) -> Result<()> {
    let images = AssetStore::new(config.asset_root.join("images"));
    let scene = SceneBuilder::new(config.scene)
        .build(&images)
        .context("failed to build table scene")?;
    let page = load_page(&config.asset_root, &scene)?;

    let host = config.host.as_str();
    let http_listener = TcpListener::bind((host, config.port))
        .await
        .with_context(|| format!("failed to bind {host}:{}", config.port))?;
    let local_addr = http_listener.local_addr()?;
    let channel = channel_port(local_addr.port())
        .with_context(|| format!("no channel port above {}", local_addr.port()))?;
    let channel_listener = TcpListener::bind((host, channel))
        .await
        .with_context(|| format!("failed to bind state channel {host}:{channel}"))?;

    info!(
        target = LOG_TARGET,
        %local_addr,
        channel,
        num_players = config.scene.num_players,
        "table viewer listening"
    );

    let (writer, reader) = table_feed();
    let drain = spawn_named_task(
        "state-channel-drain",
        accept_and_drain(channel_listener, writer, shutdown.clone()),
    );

    let router = ViewerServer::new(page, reader, shutdown.clone()).into_router();
    let served = axum::serve(http_listener, router.into_make_service())
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .await;

    shutdown.cancel();
    drain.await.context("state channel drain task failed")?;
    served.context("viewer server exited with error")?;
    info!(target = LOG_TARGET, %local_addr, "table viewer stopped");
    Ok(())
}
