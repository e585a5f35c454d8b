//! supervisor: runs the rendering process on behalf of a game loop.
//!
//! [`GraphicViewer::spawn`] only returns once the process serves its page and
//! has accepted the state channel, so holding a `GraphicViewer` means renders
//! can be sent. Dropping it kills the process.

mod error;
mod handshake;
mod locate;
mod phase;
pub mod ports;

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

use crate::channel::{ChannelMessage, StateSender};
use crate::config::{channel_port, ViewerConfig};
use crate::snapshot::{StateSnapshot, TableConfig};

pub use error::RenderError;
pub use handshake::page_url;
pub use locate::resolve_server_binary;
pub use phase::SupervisorPhase;

const LOG_TARGET: &str = "supervisor";

/// How long a closed rendering process gets to exit before it is killed.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

pub struct GraphicViewer {
    config: ViewerConfig,
    port: u16,
    url: Url,
    phase: SupervisorPhase,
    child: Child,
    sender: Option<StateSender>,
    exit_status: Option<ExitStatus>,
}

impl GraphicViewer {
    pub async fn spawn(config: ViewerConfig) -> Result<Self, RenderError> {
        config
            .scene
            .validate()
            .map_err(|err| RenderError::initialization(err.to_string()))?;

        let mut phase = SupervisorPhase::Starting;
        let port = match config.port {
            Some(port) => port,
            None => ports::probe_port_pair(&config.host).map_err(|err| {
                RenderError::initialization(format!("failed to probe ports: {err}"))
            })?,
        };
        let channel = channel_port(port).ok_or_else(|| {
            RenderError::initialization(format!("port {port} leaves no room for the channel port"))
        })?;
        let url = page_url(&config.host, port)?;
        phase.advance(SupervisorPhase::PortBound);

        let binary = resolve_server_binary(config.server_binary.as_deref())?;
        let mut child = Command::new(&binary)
            .arg("--host")
            .arg(&config.host)
            .arg("--port")
            .arg(port.to_string())
            .arg("--num-players")
            .arg(config.scene.num_players.to_string())
            .arg("--num-hole-cards")
            .arg(config.scene.num_hole_cards.to_string())
            .arg("--num-community-cards")
            .arg(config.scene.num_community_cards.to_string())
            .arg("--assets")
            .arg(&config.asset_root)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                RenderError::initialization(format!(
                    "failed to launch {}: {err}",
                    binary.display()
                ))
            })?;
        phase.advance(SupervisorPhase::ChildSpawned);
        info!(
            target = LOG_TARGET,
            pid = ?child.id(),
            port,
            channel,
            binary = %binary.display(),
            "rendering process spawned"
        );

        let ready = async {
            tokio::join!(
                handshake::connect_channel(&config.host, channel, config.poll_interval),
                handshake::wait_for_page(&url, config.poll_interval),
            )
        };
        let outcome = tokio::select! {
            status = child.wait() => Err(match status {
                Ok(status) => format!("rendering process exited during startup ({status})"),
                Err(err) => format!("failed to watch rendering process: {err}"),
            }),
            ready = timeout(config.startup_timeout, ready) => match ready {
                Ok((stream, Ok(()))) => Ok(stream),
                Ok((_, Err(err))) => Err(err.to_string()),
                Err(_) => Err(format!(
                    "rendering process not ready within {:?}",
                    config.startup_timeout
                )),
            },
        };

        let stream = match outcome {
            Ok(stream) => stream,
            Err(reason) => {
                phase.advance(SupervisorPhase::Closing);
                if let Err(err) = child.start_kill() {
                    debug!(target = LOG_TARGET, error = %err, "rendering process already gone");
                }
                if let Err(err) = child.wait().await {
                    warn!(target = LOG_TARGET, error = %err, "failed to reap rendering process");
                }
                phase.advance(SupervisorPhase::Closed);
                warn!(target = LOG_TARGET, %reason, "graphic viewer failed to start");
                return Err(RenderError::Initialization { reason });
            }
        };

        if let Err(err) = stream.set_nodelay(true) {
            debug!(target = LOG_TARGET, error = %err, "failed to set TCP_NODELAY");
        }
        phase.advance(SupervisorPhase::ChannelConnected);
        phase.advance(SupervisorPhase::HttpReady);
        phase.advance(SupervisorPhase::Running);
        info!(target = LOG_TARGET, %url, "graphic viewer ready");

        Ok(Self {
            config,
            port,
            url,
            phase,
            child,
            sender: Some(StateSender::new(stream)),
            exit_status: None,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Address viewers open in a browser.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn phase(&self) -> SupervisorPhase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        self.phase == SupervisorPhase::Closed
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Exit status of the rendering process, once closed.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.exit_status
    }

    /// Push `snapshot` to every viewer. Returns once the line is written;
    /// a closed viewer ignores the call.
    pub async fn render(&mut self, snapshot: &StateSnapshot) -> Result<(), RenderError> {
        self.render_config(TableConfig::from(snapshot)).await
    }

    pub async fn render_config(&mut self, config: TableConfig) -> Result<(), RenderError> {
        let Some(sender) = self.sender.as_mut() else {
            return Ok(());
        };
        sender.send(&ChannelMessage::Snapshot(config)).await?;
        Ok(())
    }

    /// Signal the rendering process to stop and wait for it to exit.
    /// Calling it again after success is a no-op.
    pub async fn close(&mut self) -> Result<(), RenderError> {
        if self.is_closed() {
            return Ok(());
        }
        if self.phase.is_running() {
            self.phase.advance(SupervisorPhase::Closing);
            if let Some(mut sender) = self.sender.take() {
                if let Err(err) = sender.send(&ChannelMessage::Close).await {
                    debug!(target = LOG_TARGET, error = %err, "close signal not delivered");
                }
            }
        }

        let status = match timeout(CLOSE_GRACE, self.child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                debug!(target = LOG_TARGET, pid = ?self.child.id(), "killing rendering process");
                self.child.start_kill()?;
                self.child.wait().await?
            }
        };
        self.exit_status = Some(status);
        self.phase.advance(SupervisorPhase::Closed);
        info!(target = LOG_TARGET, %status, url = %self.url, "graphic viewer closed");
        Ok(())
    }
}

impl Drop for GraphicViewer {
    fn drop(&mut self) {
        if self.is_closed() {
            return;
        }
        if let Err(err) = self.child.start_kill() {
            debug!(target = LOG_TARGET, error = %err, "rendering process already gone");
        }
    }
}
