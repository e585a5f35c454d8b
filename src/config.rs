use std::path::PathBuf;
use std::time::Duration;

use crate::graphic::default_asset_root;
use crate::scene::SceneParams;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub const SERVER_BIN_NAME: &str = "table_viewer_server";
/// Overrides where the supervisor looks for the rendering process binary.
pub const SERVER_BIN_ENV: &str = "TABLE_VIEWER_SERVER_BIN";

/// The state channel always listens one port above the HTTP port.
pub fn channel_port(http_port: u16) -> Option<u16> {
    http_port.checked_add(1)
}

/// Settings for one [`GraphicViewer`](crate::supervisor::GraphicViewer).
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub host: String,
    /// HTTP port; `None` picks a free pair of adjacent ports.
    pub port: Option<u16>,
    pub scene: SceneParams,
    /// Directory holding `images/`, `templates/` and `static/`.
    pub asset_root: PathBuf,
    pub server_binary: Option<PathBuf>,
    pub startup_timeout: Duration,
    pub poll_interval: Duration,
}

impl ViewerConfig {
    pub fn new(num_players: usize, num_hole_cards: usize, num_community_cards: usize) -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: None,
            scene: SceneParams::new(num_players, num_hole_cards, num_community_cards),
            asset_root: default_asset_root(),
            server_binary: None,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_asset_root(mut self, asset_root: impl Into<PathBuf>) -> Self {
        self.asset_root = asset_root.into();
        self
    }

    pub fn with_server_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.server_binary = Some(path.into());
        self
    }

    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}
