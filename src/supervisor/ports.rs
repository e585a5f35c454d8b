use std::io;
use std::net::TcpListener;

use tracing::debug;

use crate::config::channel_port;

const LOG_TARGET: &str = "supervisor::ports";
const PROBE_ATTEMPTS: usize = 32;

/// Ask the OS for a free HTTP port whose successor is free as well.
///
/// Both probe sockets are released before returning, so another process may
/// still grab either port before the rendering process binds it; the startup
/// handshake then fails instead of talking to a stranger.
pub fn probe_port_pair(host: &str) -> io::Result<u16> {
    for attempt in 0..PROBE_ATTEMPTS {
        let http = TcpListener::bind((host, 0))?;
        let port = http.local_addr()?.port();
        let Some(channel) = channel_port(port) else {
            continue;
        };
        match TcpListener::bind((host, channel)) {
            Ok(_channel) => {
                debug!(target = LOG_TARGET, port, channel, attempt, "probed free port pair");
                return Ok(port);
            }
            Err(err) => {
                debug!(target = LOG_TARGET, port, channel, error = %err, "channel port taken");
            }
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AddrInUse,
        format!("no free pair of adjacent ports on {host} after {PROBE_ATTEMPTS} attempts"),
    ))
}
