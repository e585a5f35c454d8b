use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::channel::{ChannelError, ChannelMessage, StateReceiver};
use crate::snapshot::TableConfig;

const LOG_TARGET: &str = "server::feed";

pub type CurrentConfig = Option<Arc<TableConfig>>;

/// Create the current-snapshot cell. The writer goes to the drain task, the
/// reader to the router state.
pub fn table_feed() -> (FeedWriter, FeedReader) {
    let (tx, rx) = watch::channel(None);
    (FeedWriter { tx }, FeedReader { rx })
}

#[derive(Debug)]
pub struct FeedWriter {
    tx: watch::Sender<CurrentConfig>,
}

impl FeedWriter {
    /// Replace the current snapshot and wake every viewer stream.
    pub fn publish(&self, config: TableConfig) {
        self.tx.send_replace(Some(Arc::new(config)));
    }
}

#[derive(Clone, Debug)]
pub struct FeedReader {
    rx: watch::Receiver<CurrentConfig>,
}

impl FeedReader {
    pub fn current(&self) -> CurrentConfig {
        self.rx.borrow().clone()
    }

    /// Stream yielding the current value first, then every later value.
    /// Values published while the consumer is busy coalesce to the latest.
    pub fn updates(&self) -> WatchStream<CurrentConfig> {
        WatchStream::new(self.rx.clone())
    }
}

/// Accept the single producer connection on the channel port and drain it.
/// `shutdown` is cancelled once the producer closes or hangs up.
pub async fn accept_and_drain(
    listener: TcpListener,
    writer: FeedWriter,
    shutdown: CancellationToken,
) {
    let accepted = tokio::select! {
        _ = shutdown.cancelled() => return,
        accepted = listener.accept() => accepted,
    };
    // one producer per process; later connections are refused
    drop(listener);

    match accepted {
        Ok((stream, peer)) => {
            info!(target = LOG_TARGET, %peer, "state channel connected");
            if let Err(err) = stream.set_nodelay(true) {
                debug!(target = LOG_TARGET, error = %err, "failed to set TCP_NODELAY");
            }
            drain_channel(StateReceiver::new(stream), writer, shutdown).await;
        }
        Err(err) => {
            warn!(target = LOG_TARGET, error = %err, "failed to accept state channel");
            shutdown.cancel();
        }
    }
}

pub async fn drain_channel(
    mut receiver: StateReceiver,
    writer: FeedWriter,
    shutdown: CancellationToken,
) {
    let mut received = 0u64;
    loop {
        let message = tokio::select! {
            _ = shutdown.cancelled() => break,
            message = receiver.recv() => message,
        };
        match message {
            Some(Ok(ChannelMessage::Snapshot(config))) => {
                received += 1;
                debug!(target = LOG_TARGET, received, pot = config.pot, "snapshot received");
                writer.publish(config);
            }
            Some(Ok(ChannelMessage::Close)) => {
                info!(target = LOG_TARGET, received, "close requested by producer");
                break;
            }
            Some(Err(ChannelError::Json(err))) => {
                warn!(target = LOG_TARGET, error = %err, "skipping malformed channel message");
            }
            Some(Err(err)) => {
                warn!(target = LOG_TARGET, error = %err, "state channel failed");
                break;
            }
            None => {
                info!(target = LOG_TARGET, received, "producer hung up");
                break;
            }
        }
    }
    shutdown.cancel();
}
