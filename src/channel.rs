//! channel: the private link between the supervisor and its rendering
//! process.
//!
//! One TCP connection on the channel port carries newline-delimited JSON
//! envelopes, written by exactly one [`StateSender`] and drained in order by
//! exactly one [`StateReceiver`]:
//!
//! ```text
//! {"content":"close"}
//! {"content":{"action":0,"pot":10,...}}
//! ```

use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_util::codec::{Framed, LinesCodec, LinesCodecError};
use tracing::trace;

use crate::snapshot::TableConfig;

const LOG_TARGET: &str = "channel";

/// Upper bound on one encoded envelope.
pub const MAX_LINE_BYTES: usize = 1 << 20;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("channel frame rejected: {0}")]
    Frame(#[from] LinesCodecError),

    #[error("malformed channel message: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Envelope", from = "Envelope")]
pub enum ChannelMessage {
    Close,
    Snapshot(TableConfig),
}

impl ChannelMessage {
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    fn kind(&self) -> &'static str {
        match self {
            ChannelMessage::Close => "close",
            ChannelMessage::Snapshot(_) => "snapshot",
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct Envelope {
    content: Content,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Content {
    Signal(Signal),
    Snapshot(TableConfig),
}

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Signal {
    Close,
}

impl From<ChannelMessage> for Envelope {
    fn from(message: ChannelMessage) -> Self {
        let content = match message {
            ChannelMessage::Close => Content::Signal(Signal::Close),
            ChannelMessage::Snapshot(config) => Content::Snapshot(config),
        };
        Envelope { content }
    }
}

impl From<Envelope> for ChannelMessage {
    fn from(envelope: Envelope) -> Self {
        match envelope.content {
            Content::Signal(Signal::Close) => ChannelMessage::Close,
            Content::Snapshot(config) => ChannelMessage::Snapshot(config),
        }
    }
}

fn codec() -> LinesCodec {
    LinesCodec::new_with_max_length(MAX_LINE_BYTES)
}

/// Producer end, owned by the supervisor.
#[derive(Debug)]
pub struct StateSender {
    frames: Framed<TcpStream, LinesCodec>,
}

impl StateSender {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            frames: Framed::new(stream, codec()),
        }
    }

    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ChannelError> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }

    /// Writes and flushes one envelope. Nothing is acknowledged by the peer.
    pub async fn send(&mut self, message: &ChannelMessage) -> Result<(), ChannelError> {
        let line = message.to_line()?;
        trace!(target = LOG_TARGET, kind = message.kind(), bytes = line.len(), "sending");
        self.frames.send(line).await?;
        Ok(())
    }
}

/// Consumer end, owned by the rendering process.
#[derive(Debug)]
pub struct StateReceiver {
    frames: Framed<TcpStream, LinesCodec>,
}

impl StateReceiver {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            frames: Framed::new(stream, codec()),
        }
    }

    /// Next message in write order, or `None` once the producer hung up.
    pub async fn recv(&mut self) -> Option<Result<ChannelMessage, ChannelError>> {
        let line = match self.frames.next().await? {
            Ok(line) => line,
            Err(err) => return Some(Err(err.into())),
        };
        Some(ChannelMessage::from_line(&line).map_err(ChannelError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::serde::assert_round_trip_eq;
    use crate::test_utils::two_seat_snapshot;
    use tokio::net::TcpListener;

    #[test]
    fn close_signal_wire_form() {
        assert_eq!(
            ChannelMessage::Close.to_line().unwrap(),
            r#"{"content":"close"}"#
        );
        assert_eq!(
            ChannelMessage::from_line(r#"{"content":"close"}"#).unwrap(),
            ChannelMessage::Close
        );
    }

    #[test]
    fn snapshot_is_wrapped_in_content() {
        let config = TableConfig::from(&two_seat_snapshot());
        let message = ChannelMessage::Snapshot(config.clone());
        let value: serde_json::Value = serde_json::from_str(&message.to_line().unwrap()).unwrap();
        assert_eq!(value["content"]["pot"], 10);
        assert_eq!(value["content"]["action"], 0);
        assert_eq!(
            value["content"],
            serde_json::to_value(&config).unwrap()
        );
        assert_round_trip_eq(&message);
    }

    #[test]
    fn rejects_unknown_envelopes() {
        for line in [
            r#"{"content":"open"}"#,
            r#"{"content":{}}"#,
            r#"{"payload":"close"}"#,
            "close",
        ] {
            assert!(ChannelMessage::from_line(line).is_err(), "{line} accepted");
        }
    }

    #[tokio::test]
    async fn messages_arrive_in_write_order() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut snapshot = two_seat_snapshot();
        let first = TableConfig::from(&snapshot);
        snapshot.pot = 40;
        snapshot.action = Some(1);
        let second = TableConfig::from(&snapshot);

        let producer = {
            let (first, second) = (first.clone(), second.clone());
            tokio::spawn(async move {
                let mut sender = StateSender::connect(addr).await.unwrap();
                sender.send(&ChannelMessage::Snapshot(first)).await.unwrap();
                sender.send(&ChannelMessage::Snapshot(second)).await.unwrap();
                sender.send(&ChannelMessage::Close).await.unwrap();
            })
        };

        let (stream, _) = listener.accept().await.unwrap();
        let mut receiver = StateReceiver::new(stream);
        let mut received = Vec::new();
        while let Some(message) = receiver.recv().await {
            received.push(message.unwrap());
        }
        producer.await.unwrap();

        assert_eq!(
            received,
            vec![
                ChannelMessage::Snapshot(first),
                ChannelMessage::Snapshot(second),
                ChannelMessage::Close,
            ]
        );
    }

    #[tokio::test]
    async fn garbage_line_surfaces_as_json_error() {
        use tokio::io::AsyncWriteExt;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let writer = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(b"not json\n").await.unwrap();
        });

        let (stream, _) = listener.accept().await.unwrap();
        let mut receiver = StateReceiver::new(stream);
        assert!(matches!(
            receiver.recv().await,
            Some(Err(ChannelError::Json(_)))
        ));
        writer.await.unwrap();
        assert!(receiver.recv().await.is_none());
    }
}
