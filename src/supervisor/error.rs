use std::io;

use thiserror::Error;
use tokio_util::codec::LinesCodecError;

use crate::channel::ChannelError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("graphic viewer failed to start: {reason}")]
    Initialization { reason: String },

    #[error("viewer i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode table state: {0}")]
    Encode(#[from] serde_json::Error),
}

impl RenderError {
    pub fn initialization(reason: impl Into<String>) -> Self {
        RenderError::Initialization {
            reason: reason.into(),
        }
    }
}

impl From<ChannelError> for RenderError {
    fn from(err: ChannelError) -> Self {
        match err {
            ChannelError::Io(err) | ChannelError::Frame(LinesCodecError::Io(err)) => {
                RenderError::Io(err)
            }
            ChannelError::Json(err) => RenderError::Encode(err),
            ChannelError::Frame(other) => {
                RenderError::Io(io::Error::new(io::ErrorKind::InvalidData, other))
            }
        }
    }
}
