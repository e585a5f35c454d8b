pub mod card;
pub mod channel;
pub mod config;
pub mod graphic;
pub mod layout;
pub mod scene;
pub mod server;
pub mod snapshot;
pub mod supervisor;
pub mod tokio_tools;
pub mod viewer;

#[cfg(test)]
pub mod test_utils;

pub use config::ViewerConfig;
pub use snapshot::{StateSnapshot, TableConfig};
pub use supervisor::{GraphicViewer, RenderError};
pub use viewer::PokerViewer;
