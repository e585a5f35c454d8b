//! server: the rendering process. Serves the table page at `/` and relays
//! snapshots from the state channel to every viewer on `/events`.

mod bootstrap;
mod error;
pub mod feed;
mod logging;
mod page;
mod routes;

pub use bootstrap::{run_render_process, RenderProcessConfig};
pub use error::ApiError;
pub use feed::{table_feed, FeedReader, FeedWriter};
pub use logging::log_requests;
pub use page::{load_page, render_page};
pub use routes::{ServerContext, ViewerServer, CONFIG_EVENT};
