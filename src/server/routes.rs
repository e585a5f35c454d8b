use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::Uri;
use axum::middleware;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::snapshot::TableConfig;

use super::error::ApiError;
use super::feed::FeedReader;
use super::logging::log_requests;

pub const CONFIG_EVENT: &str = "config";
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Shared by every handler. `shutdown` ends open event streams so that
/// graceful shutdown can complete.
#[derive(Clone)]
pub struct ServerContext {
    pub page: Arc<String>,
    pub feed: FeedReader,
    pub shutdown: CancellationToken,
}

pub struct ViewerServer {
    router: Router,
}

impl ViewerServer {
    pub fn new(page: String, feed: FeedReader, shutdown: CancellationToken) -> Self {
        let context = Arc::new(ServerContext {
            page: Arc::new(page),
            feed,
            shutdown,
        });

        let router = Router::new()
            .route("/", get(index))
            .route("/events", get(events))
            .route("/state", get(current_state))
            .fallback(not_found)
            .layer(middleware::from_fn(log_requests))
            .with_state(context);

        Self { router }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

async fn index(State(ctx): State<Arc<ServerContext>>) -> Html<String> {
    Html(ctx.page.as_ref().clone())
}

/// Current snapshot on connect (or `{}` before the first one), then every
/// later snapshot in publish order.
async fn events(
    State(ctx): State<Arc<ServerContext>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = ctx
        .feed
        .updates()
        .map(|current| config_event(current.as_deref()))
        .take_until(ctx.shutdown.clone().cancelled_owned());

    Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

fn config_event(current: Option<&TableConfig>) -> Result<Event, axum::Error> {
    let event = Event::default().event(CONFIG_EVENT);
    match current {
        Some(config) => event.json_data(config),
        None => Ok(event.data("{}")),
    }
}

async fn current_state(
    State(ctx): State<Arc<ServerContext>>,
) -> Result<Json<TableConfig>, ApiError> {
    let current = ctx
        .feed
        .current()
        .ok_or_else(|| ApiError::not_found("no table state received yet"))?;
    Ok(Json(TableConfig::clone(&current)))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("no route for {}", uri.path()))
}
