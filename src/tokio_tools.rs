use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const LOG_TARGET: &str = "tokio_tools";

/// Spawn a Tokio task with a stable name when supported, and trace span otherwise.
pub fn spawn_named_task<F, S>(name: S, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
    S: Into<String>,
{
    let name_owned = name.into();
    #[cfg(tokio_unstable)]
    {
        match tokio::task::Builder::new().name(&name_owned).spawn(future) {
            Ok(handle) => handle,
            Err(err) => panic!("failed to spawn task {name_owned}: {err}"),
        }
    }
    #[cfg(not(tokio_unstable))]
    {
        use tracing::Instrument;
        let span = tracing::info_span!("task", task_name = %name_owned);
        tokio::spawn(future.instrument(span))
    }
}

/// Cancel `token` on ctrl-c. The watcher exits quietly if `token` is
/// cancelled first.
pub fn cancel_on_ctrl_c(token: CancellationToken) -> JoinHandle<()> {
    spawn_named_task("ctrl-c-watcher", async move {
        tokio::select! {
            _ = token.cancelled() => {}
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    info!(target = LOG_TARGET, "shutdown signal received");
                    token.cancel();
                }
                Err(err) => {
                    warn!(
                        target = LOG_TARGET,
                        error = %err,
                        "failed to install ctrl-c handler"
                    );
                    token.cancelled().await;
                }
            },
        }
    })
}
