//! Periodic backend health ping

use crate::api_client::ApiClient;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Spawn a task that pings `/api/health` now and then every `interval`
///
/// Failures are logged and never stop the task. Abort the returned handle to
/// stop pinging.
pub fn spawn_keep_alive(client: ApiClient, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        run_keep_alive(client, interval).await;
    })
}

async fn run_keep_alive(client: ApiClient, interval: Duration) {
    info!(interval_secs = %interval.as_secs(), "Started keep-alive task");

    // The first tick completes immediately.
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        match client.health().await {
            Ok(_) => debug!("Backend keep-alive ping successful"),
            Err(e) => warn!(error = %e, "Backend keep-alive ping failed"),
        }
    }
}
