use crate::utils::error::{GatewayError, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Periodically pings the public URL so idle hosts keep the instance warm.
pub fn spawn(client: Client, url: String, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match ping(&client, &url).await {
                Ok(status) => tracing::debug!("Keep-alive ping to {} returned {}", url, status),
                Err(e) => tracing::warn!("Keep-alive ping to {} failed: {}", url, e),
            }
        }
    })
}

pub async fn ping(client: &Client, url: &str) -> Result<StatusCode> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if status.is_server_error() {
        return Err(GatewayError::upstream("keepalive", format!("HTTP {}", status)));
    }
    Ok(status)
}
