//! Outbound network reachability probe.
//!
//! Used as a deployment check: a parser running inside an isolated container should not be able
//! to reach the internet. The probe issues a single GET against a configured URL and reports
//! whether it came back with `200 OK`.
//!
//! Every failure mode is folded into a [`ProbeOutcome`]. Only building the HTTP client can fail
//! with an error.

use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Errors returned when setting up a probe.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("probe URL cannot be empty")]
    EmptyUrl,
}

/// What happened when the probe tried to reach its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The target answered with `200 OK`.
    Reachable,
    /// The target answered, but not with `200 OK`.
    UnexpectedStatus(u16),
    /// The connection was refused or could not be established.
    Blocked,
    /// No answer before the timeout elapsed.
    TimedOut,
    /// Any other request failure.
    Failed(String),
}

impl ProbeOutcome {
    /// `true` only when outbound access demonstrably works.
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable)
    }
}

/// Single-shot GET probe against a fixed URL.
#[derive(Clone, Debug)]
pub struct NetworkProbe {
    client: Client,
    url: String,
}

impl NetworkProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ProbeError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(ProbeError::EmptyUrl);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProbeError::ClientBuild)?;

        Ok(Self { client, url })
    }

    /// Sends the request and classifies the result.
    pub async fn run(&self) -> ProbeOutcome {
        tracing::info!("probing outbound access to {}", self.url);

        let outcome = match self.client.get(&self.url).send().await {
            Ok(response) if response.status() == StatusCode::OK => ProbeOutcome::Reachable,
            Ok(response) => ProbeOutcome::UnexpectedStatus(response.status().as_u16()),
            Err(e) if e.is_timeout() => ProbeOutcome::TimedOut,
            Err(e) if e.is_connect() => ProbeOutcome::Blocked,
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        };

        match &outcome {
            ProbeOutcome::Reachable => {
                tracing::warn!("outbound connection to {} succeeded", self.url)
            }
            ProbeOutcome::UnexpectedStatus(status) => {
                tracing::info!("probe got status {} from {}", status, self.url)
            }
            ProbeOutcome::Blocked => tracing::info!("outbound connection blocked"),
            ProbeOutcome::TimedOut => tracing::info!("outbound connection timed out"),
            ProbeOutcome::Failed(reason) => tracing::warn!("probe error: {}", reason),
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as HttpStatus, routing::get, Router};
    use tokio::net::TcpListener;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_probe_reachable_on_200() {
        let url = serve(Router::new().route("/", get(|| async { "ok" }))).await;
        let probe = NetworkProbe::new(url, Duration::from_secs(3)).unwrap();

        let outcome = probe.run().await;

        assert_eq!(outcome, ProbeOutcome::Reachable);
        assert!(outcome.is_reachable());
    }

    #[tokio::test]
    async fn test_probe_non_200_is_not_reachable() {
        let router = Router::new().route(
            "/",
            get(|| async { (HttpStatus::SERVICE_UNAVAILABLE, "down") }),
        );
        let url = serve(router).await;
        let probe = NetworkProbe::new(url, Duration::from_secs(3)).unwrap();

        let outcome = probe.run().await;

        assert_eq!(outcome, ProbeOutcome::UnexpectedStatus(503));
        assert!(!outcome.is_reachable());
    }

    #[tokio::test]
    async fn test_probe_refused_connection_is_blocked() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe =
            NetworkProbe::new(format!("http://{}/", addr), Duration::from_secs(3)).unwrap();

        assert_eq!(probe.run().await, ProbeOutcome::Blocked);
    }

    #[tokio::test]
    async fn test_probe_times_out() {
        // Accepts the connection but never answers.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let probe =
            NetworkProbe::new(format!("http://{}/", addr), Duration::from_millis(200)).unwrap();

        let outcome = probe.run().await;
        assert_eq!(outcome, ProbeOutcome::TimedOut);
    }

    #[test]
    fn test_empty_url_rejected() {
        assert!(matches!(
            NetworkProbe::new("  ", Duration::from_secs(1)),
            Err(ProbeError::EmptyUrl)
        ));
    }
}
