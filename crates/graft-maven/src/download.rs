//! Issues a single HTTP GET for one repository fetch attempt.

use graft_core::UserSettings;
use graft_util::errors::GraftResult;
use reqwest::Client;
use std::time::Duration;

use crate::auth;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build_client() -> GraftResult<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent("graft/0.1")
        .build()
        .map_err(|e| graft_util::errors::GraftError::Network {
            message: format!("failed to build HTTP client: {e}"),
        }
        .into())
}

/// The outcome of a single repository GET: a 200 is a hit, a 404 or any
/// other status is a clean miss, and a network error (distinguishing
/// timeouts, which feed the per-host blocklist) short-circuits the attempt.
pub enum FetchOutcome {
    Found(String),
    Miss { status: Option<u16> },
    Timeout,
    NetworkError(String),
}

pub async fn fetch_text(client: &Client, settings: &UserSettings, repository_id: &str, url: &str) -> FetchOutcome {
    let request = client.get(url);
    let request = auth::apply_auth(request, settings, repository_id);

    match request.send().await {
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                match response.text().await {
                    Ok(body) => FetchOutcome::Found(body),
                    Err(e) => FetchOutcome::NetworkError(format!("{e}")),
                }
            } else {
                tracing::debug!(%url, %status, "repository returned non-success status");
                FetchOutcome::Miss {
                    status: Some(status.as_u16()),
                }
            }
        }
        Err(e) if e.is_timeout() => {
            tracing::warn!(%url, "request timed out");
            FetchOutcome::Timeout
        }
        Err(e) => {
            tracing::warn!(%url, error = %e, "network error fetching repository resource");
            FetchOutcome::NetworkError(format!("{e}"))
        }
    }
}
