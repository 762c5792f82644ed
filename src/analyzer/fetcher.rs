//! HTTP fetching for the analyzer
//!
//! Builds the shared HTTP client and performs the single root-page fetch.
//! Connection reuse is disabled and the user agent is rotated per request,
//! so probed hosts see each request as an independent visitor.

use crate::config::UserAgentConfig;
use crate::PagelensError;
use rand::seq::SliceRandom;
use reqwest::{header::USER_AGENT, redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// The fetched root document
#[derive(Debug)]
pub struct RootDocument {
    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code of the root response
    pub status_code: u16,

    /// Raw response body
    pub body: String,
}

/// Builds the HTTP client shared by the root fetch and all probes
///
/// Keep-alive is disabled (`pool_max_idle_per_host(0)`); redirects are
/// followed up to 10 hops. Timeouts are applied per request, not on the
/// client, because the root fetch and probes carry different deadlines.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .pool_max_idle_per_host(0)
        .redirect(Policy::limited(10))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Picks a user agent at random from the configured pool
///
/// The pool is validated non-empty at config load time.
pub fn pick_user_agent(config: &UserAgentConfig) -> String {
    config
        .pool
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_default()
}

/// Fetches the root document exactly once
///
/// A timeout becomes [`PagelensError::FetchTimeout`]; any other transport
/// failure, and any non-success status, becomes [`PagelensError::RootFetch`].
/// Neither is ever silently turned into an empty page.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `url` - The validated absolute root URL
/// * `timeout` - Deadline for the whole fetch
/// * `user_agents` - Pool to draw the request's user agent from
pub async fn fetch_root(
    client: &Client,
    url: &Url,
    timeout: Duration,
    user_agents: &UserAgentConfig,
) -> Result<RootDocument, PagelensError> {
    let user_agent = pick_user_agent(user_agents);

    let response = client
        .get(url.clone())
        .header(USER_AGENT, user_agent)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_root_error(url, e))?;

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return Err(PagelensError::RootFetch {
            url: url.to_string(),
            message: format!("HTTP {}", status.as_u16()),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| classify_root_error(url, e))?;

    Ok(RootDocument {
        final_url,
        status_code: status.as_u16(),
        body,
    })
}

/// Returns the first line of a response body, for doctype classification
pub fn first_line(body: &str) -> &str {
    body.lines().next().unwrap_or("")
}

fn classify_root_error(url: &Url, error: reqwest::Error) -> PagelensError {
    if error.is_timeout() {
        PagelensError::FetchTimeout {
            url: url.to_string(),
        }
    } else {
        PagelensError::RootFetch {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client().is_ok());
    }

    #[test]
    fn test_pick_user_agent_from_pool() {
        let config = UserAgentConfig {
            pool: vec!["A/1".to_string(), "B/2".to_string()],
        };
        for _ in 0..20 {
            let picked = pick_user_agent(&config);
            assert!(picked == "A/1" || picked == "B/2");
        }
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("<!DOCTYPE html>\n<html>"), "<!DOCTYPE html>");
        assert_eq!(first_line(""), "");
        assert_eq!(first_line("single"), "single");
    }

    #[tokio::test]
    async fn test_refused_connection_is_root_fetch_error() {
        let client = build_http_client().unwrap();
        let url = Url::parse("http://127.0.0.1:1/").unwrap();
        let config = UserAgentConfig::default();

        let result = fetch_root(&client, &url, Duration::from_secs(2), &config).await;
        assert!(matches!(result, Err(PagelensError::RootFetch { .. })));
    }
}
