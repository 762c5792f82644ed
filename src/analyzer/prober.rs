//! Link probing
//!
//! A probe is a single-hop fetch of one discovered link, used only for
//! reachability and scope classification. No link discovery happens here and
//! nothing is ever retried: every probe produces exactly one [`Link`].

use crate::analyzer::fetcher::pick_user_agent;
use crate::analyzer::throttle::DomainThrottle;
use crate::config::UserAgentConfig;
use crate::session::Link;
use crate::url::is_internal;
use reqwest::{header::USER_AGENT, Client};
use std::time::Duration;
use url::Url;

/// One link dispatched for probing
///
/// The root host is captured at dispatch time so classification never reads
/// shared mutable session state from inside a probe task.
#[derive(Debug, Clone)]
pub struct ProbeTarget {
    pub url: Url,
    pub root_host: String,
}

/// Probes one link and classifies the outcome
///
/// Any HTTP response, 2xx-5xx alike, makes the link accessible with its
/// status code. A transport, DNS, or timeout failure makes it inaccessible
/// with status 0.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `target` - The link and the owning session's root host
/// * `timeout` - Deadline for the probe fetch
/// * `throttle` - Per-domain pacing shared across the session's probes
/// * `user_agents` - Pool to draw the request's user agent from
pub async fn probe_link(
    client: &Client,
    target: &ProbeTarget,
    timeout: Duration,
    throttle: &DomainThrottle,
    user_agents: &UserAgentConfig,
) -> Link {
    let internal = is_internal(&target.url, &target.root_host);
    let domain = target.url.host_str().unwrap_or("").to_string();
    let user_agent = pick_user_agent(user_agents);

    throttle.acquire(&domain).await;

    match client
        .get(target.url.clone())
        .header(USER_AGENT, user_agent)
        .timeout(timeout)
        .send()
        .await
    {
        Ok(response) => {
            let status = response.status().as_u16();
            tracing::debug!("Probed {} -> HTTP {}", target.url, status);
            Link {
                url: target.url.to_string(),
                status_code: status,
                is_internal: internal,
                is_accessible: true,
            }
        }
        Err(error) => {
            tracing::debug!("Probe of {} failed: {}", target.url, error);
            Link {
                url: target.url.to_string(),
                status_code: 0,
                is_internal: internal,
                is_accessible: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::fetcher::build_http_client;

    fn target(url: &str, root_host: &str) -> ProbeTarget {
        ProbeTarget {
            url: Url::parse(url).unwrap(),
            root_host: root_host.to_string(),
        }
    }

    #[tokio::test]
    async fn test_refused_connection_is_inaccessible() {
        let client = build_http_client().unwrap();
        let throttle = DomainThrottle::new(Duration::ZERO);
        let config = UserAgentConfig::default();

        let link = probe_link(
            &client,
            &target("http://127.0.0.1:1/", "example.com"),
            Duration::from_secs(2),
            &throttle,
            &config,
        )
        .await;

        assert!(!link.is_accessible);
        assert_eq!(link.status_code, 0);
        assert!(!link.is_internal);
    }

    #[tokio::test]
    async fn test_internal_flag_uses_dispatch_host() {
        let client = build_http_client().unwrap();
        let throttle = DomainThrottle::new(Duration::ZERO);
        let config = UserAgentConfig::default();

        let link = probe_link(
            &client,
            &target("http://127.0.0.1:1/about", "127.0.0.1:1"),
            Duration::from_secs(2),
            &throttle,
            &config,
        )
        .await;

        // Inaccessible, but still classified against the captured root host
        assert!(link.is_internal);
    }
}
