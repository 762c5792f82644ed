//! Session coordination - per-request analysis orchestration
//!
//! This module owns the lifecycle of one analysis session:
//! - `reset` clears all state keyed to the session
//! - `visit` drives the root fetch and the probe fan-out to completion
//! - `snapshot` reads the aggregated result
//!
//! `visit` is the single synchronization barrier of the system: it returns
//! only after every dispatched probe has completed and the aggregator has
//! folded in every outcome, so a snapshot taken afterwards is always
//! complete and stable.

use crate::analyzer::aggregator::Aggregator;
use crate::analyzer::doctype;
use crate::analyzer::fetcher::{fetch_root, first_line};
use crate::analyzer::parser::extract_page;
use crate::analyzer::prober::{probe_link, ProbeTarget};
use crate::analyzer::throttle::DomainThrottle;
use crate::config::Config;
use crate::session::{Link, SessionId, Snapshot};
use crate::storage::{SessionStore, StoreResult};
use crate::url::parse_absolute;
use crate::PagelensError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

/// Coordinates one analysis session
///
/// Callers must serialize `reset` and `visit` on the same session; sessions
/// with distinct ids are fully isolated from each other and may run
/// concurrently.
pub struct SessionCoordinator {
    session: SessionId,
    config: Arc<Config>,
    client: Client,
    aggregator: Aggregator,
}

impl SessionCoordinator {
    /// Creates a coordinator for the given session
    ///
    /// # Arguments
    ///
    /// * `session` - The session identifier scoping all state
    /// * `config` - Shared service configuration
    /// * `store` - The session store backend
    /// * `client` - The shared HTTP client
    pub fn new(
        session: SessionId,
        config: Arc<Config>,
        store: Arc<dyn SessionStore>,
        client: Client,
    ) -> Self {
        let aggregator = Aggregator::new(store, session.clone());
        Self {
            session,
            config,
            client,
            aggregator,
        }
    }

    /// The session this coordinator drives
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Clears all state keyed to this session
    ///
    /// Must complete before `visit` is called.
    pub fn reset(&self) -> StoreResult<()> {
        tracing::debug!("Resetting session {}", self.session);
        self.aggregator.clear()
    }

    /// Analyzes the root page and probes every discovered link
    ///
    /// Validates the URL, fetches the root document exactly once, extracts
    /// page metadata, then fans out one probe task per discovered href under
    /// a bounded worker pool. Blocks until every probe outcome has been
    /// folded into the session state.
    ///
    /// # Errors
    ///
    /// * [`PagelensError::InvalidUrl`] - the URL is not absolute HTTP(S)
    /// * [`PagelensError::FetchTimeout`] - the root fetch hit its deadline
    /// * [`PagelensError::RootFetch`] - the root document could not be retrieved
    /// * [`PagelensError::Store`] - a session store operation failed
    ///
    /// Probe failures are never errors: they are recorded as inaccessible
    /// links and the visit still succeeds.
    pub async fn visit(&self, raw_url: &str) -> Result<(), PagelensError> {
        let root = parse_absolute(raw_url)?;
        let root_host = crate::url::host_of(&root).unwrap_or_default();

        tracing::info!("Session {} visiting {}", self.session, root);
        self.aggregator.record_root(&root, &root_host)?;

        let document = fetch_root(
            &self.client,
            &root,
            Duration::from_millis(self.config.analyzer.root_timeout_ms),
            &self.config.user_agent,
        )
        .await?;

        let html_version = doctype::classify(first_line(&document.body));
        // Hrefs resolve against the post-redirect URL, like a browser would
        let page = extract_page(&document.body, &document.final_url);

        tracing::debug!(
            "Session {}: '{}' ({}) with {} links",
            self.session,
            page.title.as_deref().unwrap_or(""),
            html_version,
            page.links.len()
        );

        self.aggregator.record_page(html_version, &page)?;
        self.probe_all(page.links, root_host).await
    }

    /// Reads the aggregated snapshot for this session
    ///
    /// Idempotent between a `visit` and the next `reset`. After a `reset`
    /// (and before any `visit`) it returns a zero-valued page with no links.
    pub fn snapshot(&self) -> StoreResult<Snapshot> {
        self.aggregator.snapshot()
    }

    /// Fans out one probe task per discovered link and waits for the pool
    ///
    /// Probes run under a semaphore bounding per-session parallelism and a
    /// shared per-domain throttle. Outcomes flow over an mpsc channel into a
    /// single drain task; this method is the barrier that joins both.
    async fn probe_all(
        &self,
        links: Vec<url::Url>,
        root_host: String,
    ) -> Result<(), PagelensError> {
        let (tx, rx) = mpsc::channel::<Link>(64);

        let drain = {
            let aggregator = self.aggregator.clone();
            tokio::spawn(async move { aggregator.drain(rx).await })
        };

        let semaphore = Arc::new(Semaphore::new(
            self.config.analyzer.probe_parallelism as usize,
        ));
        let throttle = Arc::new(DomainThrottle::new(Duration::from_millis(
            self.config.analyzer.max_probe_delay_ms,
        )));
        let timeout = Duration::from_millis(self.config.analyzer.probe_timeout_ms);

        let mut probes = JoinSet::new();
        for url in links {
            // Root host captured here, at dispatch time; probes never read
            // it back from shared session state.
            let target = ProbeTarget {
                url,
                root_host: root_host.clone(),
            };
            let client = self.client.clone();
            let semaphore = semaphore.clone();
            let throttle = throttle.clone();
            let user_agents = self.config.user_agent.clone();
            let tx = tx.clone();

            probes.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let link = probe_link(&client, &target, timeout, &throttle, &user_agents).await;
                // Fails only if the drain task already exited on a store error;
                // that error surfaces below.
                let _ = tx.send(link).await;
            });
        }

        // Our own sender must go away before the drain task can finish
        drop(tx);

        while let Some(joined) = probes.join_next().await {
            joined.map_err(|e| PagelensError::ProbeJoin(e.to_string()))?;
        }

        drain
            .await
            .map_err(|e| PagelensError::ProbeJoin(e.to_string()))??;

        tracing::debug!("Session {}: all probes drained", self.session);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::fetcher::build_http_client;
    use crate::storage::MemoryStore;

    fn coordinator() -> SessionCoordinator {
        SessionCoordinator::new(
            SessionId::new(),
            Arc::new(Config::default()),
            Arc::new(MemoryStore::new()),
            build_http_client().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_visit_rejects_relative_url() {
        let result = coordinator().visit("/not/absolute").await;
        assert!(matches!(result, Err(PagelensError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_visit_rejects_empty_url() {
        let result = coordinator().visit("").await;
        assert!(matches!(result, Err(PagelensError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_reset_then_snapshot_is_empty() {
        let coordinator = coordinator();
        coordinator.reset().unwrap();

        let snapshot = coordinator.snapshot().unwrap();
        assert_eq!(snapshot.title, "");
        assert_eq!(snapshot.html_version, "");
        assert!(snapshot.links.is_empty());
        assert!(!snapshot.has_login_form);
    }
}
