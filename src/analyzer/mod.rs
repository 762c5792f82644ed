//! Page analysis core
//!
//! This module contains the crawl orchestration and result aggregation
//! engine:
//! - Doctype classification from the document's leading bytes
//! - Root page fetching and metadata extraction
//! - Bounded-concurrency, rate-limited link probing
//! - Session-isolated result aggregation

mod aggregator;
mod coordinator;
mod doctype;
mod fetcher;
mod parser;
mod prober;
mod throttle;

pub use aggregator::Aggregator;
pub use coordinator::SessionCoordinator;
pub use doctype::{classify, DOCTYPE_SIGNATURES, UNKNOWN_VERSION};
pub use fetcher::{build_http_client, fetch_root, RootDocument};
pub use parser::{extract_page, ExtractedPage};
pub use prober::{probe_link, ProbeTarget};
pub use throttle::DomainThrottle;

use crate::config::Config;
use crate::session::{SessionId, Snapshot};
use crate::storage::SessionStore;
use crate::PagelensError;
use std::sync::Arc;

/// Runs one complete analysis in a fresh session
///
/// Convenience entry point for one-shot callers: creates a session,
/// resets it, visits the URL, and returns the snapshot.
///
/// # Arguments
///
/// * `config` - Shared service configuration
/// * `store` - The session store backend
/// * `url` - Absolute URL of the page to analyze
///
/// # Returns
///
/// * `Ok(Snapshot)` - The aggregated analysis result
/// * `Err(PagelensError)` - Invalid URL, root fetch failure, or store failure
pub async fn analyze_page(
    config: Arc<Config>,
    store: Arc<dyn SessionStore>,
    url: &str,
) -> Result<Snapshot, PagelensError> {
    let client = build_http_client()?;
    let coordinator = SessionCoordinator::new(SessionId::new(), config, store, client);

    coordinator.reset()?;
    coordinator.visit(url).await?;
    Ok(coordinator.snapshot()?)
}
