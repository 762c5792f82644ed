//! Per-session result aggregation
//!
//! All writes for a session funnel through one `Aggregator`. Probe outcomes
//! arrive over an mpsc channel and are folded in by a single drain task, so
//! concurrently completing probes can never lose updates to each other. Link
//! counters are not stored at all: they are derived from the stored links at
//! snapshot time, which makes drift between the counters and the list
//! impossible.

use crate::analyzer::parser::ExtractedPage;
use crate::session::{keys, Link, LinkCounts, SessionId, Snapshot};
use crate::storage::{SessionStore, StoreResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

/// Write funnel and read surface for one session's crawl state
#[derive(Clone)]
pub struct Aggregator {
    store: Arc<dyn SessionStore>,
    session: SessionId,
}

impl Aggregator {
    pub fn new(store: Arc<dyn SessionStore>, session: SessionId) -> Self {
        Self { store, session }
    }

    /// Clears every store entry belonging to this session
    pub fn clear(&self) -> StoreResult<()> {
        self.store.clear(&self.session.prefix())
    }

    /// Records the root URL and host at the start of a visit
    pub fn record_root(&self, url: &Url, root_host: &str) -> StoreResult<()> {
        self.store.set(&self.session.key(keys::URL), url.as_str())?;
        self.store
            .set(&self.session.key(keys::ROOT_HOST), root_host)?;
        self.store.set(
            &self.session.key(keys::VISITED_AT),
            &chrono::Utc::now().to_rfc3339(),
        )?;
        Ok(())
    }

    /// Records the page metadata extracted from the root document
    ///
    /// Populated exactly once per visit.
    pub fn record_page(&self, html_version: &str, page: &ExtractedPage) -> StoreResult<()> {
        self.store
            .set(&self.session.key(keys::HTML_VERSION), html_version)?;
        self.store.set(
            &self.session.key(keys::TITLE),
            page.title.as_deref().unwrap_or(""),
        )?;
        self.store.set(
            &self.session.key(keys::HEADINGS),
            &serde_json::to_string(&page.headings)?,
        )?;
        self.store.set(
            &self.session.key(keys::PASSWORD_FIELDS),
            &page.password_fields.to_string(),
        )?;
        Ok(())
    }

    /// Appends one classified link to the session's link list
    pub fn record_link(&self, link: &Link) -> StoreResult<()> {
        self.store.list_push(
            &self.session.key(keys::LINKS),
            &serde_json::to_string(link)?,
        )
    }

    /// Drains the probe result channel into the store
    ///
    /// This is the single writer for link outcomes; it runs until every
    /// sender has been dropped, which the coordinator guarantees happens only
    /// after all probe tasks finished.
    pub async fn drain(&self, mut outcomes: mpsc::Receiver<Link>) -> StoreResult<()> {
        while let Some(link) = outcomes.recv().await {
            self.record_link(&link)?;
        }
        Ok(())
    }

    /// Builds the read-only snapshot of this session
    ///
    /// Idempotent: repeated calls between a visit and the next reset return
    /// identical data. The link list is read by cycling each entry from the
    /// head back to the tail, which restores the original order.
    pub fn snapshot(&self) -> StoreResult<Snapshot> {
        let html_version = self
            .store
            .get(&self.session.key(keys::HTML_VERSION))?
            .unwrap_or_default();
        let title = self
            .store
            .get(&self.session.key(keys::TITLE))?
            .unwrap_or_default();

        let headings: BTreeMap<String, u32> = match self.store.get(&self.session.key(keys::HEADINGS))? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => BTreeMap::new(),
        };

        let password_fields: u32 = self
            .store
            .get(&self.session.key(keys::PASSWORD_FIELDS))?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0);

        let links = self.read_links()?;
        let links_count = LinkCounts::fold(&links);

        Ok(Snapshot {
            html_version,
            title,
            headings_count_by_level: headings,
            links,
            links_count,
            // Exactly one password field counts as a login form
            has_login_form: password_fields == 1,
        })
    }

    fn read_links(&self) -> StoreResult<Vec<Link>> {
        let key = self.session.key(keys::LINKS);
        let length = self.store.list_length(&key)?;

        let mut links = Vec::with_capacity(length as usize);
        for _ in 0..length {
            let Some(raw) = self.store.list_pop(&key)? else {
                break;
            };
            self.store.list_push(&key, &raw)?;
            links.push(serde_json::from_str(&raw)?);
        }

        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn aggregator(session: &str) -> Aggregator {
        Aggregator::new(
            Arc::new(MemoryStore::new()),
            SessionId::from_string(session),
        )
    }

    fn shared_aggregators(a: &str, b: &str) -> (Aggregator, Aggregator) {
        let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
        (
            Aggregator::new(store.clone(), SessionId::from_string(a)),
            Aggregator::new(store, SessionId::from_string(b)),
        )
    }

    fn link(url: &str, status: u16, internal: bool, accessible: bool) -> Link {
        Link {
            url: url.to_string(),
            status_code: status,
            is_internal: internal,
            is_accessible: accessible,
        }
    }

    fn sample_page() -> ExtractedPage {
        ExtractedPage {
            title: Some("Example Domain".to_string()),
            headings: BTreeMap::from([("h1".to_string(), 1)]),
            password_fields: 0,
            links: vec![],
        }
    }

    #[test]
    fn test_empty_snapshot_is_zero_valued() {
        let snapshot = aggregator("s1").snapshot().unwrap();

        assert_eq!(snapshot.html_version, "");
        assert_eq!(snapshot.title, "");
        assert!(snapshot.headings_count_by_level.is_empty());
        assert!(snapshot.links.is_empty());
        assert_eq!(snapshot.links_count, LinkCounts::default());
        assert!(!snapshot.has_login_form);
    }

    #[test]
    fn test_snapshot_reflects_page_and_links() {
        let agg = aggregator("s1");
        agg.record_page("HTML 5", &sample_page()).unwrap();
        agg.record_link(&link("http://www.iana.org/domains/reserved", 200, false, true))
            .unwrap();

        let snapshot = agg.snapshot().unwrap();
        assert_eq!(snapshot.html_version, "HTML 5");
        assert_eq!(snapshot.title, "Example Domain");
        assert_eq!(snapshot.headings_count_by_level.get("h1"), Some(&1));
        assert_eq!(snapshot.links.len(), 1);
        assert_eq!(snapshot.links_count.accessible, 1);
        assert_eq!(snapshot.links_count.external, 1);
        assert!(!snapshot.has_login_form);
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let agg = aggregator("s1");
        agg.record_page("HTML 5", &sample_page()).unwrap();
        agg.record_link(&link("http://a.example/", 200, true, true))
            .unwrap();
        agg.record_link(&link("http://b.example/", 0, false, false))
            .unwrap();

        let first = agg.snapshot().unwrap();
        let second = agg.snapshot().unwrap();
        let third = agg.snapshot().unwrap();

        assert_eq!(first.links, second.links);
        assert_eq!(second.links, third.links);
        assert_eq!(first.links_count, third.links_count);
    }

    #[test]
    fn test_count_invariants() {
        let agg = aggregator("s1");
        agg.record_link(&link("http://a.example/", 200, true, true))
            .unwrap();
        agg.record_link(&link("http://b.example/", 404, false, true))
            .unwrap();
        agg.record_link(&link("http://c.example/", 0, false, false))
            .unwrap();

        let snapshot = agg.snapshot().unwrap();
        let total = snapshot.links.len() as u32;
        assert_eq!(
            snapshot.links_count.accessible + snapshot.links_count.inaccessible,
            total
        );
        assert_eq!(
            snapshot.links_count.internal + snapshot.links_count.external,
            total
        );
    }

    #[test]
    fn test_login_form_requires_exactly_one_password_field() {
        let agg = aggregator("s1");

        let mut page = sample_page();
        page.password_fields = 1;
        agg.record_page("HTML 5", &page).unwrap();
        assert!(agg.snapshot().unwrap().has_login_form);

        // Two password fields is a registration form, not a login form
        page.password_fields = 2;
        agg.record_page("HTML 5", &page).unwrap();
        assert!(!agg.snapshot().unwrap().has_login_form);
    }

    #[test]
    fn test_clear_resets_to_zero() {
        let agg = aggregator("s1");
        agg.record_page("HTML 5", &sample_page()).unwrap();
        agg.record_link(&link("http://a.example/", 200, true, true))
            .unwrap();

        agg.clear().unwrap();

        let snapshot = agg.snapshot().unwrap();
        assert_eq!(snapshot.title, "");
        assert!(snapshot.links.is_empty());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let (agg_a, agg_b) = shared_aggregators("session-a", "session-b");

        agg_a.record_page("HTML 5", &sample_page()).unwrap();
        agg_a
            .record_link(&link("http://a.example/", 200, true, true))
            .unwrap();

        let snapshot_b = agg_b.snapshot().unwrap();
        assert_eq!(snapshot_b.title, "");
        assert!(snapshot_b.links.is_empty());

        // Clearing B must not disturb A
        agg_b.clear().unwrap();
        assert_eq!(agg_a.snapshot().unwrap().links.len(), 1);
    }

    #[tokio::test]
    async fn test_drain_funnels_all_outcomes() {
        let agg = aggregator("s1");
        let (tx, rx) = mpsc::channel(8);

        let drain = {
            let agg = agg.clone();
            tokio::spawn(async move { agg.drain(rx).await })
        };

        for i in 0..5 {
            tx.send(link(&format!("http://x.example/{i}"), 200, false, true))
                .await
                .unwrap();
        }
        drop(tx);
        drain.await.unwrap().unwrap();

        let snapshot = agg.snapshot().unwrap();
        assert_eq!(snapshot.links.len(), 5);
        assert_eq!(snapshot.links_count.accessible, 5);
    }
}
