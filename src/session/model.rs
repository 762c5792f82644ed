//! Wire-facing data model for analysis results

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One classified outbound link
///
/// One instance exists per discovered href occurrence; duplicate hrefs on the
/// root page each produce their own entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Absolute URL of the link
    pub url: String,
    /// HTTP status of the probe; 0 when the fetch never got a response
    pub status_code: u16,
    /// Whether the link's host is empty or matches the session's root host
    pub is_internal: bool,
    /// Whether the probe received any HTTP response (2xx-5xx alike)
    pub is_accessible: bool,
}

/// Link tally derived by folding over a session's links
///
/// Never stored independently of the links that produced it; always recomputed
/// at snapshot time so the counters cannot drift from the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCounts {
    pub accessible: u32,
    pub inaccessible: u32,
    pub internal: u32,
    pub external: u32,
}

impl LinkCounts {
    /// Folds the counters from a slice of classified links
    pub fn fold(links: &[Link]) -> Self {
        let mut counts = Self::default();
        for link in links {
            if link.is_accessible {
                counts.accessible += 1;
            } else {
                counts.inaccessible += 1;
            }
            if link.is_internal {
                counts.internal += 1;
            } else {
                counts.external += 1;
            }
        }
        counts
    }

    pub fn total(&self) -> u32 {
        self.accessible + self.inaccessible
    }
}

/// Read-only aggregated view of one analysis session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub html_version: String,
    pub title: String,
    pub headings_count_by_level: BTreeMap<String, u32>,
    pub links: Vec<Link>,
    pub links_count: LinkCounts,
    pub has_login_form: bool,
}
