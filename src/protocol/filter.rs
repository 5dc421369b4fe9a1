//! Subscriber-side event filter
//!
//! Connections may pass `?q=term1,term2` to restrict the stream. An event
//! matches when any term occurs, case-insensitively, in its id, its edge
//! endpoints, or any of its string attribute values. An empty filter matches
//! everything; the clear control event always passes so filtered consumers
//! still observe resets.

use crate::types::GraphEvent;

/// A predicate over incoming events, parsed from the query string.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    terms: Vec<String>,
}

impl EventFilter {
    /// Match-all filter.
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse the comma-separated `q` parameter. Blank terms are dropped, so
    /// `q=` and a missing parameter both mean match-all.
    pub fn from_query(q: Option<&str>) -> Self {
        let terms = q
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { terms }
    }

    pub fn is_match_all(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, event: &GraphEvent) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        if matches!(event, GraphEvent::Clear { .. }) {
            return true;
        }
        self.terms.iter().any(|term| event_contains(event, term))
    }
}

fn event_contains(event: &GraphEvent, term: &str) -> bool {
    if let Some(id) = event.id() {
        if id.to_lowercase().contains(term) {
            return true;
        }
    }
    if let GraphEvent::AddEdge { source, target, .. } = event {
        if source.to_lowercase().contains(term) || target.to_lowercase().contains(term) {
            return true;
        }
    }
    if let Some(attrs) = event.attrs() {
        for value in attrs.values() {
            if let Some(text) = value.as_text() {
                if text.to_lowercase().contains(term) {
                    return true;
                }
            }
        }
    }
    false
}
