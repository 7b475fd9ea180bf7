//! Search-as-you-type state for the assignee picker.
//!
//! Keystrokes are debounced; each keystroke also bumps a sequence number so a response for a
//! superseded query can be recognised and dropped instead of overwriting newer results.

use std::time::Duration;

use crate::domain::User;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const MIN_QUERY_CHARS: usize = 3;

/// A query cleared for dispatch. Results must be handed back with the same ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPoll {
    /// Nothing to do yet.
    Idle,
    /// The settled query is too short; results were cleared.
    Cleared,
    /// The settled query should be searched.
    Dispatch(SearchTicket),
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    debounce_ms: u64,
    query: String,
    seq: u64,
    due_at_ms: Option<u64>,
    results: Vec<User>,
    selected: Option<User>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self::with_debounce(SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(debounce: Duration) -> Self {
        SearchSession {
            debounce_ms: u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX),
            query: String::new(),
            seq: 0,
            due_at_ms: None,
            results: Vec::new(),
            selected: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[User] {
        &self.results
    }

    pub fn selected(&self) -> Option<&User> {
        self.selected.as_ref()
    }

    /// Record a keystroke. Restarts the debounce window and invalidates outstanding tickets.
    pub fn input(&mut self, query: &str, now_ms: u64) {
        self.query = query.to_string();
        self.selected = None;
        self.seq += 1;
        self.due_at_ms = Some(now_ms.saturating_add(self.debounce_ms));
    }

    pub fn poll(&mut self, now_ms: u64) -> SearchPoll {
        match self.due_at_ms {
            Some(due) if now_ms >= due => {}
            _ => return SearchPoll::Idle,
        }
        self.due_at_ms = None;

        let trimmed = self.query.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            self.results.clear();
            return SearchPoll::Cleared;
        }

        SearchPoll::Dispatch(SearchTicket {
            seq: self.seq,
            query: trimmed.to_string(),
        })
    }

    /// Store results if `ticket` is still the latest dispatch. Returns whether they were kept.
    pub fn apply(&mut self, ticket: &SearchTicket, results: Vec<User>) -> bool {
        if ticket.seq != self.seq {
            tracing::debug!(
                stale_seq = ticket.seq,
                current_seq = self.seq,
                query = %ticket.query,
                "dropping superseded search results"
            );
            return false;
        }
        self.results = results;
        true
    }

    /// Pick a result. The query shows the chosen name and pending searches are discarded.
    pub fn select(&mut self, user: User) {
        self.query = user.name.clone();
        self.seq += 1;
        self.due_at_ms = None;
        self.results.clear();
        self.selected = Some(user);
    }

    pub fn reset(&mut self) {
        self.query.clear();
        self.seq += 1;
        self.due_at_ms = None;
        self.results.clear();
        self.selected = None;
    }
}
