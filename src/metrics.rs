use std::sync::atomic::{AtomicU64, Ordering};

/// Operations tracked by [`RosterMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// List-all request served.
    List,
    /// Student fetched by id or name.
    Fetch,
    /// Student created.
    Create,
    /// Student fully updated.
    Update,
    /// Student partially updated.
    Patch,
    /// Student deleted.
    Delete,
}

/// Thread-safe counters describing roster activity.
#[derive(Default)]
pub struct RosterMetrics {
    listed: AtomicU64,
    fetched: AtomicU64,
    created: AtomicU64,
    updated: AtomicU64,
    patched: AtomicU64,
    deleted: AtomicU64,
    rejected: AtomicU64,
}

impl RosterMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully completed operation.
    pub fn record(&self, operation: Operation) {
        let counter = match operation {
            Operation::List => &self.listed,
            Operation::Fetch => &self.fetched,
            Operation::Create => &self.created,
            Operation::Update => &self.updated,
            Operation::Patch => &self.patched,
            Operation::Delete => &self.deleted,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an operation that failed with a client or lookup error.
    pub fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters alongside the live record count.
    pub fn snapshot(&self, students: usize) -> MetricsSnapshot {
        MetricsSnapshot {
            listed: self.listed.load(Ordering::Relaxed),
            fetched: self.fetched.load(Ordering::Relaxed),
            created: self.created.load(Ordering::Relaxed),
            updated: self.updated.load(Ordering::Relaxed),
            patched: self.patched.load(Ordering::Relaxed),
            deleted: self.deleted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            students: students as u64,
        }
    }
}

/// Immutable view of roster counters used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// List-all requests served.
    pub listed: u64,
    /// Successful lookups by id or name.
    pub fetched: u64,
    /// Students created since startup.
    pub created: u64,
    /// Full updates applied.
    pub updated: u64,
    /// Partial updates applied.
    pub patched: u64,
    /// Students deleted.
    pub deleted: u64,
    /// Requests rejected with a 400 or 404 outcome.
    pub rejected: u64,
    /// Records currently held in the store.
    pub students: u64,
}
