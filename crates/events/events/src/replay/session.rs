use crate::partition::{DeviceTimeline, Partition};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Session-wide count of successfully delivered events
///
/// The only way to change the count is [`SentCounter::record_delivery`],
/// a single atomic increment.
#[derive(Debug)]
pub struct SentCounter {
    sent: AtomicUsize,
    total: usize,
}

impl SentCounter {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            sent: AtomicUsize::new(0),
            total,
        }
    }

    /// Record one successful delivery and return the new running count
    pub fn record_delivery(&self) -> usize {
        let sent = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        debug_assert!(sent <= self.total, "sent count {} exceeds total {}", sent, self.total);
        sent
    }

    /// Deliveries recorded so far
    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }

    /// Total events in the session
    pub fn total(&self) -> usize {
        self.total
    }
}

/// State of one replay invocation
///
/// Holds the device timelines, the total event count fixed at creation, and
/// the shared sent counter.
#[derive(Debug)]
pub struct ReplaySession {
    timelines: Vec<Arc<DeviceTimeline>>,
    counter: Arc<SentCounter>,
    dropped_records: usize,
    unresolved_timestamps: usize,
}

impl ReplaySession {
    /// Create a session from a partition
    pub fn new(partition: Partition) -> Self {
        let dropped_records = partition.dropped_records();
        let unresolved_timestamps = partition.unresolved_timestamps();
        let total = partition.total_events();

        Self {
            timelines: partition.into_timelines().into_iter().map(Arc::new).collect(),
            counter: Arc::new(SentCounter::new(total)),
            dropped_records,
            unresolved_timestamps,
        }
    }

    pub fn timelines(&self) -> &[Arc<DeviceTimeline>] {
        &self.timelines
    }

    pub fn total_events(&self) -> usize {
        self.counter.total()
    }

    pub fn sent(&self) -> usize {
        self.counter.sent()
    }

    pub fn dropped_records(&self) -> usize {
        self.dropped_records
    }

    pub fn unresolved_timestamps(&self) -> usize {
        self.unresolved_timestamps
    }

    pub(crate) fn counter(&self) -> Arc<SentCounter> {
        Arc::clone(&self.counter)
    }
}
