//! Device partitioner: groups records into per-device timelines.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::RecordIssue;
use crate::event::{EventRecord, ResolvedTimestamp};

/// A record paired with its resolved timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
    timestamp: ResolvedTimestamp,
    record: EventRecord,
}

impl TimedEvent {
    /// Resolves the record's timestamp and pairs it with the record.
    pub fn new(record: EventRecord) -> Self {
        Self {
            timestamp: record.resolve_timestamp(),
            record,
        }
    }

    /// Timestamp in epoch seconds.
    pub fn seconds(&self) -> f64 {
        self.timestamp.seconds
    }

    /// The resolved timestamp with its origin.
    pub fn timestamp(&self) -> ResolvedTimestamp {
        self.timestamp
    }

    /// The original record.
    pub fn record(&self) -> &EventRecord {
        &self.record
    }
}

/// One device's events, sorted ascending by timestamp.
///
/// Built only by [`DevicePartitioner`]. The order is fixed at construction
/// and the timeline exposes no way to change it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceTimeline {
    device_id: String,
    events: Vec<TimedEvent>,
}

impl DeviceTimeline {
    fn new(device_id: String, mut events: Vec<TimedEvent>) -> Self {
        // `sort_by` is stable, so equal timestamps keep input order. Numeric
        // equality keeps `-0.0` and `0.0` tied.
        events.sort_by(|a, b| {
            a.seconds()
                .partial_cmp(&b.seconds())
                .unwrap_or(Ordering::Equal)
        });
        Self { device_id, events }
    }

    /// The device identifier.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// The events in dispatch order.
    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the timeline has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Timestamp of the first event.
    pub fn first_timestamp(&self) -> Option<f64> {
        self.events.first().map(TimedEvent::seconds)
    }
}

/// Result of partitioning a batch of records.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    timelines: Vec<DeviceTimeline>,
    issues: Vec<RecordIssue>,
}

impl Partition {
    /// Timelines in the order their devices first appeared in the input.
    pub fn timelines(&self) -> &[DeviceTimeline] {
        &self.timelines
    }

    /// Consumes the partition and returns its timelines.
    pub fn into_timelines(self) -> Vec<DeviceTimeline> {
        self.timelines
    }

    /// Looks up a device's timeline.
    pub fn get(&self, device_id: &str) -> Option<&DeviceTimeline> {
        self.timelines.iter().find(|t| t.device_id == device_id)
    }

    /// Number of devices.
    pub fn device_count(&self) -> usize {
        self.timelines.len()
    }

    /// Sum of all timeline lengths.
    pub fn total_events(&self) -> usize {
        self.timelines.iter().map(DeviceTimeline::len).sum()
    }

    /// Non-fatal problems found while partitioning.
    pub fn issues(&self) -> &[RecordIssue] {
        &self.issues
    }

    /// Records dropped for lacking a device identifier.
    pub fn dropped_records(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| matches!(i, RecordIssue::MalformedRecord { .. }))
            .count()
    }

    /// Included records whose timestamp defaulted to zero.
    pub fn unresolved_timestamps(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| matches!(i, RecordIssue::UnresolvedTimestamp { .. }))
            .count()
    }
}

/// Groups records by device identifier into sorted timelines.
#[derive(Debug, Clone, Copy, Default)]
pub struct DevicePartitioner;

impl DevicePartitioner {
    /// Creates a new partitioner.
    pub fn new() -> Self {
        Self
    }

    /// Partitions the records.
    ///
    /// Records without a device identifier are dropped. Every other record
    /// lands in exactly one timeline.
    pub fn partition(&self, records: Vec<EventRecord>) -> Partition {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<(String, Vec<TimedEvent>)> = Vec::new();
        let mut issues = Vec::new();

        for (position, record) in records.into_iter().enumerate() {
            let Some(device_id) = record.device_id().map(|id| id.into_owned()) else {
                tracing::debug!("Dropping record {} without device identifier", position);
                issues.push(RecordIssue::MalformedRecord { index: position });
                continue;
            };

            let event = TimedEvent::new(record);
            if event.timestamp().is_unresolved() {
                tracing::debug!(
                    "Record {} for device {} has no usable timestamp",
                    position,
                    device_id
                );
                issues.push(RecordIssue::UnresolvedTimestamp { index: position });
            }

            let slot = *index.entry(device_id.clone()).or_insert_with(|| {
                groups.push((device_id, Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(event);
        }

        let partition = Partition {
            timelines: groups
                .into_iter()
                .map(|(device_id, events)| DeviceTimeline::new(device_id, events))
                .collect(),
            issues,
        };

        if partition.dropped_records() > 0 {
            tracing::warn!(
                "Dropped {} records without a device identifier",
                partition.dropped_records()
            );
        }
        if partition.unresolved_timestamps() > 0 {
            tracing::warn!(
                "{} records have no usable timestamp and were placed at epoch 0",
                partition.unresolved_timestamps()
            );
        }

        partition
    }
}
