use super::player::{PlayerSummary, TimelinePlayer};
use super::report::{ReplayProgress, ReplayReporter, TracingReporter};
use super::session::ReplaySession;
use super::speed::ReplaySpeed;
use crate::partition::{DevicePartitioner, Partition};
use crate::sink::SharedSink;
use crate::store::RecordSource;
use crate::ReplayResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Coordinates a replay: one concurrent timeline player per device
pub struct ReplayCoordinator {
    sink: SharedSink,
    speed: ReplaySpeed,
    reporter: Arc<dyn ReplayReporter>,
}

/// Statistics from a replay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    /// Number of device timelines played
    pub devices: usize,

    /// Events across all timelines
    pub total_events: usize,

    /// Events delivered successfully
    pub sent: usize,

    /// Events the sink rejected or could not receive
    pub failed: usize,

    /// Input records dropped for lacking a device identifier
    pub dropped_records: usize,

    /// Included records whose timestamp defaulted to zero
    pub unresolved_timestamps: usize,

    /// Wall-clock duration of the replay
    pub duration: Duration,

    /// Per-device outcomes, in completion order
    pub players: Vec<PlayerSummary>,
}

impl ReplayCoordinator {
    /// Create a coordinator delivering to `sink` at the given speed
    ///
    /// The sink is shared by every player and must tolerate concurrent use.
    pub fn new(sink: SharedSink, speed: ReplaySpeed) -> Self {
        Self {
            sink,
            speed,
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Replace the default tracing reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn ReplayReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn speed(&self) -> ReplaySpeed {
        self.speed
    }

    /// Identifier of the sink events are delivered to
    pub fn sink_id(&self) -> &str {
        self.sink.id()
    }

    /// Load, partition and replay every record of a source
    ///
    /// Only a load failure is returned as an error. Once replay starts every
    /// timeline runs to completion.
    pub async fn replay(&self, source: &dyn RecordSource) -> ReplayResult<ReplaySummary> {
        let records = source.load().await?;
        tracing::info!("Loaded {} records from {}", records.len(), source.describe());

        let partition = DevicePartitioner::new().partition(records);
        Ok(self.run(partition).await)
    }

    /// Replay an already partitioned batch
    pub async fn run(&self, partition: Partition) -> ReplaySummary {
        let start_time = Instant::now();
        let session = ReplaySession::new(partition);

        tracing::info!(
            "Starting replay of {} events across {} devices to {} ({:?})",
            session.total_events(),
            session.timelines().len(),
            self.sink_id(),
            self.speed
        );

        let mut players = JoinSet::new();
        for timeline in session.timelines() {
            let mut player = TimelinePlayer::new(
                Arc::clone(timeline),
                self.speed,
                Arc::clone(&self.sink),
                &session,
                Arc::clone(&self.reporter),
            );
            players.spawn(async move { player.run().await });
        }

        let mut summary = ReplaySummary {
            devices: session.timelines().len(),
            total_events: session.total_events(),
            dropped_records: session.dropped_records(),
            unresolved_timestamps: session.unresolved_timestamps(),
            ..Default::default()
        };

        while let Some(joined) = players.join_next().await {
            match joined {
                Ok(Ok(player)) => {
                    summary.failed += player.failed;
                    summary.players.push(player);
                }
                Ok(Err(e)) => tracing::error!("Timeline player error: {}", e),
                Err(e) => tracing::error!("Timeline player task failed: {}", e),
            }
        }

        summary.sent = session.sent();
        summary.duration = start_time.elapsed();

        tracing::info!(
            "Replay completed: {} sent, {} failed of {} in {:?}",
            summary.sent,
            summary.failed,
            summary.total_events,
            summary.duration
        );

        self.reporter.report(&ReplayProgress::Completed(summary.clone()));

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::report::MemoryReporter;
    use crate::sink::{DeliveryFailure, DeliveryResult, DeliverySink};
    use crate::store::MemoryRecordSource;
    use crate::{EventRecord, JsonFileSource, ReplayError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Records dispatch instants per device; fails listed (device, seq) pairs.
    #[derive(Default)]
    struct RecordingSink {
        reject: Vec<(String, i64)>,
        log: Mutex<HashMap<String, Vec<(i64, Instant)>>>,
    }

    impl RecordingSink {
        fn gaps(&self, device: &str, start: Instant) -> Vec<f64> {
            let log = self.log.lock().unwrap();
            let mut last = start;
            log.get(device)
                .map(|entries| {
                    entries
                        .iter()
                        .map(|(_, at)| {
                            let gap = (*at - last).as_secs_f64();
                            last = *at;
                            gap
                        })
                        .collect()
                })
                .unwrap_or_default()
        }

        fn seqs(&self, device: &str) -> Vec<i64> {
            let log = self.log.lock().unwrap();
            log.get(device)
                .map(|entries| entries.iter().map(|(seq, _)| *seq).collect())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl DeliverySink for RecordingSink {
        fn id(&self) -> &str {
            "recording"
        }

        async fn deliver(&self, device_id: &str, record: &EventRecord) -> DeliveryResult {
            let seq = record.get("seq").and_then(|v| v.as_i64()).unwrap_or(-1);
            self.log
                .lock()
                .unwrap()
                .entry(device_id.to_string())
                .or_default()
                .push((seq, Instant::now()));

            if self.reject.iter().any(|(d, s)| d == device_id && *s == seq) {
                Err(DeliveryFailure::Status(503))
            } else {
                Ok(())
            }
        }
    }

    fn two_device_source() -> MemoryRecordSource {
        let records = vec![
            json!({"device_id": "A", "seq": 1, "timestamp": 0.0}),
            json!({"device_id": "B", "seq": 1, "timestamp": 0.0}),
            json!({"device_id": "A", "seq": 2, "timestamp": 1.0}),
            json!({"Device ID": "B", "seq": 2, "timestamp": 0.5}),
            json!({"device_id": "A", "seq": 3, "timestamp": 3.0}),
        ];
        MemoryRecordSource::from_records(
            records.into_iter().filter_map(EventRecord::from_value).collect(),
        )
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 0.01, "{:?} vs {:?}", actual, expected);
        }
    }

    fn completions(reporter: &MemoryReporter) -> usize {
        reporter
            .entries()
            .iter()
            .filter(|p| matches!(p, ReplayProgress::Completed(_)))
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_devices_real_time() {
        let sink = Arc::new(RecordingSink::default());
        let reporter = Arc::new(MemoryReporter::new());
        let coordinator = ReplayCoordinator::new(sink.clone(), ReplaySpeed::RealTime)
            .with_reporter(reporter.clone());

        let start = Instant::now();
        let summary = coordinator.replay(&two_device_source()).await.unwrap();

        assert_close(&sink.gaps("A", start), &[0.0, 1.0, 2.0]);
        assert_close(&sink.gaps("B", start), &[0.0, 0.5]);
        assert_eq!(summary.sent, 5);
        assert_eq!(summary.total_events, 5);
        assert_eq!(summary.devices, 2);
        assert_eq!(completions(&reporter), 1);
        assert_eq!(
            reporter.lines().last().map(String::as_str),
            Some("All events sent successfully.")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_devices_run_concurrently() {
        let sink = Arc::new(RecordingSink::default());
        let coordinator = ReplayCoordinator::new(sink.clone(), ReplaySpeed::RealTime)
            .with_reporter(Arc::new(MemoryReporter::new()));

        let start = Instant::now();
        let summary = coordinator.replay(&two_device_source()).await.unwrap();

        // Sequential playback would take 3.5s; concurrent playback takes the
        // longest timeline.
        assert!((summary.duration.as_secs_f64() - 3.0).abs() < 0.01);
        assert!(((Instant::now() - start).as_secs_f64() - 3.0).abs() < 0.01);
    }

    #[tokio::test(start_paused = true)]
    async fn test_speed_factor_ten() {
        let sink = Arc::new(RecordingSink::default());
        let coordinator = ReplayCoordinator::new(sink.clone(), ReplaySpeed::Custom(10.0))
            .with_reporter(Arc::new(MemoryReporter::new()));

        let start = Instant::now();
        coordinator.replay(&two_device_source()).await.unwrap();

        assert_close(&sink.gaps("A", start), &[0.0, 0.1, 0.2]);
        assert_close(&sink.gaps("B", start), &[0.0, 0.05]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_record_without_device_is_excluded() {
        let source = two_device_source();
        source
            .push(EventRecord::default().with_field("seq", 99).with_field("timestamp", 0.2))
            .await;

        let sink = Arc::new(RecordingSink::default());
        let reporter = Arc::new(MemoryReporter::new());
        let coordinator = ReplayCoordinator::new(sink.clone(), ReplaySpeed::Fast)
            .with_reporter(reporter.clone());

        let summary = coordinator.replay(&source).await.unwrap();

        assert_eq!(summary.total_events, 5);
        assert_eq!(summary.dropped_records, 1);
        assert_eq!(summary.sent, 5);
        let lines = reporter.lines();
        assert!(
            lines
                .iter()
                .any(|l| l == "A | Event sent (5/5)" || l == "B | Event sent (5/5)")
        );
    }

    #[test]
    fn test_coordinator_names_its_sink() {
        let coordinator =
            ReplayCoordinator::new(Arc::new(RecordingSink::default()), ReplaySpeed::Fast);
        assert_eq!(coordinator.sink_id(), "recording");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_delivery_keeps_schedule() {
        let sink = Arc::new(RecordingSink {
            reject: vec![("A".to_string(), 2)],
            ..Default::default()
        });
        let reporter = Arc::new(MemoryReporter::new());
        let coordinator = ReplayCoordinator::new(sink.clone(), ReplaySpeed::RealTime)
            .with_reporter(reporter.clone());

        let start = Instant::now();
        let summary = coordinator.replay(&two_device_source()).await.unwrap();

        assert_eq!(sink.seqs("A"), vec![1, 2, 3]);
        assert_close(&sink.gaps("A", start), &[0.0, 1.0, 2.0]);
        assert_eq!(summary.sent, 4);
        assert_eq!(summary.failed, 1);
        assert!(reporter
            .lines()
            .contains(&"A | Failed to send event with status 503".to_string()));
        assert_eq!(completions(&reporter), 1);

        let a = summary.players.iter().find(|p| p.device_id == "A").unwrap();
        assert_eq!((a.delivered, a.failed), (2, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sent_counter_is_monotonic_and_bounded() {
        let sink = Arc::new(RecordingSink {
            reject: vec![("B".to_string(), 1)],
            ..Default::default()
        });
        let reporter = Arc::new(MemoryReporter::new());
        let coordinator = ReplayCoordinator::new(sink, ReplaySpeed::Fast)
            .with_reporter(reporter.clone());

        coordinator.replay(&two_device_source()).await.unwrap();

        let counts: Vec<usize> = reporter
            .entries()
            .iter()
            .filter_map(|p| match p {
                ReplayProgress::Sent { sent, total, .. } => {
                    assert_eq!(*total, 5);
                    Some(*sent)
                }
                _ => None,
            })
            .collect();
        assert_eq!(counts, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_empty_batch_still_completes() {
        let reporter = Arc::new(MemoryReporter::new());
        let coordinator =
            ReplayCoordinator::new(Arc::new(RecordingSink::default()), ReplaySpeed::RealTime)
                .with_reporter(reporter.clone());

        let summary = coordinator.replay(&MemoryRecordSource::new()).await.unwrap();
        assert_eq!(summary.total_events, 0);
        assert_eq!(reporter.lines(), vec!["All events sent successfully."]);
    }

    #[tokio::test]
    async fn test_load_error_aborts_before_replay() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = Arc::new(MemoryReporter::new());
        let coordinator =
            ReplayCoordinator::new(Arc::new(RecordingSink::default()), ReplaySpeed::Fast)
                .with_reporter(reporter.clone());

        let source = JsonFileSource::new(dir.path().join("absent.json"));
        let err = coordinator.replay(&source).await.unwrap_err();
        assert!(matches!(err, ReplayError::Load(_)));
        assert!(reporter.entries().is_empty());
    }
}
