//! Counters for moderation activity.

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Metrics collector shared by every event task.
#[derive(Debug, Clone)]
pub struct ModerationMetrics {
    inner: Arc<ModerationMetricsInner>,
}

#[derive(Debug)]
struct ModerationMetricsInner {
    messages_observed: AtomicU64,
    links_deleted: AtomicU64,
    deletions_failed: AtomicU64,
    commands_handled: AtomicU64,
    commands_rejected: AtomicU64,
    sweeps_run: AtomicU64,
    members_banned: AtomicU64,
    bans_failed: AtomicU64,

    last_sweep: parking_lot::Mutex<Option<Instant>>,
}

impl Default for ModerationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ModerationMetrics {
    /// Creates a new metrics collector.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ModerationMetricsInner {
                messages_observed: AtomicU64::new(0),
                links_deleted: AtomicU64::new(0),
                deletions_failed: AtomicU64::new(0),
                commands_handled: AtomicU64::new(0),
                commands_rejected: AtomicU64::new(0),
                sweeps_run: AtomicU64::new(0),
                members_banned: AtomicU64::new(0),
                bans_failed: AtomicU64::new(0),
                last_sweep: parking_lot::Mutex::new(None),
            }),
        }
    }

    /// Records a group message that reached the pipeline.
    pub fn record_message(&self) {
        self.inner.messages_observed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a deleted link message.
    pub fn record_deletion(&self) {
        self.inner.links_deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a deletion the platform refused.
    pub fn record_deletion_failure(&self) {
        self.inner.deletions_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a command that ran to completion.
    pub fn record_command(&self) {
        self.inner.commands_handled.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a command refused for lack of standing.
    pub fn record_rejection(&self) {
        self.inner.commands_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a single ban outside a sweep.
    pub fn record_ban(&self) {
        self.inner.members_banned.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a finished sweep and its ban counts.
    pub fn record_sweep(&self, banned: usize, failed: usize) {
        self.inner.sweeps_run.fetch_add(1, Ordering::Relaxed);
        self.inner
            .members_banned
            .fetch_add(banned as u64, Ordering::Relaxed);
        self.inner
            .bans_failed
            .fetch_add(failed as u64, Ordering::Relaxed);
        *self.inner.last_sweep.lock() = Some(Instant::now());
    }

    /// Gets the number of messages observed.
    pub fn messages_observed(&self) -> u64 {
        self.inner.messages_observed.load(Ordering::Relaxed)
    }

    /// Gets the number of deleted link messages.
    pub fn links_deleted(&self) -> u64 {
        self.inner.links_deleted.load(Ordering::Relaxed)
    }

    /// Gets the number of refused deletions.
    pub fn deletions_failed(&self) -> u64 {
        self.inner.deletions_failed.load(Ordering::Relaxed)
    }

    /// Gets the number of completed commands.
    pub fn commands_handled(&self) -> u64 {
        self.inner.commands_handled.load(Ordering::Relaxed)
    }

    /// Gets the number of rejected commands.
    pub fn commands_rejected(&self) -> u64 {
        self.inner.commands_rejected.load(Ordering::Relaxed)
    }

    /// Gets the number of sweeps run.
    pub fn sweeps_run(&self) -> u64 {
        self.inner.sweeps_run.load(Ordering::Relaxed)
    }

    /// Gets the number of members banned, by `/kill` or a sweep.
    pub fn members_banned(&self) -> u64 {
        self.inner.members_banned.load(Ordering::Relaxed)
    }

    /// Gets the number of sweep bans the platform refused.
    pub fn bans_failed(&self) -> u64 {
        self.inner.bans_failed.load(Ordering::Relaxed)
    }

    /// Gets time since the last sweep.
    pub fn time_since_sweep(&self) -> Option<std::time::Duration> {
        self.inner.last_sweep.lock().map(|instant| instant.elapsed())
    }

    /// Creates a serializable snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_observed: self.messages_observed(),
            links_deleted: self.links_deleted(),
            deletions_failed: self.deletions_failed(),
            commands_handled: self.commands_handled(),
            commands_rejected: self.commands_rejected(),
            sweeps_run: self.sweeps_run(),
            members_banned: self.members_banned(),
            bans_failed: self.bans_failed(),
            seconds_since_sweep: self.time_since_sweep().map(|d| d.as_secs()),
        }
    }
}

/// Serializable snapshot of moderation metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Group messages that reached the pipeline
    pub messages_observed: u64,
    /// Link messages deleted
    pub links_deleted: u64,
    /// Deletions the platform refused
    pub deletions_failed: u64,
    /// Commands that completed
    pub commands_handled: u64,
    /// Commands refused for lack of standing
    pub commands_rejected: u64,
    /// Sweeps run
    pub sweeps_run: u64,
    /// Members banned
    pub members_banned: u64,
    /// Sweep bans the platform refused
    pub bans_failed: u64,
    /// Seconds since the last sweep
    pub seconds_since_sweep: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_counters() {
        let metrics = ModerationMetrics::new();
        let clone = metrics.clone();
        clone.record_message();
        clone.record_sweep(3, 1);
        metrics.record_ban();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.messages_observed, 1);
        assert_eq!(snapshot.sweeps_run, 1);
        assert_eq!(snapshot.members_banned, 4);
        assert_eq!(snapshot.bans_failed, 1);
        assert!(snapshot.seconds_since_sweep.is_some());
    }

    #[test]
    fn snapshot_serializes() {
        let json = serde_json::to_value(ModerationMetrics::new().snapshot()).unwrap();
        assert_eq!(json["links_deleted"], 0);
        assert!(json["seconds_since_sweep"].is_null());
    }
}
