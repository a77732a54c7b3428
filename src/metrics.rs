//! Bridge metrics for monitoring and observability.
//!
//! [`BridgeMetrics`] is updated in place by host calls and the frame loop.
//! [`BridgeStats`] is a serializable snapshot that also folds in the
//! per-surface queue counters and can be rendered as Prometheus text.

use crate::error::ErrorCode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::time::{Duration, Instant};

/// Counters owned by one bridge context
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    host_calls: HashMap<&'static str, u64>,
    errors: HashMap<ErrorCode, u64>,
    objects_created: u64,
    objects_deleted: u64,
    frames: u64,
    frame_time: Duration,
}

impl BridgeMetrics {
    /// Create zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one call of `import`
    pub fn record_call(&mut self, import: &'static str) {
        *self.host_calls.entry(import).or_insert(0) += 1;
    }

    /// Count one failed host call
    pub fn record_error(&mut self, code: ErrorCode) {
        *self.errors.entry(code).or_insert(0) += 1;
    }

    /// Count objects given handles
    pub fn record_created(&mut self, count: usize) {
        self.objects_created += count as u64;
    }

    /// Count objects released
    pub fn record_deleted(&mut self, count: usize) {
        self.objects_deleted += count as u64;
    }

    /// Count one call of the loop export
    pub fn record_frame(&mut self, elapsed: Duration) {
        self.frames += 1;
        self.frame_time += elapsed;
    }

    /// Calls of one import so far
    pub fn calls(&self, import: &str) -> u64 {
        self.host_calls.get(import).copied().unwrap_or(0)
    }

    /// Calls of every import so far
    pub fn total_calls(&self) -> u64 {
        self.host_calls.values().sum()
    }

    /// Frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Average time spent in the loop export, in microseconds
    pub fn avg_frame_time_us(&self) -> f64 {
        match self.frames {
            0 => 0.0,
            frames => self.frame_time.as_micros() as f64 / frames as f64,
        }
    }

    /// Reset every counter
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Copy the counters into a snapshot
    pub(crate) fn fill(&self, stats: &mut BridgeStats) {
        stats.host_calls = self
            .host_calls
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect();
        stats.errors = self
            .errors
            .iter()
            .map(|(code, count)| (code.to_string(), *count))
            .collect();
        stats.objects_created = self.objects_created;
        stats.objects_deleted = self.objects_deleted;
        stats.frames = self.frames;
        stats.avg_frame_time_us = self.avg_frame_time_us();
    }
}

/// Point-in-time view of a bridge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeStats {
    /// Surfaces created
    pub surfaces: usize,
    /// Scalars waiting in all queues
    pub queued_scalars: usize,
    /// Event records accepted
    pub events_pushed: u64,
    /// Event records dropped by a queue cap
    pub events_dropped: u64,
    /// Scalars handed to the module
    pub scalars_shifted: u64,
    /// Objects currently holding handles
    pub live_objects: usize,
    /// Objects given handles so far
    pub objects_created: u64,
    /// Objects released so far
    pub objects_deleted: u64,
    /// Calls per import
    pub host_calls: BTreeMap<String, u64>,
    /// Failed host calls per error code
    pub errors: BTreeMap<String, u64>,
    /// Frames run
    pub frames: u64,
    /// Average frame time in microseconds
    pub avg_frame_time_us: f64,
}

impl BridgeStats {
    /// Export Prometheus-format metrics
    pub fn to_prometheus(&self) -> String {
        let mut output = String::new();

        let gauges = [
            ("wio_surfaces", "Surfaces created", self.surfaces as f64),
            ("wio_queued_scalars", "Scalars waiting in event queues", self.queued_scalars as f64),
            ("wio_live_objects", "Graphics objects holding handles", self.live_objects as f64),
            ("wio_frame_time_us", "Average frame time", self.avg_frame_time_us),
        ];
        for (name, help, value) in gauges {
            let _ = writeln!(output, "# HELP {name} {help}");
            let _ = writeln!(output, "# TYPE {name} gauge");
            let _ = writeln!(output, "{name} {value}\n");
        }

        let _ = writeln!(output, "# HELP wio_events_total Event records by outcome");
        let _ = writeln!(output, "# TYPE wio_events_total counter");
        let _ = writeln!(output, "wio_events_total{{outcome=\"pushed\"}} {}", self.events_pushed);
        let _ = writeln!(output, "wio_events_total{{outcome=\"dropped\"}} {}", self.events_dropped);
        let _ = writeln!(output, "wio_scalars_shifted_total {}\n", self.scalars_shifted);

        let _ = writeln!(output, "# HELP wio_objects_total Graphics objects by operation");
        let _ = writeln!(output, "# TYPE wio_objects_total counter");
        let _ = writeln!(output, "wio_objects_total{{op=\"created\"}} {}", self.objects_created);
        let _ = writeln!(output, "wio_objects_total{{op=\"deleted\"}} {}\n", self.objects_deleted);

        let _ = writeln!(output, "# HELP wio_frames_total Calls of the loop export");
        let _ = writeln!(output, "# TYPE wio_frames_total counter");
        let _ = writeln!(output, "wio_frames_total {}\n", self.frames);

        let _ = writeln!(output, "# HELP wio_host_calls_total Host function calls");
        let _ = writeln!(output, "# TYPE wio_host_calls_total counter");
        for (name, count) in &self.host_calls {
            let _ = writeln!(output, "wio_host_calls_total{{function=\"{name}\"}} {count}");
        }

        let _ = writeln!(output, "\n# HELP wio_errors_total Failed host calls by code");
        let _ = writeln!(output, "# TYPE wio_errors_total counter");
        for (code, count) in &self.errors {
            let _ = writeln!(output, "wio_errors_total{{code=\"{code}\"}} {count}");
        }

        output
    }
}

/// Timer for one frame
pub struct FrameTimer {
    start: Instant,
}

impl FrameTimer {
    /// Start timing
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop timing and record the frame
    pub fn finish(self, metrics: &mut BridgeMetrics) {
        metrics.record_frame(self.start.elapsed());
    }
}
