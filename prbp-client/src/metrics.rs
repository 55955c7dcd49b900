//! Per-session transfer metrics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Wire byte counters for one client session.
///
/// Counts whole frames as they cross the socket, headers included.
#[derive(Debug)]
pub struct SessionMetrics {
    bytes_sent: AtomicU64,
    bytes_received: AtomicU64,
    started_at: Instant,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            bytes_sent: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn record_sent(&self, n: usize) {
        self.bytes_sent.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn record_received(&self, n: usize) {
        self.bytes_received.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received.load(Ordering::Relaxed)
    }

    /// Time since the session started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Renders the end-of-session report.
    pub fn summary(&self) -> String {
        let secs = self.elapsed().as_secs_f64();
        let sent = self.bytes_sent();
        let throughput = if secs > 0.0 { sent as f64 / secs } else { 0.0 };
        format!(
            "Duration: {:.2} seconds\nBytes Sent: {} bytes\nBytes Received: {} bytes\nThroughput: {:.2} bytes/sec",
            secs,
            sent,
            self.bytes_received(),
            throughput
        )
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = SessionMetrics::new();
        metrics.record_sent(12);
        metrics.record_sent(30);
        metrics.record_received(7);
        assert_eq!(metrics.bytes_sent(), 42);
        assert_eq!(metrics.bytes_received(), 7);
    }

    #[test]
    fn test_summary_reports_counters() {
        let metrics = SessionMetrics::new();
        metrics.record_sent(100);
        metrics.record_received(25);
        let summary = metrics.summary();
        assert!(summary.contains("Bytes Sent: 100 bytes"));
        assert!(summary.contains("Bytes Received: 25 bytes"));
        assert!(summary.starts_with("Duration: "));
        assert!(summary.contains("bytes/sec"));
    }
}
