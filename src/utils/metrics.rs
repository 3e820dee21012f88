//! Codec Metrics
//!
//! Process-wide counters for encode and decode activity.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Global metrics collector for codec operations
#[derive(Debug)]
pub struct Metrics {
    /// Bundles successfully encoded
    pub bundles_encoded: AtomicU64,
    /// Bundles successfully decoded
    pub bundles_decoded: AtomicU64,
    /// Wire bytes produced by encode (header included)
    pub bytes_encoded: AtomicU64,
    /// Wire bytes accepted by decode (header included)
    pub bytes_decoded: AtomicU64,
    /// Decodes rejected for bad magic, version or flag
    pub format_failures: AtomicU64,
    /// Decodes rejected for length or checksum mismatch
    pub integrity_failures: AtomicU64,
    /// Decodes rejected by AEAD authentication
    pub authentication_failures: AtomicU64,
    /// Decodes rejected for any other reason
    pub other_failures: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            bundles_encoded: AtomicU64::new(0),
            bundles_decoded: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            format_failures: AtomicU64::new(0),
            integrity_failures: AtomicU64::new(0),
            authentication_failures: AtomicU64::new(0),
            other_failures: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a successful encode
    pub fn bundle_encoded(&self, byte_count: u64) {
        self.bundles_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a successful decode
    pub fn bundle_decoded(&self, byte_count: u64) {
        self.bundles_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_decoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a failed decode under its error category
    pub fn decode_failed(&self, error: &crate::error::BundleError) {
        use crate::error::{BundleError, ErrorCategory};

        let counter = match (error.category(), error) {
            (ErrorCategory::Format, _) => &self.format_failures,
            (ErrorCategory::Integrity, _) => &self.integrity_failures,
            (_, BundleError::AuthenticationFailed) => &self.authentication_failures,
            _ => &self.other_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            bundles_encoded: self.bundles_encoded.load(Ordering::Relaxed),
            bundles_decoded: self.bundles_decoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            format_failures: self.format_failures.load(Ordering::Relaxed),
            integrity_failures: self.integrity_failures.load(Ordering::Relaxed),
            authentication_failures: self.authentication_failures.load(Ordering::Relaxed),
            other_failures: self.other_failures.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            bundles_encoded = snapshot.bundles_encoded,
            bundles_decoded = snapshot.bundles_decoded,
            bytes_encoded = snapshot.bytes_encoded,
            bytes_decoded = snapshot.bytes_decoded,
            format_failures = snapshot.format_failures,
            integrity_failures = snapshot.integrity_failures,
            authentication_failures = snapshot.authentication_failures,
            other_failures = snapshot.other_failures,
            uptime_seconds = snapshot.uptime_seconds,
            "Bundle codec metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub bundles_encoded: u64,
    pub bundles_decoded: u64,
    pub bytes_encoded: u64,
    pub bytes_decoded: u64,
    pub format_failures: u64,
    pub integrity_failures: u64,
    pub authentication_failures: u64,
    pub other_failures: u64,
    pub uptime_seconds: u64,
}

/// Global metrics instance (lazy static for simplicity)
static METRICS: once_cell::sync::Lazy<Metrics> = once_cell::sync::Lazy::new(Metrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static Metrics {
    &METRICS
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BundleError;

    #[test]
    fn test_counters() {
        let metrics = Metrics::new();
        metrics.bundle_encoded(100);
        metrics.bundle_decoded(40);
        metrics.bundle_decoded(60);
        metrics.decode_failed(&BundleError::NotABundle);
        metrics.decode_failed(&BundleError::ChecksumMismatch {
            declared: 0,
            actual: 1,
        });
        metrics.decode_failed(&BundleError::AuthenticationFailed);
        metrics.decode_failed(&BundleError::DecompressionFailure);

        let snap = metrics.snapshot();
        assert_eq!(snap.bundles_encoded, 1);
        assert_eq!(snap.bytes_encoded, 100);
        assert_eq!(snap.bundles_decoded, 2);
        assert_eq!(snap.bytes_decoded, 100);
        assert_eq!(snap.format_failures, 1);
        assert_eq!(snap.integrity_failures, 1);
        assert_eq!(snap.authentication_failures, 1);
        assert_eq!(snap.other_failures, 1);
    }
}
