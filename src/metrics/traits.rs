//! Consumption side of the metrics: snapshotting, resetting and export.
//!
//! Recording happens through [`Observer`](crate::hook::Observer); these traits
//! only read what an observer has collected.

/// Produces a point-in-time copy of collected metrics.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Resets collected metrics to zero.
pub trait MetricsReset {
    fn reset_metrics(&self);
}

/// Publishes a snapshot to a monitoring system.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
