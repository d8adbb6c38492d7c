use std::io::Write;

use parking_lot::Mutex;

use crate::metrics::snapshot::CacheMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for cache metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be scraped
/// by Prometheus or forwarded to an OpenTelemetry collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_counter(&self, writer: &mut W, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let _ = writeln!(writer, "# TYPE {} counter", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_gauge(&self, writer: &mut W, suffix: &str, value: f64) {
        let name = self.metric_name(suffix);
        let _ = writeln!(writer, "# TYPE {} gauge", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<CacheMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &CacheMetricsSnapshot) {
        let mut writer = self.writer.lock();
        let w = &mut *writer;
        self.write_counter(w, "put_calls_total", snapshot.put_calls());
        self.write_counter(w, "put_added_total", snapshot.put_added);
        self.write_counter(w, "put_updated_total", snapshot.put_updated);
        self.write_counter(w, "evicted_entries_total", snapshot.evictions);
        self.write_counter(w, "get_calls_total", snapshot.get_calls());
        self.write_counter(w, "get_hits_total", snapshot.get_hits);
        self.write_counter(w, "get_misses_total", snapshot.get_misses);
        self.write_counter(w, "delete_hits_total", snapshot.delete_hits);
        self.write_counter(w, "delete_misses_total", snapshot.delete_misses);
        self.write_gauge(w, "hit_rate", snapshot.hit_rate());
        let _ = w.flush();
    }
}
