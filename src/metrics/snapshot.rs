/// Point-in-time counters for one cache.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub put_added: u64,
    pub put_updated: u64,
    pub evictions: u64,

    pub get_hits: u64,
    pub get_misses: u64,

    pub delete_hits: u64,
    pub delete_misses: u64,
}

impl CacheMetricsSnapshot {
    pub fn put_calls(&self) -> u64 {
        self.put_added + self.put_updated
    }

    pub fn get_calls(&self) -> u64 {
        self.get_hits + self.get_misses
    }

    pub fn delete_calls(&self) -> u64 {
        self.delete_hits + self.delete_misses
    }

    /// Fraction of gets that hit, or `0.0` before the first get.
    pub fn hit_rate(&self) -> f64 {
        match self.get_calls() {
            0 => 0.0,
            calls => self.get_hits as f64 / calls as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_totals() {
        let snapshot = CacheMetricsSnapshot {
            put_added: 3,
            put_updated: 1,
            evictions: 2,
            get_hits: 3,
            get_misses: 1,
            delete_hits: 1,
            delete_misses: 4,
        };
        assert_eq!(snapshot.put_calls(), 4);
        assert_eq!(snapshot.get_calls(), 4);
        assert_eq!(snapshot.delete_calls(), 5);
        assert_eq!(snapshot.hit_rate(), 0.75);
    }

    #[test]
    fn hit_rate_without_gets_is_zero() {
        assert_eq!(CacheMetricsSnapshot::default().hit_rate(), 0.0);
    }
}
