/// Occupancy and probe-length statistics for an [`IntMap`](crate::IntMap).
///
/// Available with the `stats` feature.
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of entries, including key `0`
    pub len: usize,
    /// Number of buckets allocated
    pub buckets: usize,
    /// Number of buckets currently holding a key
    pub occupied_buckets: usize,
    /// Entry count above which the next insertion grows the table
    pub threshold: usize,
    /// Bucket utilization (occupied_buckets / buckets)
    pub load_factor: f64,
    /// Longest distance of any entry from its probe start
    pub max_probe_distance: usize,
    /// Average distance of entries from their probe start
    pub mean_probe_distance: f64,
    /// Total memory in bytes used by the bucket arrays
    pub total_bytes: usize,
}

impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== IntMap Debug Statistics ===");
        println!("Population: {} entries, threshold {}", self.len, self.threshold);
        println!(
            "Bucket Usage: {}/{} ({:.2}% load factor)",
            self.occupied_buckets,
            self.buckets,
            self.load_factor * 100.0
        );
        println!(
            "Probe Distance: max {}, mean {:.3}",
            self.max_probe_distance, self.mean_probe_distance
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

#[cfg(any(test, feature = "std"))]
const BAR_WIDTH: usize = 60;

/// Length of the bar drawn for `count` when the tallest bar is `max`.
///
/// Non-zero counts always get at least one cell.
#[cfg(any(test, feature = "std"))]
fn bar_len(count: usize, max: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    (count * BAR_WIDTH).div_ceil(max).clamp(1, BAR_WIDTH)
}

/// Pretty-prints a probe-distance histogram as horizontal bars on stdout.
///
/// `hist` is the output of [`IntMap::probe_histogram`](crate::IntMap::probe_histogram).
#[cfg(feature = "std")]
pub fn print_probe_histogram(hist: &[usize]) {
    let max = hist.iter().copied().max().unwrap_or(0);
    if max == 0 {
        println!("probe histogram: empty");
        return;
    }

    println!("probe histogram ({} entries):", hist.iter().sum::<usize>());
    for (distance, &count) in hist.iter().enumerate() {
        let bar = "#".repeat(bar_len(count, max));
        println!("{distance:>3} | {bar:<width$} {count}", width = BAR_WIDTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_len_scales_to_tallest_bucket() {
        assert_eq!(bar_len(0, 10), 0);
        assert_eq!(bar_len(10, 10), BAR_WIDTH);
        assert_eq!(bar_len(5, 10), BAR_WIDTH / 2);
        assert_eq!(bar_len(1, 1_000_000), 1);
        assert_eq!(bar_len(3, 0), 0);
    }
}
