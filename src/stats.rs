use alloc::vec::Vec;

/// Debug statistics for hash table analysis.
///
/// Produced by [`HashTable::debug_stats`](crate::HashTable::debug_stats).
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live entries
    pub populated: usize,
    /// Number of tombstone slots
    pub tombstones: usize,
    /// Total number of slots allocated
    pub capacity: usize,
    /// (populated + tombstones) / capacity
    pub load_factor: f64,
    /// Longest distance of any entry from its home slot
    pub max_probe: usize,
    /// Mean distance of the entries from their home slots
    pub mean_probe: f64,
    /// Bytes used by the slot array itself
    pub slot_bytes: usize,
    /// Bytes of key and value data owned by the entries
    pub payload_bytes: usize,
}

impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {} live + {} tombstones / {} slots ({:.2}% load factor)",
            self.populated,
            self.tombstones,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Probe distance: max {}, mean {:.3}",
            self.max_probe, self.mean_probe
        );
        println!(
            "Memory: {} slot bytes + {} payload bytes",
            self.slot_bytes, self.payload_bytes
        );
    }
}

/// Counts of live entries by distance from their home slot.
///
/// Produced by
/// [`HashTable::probe_histogram`](crate::HashTable::probe_histogram).
#[derive(Debug, Clone, Default)]
pub struct ProbeHistogram {
    pub(crate) bins: Vec<usize>,
}

impl ProbeHistogram {
    /// Bin `n` holds the number of entries found `n` slots past home.
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    /// Total number of entries counted.
    pub fn total(&self) -> usize {
        self.bins.iter().sum()
    }

    /// The largest distance with a non-zero count, or zero when empty.
    pub fn max_distance(&self) -> usize {
        self.bins.iter().rposition(|&count| count != 0).unwrap_or(0)
    }

    /// Mean distance over all counted entries, or zero when empty.
    pub fn mean_distance(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let weighted = self
            .bins
            .iter()
            .enumerate()
            .map(|(distance, &count)| distance * count)
            .sum::<usize>();
        weighted as f64 / total as f64
    }

    /// Pretty-prints the histogram as a horizontal bar chart.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.total());

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            match units % 8 {
                1 => bar.push('▏'),
                2 => bar.push('▎'),
                3 => bar.push('▍'),
                4 => bar.push('▌'),
                5 => bar.push('▋'),
                6 => bar.push('▊'),
                7 => bar.push('▉'),
                _ => {}
            }
            bar
        };

        for (distance, &count) in self.bins.iter().enumerate() {
            println!("{:>3} | {} ({})", distance, make_bar(count), count);
        }
    }
}
