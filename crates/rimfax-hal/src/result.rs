//! Execution results and measurement counts.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Measurement outcome histogram.
///
/// Keys are classical bitstrings with bit `i` of the classical register at
/// string position `i`. Values are the number of shots that produced the
/// outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` occurrences of an outcome, accumulating with any
    /// previous occurrences.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Record a single occurrence of an outcome.
    pub fn record(&mut self, bitstring: impl Into<String>) {
        self.insert(bitstring, 1);
    }

    /// Get the count for an outcome.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of shots recorded.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// The most frequent outcome, if any.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.counts
            .iter()
            .max_by_key(|&(_, &count)| count)
            .map(|(bitstring, &count)| (bitstring.as_str(), count))
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no outcomes were recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(bitstring, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Outcome bitstrings in sorted order.
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.counts.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (bitstring, count) in iter {
            counts.insert(bitstring, count);
        }
        counts
    }
}

/// The result of executing a circuit on a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measurement histogram.
    pub counts: Counts,
    /// Number of shots executed.
    pub shots: u32,
    /// Wall-clock execution time in milliseconds, if measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a result from a histogram.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
        }
    }

    /// Attach the measured execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_accumulates() {
        let mut counts = Counts::new();
        counts.insert("00", 3);
        counts.insert("00", 2);
        counts.record("11");
        assert_eq!(counts.get("00"), 5);
        assert_eq!(counts.get("11"), 1);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.total_shots(), 6);
    }

    #[test]
    fn test_most_frequent() {
        let counts: Counts = [("00".to_string(), 70), ("11".to_string(), 30)]
            .into_iter()
            .collect();
        assert_eq!(counts.most_frequent(), Some(("00", 70)));
        assert_eq!(Counts::new().most_frequent(), None);
    }

    #[test]
    fn test_sorted_keys() {
        let counts: Counts = [
            ("10".to_string(), 1),
            ("00".to_string(), 1),
            ("01".to_string(), 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(counts.sorted_keys(), vec!["00", "01", "10"]);
    }
}
