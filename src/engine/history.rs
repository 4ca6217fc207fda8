use std::collections::VecDeque;

use crate::models::HistoryEntry;

#[cfg(debug_assertions)]
use crate::config::DF;

/// Bounded FIFO of accepted results, newest at the tail.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Appends at the tail and evicts from the head past capacity.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            let _evicted = self.entries.pop_front();

            #[cfg(debug_assertions)]
            if DF.log_history {
                log::debug!("HISTORY: evicted {:?}", _evicted);
            }
        }
    }

    /// Current contents, oldest first.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().copied().collect()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sequence: u64) -> HistoryEntry {
        HistoryEntry {
            sequence,
            value: sequence as f64 * 10.0,
        }
    }

    #[test]
    fn twenty_first_insert_evicts_oldest() {
        let mut buf = HistoryBuffer::new(20);
        for seq in 1..=21 {
            buf.append(entry(seq));
            assert!(buf.len() <= 20);
        }
        let snap = buf.snapshot();
        assert_eq!(snap.len(), 20);
        assert!(snap.iter().all(|e| e.sequence != 1));
        let seqs: Vec<u64> = snap.iter().map(|e| e.sequence).collect();
        assert_eq!(seqs, (2..=21).collect::<Vec<_>>());
        assert_eq!(buf.latest().map(|e| e.sequence), Some(21));
    }

    #[test]
    fn snapshot_does_not_mutate() {
        let mut buf = HistoryBuffer::new(3);
        buf.append(entry(1));
        buf.append(entry(2));
        let first = buf.snapshot();
        let second = buf.snapshot();
        assert_eq!(first, second);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.values().collect::<Vec<_>>(), vec![10.0, 20.0]);
    }
}
