//! Frontier entries for the priority-queue searches.

use std::cmp::Ordering;

/// Reference into the cell arena, ordered by `priority` for use in
/// `BinaryHeap`.
///
/// Entries are immutable once pushed; a relaxation pushes a fresh entry and
/// the stale one is skipped on pop by comparing its recorded priority
/// against the cell's current value.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrontierEntry {
    pub(crate) idx: usize,
    pub(crate) priority: f64,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (a max-heap) pops the smallest priority
        // first; ties break on index for a deterministic pop order.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn heap_pops_smallest_priority_first() {
        let mut heap = BinaryHeap::new();
        for (idx, priority) in [(0, 3.5), (1, 1.0), (2, 2.0), (3, f64::INFINITY)] {
            heap.push(FrontierEntry { idx, priority });
        }
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.idx)).collect();
        assert_eq!(order, vec![1, 2, 0, 3]);
    }

    #[test]
    fn ties_pop_lowest_index_first() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry { idx: 7, priority: 1.0 });
        heap.push(FrontierEntry { idx: 2, priority: 1.0 });
        assert_eq!(heap.pop().map(|e| e.idx), Some(2));
        assert_eq!(heap.pop().map(|e| e.idx), Some(7));
    }
}
