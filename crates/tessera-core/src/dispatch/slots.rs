//! Pre-sized result storage shared by all workers of one dispatch.
//!
//! Every slot is a write-once cell. Workers own disjoint index sets, so no
//! slot is ever contended and no lock guards the array.

use std::sync::OnceLock;

use crate::error::DispatchError;

/// One write-once slot per job.
#[derive(Debug)]
pub struct ResultSlots<O> {
    slots: Vec<OnceLock<O>>,
}

impl<O> ResultSlots<O> {
    /// Allocate `len` empty slots.
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| OnceLock::new()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Store the result for job `index`.
    pub fn fill(&self, index: usize, value: O) -> Result<(), DispatchError> {
        let slot = self
            .slots
            .get(index)
            .ok_or(DispatchError::ResultSizeMismatch {
                expected: index + 1,
                actual: self.slots.len(),
            })?;
        slot.set(value)
            .map_err(|_| DispatchError::SlotConflict { index })
    }

    /// Whether job `index` has a result.
    pub fn is_filled(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|slot| slot.get().is_some())
    }

    /// Number of slots holding a result.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }

    /// Consume the storage, yielding one entry per job in job order.
    pub fn into_results(self) -> Vec<Option<O>> {
        self.slots.into_iter().map(OnceLock::into_inner).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_start_empty() {
        let slots = ResultSlots::<u8>::new(3);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots.filled(), 0);
        assert_eq!(slots.into_results(), vec![None, None, None]);
    }

    #[test]
    fn test_fill_once() {
        let slots = ResultSlots::new(2);
        slots.fill(1, "b").unwrap();
        assert!(slots.is_filled(1));
        assert!(!slots.is_filled(0));
        assert_eq!(slots.fill(1, "again"), Err(DispatchError::SlotConflict { index: 1 }));
        assert_eq!(slots.into_results(), vec![None, Some("b")]);
    }

    #[test]
    fn test_fill_out_of_range() {
        let slots = ResultSlots::new(2);
        assert_eq!(
            slots.fill(5, 0u8),
            Err(DispatchError::ResultSizeMismatch {
                expected: 6,
                actual: 2
            })
        );
    }

    #[test]
    fn test_disjoint_concurrent_fill() {
        let slots = ResultSlots::new(64);
        std::thread::scope(|s| {
            for worker in 0..4 {
                let slots = &slots;
                s.spawn(move || {
                    for i in (worker..64).step_by(4) {
                        slots.fill(i, i * 10).unwrap();
                    }
                });
            }
        });
        let results = slots.into_results();
        assert!(results.iter().enumerate().all(|(i, r)| *r == Some(i * 10)));
    }
}
