//! `PendingQueue` — trucks waiting for a bay.

use sirq_core::TruckId;

/// Queued trucks in the order they joined.
///
/// The queue itself imposes no service order; the active
/// [`AllocationPolicy`][crate::AllocationPolicy] decides who leaves.  Removal
/// keeps the relative order of the remaining entries, so an entry's position
/// is always its stable insertion rank.
#[derive(Clone, Debug, Default)]
pub struct PendingQueue {
    entries: Vec<TruckId>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `truck` at the back.
    pub fn push(&mut self, truck: TruckId) {
        debug_assert!(!self.contains(truck), "{truck} queued twice");
        self.entries.push(truck);
    }

    /// Remove `truck`; returns `false` if it was not queued.
    pub fn remove(&mut self, truck: TruckId) -> bool {
        match self.entries.iter().position(|&t| t == truck) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, truck: TruckId) -> bool {
        self.entries.contains(&truck)
    }

    /// Queued trucks in insertion order.
    pub fn as_slice(&self) -> &[TruckId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
