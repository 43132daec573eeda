use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts tasks currently running in one slot and the most ever seen at once.
#[derive(Debug, Default)]
pub struct Occupancy {
    current: AtomicUsize,
    peak: AtomicUsize,
}

/// Marks one running task. Dropping it leaves the slot.
#[derive(Debug)]
pub struct OccupancyGuard(Arc<Occupancy>);

impl Occupancy {
    pub fn enter(self: &Arc<Self>) -> OccupancyGuard {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        OccupancyGuard(Arc::clone(self))
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Drop for OccupancyGuard {
    fn drop(&mut self) {
        self.0.current.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_survives_exits() {
        let slot = Arc::new(Occupancy::default());
        let first = slot.enter();
        let second = slot.enter();
        assert_eq!(slot.current(), 2);
        drop(first);
        drop(second);
        let _third = slot.enter();
        assert_eq!(slot.current(), 1);
        assert_eq!(slot.peak(), 2);
    }

    #[test]
    fn test_concurrent_entries_are_counted() {
        let slot = Arc::new(Occupancy::default());
        let barrier = Arc::new(std::sync::Barrier::new(4));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let slot = Arc::clone(&slot);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    let _guard = slot.enter();
                    barrier.wait();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(slot.current(), 0);
        assert_eq!(slot.peak(), 4);
    }
}
