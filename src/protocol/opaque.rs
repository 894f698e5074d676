//! Correlation id ("opaque") generation
//!
//! Every request carries an `opaque` that the peer echoes in its response.
//! Ids only need to be unique among requests in flight on one connection,
//! so a wrapping 32-bit counter is enough: wrapping back onto a live id
//! would need ~4 billion concurrent requests on the same socket.

use std::sync::atomic::{AtomicI32, Ordering};

/// Process-wide default generator used by `Command::request`
static GLOBAL: OpaqueGenerator = OpaqueGenerator::new(0);

/// Monotonically increasing source of correlation ids
#[derive(Debug)]
pub struct OpaqueGenerator {
    last: AtomicI32,
}

impl OpaqueGenerator {
    /// Create a generator whose first id is `start + 1`
    pub const fn new(start: i32) -> Self {
        Self {
            last: AtomicI32::new(start),
        }
    }

    /// The generator shared by every command built without an explicit one
    pub fn global() -> &'static OpaqueGenerator {
        &GLOBAL
    }

    /// Allocate the next id (wraps at `i32::MAX`)
    pub fn next_id(&self) -> i32 {
        self.last.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// The most recently allocated id
    pub fn current(&self) -> i32 {
        self.last.load(Ordering::Relaxed)
    }

    /// Restart the sequence so the next id is `start + 1`
    pub fn reset(&self, start: i32) {
        self.last.store(start, Ordering::Relaxed);
    }
}

impl Default for OpaqueGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_sequence_starts_after_seed() {
        let gen = OpaqueGenerator::new(41);
        assert_eq!(gen.next_id(), 42);
        assert_eq!(gen.next_id(), 43);
        assert_eq!(gen.current(), 43);
    }

    #[test]
    fn test_reset() {
        let gen = OpaqueGenerator::default();
        gen.next_id();
        gen.next_id();
        gen.reset(100);
        assert_eq!(gen.next_id(), 101);
    }

    #[test]
    fn test_wraps_at_i32_boundary() {
        let gen = OpaqueGenerator::new(i32::MAX - 1);
        assert_eq!(gen.next_id(), i32::MAX);
        assert_eq!(gen.next_id(), i32::MIN);
    }

    #[test]
    fn test_concurrent_ids_are_distinct() {
        let gen = Arc::new(OpaqueGenerator::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gen = Arc::clone(&gen);
                thread::spawn(move || (0..1000).map(|_| gen.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(seen.len(), 8000);
    }
}
