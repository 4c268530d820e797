//! Change-detected recomputation
//!
//! Derived picker data (the ancestor list, the visible items) is a pure
//! function of versioned inputs. Instead of eagerly recomputing on every
//! event, a `Memo` remembers the key its value was computed from and only
//! recomputes when the key changes.
//!
//! # Key Concepts
//!
//! - **Version tracking**: the session bumps a counter whenever the graph or
//!   the sample data is replaced, so keys stay cheap to compare
//! - **Single slot**: only the latest key/value pair is kept

/// Single-slot cache keyed by the inputs the value was derived from
#[derive(Debug)]
pub struct Memo<K, V> {
    slot: Option<(K, V)>,
    hits: u64,
    misses: u64,
}

impl<K: PartialEq, V> Memo<K, V> {
    /// Create an empty memo
    pub fn new() -> Self {
        Self {
            slot: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached value for `key`, computing it if the key changed
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        let entry = match self.slot.take() {
            Some((cached, value)) if cached == key => {
                self.hits += 1;
                log::trace!("memo hit ({} hits, {} misses)", self.hits, self.misses);
                (cached, value)
            }
            _ => {
                self.misses += 1;
                (key, compute())
            }
        };
        &self.slot.insert(entry).1
    }

    /// The cached value, if any, regardless of key
    pub fn cached(&self) -> Option<&V> {
        self.slot.as_ref().map(|(_, value)| value)
    }

    /// Drop the cached value
    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// Get statistics about the cache
    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits,
            misses: self.misses,
            cached: self.slot.is_some(),
        }
    }
}

impl<K: PartialEq, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about a memo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that recomputed
    pub misses: u64,
    /// Whether a value is currently held
    pub cached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_recomputes_only_on_key_change() {
        let calls = Cell::new(0);
        let mut memo: Memo<(u64, String), usize> = Memo::new();

        let compute = || {
            calls.set(calls.get() + 1);
            calls.get()
        };

        assert_eq!(*memo.get_or_compute((1, "a".into()), compute), 1);
        assert_eq!(*memo.get_or_compute((1, "a".into()), compute), 1);
        assert_eq!(*memo.get_or_compute((2, "a".into()), compute), 2);
        assert_eq!(*memo.get_or_compute((2, "b".into()), compute), 3);
        assert_eq!(calls.get(), 3);

        let stats = memo.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 3);
        assert!(stats.cached);
    }

    #[test]
    fn test_hit_returns_cached_value_without_computing() {
        let mut memo: Memo<&str, Vec<u32>> = Memo::new();
        assert_eq!(memo.get_or_compute("k", || vec![1, 2]), &vec![1, 2]);

        let value = memo.get_or_compute("k", || panic!("must not recompute"));
        assert_eq!(value, &vec![1, 2]);
        assert_eq!(memo.cached(), Some(&vec![1, 2]));
    }

    #[test]
    fn test_invalidate() {
        let mut memo: Memo<u8, &str> = Memo::new();
        memo.get_or_compute(1, || "first");
        memo.invalidate();
        assert!(memo.cached().is_none());
        assert_eq!(*memo.get_or_compute(1, || "second"), "second");
    }
}
