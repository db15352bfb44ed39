//! Sharded string interner for efficient type-key and function-id storage.
//!
//! Provides O(1) interning and lookup with thread-safe concurrent access
//! via per-shard locking. The dispatch engine calls `intern` once per
//! `TypeKey`/function id it observes; every subsequent comparison on the
//! hot path is then a `u32` equality check instead of a string compare.

// Arc is needed here for SharedInterner - the interner must be shared across
// the registry, the cache, and every thread issuing dispatched calls.
#![expect(
    clippy::disallowed_types,
    reason = "Arc required for SharedInterner thread-safety"
)]

use super::Sym;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Per-shard storage for interned strings.
struct InternShard {
    /// Map from string content to local index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents.
    strings: Vec<&'static str>,
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Shard exceeded capacity (over 4 billion strings).
    ShardOverflow { shard_idx: usize, count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::ShardOverflow { shard_idx, count } => write!(
                f,
                "interner shard {shard_idx} exceeded capacity: {count} strings, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

impl InternShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        let empty: &'static str = "";
        shard.map.insert(empty, 0);
        shard.strings.push(empty);
        shard
    }
}

/// Sharded string interner for concurrent access.
///
/// # Thread Safety
/// Uses `RwLock` per shard for concurrent read/write access.
/// Can be wrapped in Arc for sharing across threads.
pub struct StringInterner {
    shards: [RwLock<InternShard>; Sym::NUM_SHARDS],
    /// Total count of interned strings across all shards (O(1) `len()`).
    total_count: AtomicUsize,
}

impl StringInterner {
    /// Create a new, empty interner.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(InternShard::with_empty())
            } else {
                RwLock::new(InternShard::new())
            }
        });

        Self {
            shards,
            // Start at 1 for the empty string pre-interned in shard 0.
            total_count: AtomicUsize::new(1),
        }
    }

    /// Compute shard for a string based on its hash.
    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hash = 0u32;
        for byte in s.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Sym::NUM_SHARDS
    }

    /// Try to intern a string, returning its `Sym` or an error on overflow.
    #[inline]
    pub fn try_intern(&self, s: &str) -> Result<Sym, InternError> {
        let shard_idx = Self::shard_for(s);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (16)"
        )]
        let shard_idx_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(s) {
                return Ok(Sym::new(shard_idx_u32, local));
            }
        }

        let mut guard = shard.write();
        if let Some(&local) = guard.map.get(s) {
            return Ok(Sym::new(shard_idx_u32, local));
        }

        let owned: String = s.to_owned();
        let leaked: &'static str = Box::leak(owned.into_boxed_str());

        let local = u32::try_from(guard.strings.len()).map_err(|_| InternError::ShardOverflow {
            shard_idx,
            count: guard.strings.len(),
        })?;
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);

        // Relaxed: total_count is an approximate counter, not a sync point.
        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Sym::new(shard_idx_u32, local))
    }

    /// Intern a string, returning its `Sym`.
    ///
    /// # Panics
    /// Panics if the interner exceeds capacity (over 4 billion strings per
    /// shard). Use `try_intern` for fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Sym {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the string for a `Sym`.
    pub fn lookup(&self, sym: Sym) -> &str {
        let shard = &self.shards[sym.shard()];
        let guard = shard.read();
        guard.strings[sym.local()]
    }

    /// Look up the string for a `Sym`, returning a `'static` reference.
    ///
    /// Safe because every interned string is leaked and never deallocated.
    pub fn lookup_static(&self, sym: Sym) -> &'static str {
        let shard = &self.shards[sym.shard()];
        let guard = shard.read();
        guard.strings[sym.local()]
    }

    /// Get the number of interned strings (O(1)).
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Check if the interner is empty (only has the empty string).
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared interner for thread-safe interning across the registry, cache,
/// and concurrent dispatched calls.
///
/// This newtype enforces that all interner sharing goes through `Arc`,
/// preventing accidental uncounted borrows that would outlive a scoped
/// registry rebuild.
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    /// Create a new shared interner.
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
