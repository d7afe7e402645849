//! Bounded top-k result lists.
//!
//! [`MinKList`] keeps the k smallest keys seen so far (hyperplane search,
//! where smaller distance is better); [`MaxKList`] is its mirror image
//! keeping the k largest (maximum-inner-product search). Both are flat
//! sorted arrays: k is small in practice, so ordered insertion beats a
//! heap and gives rank access for free.
//!
//! `insert` returns the updated pruning threshold (`max_key` for the min
//! list, `min_key` for the max list), so a search loop can tighten its
//! bound without a second call. Until a list is full the threshold stays
//! at its sentinel, which means comparisons against an under-full list
//! never prune.

/// Sentinel id returned by rank accessors when out of range.
pub const INVALID_ID: u32 = u32::MAX;

#[derive(Debug, Clone, Copy)]
struct Entry {
    key: f32,
    id: u32,
}

/// Fixed-capacity list of the k smallest (key, id) pairs, ascending.
#[derive(Debug, Clone)]
pub struct MinKList {
    k: usize,
    items: Vec<Entry>,
}

impl MinKList {
    /// Create a list retaining the `k` smallest keys.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            items: Vec::with_capacity(k),
        }
    }

    /// Insert a scored item, evicting the current worst when full and
    /// improved upon. Returns the updated pruning threshold
    /// ([`MinKList::max_key`]).
    pub fn insert(&mut self, key: f32, id: u32) -> f32 {
        if self.items.len() < self.k {
            let pos = self.items.partition_point(|e| e.key < key);
            self.items.insert(pos, Entry { key, id });
        } else if self.k > 0 && key < self.items[self.k - 1].key {
            self.items.pop();
            let pos = self.items.partition_point(|e| e.key < key);
            self.items.insert(pos, Entry { key, id });
        }
        self.max_key()
    }

    /// Clear contents; capacity and allocation are retained so the list
    /// can be reused across queries.
    pub fn reset(&mut self) {
        self.items.clear();
    }

    /// Change capacity, dropping the worst entries if shrinking.
    pub fn set_capacity(&mut self, k: usize) {
        self.k = k;
        self.items.truncate(k);
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no entries are held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the list holds its full k entries.
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.k
    }

    /// Maximum number of entries retained.
    pub fn capacity(&self) -> usize {
        self.k
    }

    /// Best (smallest) held key, or `f32::INFINITY` when empty.
    pub fn min_key(&self) -> f32 {
        self.items.first().map_or(f32::INFINITY, |e| e.key)
    }

    /// Pruning threshold: the worst held key once full, `f32::INFINITY`
    /// before that.
    pub fn max_key(&self) -> f32 {
        if self.is_full() && self.k > 0 {
            self.items[self.k - 1].key
        } else {
            f32::INFINITY
        }
    }

    /// Key at rank `i` (ascending), or `f32::INFINITY` out of range.
    pub fn ith_key(&self, i: usize) -> f32 {
        self.items.get(i).map_or(f32::INFINITY, |e| e.key)
    }

    /// Id at rank `i` (ascending), or [`INVALID_ID`] out of range.
    pub fn ith_id(&self, i: usize) -> u32 {
        self.items.get(i).map_or(INVALID_ID, |e| e.id)
    }
}

/// Fixed-capacity list of the k largest (key, id) pairs, descending.
///
/// Mirror image of [`MinKList`]; used for the maximum-inner-product
/// variant of the search, where larger is better.
#[derive(Debug, Clone)]
pub struct MaxKList {
    k: usize,
    items: Vec<Entry>,
}

impl MaxKList {
    /// Create a list retaining the `k` largest keys.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            items: Vec::with_capacity(k),
        }
    }

    /// Insert a scored item, evicting the current worst when full and
    /// improved upon. Returns the updated pruning threshold
    /// ([`MaxKList::min_key`]).
    pub fn insert(&mut self, key: f32, id: u32) -> f32 {
        if self.items.len() < self.k {
            let pos = self.items.partition_point(|e| e.key > key);
            self.items.insert(pos, Entry { key, id });
        } else if self.k > 0 && key > self.items[self.k - 1].key {
            self.items.pop();
            let pos = self.items.partition_point(|e| e.key > key);
            self.items.insert(pos, Entry { key, id });
        }
        self.min_key()
    }

    /// Clear contents; capacity and allocation are retained.
    pub fn reset(&mut self) {
        self.items.clear();
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no entries are held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the list holds its full k entries.
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.k
    }

    /// Maximum number of entries retained.
    pub fn capacity(&self) -> usize {
        self.k
    }

    /// Best (largest) held key, or `f32::NEG_INFINITY` when empty.
    pub fn max_key(&self) -> f32 {
        self.items.first().map_or(f32::NEG_INFINITY, |e| e.key)
    }

    /// Pruning threshold: the worst held key once full,
    /// `f32::NEG_INFINITY` before that.
    pub fn min_key(&self) -> f32 {
        if self.is_full() && self.k > 0 {
            self.items[self.k - 1].key
        } else {
            f32::NEG_INFINITY
        }
    }

    /// Key at rank `i` (descending), or `f32::NEG_INFINITY` out of range.
    pub fn ith_key(&self, i: usize) -> f32 {
        self.items.get(i).map_or(f32::NEG_INFINITY, |e| e.key)
    }

    /// Id at rank `i` (descending), or [`INVALID_ID`] out of range.
    pub fn ith_id(&self, i: usize) -> u32 {
        self.items.get(i).map_or(INVALID_ID, |e| e.id)
    }
}
