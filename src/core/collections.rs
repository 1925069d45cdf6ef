//! Collection aliases used throughout the triangulation.
//!
//! Centralizing these keeps the storage and hashing choices in one place: slotmap arenas
//! for stable keys, `FxHash` for internal maps keyed by those keys, and small inline
//! buffers for the short per-triangle lists that dominate the hot paths.

#![forbid(unsafe_code)]

use crate::core::edge::EdgeKey;
use crate::core::triangulation_data_structure::TriangleKey;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;
use smallvec::SmallVec;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Arena backing the vertex and triangle stores.
///
/// Removed keys are never handed out again for a different value, so a stale
/// [`TriangleKey`] simply fails to resolve.
pub type StorageMap<K, V> = SlotMap<K, V>;

// =============================================================================
// CORE OPTIMIZED TYPES
// =============================================================================

/// Optimized `HashMap` for internal mappings.
///
/// Uses `rustc_hash::FxHasher`, which is fast but not DoS-resistant. All keys hashed in
/// this crate are slotmap keys or coordinate bits produced internally.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::collections::FastHashMap;
///
/// let mut map: FastHashMap<u64, usize> = FastHashMap::default();
/// map.insert(123, 456);
/// assert_eq!(map.get(&123), Some(&456));
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Optimized `HashSet` counterpart of [`FastHashMap`].
pub type FastHashSet<T> = FxHashSet<T>;

/// Stack-allocated buffer that spills to the heap beyond `N` elements.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::collections::SmallBuffer;
///
/// let mut buffer: SmallBuffer<i32, 4> = SmallBuffer::new();
/// buffer.extend([1, 2, 3]);
/// assert!(!buffer.spilled());
/// ```
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

// =============================================================================
// TRIANGULATION-SPECIFIC TYPES
// =============================================================================

/// Triangles incident to an edge. A manifold edge has one (hull) or two (interior).
pub type EdgeTriangles = SmallBuffer<TriangleKey, 2>;

/// Edge → incident triangles index used to re-derive adjacency.
pub type EdgeToTrianglesMap = FastHashMap<EdgeKey, EdgeTriangles>;

/// Keys of the triangles produced by one split (at most four) or one flip (two).
pub type TriangleKeyBuffer = SmallBuffer<TriangleKey, 4>;
