//! # Specificity
//!
//! How precisely a pattern pins down the elements it applies to, as a
//! totally-ordered scalar. Each path component contributes one bit for a
//! concrete value and the next-higher bit for a concrete variant, with
//! components nearer the leaf weighted above everything root-ward of them:
//! a concrete value deep in the path outweighs any combination of shallower
//! ones, and a variant outweighs a plain value at the same depth.
//!
//! Resolution recomputes specificities for the same component sequences on
//! every pass over the registered rules, so values are memoized in a
//! [SpecificityCache]; [SpecificityCache::shared] is the process-wide
//! instance used by [Path::specificity](crate::identifier::Path::specificity).

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use crate::identifier::Component;

/// Bit positions past this collapse onto the top bit. Identifier paths in
/// practice stay a couple of orders of magnitude below this depth.
const MAX_BIT: u32 = 63;

/// An opaque measure of how specific a component sequence is.
///
/// The numeric value is meaningless on its own; only comparison with other
/// `Specificity` values is useful.
///
/// ```rust
/// use stylist::identifier::Path;
///
/// let concrete = Path::from("home/header/searchBar");
/// let partial = Path::from("*/header/*");
/// let shallow = Path::from("home/header");
/// assert!(concrete.specificity() > partial.specificity());
/// assert!(concrete.specificity() > shallow.specificity());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(u64);

impl Specificity {
    /// The least possible specificity.
    pub const ZERO: Self = Self(0);

    /// Compute the specificity of a component sequence (leaf-first order,
    /// as stored by [Path](crate::identifier::Path)).
    ///
    /// Folds root to leaf with a running bit position: a concrete value
    /// sets the bit at the current position, a concrete variant the one
    /// above it.
    pub fn of(components: &[Component]) -> Self {
        let mut score = 0u64;
        let mut bit = 0u32;
        for component in components.iter().rev() {
            if component.value().is_some() {
                score |= 1 << bit.min(MAX_BIT);
            }
            bit += 1;
            if component.variant().is_some() {
                score |= 1 << bit.min(MAX_BIT);
            }
            bit += 1;
        }
        Self(score)
    }
}

/// Memoizes [Specificity] values per distinct component sequence.
///
/// The cache is a pure-function cache keyed by structural content, so it
/// never needs invalidating. It is safe to share between threads and
/// between registries. A capacity of `0` disables caching entirely; once a
/// bounded cache is full, further values are computed but not stored.
pub struct SpecificityCache {
    capacity: usize,
    cache: RwLock<HashMap<Vec<Component>, Specificity>>,
}

impl SpecificityCache {
    /// Create a cache holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide shared cache, unbounded.
    pub fn shared() -> &'static SpecificityCache {
        static SHARED: OnceLock<SpecificityCache> = OnceLock::new();
        SHARED.get_or_init(|| SpecificityCache::with_capacity(usize::MAX))
    }

    /// The specificity of `components`, from the cache when possible.
    pub fn specificity(&self, components: &[Component]) -> Specificity {
        if self.capacity == 0 {
            return Specificity::of(components);
        }

        if let Ok(cache) = self.cache.read() {
            if let Some(specificity) = cache.get(components) {
                return *specificity;
            }
        }

        let specificity = Specificity::of(components);

        if let Ok(mut cache) = self.cache.write() {
            if cache.len() < self.capacity {
                cache.insert(components.to_vec(), specificity);
            } else {
                log::debug!("specificity cache full, not caching {components:?}");
            }
        }

        specificity
    }

    /// The number of memoized sequences.
    pub fn len(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::Path;

    fn specificity(path: &str) -> Specificity {
        Specificity::of(Path::from(path).components())
    }

    #[test]
    fn test_empty_path_is_zero() {
        assert_eq!(specificity(""), Specificity::ZERO);
        assert_eq!(specificity("*/*/*"), Specificity::ZERO);
    }

    #[test]
    fn test_deeper_concrete_components_outweigh_shallower() {
        // A concrete value near the leaf beats any combination of
        // concrete values above it.
        assert!(specificity("*/*/searchBar") > specificity("home/header/*"));
        assert!(specificity("home/searchBar") > specificity("home/*"));
    }

    #[test]
    fn test_variant_outweighs_value_at_same_depth() {
        assert!(specificity("*[selected]") > specificity("button"));
        assert!(specificity("button[selected]") > specificity("button"));
    }

    #[test]
    fn test_more_components_matched_scores_higher() {
        assert!(specificity("home/header/searchBar") > specificity("header/searchBar"));
        assert!(specificity("header/searchBar") > specificity("searchBar"));
    }

    #[test]
    fn test_cache_returns_computed_values() {
        let cache = SpecificityCache::with_capacity(usize::MAX);
        let components = Path::from("organism/*/element/*/atom");
        let first = cache.specificity(components.components());
        let second = cache.specificity(components.components());
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let cache = SpecificityCache::with_capacity(0);
        let components = Path::from("a/b/c");
        let value = cache.specificity(components.components());
        assert_eq!(value, Specificity::of(components.components()));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_bounded_cache_stops_storing_at_capacity() {
        let cache = SpecificityCache::with_capacity(1);
        cache.specificity(Path::from("a/b").components());
        cache.specificity(Path::from("c/d").components());
        assert_eq!(cache.len(), 1);
    }
}
