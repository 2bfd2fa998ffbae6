//! Graft types and per-type counts.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Follicular unit size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GraftType {
    /// One hair.
    Single,
    /// Two hairs.
    Double,
    /// Three hairs.
    Triple,
    /// Four hairs.
    Quadruple,
}

impl GraftType {
    /// Every type, in canonical order.
    pub const ALL: [Self; 4] = [Self::Single, Self::Double, Self::Triple, Self::Quadruple];

    /// Hairs per graft.
    #[must_use]
    pub const fn hairs(self) -> u64 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::Quadruple => 4,
        }
    }
}

impl fmt::Display for GraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Triple => "triple",
            Self::Quadruple => "quadruple",
        };
        f.write_str(name)
    }
}

/// Graft counts by type.
///
/// # Example
///
/// ```
/// use graft_plan::{GraftDistribution, GraftType};
///
/// let mut dist = GraftDistribution::new();
/// dist.insert(GraftType::Single, 100);
/// dist.insert(GraftType::Triple, 50);
///
/// assert_eq!(dist.total(), 150);
/// assert_eq!(dist.hairs(), 250);
/// assert_eq!(dist.get(GraftType::Double), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraftDistribution {
    counts: BTreeMap<GraftType, u64>,
}

impl GraftDistribution {
    /// Empty distribution.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Set the count for a type.
    pub fn insert(&mut self, graft_type: GraftType, count: u64) {
        self.counts.insert(graft_type, count);
    }

    /// Count for a type, zero if absent.
    #[must_use]
    pub fn get(&self, graft_type: GraftType) -> u64 {
        self.counts.get(&graft_type).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Hairs transplanted by these grafts.
    #[must_use]
    pub fn hairs(&self) -> u64 {
        self.counts.iter().map(|(t, n)| t.hairs() * n).sum()
    }

    /// Types and counts in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (GraftType, u64)> + '_ {
        self.counts.iter().map(|(t, n)| (*t, *n))
    }

    /// True if no type has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(GraftType, u64)> for GraftDistribution {
    fn from_iter<I: IntoIterator<Item = (GraftType, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let mut sorted = GraftType::ALL;
        sorted.sort();
        assert_eq!(sorted, GraftType::ALL);
        assert_eq!(GraftType::Quadruple.to_string(), "quadruple");
    }

    #[test]
    fn test_from_iter() {
        let dist: GraftDistribution = [(GraftType::Double, 3), (GraftType::Single, 2)]
            .into_iter()
            .collect();
        let order: Vec<GraftType> = dist.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec![GraftType::Single, GraftType::Double]);
        assert_eq!(dist.hairs(), 8);
    }
}
