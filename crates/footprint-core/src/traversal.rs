//! # Traversal Decisions and Features
//!
//! - `Traversal`: the visitor's per-chain answer
//! - `Feature` / `Features`: optional behaviours of the exploration engine

use std::collections::BTreeSet;

/// What the engine should do after a visitor has seen a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Enumerate the value's outgoing edges.
    Explore,
    /// Do not look inside the value.
    Skip,
}

/// Optional engine behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    /// Hand primitive-valued edges to the visitor instead of dropping them.
    VisitPrimitives,
    /// Hand null-valued edges to the visitor instead of dropping them.
    VisitNull,
}

/// A set of [`Feature`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Features(BTreeSet<Feature>);

impl Features {
    /// No optional behaviour.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every feature enabled.
    #[must_use]
    pub fn all() -> Self {
        [Feature::VisitPrimitives, Feature::VisitNull]
            .into_iter()
            .collect()
    }

    /// Builder-style insertion.
    #[must_use]
    pub fn with(mut self, feature: Feature) -> Self {
        self.0.insert(feature);
        self
    }

    #[must_use]
    pub fn contains(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }
}

impl FromIterator<Feature> for Features {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_features() {
        let features = Features::new();
        assert!(!features.contains(Feature::VisitPrimitives));
        assert!(!features.contains(Feature::VisitNull));
    }

    #[test]
    fn builder_and_all() {
        let features = Features::new().with(Feature::VisitNull);
        assert!(features.contains(Feature::VisitNull));
        assert!(!features.contains(Feature::VisitPrimitives));

        let all = Features::all();
        assert!(all.contains(Feature::VisitNull));
        assert!(all.contains(Feature::VisitPrimitives));
        assert_eq!(all, features.with(Feature::VisitPrimitives));
    }
}
