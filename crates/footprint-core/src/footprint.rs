//! # Footprint
//!
//! The immutable result of a measurement: how many objects, how many
//! references between them, and how many primitive leaves of each kind.

use crate::{DeclaredType, FootprintError, PrimitiveKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The footprint of an object graph.
///
/// Counts are validated on construction: no negative count, and tally keys
/// limited to [`PrimitiveKind`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    objects: u64,
    references: u64,
    primitives: BTreeMap<PrimitiveKind, u64>,
}

impl Footprint {
    /// Build a footprint from raw counters.
    ///
    /// `primitives` pairs a declared type with an occurrence count; repeated
    /// types are summed and zero counts dropped.
    ///
    /// Returns `FootprintError::InvalidFootprint` for a negative count or a
    /// non-primitive declared type.
    pub fn new<I>(objects: i64, references: i64, primitives: I) -> Result<Self, FootprintError>
    where
        I: IntoIterator<Item = (DeclaredType, i64)>,
    {
        let objects = u64::try_from(objects).map_err(|_| {
            FootprintError::InvalidFootprint("Negative number of objects".to_string())
        })?;
        let references = u64::try_from(references).map_err(|_| {
            FootprintError::InvalidFootprint("Negative number of references".to_string())
        })?;

        let mut tally: BTreeMap<PrimitiveKind, u64> = BTreeMap::new();
        for (declared, count) in primitives {
            let Some(kind) = declared.primitive_kind() else {
                return Err(FootprintError::InvalidFootprint(format!(
                    "Unexpected primitive type: {}",
                    declared
                )));
            };
            let count = u64::try_from(count).map_err(|_| {
                FootprintError::InvalidFootprint(format!("Negative number of {} values", kind))
            })?;
            if count > 0 {
                let entry = tally.entry(kind).or_insert(0);
                *entry = entry.saturating_add(count);
            }
        }

        Ok(Self {
            objects,
            references,
            primitives: tally,
        })
    }

    /// Number of distinct objects.
    #[must_use]
    pub fn objects(&self) -> u64 {
        self.objects
    }

    /// Number of references (edges into non-primitive slots, nulls included).
    #[must_use]
    pub fn references(&self) -> u64 {
        self.references
    }

    /// Primitive tally by kind. Kinds never seen are absent.
    #[must_use]
    pub fn primitives(&self) -> &BTreeMap<PrimitiveKind, u64> {
        &self.primitives
    }

    /// Occurrences of one primitive kind.
    #[must_use]
    pub fn primitive_count(&self, kind: PrimitiveKind) -> u64 {
        self.primitives.get(&kind).copied().unwrap_or(0)
    }

    /// Occurrences of all primitive kinds together.
    #[must_use]
    pub fn total_primitives(&self) -> u64 {
        self.primitives
            .values()
            .fold(0u64, |acc, count| acc.saturating_add(*count))
    }
}

/// `Footprint{Objects=2, References=3, Primitives=[int x 2, double]}`
impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Footprint{{Objects={}, References={}, Primitives=[",
            self.objects, self.references
        )?;
        for (position, (kind, count)) in self.primitives.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            if *count == 1 {
                write!(f, "{}", kind)?;
            } else {
                write!(f, "{} x {}", kind, count)?;
            }
        }
        f.write_str("]}")
    }
}

// =============================================================================
// TESTS
// =============================================================================
