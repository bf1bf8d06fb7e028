#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::diagram::{Cardinality, Coverage, Disjointness};

/// An unordered pair of cardinalities, eg. the two ends of a binary
/// relationship.
///
/// The pair is stored smallest-first, so `(ONE, ZERO_OR_ONE)` and
/// `(ZERO_OR_ONE, ONE)` are the same value and hash the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "PairFields")]
pub struct CardinalityPair {
    /// The smaller cardinality.
    first:  Cardinality,
    /// The larger cardinality.
    second: Cardinality,
}

impl CardinalityPair {
    /// Creates a pair; argument order does not matter.
    pub fn new(a: Cardinality, b: Cardinality) -> Self {
        if a <= b {
            Self {
                first:  a,
                second: b,
            }
        } else {
            Self {
                first:  b,
                second: a,
            }
        }
    }

    /// Returns both cardinalities, smallest first.
    pub fn cardinalities(&self) -> (Cardinality, Cardinality) {
        (self.first, self.second)
    }

    /// Every unordered pair over `cardinalities`, reflexive pairs included.
    ///
    /// The input is expected to hold distinct values; pairs are produced for
    /// every `i <= j` index combination.
    pub fn from_cardinality_list(cardinalities: &[Cardinality]) -> Vec<CardinalityPair> {
        let mut pairs = Vec::new();
        for (i, a) in cardinalities.iter().enumerate() {
            for b in &cardinalities[i..] {
                pairs.push(CardinalityPair::new(*a, *b));
            }
        }
        pairs
    }
}

/// A pair as written, before it is put smallest-first.
#[derive(Deserialize)]
struct PairFields {
    /// One end.
    first:  Cardinality,
    /// The other end.
    second: Cardinality,
}

impl From<PairFields> for CardinalityPair {
    fn from(fields: PairFields) -> Self {
        CardinalityPair::new(fields.first, fields.second)
    }
}

impl Display for CardinalityPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// The coverage and disjointness annotations of one generalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HierarchyPair {
    /// Coverage half.
    pub coverage:     Coverage,
    /// Disjointness half.
    pub disjointness: Disjointness,
}

impl HierarchyPair {
    /// Creates a pair.
    pub fn new(coverage: Coverage, disjointness: Disjointness) -> Self {
        Self {
            coverage,
            disjointness,
        }
    }

    /// All four recognized combinations.
    pub fn all() -> Vec<HierarchyPair> {
        let mut pairs = Vec::new();
        for coverage in [Coverage::Complete, Coverage::Partial] {
            for disjointness in [Disjointness::Exclusive, Disjointness::Overlapping] {
                pairs.push(HierarchyPair::new(coverage, disjointness));
            }
        }
        pairs
    }
}

impl Display for HierarchyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.coverage, self.disjointness)
    }
}

/// A value a usage rule can expect to find in a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum UsageValue {
    /// A single cardinality.
    Cardinality(Cardinality),
    /// An unordered cardinality pair.
    CardinalityPair(CardinalityPair),
    /// A coverage/disjointness combination.
    HierarchyPair(HierarchyPair),
}

impl From<Cardinality> for UsageValue {
    fn from(value: Cardinality) -> Self {
        UsageValue::Cardinality(value)
    }
}

impl From<CardinalityPair> for UsageValue {
    fn from(value: CardinalityPair) -> Self {
        UsageValue::CardinalityPair(value)
    }
}

impl From<HierarchyPair> for UsageValue {
    fn from(value: HierarchyPair) -> Self {
        UsageValue::HierarchyPair(value)
    }
}

impl Display for UsageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageValue::Cardinality(c) => write!(f, "{c}"),
            UsageValue::CardinalityPair(p) => write!(f, "{p}"),
            UsageValue::HierarchyPair(p) => write!(f, "{p}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::hash_map::DefaultHasher,
        hash::{Hash, Hasher},
    };

    use super::*;

    fn hash_of(pair: &CardinalityPair) -> u64 {
        let mut hasher = DefaultHasher::new();
        pair.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn cardinality_pairs_are_unordered() {
        let a = CardinalityPair::new(Cardinality::ZeroOrOne, Cardinality::One);
        let b = CardinalityPair::new(Cardinality::One, Cardinality::ZeroOrOne);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn pair_list_includes_reflexive_pairs() {
        let pairs =
            CardinalityPair::from_cardinality_list(&[Cardinality::One, Cardinality::ZeroOrMany]);
        assert_eq!(pairs, vec![
            CardinalityPair::new(Cardinality::One, Cardinality::One),
            CardinalityPair::new(Cardinality::One, Cardinality::ZeroOrMany),
            CardinalityPair::new(Cardinality::ZeroOrMany, Cardinality::ZeroOrMany),
        ]);
        assert_eq!(CardinalityPair::from_cardinality_list(&Cardinality::REAL).len(), 10);
    }

    #[test]
    fn deserialized_pairs_are_normalized() {
        let mirrored: CardinalityPair =
            serde_json::from_str(r#"{ "first": "ONE", "second": "ZERO_OR_ONE" }"#)
                .expect("deserialize");
        assert_eq!(mirrored, CardinalityPair::new(Cardinality::ZeroOrOne, Cardinality::One));
        assert_eq!(mirrored.cardinalities(), (Cardinality::ZeroOrOne, Cardinality::One));
    }
}
