#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! What checking a rule produced.

use serde::Serialize;
use typed_builder::TypedBuilder;

use super::RuleId;
use crate::types::UsageValue;

/// Vertices sharing one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateName {
    /// The vertex whose attributes collide, for per-owner checks.
    pub owner:    Option<String>,
    /// The shared name.
    pub name:     String,
    /// Ids of the vertices using it, in diagram order.
    pub vertices: Vec<String>,
}

/// What a checker found, for the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DefectDetails {
    /// Nothing to add.
    #[default]
    None,
    /// The diagram has no vertices at all.
    EmptyDiagram,
    /// Offending vertex ids.
    Vertices(Vec<String>),
    /// Offending edge ids.
    Edges(Vec<String>),
    /// Names used more than once.
    DuplicateNames(Vec<DuplicateName>),
    /// A count against its accepted range.
    Quantity {
        /// Counted value.
        actual: usize,
        /// Smallest accepted count.
        min:    usize,
        /// Largest accepted count.
        max:    usize,
    },
    /// Expected against actually used values.
    Usage {
        /// Values the configuration asks for.
        expected: Vec<UsageValue>,
        /// Values the diagram uses, sorted.
        actual:   Vec<UsageValue>,
        /// Expected values the diagram does not use.
        missing:  Vec<UsageValue>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, TypedBuilder)]
#[builder(doc)]
/// The outcome of checking one rule.
pub struct Defect {
    /// Rule that was checked.
    rule:    RuleId,
    /// True if the diagram violates the rule.
    present: bool,
    /// Points at stake.
    points:  f64,
    /// Supporting data for the report.
    #[builder(default)]
    details: DefectDetails,
}

impl Defect {
    /// Returns the rule that was checked.
    pub fn rule(&self) -> RuleId {
        self.rule
    }

    /// Returns whether the rule is violated.
    pub fn present(&self) -> bool {
        self.present
    }

    /// Returns the points at stake.
    pub fn points(&self) -> f64 {
        self.points
    }

    /// Points earned: all of them when the defect is absent, none otherwise.
    pub fn awarded(&self) -> f64 {
        if self.present { 0.0 } else { self.points }
    }

    /// Returns the supporting data.
    pub fn details(&self) -> &DefectDetails {
        &self.details
    }
}
