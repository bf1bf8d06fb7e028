#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Rules requiring every configured value to show up somewhere in the
//! diagram.

use std::collections::BTreeSet;

use itertools::Itertools;

use super::{Defect, RuleId, defect::DefectDetails};
use crate::{
    config::{ConfigError, RuleConfig, UsageConfig},
    diagram::{Cardinality, Diagram, EdgeKind},
    types::{CardinalityPair, HierarchyPair, UsageValue},
};

/// Checks a usage rule.
pub fn check(diagram: &Diagram, rule: RuleId, config: &RuleConfig) -> Result<Defect, ConfigError> {
    match (rule, config) {
        (RuleId::RelationshipCardinalityUsage, RuleConfig::CardinalityUsage(usage)) => {
            Ok(compare(rule, usage, relationship_cardinalities(diagram)))
        }
        (RuleId::AttributeCardinalityUsage, RuleConfig::CardinalityUsage(usage)) => {
            Ok(compare(rule, usage, attribute_cardinalities(diagram)))
        }
        (RuleId::CardinalityPairUsage, RuleConfig::CardinalityPairUsage(usage)) => {
            Ok(compare(rule, usage, cardinality_pairs(diagram)))
        }
        (RuleId::HierarchyUsage, RuleConfig::HierarchyUsage(usage)) => {
            Ok(compare(rule, usage, hierarchy_pairs(diagram)))
        }
        _ => Err(ConfigError::ShapeMismatch {
            rule,
            found: config.shape_name(),
        }),
    }
}

/// Builds the defect from what was expected and what was found.
fn compare<T>(rule: RuleId, usage: &UsageConfig<T>, actual: BTreeSet<T>) -> Defect
where
    T: Copy + Ord + Into<UsageValue>,
{
    let missing: Vec<UsageValue> = usage
        .expected
        .iter()
        .filter(|value| !actual.contains(*value))
        .map(|&value| value.into())
        .collect();

    Defect::builder()
        .rule(rule)
        .present(!missing.is_empty())
        .points(usage.points)
        .details(DefectDetails::Usage {
            expected: usage.expected.iter().map(|&v| v.into()).collect(),
            actual: actual.into_iter().map(Into::into).collect(),
            missing,
        })
        .build()
}

/// Cardinalities drawn on relationship edges.
fn relationship_cardinalities(diagram: &Diagram) -> BTreeSet<Cardinality> {
    diagram
        .edges()
        .iter()
        .filter(|e| diagram.is_relationship_connection(e))
        .map(|e| e.cardinality())
        .filter(|c| c.has_cardinality())
        .collect()
}

/// Cardinalities drawn on multivalued attribute edges.
fn attribute_cardinalities(diagram: &Diagram) -> BTreeSet<Cardinality> {
    diagram
        .edges()
        .iter()
        .filter(|e| diagram.is_multivalued(e))
        .map(|e| e.cardinality())
        .collect()
}

/// Pairs formed from the distinct cardinalities of each relationship.
fn cardinality_pairs(diagram: &Diagram) -> BTreeSet<CardinalityPair> {
    let mut pairs = BTreeSet::new();
    for relationship in diagram.relationships() {
        let used: Vec<Cardinality> = diagram
            .incident_edges(relationship)
            .filter(|e| diagram.is_relationship_connection(e))
            .map(|e| e.cardinality())
            .filter(|c| c.has_cardinality())
            .unique()
            .collect();
        pairs.extend(CardinalityPair::from_cardinality_list(&used));
    }
    pairs
}

/// Coverage/disjointness combinations of every generalization.
fn hierarchy_pairs(diagram: &Diagram) -> BTreeSet<HierarchyPair> {
    diagram
        .generalizations()
        .filter_map(|e| match e.kind() {
            EdgeKind::Generalization {
                coverage,
                disjointness,
            } => Some(HierarchyPair::new(coverage, disjointness)),
            EdgeKind::Connection => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{Coverage, DiagramError, Disjointness};

    fn enrollment() -> Result<Diagram, DiagramError> {
        let mut b = Diagram::builder();
        b.entity("s", "Student")?
            .entity("c", "Course")?
            .relationship("takes", "Takes")?
            .connect("e1", "s", "takes", Cardinality::ZeroOrMany)?
            .connect("e2", "takes", "c", Cardinality::OneOrMany)?
            .attribute("p", "phone", false)?
            .connect("e3", "p", "s", Cardinality::ZeroOrMany)?
            .entity("g", "Grad")?
            .generalize("isa", "g", "s", Coverage::Partial, Disjointness::Exclusive)?;
        b.build()
    }

    fn cardinalities(expected: &[Cardinality]) -> RuleConfig {
        RuleConfig::CardinalityUsage(UsageConfig {
            points:   1.0,
            expected: expected.to_vec(),
        })
    }

    #[test]
    fn missing_relationship_cardinalities_are_listed() -> Result<(), DiagramError> {
        let d = enrollment()?;
        let defect = check(
            &d,
            RuleId::RelationshipCardinalityUsage,
            &cardinalities(&[Cardinality::ZeroOrMany, Cardinality::One]),
        )
        .expect("usage rule");
        assert!(defect.present());
        assert_eq!(defect.details(), &DefectDetails::Usage {
            expected: vec![Cardinality::ZeroOrMany.into(), Cardinality::One.into()],
            actual:   vec![Cardinality::ZeroOrMany.into(), Cardinality::OneOrMany.into()],
            missing:  vec![Cardinality::One.into()],
        });
        Ok(())
    }

    #[test]
    fn attribute_cardinalities_come_from_multivalued_edges() -> Result<(), DiagramError> {
        let d = enrollment()?;
        let defect = check(
            &d,
            RuleId::AttributeCardinalityUsage,
            &cardinalities(&[Cardinality::ZeroOrMany]),
        )
        .expect("usage rule");
        assert!(!defect.present());
        assert_eq!(defect.awarded(), 1.0);
        Ok(())
    }

    #[test]
    fn pairs_are_matched_in_either_order() -> Result<(), DiagramError> {
        let d = enrollment()?;
        let config = RuleConfig::CardinalityPairUsage(UsageConfig {
            points:   1.0,
            expected: vec![CardinalityPair::new(Cardinality::OneOrMany, Cardinality::ZeroOrMany)],
        });
        let defect = check(&d, RuleId::CardinalityPairUsage, &config).expect("usage rule");
        assert!(!defect.present());
        Ok(())
    }

    #[test]
    fn hierarchy_pairs_are_collected() -> Result<(), DiagramError> {
        let d = enrollment()?;
        let config = RuleConfig::HierarchyUsage(UsageConfig {
            points:   1.0,
            expected: HierarchyPair::all(),
        });
        let defect = check(&d, RuleId::HierarchyUsage, &config).expect("usage rule");
        assert!(defect.present());
        let DefectDetails::Usage { actual, missing, .. } = defect.details() else {
            panic!("usage details expected");
        };
        assert_eq!(actual, &vec![UsageValue::from(HierarchyPair::new(
            Coverage::Partial,
            Disjointness::Exclusive
        ))]);
        assert_eq!(missing.len(), 3);
        Ok(())
    }
}
