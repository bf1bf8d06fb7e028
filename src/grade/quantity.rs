#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Rules that count a feature of the diagram and compare the count with an
//! inclusive range.

use std::collections::HashSet;

use super::{Defect, RuleId, defect::DefectDetails};
use crate::{
    config::{ConfigError, QuantityConfig, RuleConfig},
    diagram::Diagram,
};

/// Checks a quantity rule.
pub fn check(diagram: &Diagram, rule: RuleId, config: &RuleConfig) -> Result<Defect, ConfigError> {
    let (quantity, required_edges) = match config {
        RuleConfig::Quantity(q) if rule != RuleId::NaryRelationshipQuantity => (q, None),
        RuleConfig::NaryQuantity {
            quantity,
            required_edges,
        } if rule == RuleId::NaryRelationshipQuantity => (quantity, Some(*required_edges)),
        _ => {
            return Err(ConfigError::ShapeMismatch {
                rule,
                found: config.shape_name(),
            });
        }
    };
    let QuantityConfig { points, min, max } = *quantity;
    if min > max {
        return Err(ConfigError::InvertedRange { rule, min, max });
    }

    let actual = match rule {
        RuleId::EntityQuantity => diagram.entities().count(),
        RuleId::RelationshipQuantity => diagram.relationships().count(),
        RuleId::AttributeQuantity => diagram.attributes().count(),
        RuleId::MultivaluedAttributeQuantity => diagram
            .edges()
            .iter()
            .filter(|e| diagram.is_multivalued(e))
            .count(),
        RuleId::StructuredAttributeQuantity => diagram
            .attributes()
            .filter(|a| diagram.is_structured(a))
            .count(),
        RuleId::WeakEntityQuantity => diagram.entities().filter(|e| diagram.is_weak(e.id())).count(),
        RuleId::CompositeIdentifierQuantity => diagram.composites().len(),
        RuleId::HierarchyQuantity => diagram
            .generalizations()
            .filter_map(|e| e.target())
            .collect::<HashSet<_>>()
            .len(),
        RuleId::RecursiveRelationshipQuantity => diagram
            .relationships()
            .filter(|r| diagram.is_recursive(r))
            .count(),
        RuleId::MultipleIdentifierQuantity => {
            diagram.entities().filter(|e| e.keys().len() > 1).count()
        }
        RuleId::NaryRelationshipQuantity => {
            let required = required_edges.unwrap_or_default();
            diagram
                .relationships()
                .filter(|r| diagram.adjacent_entities(r).len() >= required)
                .count()
        }
        _ => {
            return Err(ConfigError::ShapeMismatch {
                rule,
                found: config.shape_name(),
            });
        }
    };

    Ok(Defect::builder()
        .rule(rule)
        .present(!(min..=max).contains(&actual))
        .points(points)
        .details(DefectDetails::Quantity { actual, min, max })
        .build())
}
