#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Rules that either hold or do not.

use std::collections::BTreeMap;

use super::{
    Defect, RuleId,
    defect::{DefectDetails, DuplicateName},
};
use crate::{
    config::{ConfigError, RuleConfig},
    diagram::{Cardinality, Coverage, Diagram, Disjointness, EdgeKind, Key, Vertex},
};

/// Checks a boolean rule.
pub fn check(diagram: &Diagram, rule: RuleId, config: &RuleConfig) -> Result<Defect, ConfigError> {
    let RuleConfig::Basic { points } = config else {
        return Err(ConfigError::ShapeMismatch {
            rule,
            found: config.shape_name(),
        });
    };

    let details = match rule {
        RuleId::SingleComponent => single_component(diagram),
        RuleId::RelationshipCardinality => relationship_cardinality(diagram),
        RuleId::EntityIdentifier => entity_identifier(diagram),
        RuleId::WeakEntityIdentifier => weak_entity_identifier(diagram),
        RuleId::NonEmptyNames => non_empty_names(diagram),
        RuleId::NoDuplicateNames => no_duplicate_names(diagram),
        RuleId::NoDuplicateAttributes => no_duplicate_attributes(diagram),
        RuleId::MultivaluedAttributeCardinality => multivalued_attribute_cardinality(diagram),
        RuleId::HierarchyAnnotations => hierarchy_annotations(diagram),
        _ => {
            return Err(ConfigError::ShapeMismatch {
                rule,
                found: config.shape_name(),
            });
        }
    };

    let present = match &details {
        DefectDetails::None => false,
        DefectDetails::EmptyDiagram => true,
        DefectDetails::Vertices(ids) | DefectDetails::Edges(ids) => !ids.is_empty(),
        DefectDetails::DuplicateNames(dupes) => !dupes.is_empty(),
        DefectDetails::Quantity { .. } | DefectDetails::Usage { .. } => false,
    };

    Ok(Defect::builder()
        .rule(rule)
        .present(present)
        .points(*points)
        .details(details)
        .build())
}

/// Collects ids of `vertices` for the report.
fn ids<'a>(vertices: impl Iterator<Item = &'a Vertex>) -> Vec<String> {
    vertices.map(|v| v.id().to_string()).collect()
}

/// Every vertex reachable from the first one.
fn single_component(diagram: &Diagram) -> DefectDetails {
    if diagram.is_empty() {
        return DefectDetails::EmptyDiagram;
    }
    DefectDetails::Vertices(ids(diagram.missing_from_main_component().into_iter()))
}

/// Relationship edges without a drawn cardinality.
fn relationship_cardinality(diagram: &Diagram) -> DefectDetails {
    DefectDetails::Edges(
        diagram
            .edges()
            .iter()
            .filter(|e| diagram.is_relationship_connection(e) && !e.cardinality().has_cardinality())
            .map(|e| e.id().to_string())
            .collect(),
    )
}

/// Strong entities with no identifier of their own or inherited.
fn entity_identifier(diagram: &Diagram) -> DefectDetails {
    DefectDetails::Vertices(ids(diagram
        .entities()
        .filter(|e| !diagram.is_weak(e.id()) && !diagram.has_identifier(e))))
}

/// Weak entities whose composites cannot identify them.
fn weak_entity_identifier(diagram: &Diagram) -> DefectDetails {
    DefectDetails::Vertices(ids(diagram.entities().filter(|e| {
        diagram.is_weak(e.id())
            && e.keys().iter().any(|key| match key {
                Key::Composite(id) => !diagram
                    .composite(id)
                    .is_some_and(|c| diagram.is_weak_identifier(c)),
                Key::Attribute(_) => false,
            })
    })))
}

/// Vertices with a blank name.
fn non_empty_names(diagram: &Diagram) -> DefectDetails {
    DefectDetails::Vertices(ids(diagram
        .vertices()
        .iter()
        .filter(|v| v.name().trim().is_empty())))
}

/// Groups `vertices` by trimmed name and keeps names used more than once.
fn duplicates<'a>(
    owner: Option<&str>,
    vertices: impl Iterator<Item = &'a Vertex>,
) -> Vec<DuplicateName> {
    let mut by_name: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for vertex in vertices {
        let name = vertex.name().trim();
        if !name.is_empty() {
            by_name.entry(name).or_default().push(vertex.id().to_string());
        }
    }
    by_name
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(name, vertices)| DuplicateName {
            owner: owner.map(str::to_string),
            name: name.to_string(),
            vertices,
        })
        .collect()
}

/// Entities and relationships sharing a name. Attributes are checked per
/// owner by [`no_duplicate_attributes`].
fn no_duplicate_names(diagram: &Diagram) -> DefectDetails {
    DefectDetails::DuplicateNames(duplicates(
        None,
        diagram.vertices().iter().filter(|v| !v.is_attribute()),
    ))
}

/// Attributes attached to the same vertex under the same name.
fn no_duplicate_attributes(diagram: &Diagram) -> DefectDetails {
    let mut found = Vec::new();
    for owner in diagram.vertices() {
        let attributes = diagram
            .incident_edges(owner)
            .filter(|e| diagram.is_attribute_connection(e) && e.target() == Some(owner.id()))
            .filter_map(|e| diagram.source_of(e))
            .filter(|a| a.id() != owner.id());
        found.extend(duplicates(Some(owner.id()), attributes));
    }
    DefectDetails::DuplicateNames(found)
}

/// Multivalued attribute edges that say `ONE`.
fn multivalued_attribute_cardinality(diagram: &Diagram) -> DefectDetails {
    DefectDetails::Edges(
        diagram
            .edges()
            .iter()
            .filter(|e| diagram.is_multivalued(e) && e.cardinality() == Cardinality::One)
            .map(|e| e.id().to_string())
            .collect(),
    )
}

/// Generalizations missing coverage or disjointness.
fn hierarchy_annotations(diagram: &Diagram) -> DefectDetails {
    DefectDetails::Edges(
        diagram
            .generalizations()
            .filter(|e| {
                matches!(
                    e.kind(),
                    EdgeKind::Generalization {
                        coverage: Coverage::Unrecognized,
                        ..
                    } | EdgeKind::Generalization {
                        disjointness: Disjointness::Unrecognized,
                        ..
                    }
                )
            })
            .map(|e| e.id().to_string())
            .collect(),
    )
}
