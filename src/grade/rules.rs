#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The rules the grader knows and the shape of their configuration.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use super::{Defect, basic, quantity, usage};
use crate::{
    config::{ConfigError, RuleConfig},
    diagram::{Cardinality, Diagram},
};

/// The shape of the configuration value a rule expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigShape {
    /// Points only.
    Basic,
    /// `min,max,points`
    Quantity,
    /// `min,max,required_edges,points`
    NaryQuantity,
    /// Cardinalities drawn from the given domain, then points.
    Cardinalities(&'static [Cardinality]),
    /// Cardinality pairs, then points.
    CardinalityPairs,
    /// Coverage/disjointness pairs, then points.
    HierarchyPairs,
}

/// Cardinalities a multivalued attribute may be expected to use.
const ATTRIBUTE_CARDINALITIES: [Cardinality; 3] = [
    Cardinality::ZeroOrOne,
    Cardinality::ZeroOrMany,
    Cardinality::OneOrMany,
];

/// Every rule the grader knows, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleId {
    /// All vertices form one connected component.
    SingleComponent,
    /// Every relationship-entity edge carries a cardinality.
    RelationshipCardinality,
    /// Every non-weak entity is identified.
    EntityIdentifier,
    /// Every weak entity is identified through a valid composite.
    WeakEntityIdentifier,
    /// No vertex is unnamed.
    NonEmptyNames,
    /// No two entities or relationships share a name.
    NoDuplicateNames,
    /// No vertex has two attributes with the same name.
    NoDuplicateAttributes,
    /// Multivalued attributes never use cardinality `ONE`.
    MultivaluedAttributeCardinality,
    /// Every generalization has coverage and disjointness.
    HierarchyAnnotations,
    /// Number of entities.
    EntityQuantity,
    /// Number of relationships.
    RelationshipQuantity,
    /// Number of attribute vertices of any kind.
    AttributeQuantity,
    /// Number of multivalued attributes.
    MultivaluedAttributeQuantity,
    /// Number of structured attributes.
    StructuredAttributeQuantity,
    /// Number of weak entities.
    WeakEntityQuantity,
    /// Number of composite identifiers.
    CompositeIdentifierQuantity,
    /// Number of hierarchies.
    HierarchyQuantity,
    /// Number of recursive relationships.
    RecursiveRelationshipQuantity,
    /// Number of entities with more than one identifier.
    MultipleIdentifierQuantity,
    /// Number of relationships reaching many entities.
    NaryRelationshipQuantity,
    /// Cardinalities used on relationship edges.
    RelationshipCardinalityUsage,
    /// Cardinalities used on multivalued attributes.
    AttributeCardinalityUsage,
    /// Cardinality pairs used by single relationships.
    CardinalityPairUsage,
    /// Coverage/disjointness combinations used by generalizations.
    HierarchyUsage,
}

impl RuleId {
    /// All rules, in the order they are checked.
    pub const ALL: [RuleId; 24] = [
        RuleId::SingleComponent,
        RuleId::RelationshipCardinality,
        RuleId::EntityIdentifier,
        RuleId::WeakEntityIdentifier,
        RuleId::NonEmptyNames,
        RuleId::NoDuplicateNames,
        RuleId::NoDuplicateAttributes,
        RuleId::MultivaluedAttributeCardinality,
        RuleId::HierarchyAnnotations,
        RuleId::EntityQuantity,
        RuleId::RelationshipQuantity,
        RuleId::AttributeQuantity,
        RuleId::MultivaluedAttributeQuantity,
        RuleId::StructuredAttributeQuantity,
        RuleId::WeakEntityQuantity,
        RuleId::CompositeIdentifierQuantity,
        RuleId::HierarchyQuantity,
        RuleId::RecursiveRelationshipQuantity,
        RuleId::MultipleIdentifierQuantity,
        RuleId::NaryRelationshipQuantity,
        RuleId::RelationshipCardinalityUsage,
        RuleId::AttributeCardinalityUsage,
        RuleId::CardinalityPairUsage,
        RuleId::HierarchyUsage,
    ];

    /// The configuration key of the rule.
    pub fn key(self) -> &'static str {
        match self {
            RuleId::SingleComponent => "SINGLE_COMPONENT",
            RuleId::RelationshipCardinality => "RELATIONSHIP_CARDINALITY",
            RuleId::EntityIdentifier => "ENTITY_IDENTIFIER",
            RuleId::WeakEntityIdentifier => "WEAK_ENTITY_IDENTIFIER",
            RuleId::NonEmptyNames => "NON_EMPTY_NAMES",
            RuleId::NoDuplicateNames => "NO_DUPLICATE_NAMES",
            RuleId::NoDuplicateAttributes => "NO_DUPLICATE_ATTRIBUTES",
            RuleId::MultivaluedAttributeCardinality => "MULTIVALUED_ATTRIBUTE_CARDINALITY",
            RuleId::HierarchyAnnotations => "HIERARCHY_ANNOTATIONS",
            RuleId::EntityQuantity => "ENTITY_QUANTITY",
            RuleId::RelationshipQuantity => "RELATIONSHIP_QUANTITY",
            RuleId::AttributeQuantity => "ATTRIBUTE_QUANTITY",
            RuleId::MultivaluedAttributeQuantity => "MULTIVALUED_ATTRIBUTE_QUANTITY",
            RuleId::StructuredAttributeQuantity => "STRUCTURED_ATTRIBUTE_QUANTITY",
            RuleId::WeakEntityQuantity => "WEAK_ENTITY_QUANTITY",
            RuleId::CompositeIdentifierQuantity => "COMPOSITE_IDENTIFIER_QUANTITY",
            RuleId::HierarchyQuantity => "HIERARCHY_QUANTITY",
            RuleId::RecursiveRelationshipQuantity => "RECURSIVE_RELATIONSHIP_QUANTITY",
            RuleId::MultipleIdentifierQuantity => "MULTIPLE_IDENTIFIER_QUANTITY",
            RuleId::NaryRelationshipQuantity => "NARY_RELATIONSHIP_QUANTITY",
            RuleId::RelationshipCardinalityUsage => "RELATIONSHIP_CARDINALITY_USAGE",
            RuleId::AttributeCardinalityUsage => "ATTRIBUTE_CARDINALITY_USAGE",
            RuleId::CardinalityPairUsage => "CARDINALITY_PAIR_USAGE",
            RuleId::HierarchyUsage => "HIERARCHY_USAGE",
        }
    }

    /// The value used when the configuration does not mention the rule.
    pub fn default_value(self) -> &'static str {
        match self.shape() {
            ConfigShape::Basic => "1",
            ConfigShape::Quantity if self == RuleId::EntityQuantity => "1,1000,1",
            ConfigShape::Quantity => "0,1000,1",
            ConfigShape::NaryQuantity => "0,1000,3,1",
            ConfigShape::Cardinalities(_) if self == RuleId::RelationshipCardinalityUsage => {
                "ONE,ZERO_OR_MANY,1"
            }
            ConfigShape::Cardinalities(_)
            | ConfigShape::CardinalityPairs
            | ConfigShape::HierarchyPairs => "1",
        }
    }

    /// What the configuration value of the rule looks like.
    pub fn shape(self) -> ConfigShape {
        match self {
            RuleId::SingleComponent
            | RuleId::RelationshipCardinality
            | RuleId::EntityIdentifier
            | RuleId::WeakEntityIdentifier
            | RuleId::NonEmptyNames
            | RuleId::NoDuplicateNames
            | RuleId::NoDuplicateAttributes
            | RuleId::MultivaluedAttributeCardinality
            | RuleId::HierarchyAnnotations => ConfigShape::Basic,
            RuleId::EntityQuantity
            | RuleId::RelationshipQuantity
            | RuleId::AttributeQuantity
            | RuleId::MultivaluedAttributeQuantity
            | RuleId::StructuredAttributeQuantity
            | RuleId::WeakEntityQuantity
            | RuleId::CompositeIdentifierQuantity
            | RuleId::HierarchyQuantity
            | RuleId::RecursiveRelationshipQuantity
            | RuleId::MultipleIdentifierQuantity => ConfigShape::Quantity,
            RuleId::NaryRelationshipQuantity => ConfigShape::NaryQuantity,
            RuleId::RelationshipCardinalityUsage => ConfigShape::Cardinalities(&Cardinality::REAL),
            RuleId::AttributeCardinalityUsage => {
                ConfigShape::Cardinalities(&ATTRIBUTE_CARDINALITIES)
            }
            RuleId::CardinalityPairUsage => ConfigShape::CardinalityPairs,
            RuleId::HierarchyUsage => ConfigShape::HierarchyPairs,
        }
    }

    /// A one-line description for reports.
    pub fn description(self) -> &'static str {
        match self {
            RuleId::SingleComponent => "The diagram is a single connected component",
            RuleId::RelationshipCardinality => "Every relationship edge has a cardinality",
            RuleId::EntityIdentifier => "Every entity has an identifier",
            RuleId::WeakEntityIdentifier => "Weak entities are identified correctly",
            RuleId::NonEmptyNames => "Every element is named",
            RuleId::NoDuplicateNames => "Entity and relationship names are unique",
            RuleId::NoDuplicateAttributes => "Attribute names are unique per owner",
            RuleId::MultivaluedAttributeCardinality => "Multivalued attributes are not `1`",
            RuleId::HierarchyAnnotations => "Hierarchies have coverage and disjointness",
            RuleId::EntityQuantity => "Number of entities",
            RuleId::RelationshipQuantity => "Number of relationships",
            RuleId::AttributeQuantity => {
                "Number of attributes, multivalued and structured ones included"
            }
            RuleId::MultivaluedAttributeQuantity => "Number of multivalued attributes",
            RuleId::StructuredAttributeQuantity => "Number of structured attributes",
            RuleId::WeakEntityQuantity => "Number of weak entities",
            RuleId::CompositeIdentifierQuantity => "Number of composite identifiers",
            RuleId::HierarchyQuantity => "Number of hierarchies",
            RuleId::RecursiveRelationshipQuantity => "Number of recursive relationships",
            RuleId::MultipleIdentifierQuantity => "Number of entities with several identifiers",
            RuleId::NaryRelationshipQuantity => "Number of n-ary relationships",
            RuleId::RelationshipCardinalityUsage => "Cardinalities used on relationships",
            RuleId::AttributeCardinalityUsage => "Cardinalities used on multivalued attributes",
            RuleId::CardinalityPairUsage => "Cardinality pairs used on relationships",
            RuleId::HierarchyUsage => "Kinds of hierarchy used",
        }
    }

    /// Evaluates the rule against `diagram`.
    pub fn check(self, diagram: &Diagram, config: &RuleConfig) -> Result<Defect, ConfigError> {
        match self.shape() {
            ConfigShape::Basic => basic::check(diagram, self, config),
            ConfigShape::Quantity | ConfigShape::NaryQuantity => {
                quantity::check(diagram, self, config)
            }
            ConfigShape::Cardinalities(_)
            | ConfigShape::CardinalityPairs
            | ConfigShape::HierarchyPairs => usage::check(diagram, self, config),
        }
    }
}

impl Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A configuration key that names no rule.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("`{0}` is not a known rule")]
pub struct UnknownRule(pub String);

impl FromStr for RuleId {
    type Err = UnknownRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase();
        RuleId::ALL
            .into_iter()
            .find(|rule| rule.key() == key)
            .ok_or(UnknownRule(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_from_str() {
        for rule in RuleId::ALL {
            assert_eq!(rule.key().parse::<RuleId>(), Ok(rule));
        }
        assert_eq!("entity_quantity".parse::<RuleId>(), Ok(RuleId::EntityQuantity));
        assert!("NOT_A_RULE".parse::<RuleId>().is_err());
    }

    #[test]
    fn keys_match_serde_names() {
        for rule in RuleId::ALL {
            let json = serde_json::to_string(&rule).expect("serialize");
            assert_eq!(json, format!("\"{}\"", rule.key()));
        }
    }

    #[test]
    fn attribute_quantity_says_what_it_counts() {
        let text = RuleId::AttributeQuantity.description();
        assert!(text.contains("multivalued") && text.contains("structured"), "{text}");
    }
}
