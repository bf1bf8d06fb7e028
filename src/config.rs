#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Turns the flat, string-keyed grading configuration into typed per-rule
//! values.
//!
//! Every rule is configured by a comma-separated value whose last token is
//! the number of points, eg. `ENTITY_QUANTITY = 2,5,1.5`. A value of
//! `disable` switches the rule off, and a missing key falls back to the
//! rule's default.

use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{ALL_TOKEN, COMMENT_MARKERS, DISABLE_TOKEN, VALUE_SEPARATOR},
    diagram::Cardinality,
    grade::{ConfigShape, RuleId},
    parsers::parser,
    types::{CardinalityPair, HierarchyPair},
};

/// Why a rule's configuration value could not be used.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The value is blank.
    #[error("{rule}: the configuration value is empty")]
    Empty {
        /// Rule being configured.
        rule: RuleId,
    },
    /// A token that should be a number is not one.
    #[error("{rule}: `{token}` is not a valid number")]
    InvalidNumber {
        /// Rule being configured.
        rule:  RuleId,
        /// Offending token.
        token: String,
    },
    /// Points are negative, infinite or NaN.
    #[error("{rule}: `{token}` is not a valid number of points")]
    InvalidPoints {
        /// Rule being configured.
        rule:  RuleId,
        /// Offending token.
        token: String,
    },
    /// A value token names nothing the rule understands.
    #[error("{rule}: `{token}` is not a recognized value")]
    UnrecognizedToken {
        /// Rule being configured.
        rule:  RuleId,
        /// Offending token.
        token: String,
    },
    /// A recognized value that the rule cannot check.
    #[error("{rule}: `{token}` cannot be used with this rule")]
    OutOfDomain {
        /// Rule being configured.
        rule:  RuleId,
        /// Offending token.
        token: String,
    },
    /// Too many or too few tokens before the points.
    #[error("{rule}: expected {expected} value(s) before the points, found {found}")]
    WrongArity {
        /// Rule being configured.
        rule:     RuleId,
        /// Tokens the rule needs.
        expected: usize,
        /// Tokens that were given.
        found:    usize,
    },
    /// A quantity range whose minimum exceeds its maximum.
    #[error("{rule}: the minimum ({min}) is greater than the maximum ({max})")]
    InvertedRange {
        /// Rule being configured.
        rule: RuleId,
        /// Configured minimum.
        min:  usize,
        /// Configured maximum.
        max:  usize,
    },
    /// A typed value of the wrong shape was handed to a checker.
    #[error("{rule}: a {found} configuration cannot be used for this rule")]
    ShapeMismatch {
        /// Rule being checked.
        rule:  RuleId,
        /// Shape that was supplied.
        found: &'static str,
    },
}

/// An inclusive count range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantityConfig {
    /// Points awarded when the count is in range.
    pub points: f64,
    /// Smallest accepted count.
    pub min:    usize,
    /// Largest accepted count.
    pub max:    usize,
}

/// Values that must all appear in the diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageConfig<T> {
    /// Points awarded when nothing is missing.
    pub points:   f64,
    /// Expected values, distinct, in configuration order.
    pub expected: Vec<T>,
}

/// The typed configuration of one rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RuleConfig {
    /// Points only.
    Basic {
        /// Points awarded when the rule holds.
        points: f64,
    },
    /// A count range.
    Quantity(QuantityConfig),
    /// A count range over relationships reaching at least `required_edges`
    /// distinct entities.
    NaryQuantity {
        /// The range and points.
        quantity:       QuantityConfig,
        /// Minimum number of distinct entities for a relationship to count.
        required_edges: usize,
    },
    /// Expected cardinalities.
    CardinalityUsage(UsageConfig<Cardinality>),
    /// Expected cardinality pairs.
    CardinalityPairUsage(UsageConfig<CardinalityPair>),
    /// Expected coverage/disjointness combinations.
    HierarchyUsage(UsageConfig<HierarchyPair>),
}

impl RuleConfig {
    /// Points at stake for the rule.
    pub fn points(&self) -> f64 {
        match self {
            RuleConfig::Basic { points } => *points,
            RuleConfig::Quantity(q) => q.points,
            RuleConfig::NaryQuantity { quantity, .. } => quantity.points,
            RuleConfig::CardinalityUsage(u) => u.points,
            RuleConfig::CardinalityPairUsage(u) => u.points,
            RuleConfig::HierarchyUsage(u) => u.points,
        }
    }

    /// Short name of the variant, for error messages.
    pub fn shape_name(&self) -> &'static str {
        match self {
            RuleConfig::Basic { .. } => "basic",
            RuleConfig::Quantity(_) => "quantity",
            RuleConfig::NaryQuantity { .. } => "n-ary quantity",
            RuleConfig::CardinalityUsage(_) => "cardinality usage",
            RuleConfig::CardinalityPairUsage(_) => "cardinality pair usage",
            RuleConfig::HierarchyUsage(_) => "hierarchy usage",
        }
    }

    /// Parses the raw value of `rule`.
    pub fn parse(rule: RuleId, raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Err(ConfigError::Empty { rule });
        }

        let tokens: Vec<&str> = raw.split(VALUE_SEPARATOR).map(str::trim).collect();
        let (points, params) = match tokens.split_last() {
            Some((points, params)) => (parse_points(rule, points)?, params),
            None => return Err(ConfigError::Empty { rule }),
        };

        let config = match rule.shape() {
            ConfigShape::Basic => {
                expect_arity(rule, params, 0)?;
                RuleConfig::Basic { points }
            }
            ConfigShape::Quantity => {
                expect_arity(rule, params, 2)?;
                RuleConfig::Quantity(parse_range(rule, points, params[0], params[1])?)
            }
            ConfigShape::NaryQuantity => {
                expect_arity(rule, params, 3)?;
                RuleConfig::NaryQuantity {
                    quantity:       parse_range(rule, points, params[0], params[1])?,
                    required_edges: parse_count(rule, params[2])?,
                }
            }
            ConfigShape::Cardinalities(domain) => {
                let params = if rule == RuleId::AttributeCardinalityUsage {
                    without_one(rule, params)
                } else {
                    params.to_vec()
                };
                RuleConfig::CardinalityUsage(UsageConfig {
                    points,
                    expected: parse_usage(rule, &params, domain, |t| parser::cardinality(t).ok())?,
                })
            }
            ConfigShape::CardinalityPairs => {
                let domain = CardinalityPair::from_cardinality_list(&Cardinality::REAL);
                RuleConfig::CardinalityPairUsage(UsageConfig {
                    points,
                    expected: parse_usage(rule, params, &domain, |t| {
                        parser::cardinality_pair(t).ok()
                    })?,
                })
            }
            ConfigShape::HierarchyPairs => RuleConfig::HierarchyUsage(UsageConfig {
                points,
                expected: parse_usage(rule, params, &HierarchyPair::all(), |t| {
                    parser::hierarchy_pair(t).ok()
                })?,
            }),
        };
        Ok(config)
    }
}

/// Parses the trailing points token.
fn parse_points(rule: RuleId, token: &str) -> Result<f64, ConfigError> {
    let points = token
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidNumber {
            rule,
            token: token.to_string(),
        })?;
    if points.is_finite() && points >= 0.0 {
        Ok(points)
    } else {
        Err(ConfigError::InvalidPoints {
            rule,
            token: token.to_string(),
        })
    }
}

/// Parses a non-negative count.
fn parse_count(rule: RuleId, token: &str) -> Result<usize, ConfigError> {
    token
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidNumber {
            rule,
            token: token.to_string(),
        })
}

/// Parses `min` and `max`, rejecting inverted ranges.
fn parse_range(
    rule: RuleId,
    points: f64,
    min: &str,
    max: &str,
) -> Result<QuantityConfig, ConfigError> {
    let min = parse_count(rule, min)?;
    let max = parse_count(rule, max)?;
    if min > max {
        return Err(ConfigError::InvertedRange { rule, min, max });
    }
    Ok(QuantityConfig { points, min, max })
}

/// Fails unless exactly `expected` tokens precede the points.
fn expect_arity(rule: RuleId, params: &[&str], expected: usize) -> Result<(), ConfigError> {
    if params.len() == expected {
        Ok(())
    } else {
        Err(ConfigError::WrongArity {
            rule,
            expected,
            found: params.len(),
        })
    }
}

/// Drops `ONE` tokens: a multivalued attribute is never expected to use it.
fn without_one<'t>(rule: RuleId, params: &[&'t str]) -> Vec<&'t str> {
    params
        .iter()
        .copied()
        .filter(|token| {
            let one = matches!(
                parser::cardinality(token.to_ascii_uppercase().as_str()),
                Ok(Cardinality::One)
            );
            if one {
                tracing::debug!("{rule}: ignoring `{token}`, multivalued attributes are never ONE");
            }
            !one
        })
        .collect()
}

/// Parses the expected values of a usage rule. A lone `all` stands for the
/// whole domain; repeated values are kept once.
fn parse_usage<T, F>(
    rule: RuleId,
    params: &[&str],
    domain: &[T],
    parse: F,
) -> Result<Vec<T>, ConfigError>
where
    T: Copy + Eq + std::hash::Hash,
    F: Fn(&str) -> Option<T>,
{
    if let [only] = params {
        if only.eq_ignore_ascii_case(ALL_TOKEN) {
            return Ok(domain.to_vec());
        }
    }

    let mut expected = Vec::with_capacity(params.len());
    for token in params {
        let value = parse(token.to_ascii_uppercase().as_str()).ok_or_else(|| {
            ConfigError::UnrecognizedToken {
                rule,
                token: token.to_string(),
            }
        })?;
        if !domain.contains(&value) {
            return Err(ConfigError::OutOfDomain {
                rule,
                token: token.to_string(),
            });
        }
        expected.push(value);
    }
    Ok(expected.into_iter().unique().collect())
}

/// The raw grading configuration: rule key to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradingConfig {
    /// Upper-cased keys to trimmed values.
    values: BTreeMap<String, String>,
}

impl GradingConfig {
    /// An empty configuration: every rule uses its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration spelling out every rule's default.
    pub fn defaults() -> Self {
        Self::from_pairs(RuleId::ALL.map(|rule| (rule.key(), rule.default_value())))
    }

    /// Builds a configuration from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::new();
        for (key, value) in pairs {
            config.set(key.as_ref(), value.as_ref());
        }
        config
    }

    /// Sets the raw value of a key.
    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        self.values
            .insert(key.trim().to_ascii_uppercase(), value.trim().to_string());
        self
    }

    /// The raw value configured for `rule`, if any.
    pub fn raw(&self, rule: RuleId) -> Option<&str> {
        self.values.get(rule.key()).map(String::as_str)
    }

    /// The value that applies to `rule`: configured or default.
    pub fn value_for(&self, rule: RuleId) -> &str {
        self.raw(rule).unwrap_or(rule.default_value())
    }

    /// True if `rule` is switched off.
    pub fn is_disabled(&self, rule: RuleId) -> bool {
        self.value_for(rule).trim().eq_ignore_ascii_case(DISABLE_TOKEN)
    }

    /// Keys that name no rule.
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.values
            .keys()
            .filter(|key| key.parse::<RuleId>().is_err())
            .map(String::as_str)
            .collect()
    }

    /// Typed configuration of `rule`, or `None` if it is disabled.
    pub fn resolve(&self, rule: RuleId) -> Result<Option<RuleConfig>, ConfigError> {
        if self.is_disabled(rule) {
            return Ok(None);
        }
        RuleConfig::parse(rule, self.value_for(rule)).map(Some)
    }

    /// Reads `KEY = VALUE` lines. Blank lines and lines starting with `#` or
    /// `!` are skipped; `:` is accepted in place of `=`.
    pub fn from_properties(text: &str) -> Self {
        let pairs = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKERS))
            .filter_map(|line| line.split_once(['=', ':']));
        Self::from_pairs(pairs)
    }

    /// Renders the configuration as properties text.
    pub fn to_properties(&self) -> String {
        self.values
            .iter()
            .map(|(key, value)| format!("{key} = {value}\n"))
            .collect()
    }

    /// Loads a configuration file: JSON objects for `.json` files, properties
    /// text otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read configuration {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            let values: BTreeMap<String, String> = serde_json::from_str(&text)
                .with_context(|| format!("Could not parse {} as JSON", path.display()))?;
            Self::from_pairs(values)
        } else {
            Self::from_properties(&text)
        };

        for key in config.unknown_keys() {
            tracing::warn!("Ignoring unknown rule `{}` in {}", key, path.display());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{Coverage, Disjointness};

    #[test]
    fn missing_keys_use_defaults() {
        let config = GradingConfig::new();
        assert_eq!(
            config.resolve(RuleId::EntityQuantity),
            Ok(Some(RuleConfig::Quantity(QuantityConfig {
                points: 1.0,
                min:    1,
                max:    1000,
            })))
        );
        for rule in RuleId::ALL {
            assert!(config.resolve(rule).is_ok(), "default for {rule} must parse");
        }
    }

    #[test]
    fn disable_is_case_insensitive() {
        let config = GradingConfig::from_pairs([("single_component", "  DisAble ")]);
        assert_eq!(config.resolve(RuleId::SingleComponent), Ok(None));
    }

    #[test]
    fn quantity_ranges_must_not_be_inverted() {
        let config = GradingConfig::from_pairs([("ENTITY_QUANTITY", "10,1,2")]);
        assert_eq!(
            config.resolve(RuleId::EntityQuantity),
            Err(ConfigError::InvertedRange {
                rule: RuleId::EntityQuantity,
                min:  10,
                max:  1,
            })
        );
    }

    #[test]
    fn nary_quantity_takes_a_threshold() {
        let config = RuleConfig::parse(RuleId::NaryRelationshipQuantity, "1, 2, 3, 0.5");
        assert_eq!(
            config,
            Ok(RuleConfig::NaryQuantity {
                quantity:       QuantityConfig {
                    points: 0.5,
                    min:    1,
                    max:    2,
                },
                required_edges: 3,
            })
        );
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        assert!(matches!(
            RuleConfig::parse(RuleId::SingleComponent, "lots"),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            RuleConfig::parse(RuleId::SingleComponent, "-1"),
            Err(ConfigError::InvalidPoints { .. })
        ));
        assert!(matches!(
            RuleConfig::parse(RuleId::EntityQuantity, "2,1"),
            Err(ConfigError::WrongArity {
                expected: 2,
                found: 1,
                ..
            })
        ));
        assert!(matches!(
            RuleConfig::parse(RuleId::EntityQuantity, "-2,4,1"),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn all_expands_to_the_rule_domain() {
        let Ok(RuleConfig::CardinalityUsage(usage)) =
            RuleConfig::parse(RuleId::RelationshipCardinalityUsage, "ALL,2")
        else {
            panic!("expected a cardinality usage config");
        };
        assert_eq!(usage.expected, Cardinality::REAL.to_vec());
        assert_eq!(usage.points, 2.0);

        let Ok(RuleConfig::CardinalityUsage(usage)) =
            RuleConfig::parse(RuleId::AttributeCardinalityUsage, "all,1")
        else {
            panic!("expected a cardinality usage config");
        };
        assert!(!usage.expected.contains(&Cardinality::One));

        let Ok(RuleConfig::CardinalityPairUsage(usage)) =
            RuleConfig::parse(RuleId::CardinalityPairUsage, "all,1")
        else {
            panic!("expected a cardinality pair usage config");
        };
        assert_eq!(usage.expected.len(), 10);
    }

    #[test]
    fn usage_values_are_parsed_and_deduplicated() {
        let parsed = RuleConfig::parse(
            RuleId::HierarchyUsage,
            "complete-exclusive, exclusive-complete, partial-overlapping, 3",
        );
        assert_eq!(
            parsed,
            Ok(RuleConfig::HierarchyUsage(UsageConfig {
                points:   3.0,
                expected: vec![
                    HierarchyPair::new(Coverage::Complete, Disjointness::Exclusive),
                    HierarchyPair::new(Coverage::Partial, Disjointness::Overlapping),
                ],
            }))
        );
    }

    #[test]
    fn attribute_usage_ignores_one() {
        assert_eq!(
            RuleConfig::parse(RuleId::AttributeCardinalityUsage, "ONE,zero_or_many,1,2"),
            Ok(RuleConfig::CardinalityUsage(UsageConfig {
                points:   2.0,
                expected: vec![Cardinality::ZeroOrMany],
            }))
        );
        assert_eq!(
            RuleConfig::parse(RuleId::AttributeCardinalityUsage, "ONE,1"),
            Ok(RuleConfig::CardinalityUsage(UsageConfig {
                points:   1.0,
                expected: vec![],
            }))
        );
    }

    #[test]
    fn usage_tokens_outside_the_domain_are_rejected() {
        assert!(matches!(
            RuleConfig::parse(RuleId::RelationshipCardinalityUsage, "NONE,1"),
            Err(ConfigError::OutOfDomain { .. })
        ));
        assert!(matches!(
            RuleConfig::parse(RuleId::RelationshipCardinalityUsage, "MANY,1"),
            Err(ConfigError::UnrecognizedToken { .. })
        ));
        assert!(matches!(
            RuleConfig::parse(RuleId::RelationshipCardinalityUsage, "all,ONE,1"),
            Err(ConfigError::UnrecognizedToken { .. })
        ));
    }

    #[test]
    fn properties_text_is_read_and_written() {
        let config = GradingConfig::from_properties(
            "# grading for lab 3\n\nentity_quantity = 2,4,1\n! legacy comment\nHIERARCHY_USAGE: \
             disable\nNOT_A_RULE = 1\n",
        );
        assert_eq!(config.raw(RuleId::EntityQuantity), Some("2,4,1"));
        assert!(config.is_disabled(RuleId::HierarchyUsage));
        assert_eq!(config.unknown_keys(), vec!["NOT_A_RULE"]);
        assert!(config.to_properties().contains("ENTITY_QUANTITY = 2,4,1\n"));
    }
}
