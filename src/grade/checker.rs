#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Dispatches rules to their checkers.

use tracing::{debug, warn};

use super::{Defect, RuleId};
use crate::{config::GradingConfig, diagram::Diagram};

/// Evaluates the configured rules against one diagram.
#[derive(Debug, Clone, Copy)]
pub struct DefectChecker<'a> {
    /// The diagram under evaluation.
    diagram: &'a Diagram,
    /// Raw rule configuration.
    config:  &'a GradingConfig,
}

impl<'a> DefectChecker<'a> {
    /// Creates a checker for `diagram` using `config`.
    pub fn new(diagram: &'a Diagram, config: &'a GradingConfig) -> Self {
        Self { diagram, config }
    }

    /// Checks every enabled rule, in catalogue order.
    ///
    /// Disabled rules and rules whose configuration cannot be used are left
    /// out of the result; they neither earn nor cost points.
    pub fn find_defects(&self) -> Vec<Defect> {
        RuleId::ALL
            .into_iter()
            .filter_map(|rule| self.check_rule(rule))
            .collect()
    }

    /// Checks one rule, or returns `None` if it is disabled or misconfigured.
    pub fn check_rule(&self, rule: RuleId) -> Option<Defect> {
        let config = match self.config.resolve(rule) {
            Ok(Some(config)) => config,
            Ok(None) => {
                debug!("{rule} is disabled");
                return None;
            }
            Err(e) => {
                warn!("Skipping {rule}: {e}");
                return None;
            }
        };

        match rule.check(self.diagram, &config) {
            Ok(defect) => {
                debug!(
                    "{rule}: {} ({}/{})",
                    if defect.present() { "defect" } else { "ok" },
                    defect.awarded(),
                    defect.points()
                );
                Some(defect)
            }
            Err(e) => {
                warn!("Skipping {rule}: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{Cardinality, DiagramError};

    fn pair() -> Result<Diagram, DiagramError> {
        let mut b = Diagram::builder();
        b.entity("a", "A")?
            .attribute("k", "id", true)?
            .connect("ak", "k", "a", Cardinality::None)?;
        b.build()
    }

    #[test]
    fn every_rule_is_checked_by_default() -> Result<(), DiagramError> {
        let d = pair()?;
        let config = GradingConfig::new();
        let defects = DefectChecker::new(&d, &config).find_defects();
        let rules: Vec<RuleId> = defects.iter().map(Defect::rule).collect();
        assert_eq!(rules, RuleId::ALL.to_vec());
        Ok(())
    }

    #[test]
    fn disabled_rules_are_left_out() -> Result<(), DiagramError> {
        let d = pair()?;
        let config = GradingConfig::from_pairs([("ENTITY_QUANTITY", "disable")]);
        let checker = DefectChecker::new(&d, &config);
        assert!(checker.check_rule(RuleId::EntityQuantity).is_none());
        assert_eq!(checker.find_defects().len(), RuleId::ALL.len() - 1);
        Ok(())
    }

    #[test]
    fn bad_configuration_only_drops_its_rule() -> Result<(), DiagramError> {
        let d = pair()?;
        let config = GradingConfig::from_pairs([
            ("ENTITY_QUANTITY", "10,1,1"),
            ("RELATIONSHIP_CARDINALITY_USAGE", "SOMETIMES,1"),
        ]);
        let defects = DefectChecker::new(&d, &config).find_defects();
        assert_eq!(defects.len(), RuleId::ALL.len() - 2);
        assert!(
            defects
                .iter()
                .all(|d| d.rule() != RuleId::EntityQuantity
                    && d.rule() != RuleId::RelationshipCardinalityUsage)
        );
        Ok(())
    }
}
