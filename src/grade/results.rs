#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Scores.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Defect, DefectChecker};
use crate::{config::GradingConfig, diagram::Diagram};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
/// A struct representing a grade
pub struct Grade {
    /// The actual grade received
    pub grade:  f64,
    /// The maximum grade possible
    pub out_of: f64,
}

impl Grade {
    /// Creates a new grade -
    /// * `grade` - The actual grade received
    /// * `out_of` - The maximum grade possible
    pub fn new(grade: f64, out_of: f64) -> Self {
        Self { grade, out_of }
    }

    /// Totals the points awarded and at stake over `defects`.
    pub fn from_defects(defects: &[Defect]) -> Self {
        let (grade, out_of) = defects
            .iter()
            .fold((0f64, 0f64), |acc, d| (acc.0 + d.awarded(), acc.1 + d.points()));
        Self::new(grade, out_of)
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}/{:.2}", self.grade, self.out_of)
    }
}

/// Everything a grading run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeReport {
    /// One entry per evaluated rule, in catalogue order.
    defects: Vec<Defect>,
    /// The total.
    grade:   Grade,
}

impl GradeReport {
    /// Returns the evaluated rules.
    pub fn defects(&self) -> &[Defect] {
        &self.defects
    }

    /// Returns the total.
    pub fn grade(&self) -> Grade {
        self.grade
    }

    /// Points earned.
    pub fn score(&self) -> f64 {
        self.grade.grade
    }

    /// Only the rules the diagram violates.
    pub fn present_defects(&self) -> impl Iterator<Item = &Defect> {
        self.defects.iter().filter(|d| d.present())
    }
}

/// Grades diagrams against one configuration.
#[derive(Debug, Clone, Copy)]
pub struct Grader<'a> {
    /// Rule configuration used for every diagram.
    config: &'a GradingConfig,
}

impl<'a> Grader<'a> {
    /// Creates a grader using `config`.
    pub fn new(config: &'a GradingConfig) -> Self {
        Self { config }
    }

    /// Runs every enabled rule against `diagram` and totals the points.
    pub fn grade(&self, diagram: &Diagram) -> GradeReport {
        let defects = DefectChecker::new(diagram, self.config).find_defects();
        let grade = Grade::from_defects(&defects);
        info!(
            "Graded {} rules: {grade} ({} defects)",
            defects.len(),
            defects.iter().filter(|d| d.present()).count()
        );
        GradeReport { defects, grade }
    }
}
