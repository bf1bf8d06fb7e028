#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Rule evaluation and scoring.
//!
//! Every rule in [`RuleId::ALL`] is looked up in the [`GradingConfig`],
//! parsed into a [`crate::config::RuleConfig`] and handed to one of the
//! checker families:
//! - [`basic`]: the rule holds or it does not;
//! - [`quantity`]: a count must fall in an inclusive range;
//! - [`usage`]: every configured value must appear in the diagram.
//!
//! [`DefectChecker`] runs them in order and drops rules whose configuration
//! is invalid. [`Grader`] adds up the points.
//!
//! [`GradingConfig`]: crate::config::GradingConfig

/// Rules that either hold or do not
pub mod basic;
/// Runs every enabled rule against a diagram
pub mod checker;
/// The outcome of a single rule
pub mod defect;
/// Rules that count something
pub mod quantity;
/// Terminal rendering of grading results
pub mod report;
/// Scores and the grader
pub mod results;
/// The rule catalogue
pub mod rules;
/// Rules that require values to be used
pub mod usage;

pub use checker::DefectChecker;
pub use defect::{Defect, DefectDetails, DuplicateName};
pub use results::{Grade, GradeReport, Grader};
pub use rules::{ConfigShape, RuleId, UnknownRule};
