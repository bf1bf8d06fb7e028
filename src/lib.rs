//! # ergrade
//!
//! A configurable grader for Entity-Relationship diagram modeling exercises.
//!
//! A [`diagram::Diagram`] is built once (usually from a
//! [`diagram::DiagramDocument`]), then graded against a
//! [`config::GradingConfig`] by a [`grade::Grader`], which produces one
//! [`grade::Defect`] per enabled rule and a total score.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// For loading and interpreting grading configuration
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// The diagram graph and its structural predicates
pub mod diagram;
/// For all things related to grading
pub mod grade;
/// For all parsers used
pub mod parsers;
/// Value types shared by configuration and reports
pub mod types;

pub use config::{ConfigError, GradingConfig, RuleConfig};
pub use diagram::{Diagram, DiagramBuilder, DiagramDocument, DiagramError};
pub use grade::{Defect, DefectChecker, Grade, GradeReport, Grader, RuleId};
