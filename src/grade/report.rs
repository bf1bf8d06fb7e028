#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Renders a [`GradeReport`] as a table for the terminal.

use colored::Colorize;
use itertools::Itertools;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};

use super::{Defect, DefectDetails, GradeReport};

/// One row of the overview table.
#[derive(Tabled, Clone, Debug)]
pub struct DefectRow {
    /// * `rule`: the rule id
    #[tabled(rename = "Rule")]
    rule:    String,
    /// * `status`: whether the rule passed
    #[tabled(rename = "Status")]
    status:  String,
    /// * `grade`: awarded out of possible points
    #[tabled(rename = "Grade")]
    grade:   String,
    /// * `details`: what was found
    #[tabled(rename = "Details")]
    details: String,
}

impl From<&Defect> for DefectRow {
    fn from(defect: &Defect) -> Self {
        let status = if defect.present() {
            "defect".red().bold().to_string()
        } else {
            "ok".green().to_string()
        };
        Self {
            rule: defect.rule().key().to_string(),
            status,
            grade: format!("{:.2}/{:.2}", defect.awarded(), defect.points()),
            details: describe(defect.details()),
        }
    }
}

/// Short human readable summary of a defect's details.
pub fn describe(details: &DefectDetails) -> String {
    match details {
        DefectDetails::None => String::new(),
        DefectDetails::EmptyDiagram => "the diagram is empty".to_string(),
        DefectDetails::Vertices(ids) | DefectDetails::Edges(ids) => ids.join(", "),
        DefectDetails::DuplicateNames(dupes) => dupes
            .iter()
            .map(|d| match &d.owner {
                Some(owner) => format!("{owner}.{} ({})", d.name, d.vertices.join(", ")),
                None => format!("{} ({})", d.name, d.vertices.join(", ")),
            })
            .join("; "),
        DefectDetails::Quantity { actual, min, max } => {
            format!("found {actual}, expected {min}..={max}")
        }
        DefectDetails::Usage { missing, .. } if missing.is_empty() => String::new(),
        DefectDetails::Usage { missing, .. } => {
            format!("missing {}", missing.iter().join(", "))
        }
    }
}

/// Renders the whole report as a table with the total in the footer.
pub fn render(report: &GradeReport) -> String {
    let rows: Vec<DefectRow> = report.defects().iter().map(DefectRow::from).collect();
    Table::new(&rows)
        .with(Panel::header("Grading Overview"))
        .with(Panel::footer(format!("Total: {}", report.grade())))
        .with(Modify::new(Rows::new(1..)).with(Width::wrap(40).keep_words(true)))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(
            Modify::new(Rows::last())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        diagram::Cardinality,
        grade::{DuplicateName, RuleId},
        types::UsageValue,
    };

    #[test]
    fn details_are_summarized() {
        assert_eq!(
            describe(&DefectDetails::Quantity {
                actual: 0,
                min:    1,
                max:    3,
            }),
            "found 0, expected 1..=3"
        );
        assert_eq!(
            describe(&DefectDetails::DuplicateNames(vec![DuplicateName {
                owner:    Some("s".into()),
                name:     "name".into(),
                vertices: vec!["x".into(), "y".into()],
            }])),
            "s.name (x, y)"
        );
        assert_eq!(
            describe(&DefectDetails::Usage {
                expected: vec![UsageValue::from(Cardinality::One)],
                actual:   vec![],
                missing:  vec![UsageValue::from(Cardinality::One)],
            }),
            "missing ONE"
        );
    }

    #[test]
    fn rows_carry_the_rule_and_grade() {
        let defect = Defect::builder()
            .rule(RuleId::EntityQuantity)
            .present(false)
            .points(2.0)
            .build();
        let row = DefectRow::from(&defect);
        assert_eq!(row.rule, "ENTITY_QUANTITY");
        assert_eq!(row.grade, "2.00/2.00");
        assert!(row.details.is_empty());
    }
}
