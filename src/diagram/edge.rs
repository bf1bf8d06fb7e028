#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::parsers::parser;

/// Participation multiplicity written on one end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cardinality {
    /// No cardinality was drawn.
    #[default]
    None,
    /// `0..1`
    ZeroOrOne,
    /// `1`
    One,
    /// `0..N`
    ZeroOrMany,
    /// `1..N`
    OneOrMany,
    /// Something was drawn, but it is not a cardinality we know.
    Unrecognized,
}

impl Cardinality {
    /// The four cardinalities that count as "drawn".
    pub const REAL: [Cardinality; 4] = [
        Cardinality::ZeroOrOne,
        Cardinality::One,
        Cardinality::ZeroOrMany,
        Cardinality::OneOrMany,
    ];

    /// True only for the four real values, never for `None` or
    /// `Unrecognized`.
    pub fn has_cardinality(self) -> bool {
        !matches!(self, Cardinality::None | Cardinality::Unrecognized)
    }

    /// Reads a cardinality label as exported by a diagram tool.
    ///
    /// Blank text means nothing was drawn; text that does not parse is kept
    /// as `Unrecognized` so the rules can report it.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() {
            return Cardinality::None;
        }
        parser::cardinality(&label.to_ascii_uppercase()).unwrap_or(Cardinality::Unrecognized)
    }
}

impl Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cardinality::None => "NONE",
            Cardinality::ZeroOrOne => "ZERO_OR_ONE",
            Cardinality::One => "ONE",
            Cardinality::ZeroOrMany => "ZERO_OR_MANY",
            Cardinality::OneOrMany => "ONE_OR_MANY",
            Cardinality::Unrecognized => "UNRECOGNIZED",
        };
        write!(f, "{name}")
    }
}

/// Whether every instance of the parent belongs to some child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Coverage {
    /// Total coverage.
    Complete,
    /// Partial coverage.
    Partial,
    /// Missing or unreadable annotation.
    Unrecognized,
}

impl Coverage {
    /// Reads a coverage annotation, falling back to `Unrecognized`.
    pub fn from_label(label: &str) -> Self {
        parser::coverage(&label.trim().to_ascii_uppercase()).unwrap_or(Coverage::Unrecognized)
    }
}

impl Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Coverage::Complete => "COMPLETE",
            Coverage::Partial => "PARTIAL",
            Coverage::Unrecognized => "UNRECOGNIZED",
        };
        write!(f, "{name}")
    }
}

/// Whether an instance of the parent may belong to several children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Disjointness {
    /// Children are disjoint.
    Exclusive,
    /// Children may overlap.
    Overlapping,
    /// Missing or unreadable annotation.
    Unrecognized,
}

impl Disjointness {
    /// Reads a disjointness annotation, falling back to `Unrecognized`.
    pub fn from_label(label: &str) -> Self {
        parser::disjointness(&label.trim().to_ascii_uppercase())
            .unwrap_or(Disjointness::Unrecognized)
    }
}

impl Display for Disjointness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Disjointness::Exclusive => "EXCLUSIVE",
            Disjointness::Overlapping => "OVERLAPPING",
            Disjointness::Unrecognized => "UNRECOGNIZED",
        };
        write!(f, "{name}")
    }
}

/// The two kinds of edge a diagram can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeKind {
    /// A plain line between two vertices.
    Connection,
    /// An is-a edge from a child entity (`source`) to its parent (`target`).
    Generalization {
        /// Coverage annotation of the hierarchy.
        coverage:     Coverage,
        /// Disjointness annotation of the hierarchy.
        disjointness: Disjointness,
    },
}

#[derive(Debug, Clone, Serialize)]
/// An edge of the diagram.
///
/// Endpoints are vertex ids and may be unset when the exporter could not
/// resolve them; nothing in the crate assumes they are present.
pub struct Edge {
    /// Diagram-unique id.
    pub(crate) id:          String,
    /// Source vertex id, if resolved.
    pub(crate) source:      Option<String>,
    /// Target vertex id, if resolved.
    pub(crate) target:      Option<String>,
    /// Cardinality drawn on the edge.
    pub(crate) cardinality: Cardinality,
    /// Free text found on the edge.
    pub(crate) description: Vec<String>,
    /// Connection or generalization.
    pub(crate) kind:        EdgeKind,
}

impl Edge {
    /// Creates a plain connection without cardinality.
    pub fn connection(
        id: impl Into<String>,
        source: Option<impl Into<String>>,
        target: Option<impl Into<String>>,
    ) -> Self {
        Self {
            id:          id.into(),
            source:      source.map(Into::into),
            target:      target.map(Into::into),
            cardinality: Cardinality::None,
            description: Vec::new(),
            kind:        EdgeKind::Connection,
        }
    }

    /// Creates a generalization from `child` to `parent`.
    pub fn generalization(
        id: impl Into<String>,
        child: Option<impl Into<String>>,
        parent: Option<impl Into<String>>,
        coverage: Coverage,
        disjointness: Disjointness,
    ) -> Self {
        Self {
            id:          id.into(),
            source:      child.map(Into::into),
            target:      parent.map(Into::into),
            cardinality: Cardinality::None,
            description: Vec::new(),
            kind:        EdgeKind::Generalization {
                coverage,
                disjointness,
            },
        }
    }

    /// Sets the cardinality drawn on the edge.
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Appends a line of free text.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description.push(text.into());
        self
    }

    /// Returns the edge id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the source vertex id, if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Returns the target vertex id, if any.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Returns the cardinality drawn on the edge.
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Returns the free text found on the edge.
    pub fn description(&self) -> &[String] {
        &self.description
    }

    /// Returns the kind of the edge.
    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    /// Returns true for generalization edges.
    pub fn is_generalization(&self) -> bool {
        matches!(self.kind, EdgeKind::Generalization { .. })
    }

    /// Returns the vertex id at the other end from `vertex_id`, if the edge
    /// touches it and the other end is set.
    pub fn other_end(&self, vertex_id: &str) -> Option<&str> {
        if self.source.as_deref() == Some(vertex_id) {
            self.target.as_deref()
        } else if self.target.as_deref() == Some(vertex_id) {
            self.source.as_deref()
        } else {
            None
        }
    }

    /// Returns true if `vertex_id` is one of the endpoints.
    pub fn touches(&self, vertex_id: &str) -> bool {
        self.source.as_deref() == Some(vertex_id) || self.target.as_deref() == Some(vertex_id)
    }

    /// Swaps source and target.
    pub(crate) fn reverse(&mut self) {
        std::mem::swap(&mut self.source, &mut self.target);
    }
}
