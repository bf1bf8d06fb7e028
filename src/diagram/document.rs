#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{Cardinality, Composite, Coverage, Diagram, DiagramError, Disjointness, Edge, Vertex};

/// What a vertex record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexRecordKind {
    /// An entity.
    Entity,
    /// A relationship.
    Relationship,
    /// An attribute.
    Attribute,
}

/// A vertex as exported by a diagram tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexRecord {
    /// Vertex id.
    pub id:   String,
    /// Label, possibly empty.
    #[serde(default)]
    pub name: String,
    /// Kind of vertex.
    pub kind: VertexRecordKind,
    /// Whether an attribute is drawn as a key.
    #[serde(default)]
    pub key:  bool,
}

/// Annotations of an is-a edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralizationRecord {
    /// Coverage label, eg. `complete`.
    #[serde(default)]
    pub coverage:     Option<String>,
    /// Disjointness label, eg. `exclusive`.
    #[serde(default)]
    pub disjointness: Option<String>,
}

/// An edge as exported by a diagram tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Edge id.
    pub id:             String,
    /// Source vertex id, if the exporter resolved one.
    #[serde(default)]
    pub source:         Option<String>,
    /// Target vertex id, if the exporter resolved one.
    #[serde(default)]
    pub target:         Option<String>,
    /// Cardinality label, eg. `0..N` or `ONE`.
    #[serde(default)]
    pub cardinality:    Option<String>,
    /// Free text attached to the edge.
    #[serde(default)]
    pub description:    Vec<String>,
    /// Present for is-a edges, where `source` is the child.
    #[serde(default)]
    pub generalization: Option<GeneralizationRecord>,
}

/// A composite key as exported by a diagram tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeRecord {
    /// Composite id.
    pub id:    String,
    /// Owning entity id.
    pub owner: String,
    /// Edges linking the owner to the key parts.
    pub edges: Vec<String>,
}

/// A tool-neutral JSON export of an ER diagram.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagramDocument {
    /// All vertices.
    #[serde(default)]
    pub vertices:   Vec<VertexRecord>,
    /// All edges.
    #[serde(default)]
    pub edges:      Vec<EdgeRecord>,
    /// All composite keys.
    #[serde(default)]
    pub composites: Vec<CompositeRecord>,
}

impl DiagramDocument {
    /// Parses a JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse diagram document")
    }

    /// Reads and parses a JSON document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read diagram {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("In {}", path.display()))
    }

    /// Builds the normalized diagram described by this document.
    pub fn into_diagram(self) -> Result<Diagram, DiagramError> {
        let mut builder = Diagram::builder();

        for v in self.vertices {
            let vertex = match v.kind {
                VertexRecordKind::Entity => Vertex::entity(v.id, v.name),
                VertexRecordKind::Relationship => Vertex::relationship(v.id, v.name),
                VertexRecordKind::Attribute => Vertex::attribute(v.id, v.name, v.key),
            };
            builder.add_vertex(vertex)?;
        }

        for e in self.edges {
            let mut edge = match e.generalization {
                Some(g) => Edge::generalization(
                    e.id,
                    e.source,
                    e.target,
                    g.coverage
                        .as_deref()
                        .map_or(Coverage::Unrecognized, Coverage::from_label),
                    g.disjointness
                        .as_deref()
                        .map_or(Disjointness::Unrecognized, Disjointness::from_label),
                ),
                None => Edge::connection(e.id, e.source, e.target).with_cardinality(
                    e.cardinality
                        .as_deref()
                        .map_or(Cardinality::None, Cardinality::from_label),
                ),
            };
            for line in e.description {
                edge = edge.with_description(line);
            }
            builder.add_edge(edge)?;
        }

        for c in self.composites {
            builder.add_composite(Composite::new(c.id, c.owner, c.edges))?;
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARY: &str = r#"{
        "vertices": [
            { "id": "book", "name": "Book", "kind": "entity" },
            { "id": "isbn", "name": "isbn", "kind": "attribute", "key": true },
            { "id": "novel", "name": "Novel", "kind": "entity" }
        ],
        "edges": [
            { "id": "e1", "source": "book", "target": "isbn" },
            { "id": "e2", "source": "novel", "target": "book",
              "generalization": { "coverage": "partial", "disjointness": "overlap" } },
            { "id": "e3", "source": "book", "target": "nowhere", "cardinality": "lots" }
        ]
    }"#;

    #[test]
    fn documents_become_normalized_diagrams() {
        let diagram = DiagramDocument::from_json(LIBRARY)
            .expect("parse")
            .into_diagram()
            .expect("build");

        let e1 = diagram.edge("e1").expect("e1");
        assert_eq!(e1.source(), Some("isbn"));

        let e2 = diagram.edge("e2").expect("e2");
        assert_eq!(e2.kind(), super::super::EdgeKind::Generalization {
            coverage:     Coverage::Partial,
            disjointness: Disjointness::Overlapping,
        });

        let e3 = diagram.edge("e3").expect("e3");
        assert_eq!(e3.target(), None);
        assert_eq!(e3.cardinality(), Cardinality::Unrecognized);

        let novel = diagram.vertex("novel").expect("novel");
        assert!(diagram.has_identifier(novel));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(DiagramDocument::from_json("{ \"vertices\": 3 }").is_err());
    }
}
