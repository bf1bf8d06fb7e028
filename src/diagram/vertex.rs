#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::Serialize;

/// Something that identifies an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Key {
    /// A key attribute, by vertex id.
    Attribute(String),
    /// A compound key, by composite id.
    Composite(String),
}

/// Variant-specific data of a vertex.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VertexKind {
    /// An entity with the keys assigned to it while building the diagram.
    Entity {
        /// Simple and compound keys.
        keys: Vec<Key>,
    },
    /// A relationship between entities.
    Relationship,
    /// An attribute of an entity, relationship, or another attribute.
    Attribute {
        /// Whether the attribute is drawn as a key.
        is_key: bool,
    },
}

#[derive(Debug, Clone, Serialize)]
/// A vertex of the diagram. Two vertices are equal when their ids are.
pub struct Vertex {
    /// Diagram-unique id.
    pub(crate) id:    String,
    /// Label of the vertex.
    pub(crate) name:  String,
    /// Entity, relationship, or attribute.
    pub(crate) kind:  VertexKind,
    /// Ids of the incident edges, in edge insertion order.
    pub(crate) edges: Vec<String>,
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl Vertex {
    /// Creates an entity without keys.
    pub fn entity(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, VertexKind::Entity { keys: Vec::new() })
    }

    /// Creates a relationship.
    pub fn relationship(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, VertexKind::Relationship)
    }

    /// Creates an attribute.
    pub fn attribute(id: impl Into<String>, name: impl Into<String>, is_key: bool) -> Self {
        Self::new(id, name, VertexKind::Attribute { is_key })
    }

    /// Shared constructor.
    fn new(id: impl Into<String>, name: impl Into<String>, kind: VertexKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            edges: Vec::new(),
        }
    }

    /// Returns the vertex id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the vertex label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the variant data.
    pub fn kind(&self) -> &VertexKind {
        &self.kind
    }

    /// Returns the ids of incident edges.
    pub fn edge_ids(&self) -> &[String] {
        &self.edges
    }

    /// True for entities.
    pub fn is_entity(&self) -> bool {
        matches!(self.kind, VertexKind::Entity { .. })
    }

    /// True for relationships.
    pub fn is_relationship(&self) -> bool {
        matches!(self.kind, VertexKind::Relationship)
    }

    /// True for attributes.
    pub fn is_attribute(&self) -> bool {
        matches!(self.kind, VertexKind::Attribute { .. })
    }

    /// Keys of an entity; empty for other vertices.
    pub fn keys(&self) -> &[Key] {
        match &self.kind {
            VertexKind::Entity { keys } => keys,
            _ => &[],
        }
    }

    /// Registers a key on an entity. Ignored for other vertices.
    pub(crate) fn push_key(&mut self, key: Key) {
        if let VertexKind::Entity { keys } = &mut self.kind {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
}
