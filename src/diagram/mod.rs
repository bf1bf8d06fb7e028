#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The typed graph of an ER diagram.
//!
//! A [`Diagram`] is assembled once through a [`DiagramBuilder`], which also
//! normalizes edge orientation, assigns keys to entities and infers which
//! entities are weak. After that it is read-only.

/// Structural predicates computed over a built diagram.
mod analysis;
/// Composite (multi-part) keys.
pub mod composite;
/// Serde interchange document exported by diagram tools.
pub mod document;
/// Edges and the enumerations written on them.
pub mod edge;
/// Vertices and keys.
pub mod vertex;

use std::collections::{HashMap, HashSet};

pub use composite::{Composite, Member};
pub use document::DiagramDocument;
pub use edge::{Cardinality, Coverage, Disjointness, Edge, EdgeKind};
pub use vertex::{Key, Vertex, VertexKind};

/// Errors raised while assembling a diagram.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    /// Two elements were given the same id.
    #[error("The id `{0}` is used by more than one diagram element.")]
    DuplicateId(String),
    /// A composite names an owner that is missing or is not an entity.
    #[error("Composite `{composite}` is owned by `{owner}`, which is not an entity of the diagram.")]
    InvalidCompositeOwner {
        /// The composite id.
        composite: String,
        /// The owner id it names.
        owner:     String,
    },
}

#[derive(Debug, Clone, Default)]
/// A normalized ER diagram.
pub struct Diagram {
    /// Vertices in insertion order.
    vertices:        Vec<Vertex>,
    /// Edges in insertion order.
    edges:           Vec<Edge>,
    /// Composites in insertion order.
    composites:      Vec<Composite>,
    /// Vertex id to position in `vertices`.
    vertex_index:    HashMap<String, usize>,
    /// Edge id to position in `edges`.
    edge_index:      HashMap<String, usize>,
    /// Composite id to position in `composites`.
    composite_index: HashMap<String, usize>,
    /// Weak-entity verdicts, one per entity id.
    weak:            HashMap<String, bool>,
}

impl Diagram {
    /// Starts a new diagram.
    pub fn builder() -> DiagramBuilder {
        DiagramBuilder::default()
    }

    /// Returns all vertices in insertion order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns all edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns all composites in insertion order.
    pub fn composites(&self) -> &[Composite] {
        &self.composites
    }

    /// True if the diagram has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Looks up a vertex by id.
    pub fn vertex(&self, id: &str) -> Option<&Vertex> {
        self.vertex_index.get(id).map(|&i| &self.vertices[i])
    }

    /// Looks up an edge by id.
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index.get(id).map(|&i| &self.edges[i])
    }

    /// Looks up a composite by id.
    pub fn composite(&self, id: &str) -> Option<&Composite> {
        self.composite_index.get(id).map(|&i| &self.composites[i])
    }

    /// Entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter().filter(|v| v.is_entity())
    }

    /// Relationships in insertion order.
    pub fn relationships(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter().filter(|v| v.is_relationship())
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter().filter(|v| v.is_attribute())
    }

    /// Generalization edges in insertion order.
    pub fn generalizations(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| e.is_generalization())
    }

    /// Edges incident to `vertex`.
    pub fn incident_edges<'a>(&'a self, vertex: &'a Vertex) -> impl Iterator<Item = &'a Edge> {
        vertex.edges.iter().filter_map(|id| self.edge(id))
    }

    /// The source vertex of `edge`, if it is set.
    pub fn source_of(&self, edge: &Edge) -> Option<&Vertex> {
        edge.source().and_then(|id| self.vertex(id))
    }

    /// The target vertex of `edge`, if it is set.
    pub fn target_of(&self, edge: &Edge) -> Option<&Vertex> {
        edge.target().and_then(|id| self.vertex(id))
    }

    /// Distinct vertices sharing an edge with `vertex`, in edge order.
    pub fn adjacent<'a>(&'a self, vertex: &'a Vertex) -> Vec<&'a Vertex> {
        let mut seen = HashSet::new();
        self.incident_edges(vertex)
            .filter_map(|e| e.other_end(vertex.id()))
            .filter(|id| *id != vertex.id() && seen.insert(*id))
            .filter_map(|id| self.vertex(id))
            .collect()
    }

    /// Whether the entity with `id` was inferred to be weak.
    pub fn is_weak(&self, id: &str) -> bool {
        self.weak.get(id).copied().unwrap_or(false)
    }

    /// Fills the id lookup tables.
    fn index(&mut self) {
        self.vertex_index = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id.clone(), i))
            .collect();
        self.edge_index = self
            .edges
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
        self.composite_index = self
            .composites
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
    }

    /// Drops endpoint ids that name no vertex.
    fn resolve_endpoints(&mut self) {
        let known = &self.vertex_index;
        for edge in &mut self.edges {
            for end in [&mut edge.source, &mut edge.target] {
                if let Some(id) = end.as_deref() {
                    if !known.contains_key(id) {
                        tracing::warn!("Edge `{}` points at unknown vertex `{}`", edge.id, id);
                        *end = None;
                    }
                }
            }
        }
    }

    /// Puts every connection in canonical orientation: attributes are the
    /// source, and between an entity and a relationship the relationship is.
    /// Generalizations are left alone.
    fn organize(&mut self) {
        for i in 0..self.edges.len() {
            let reverse = {
                let edge = &self.edges[i];
                if edge.is_generalization() {
                    continue;
                }
                match (self.source_of(edge), self.target_of(edge)) {
                    (source, Some(target)) if target.is_attribute() => {
                        !source.is_some_and(Vertex::is_attribute)
                    }
                    (Some(source), Some(target)) => source.is_entity() && target.is_relationship(),
                    _ => false,
                }
            };
            if reverse {
                self.edges[i].reverse();
            }
        }
    }

    /// Records on each vertex the edges that touch it.
    fn link_edges(&mut self) {
        for vertex in &mut self.vertices {
            vertex.edges.clear();
        }
        for edge in &self.edges {
            let ends = [edge.source.as_deref(), edge.target.as_deref()];
            for (n, end) in ends.iter().enumerate() {
                let Some(id) = end else { continue };
                if n == 1 && ends[0] == Some(*id) {
                    continue;
                }
                if let Some(&i) = self.vertex_index.get(*id) {
                    self.vertices[i].edges.push(edge.id.clone());
                }
            }
        }
    }

    /// Works out the participant behind every composite edge.
    fn resolve_composites(&mut self) -> Result<(), DiagramError> {
        let mut resolved = Vec::with_capacity(self.composites.len());
        for composite in &self.composites {
            if !self.vertex(&composite.owner).is_some_and(Vertex::is_entity) {
                return Err(DiagramError::InvalidCompositeOwner {
                    composite: composite.id.clone(),
                    owner:     composite.owner.clone(),
                });
            }

            let mut members = Vec::new();
            for edge_id in &composite.edges {
                let other = self
                    .edge(edge_id)
                    .and_then(|edge| edge.other_end(&composite.owner));
                match other {
                    Some(vertex) => members.push(Member {
                        edge:   edge_id.clone(),
                        vertex: vertex.to_string(),
                    }),
                    None => tracing::warn!(
                        "Composite `{}` lists edge `{}`, which does not reach its owner `{}`",
                        composite.id,
                        edge_id,
                        composite.owner
                    ),
                }
            }
            resolved.push(members);
        }

        for (composite, members) in self.composites.iter_mut().zip(resolved) {
            composite.members = members;
        }
        Ok(())
    }

    /// Gives entities their simple and compound keys.
    fn add_keys_to_entities(&mut self) {
        let mut assignments: Vec<(String, Key)> = Vec::new();

        for attribute in self.attributes() {
            if !matches!(attribute.kind, VertexKind::Attribute { is_key: true }) {
                continue;
            }
            for edge in self.incident_edges(attribute) {
                if edge.source() != Some(attribute.id()) {
                    continue;
                }
                let Some(owner) = self.target_of(edge).filter(|v| v.is_entity()) else {
                    continue;
                };
                let in_composite = self
                    .composites
                    .iter()
                    .any(|c| c.owner == owner.id && c.includes_vertex(&attribute.id));
                if !in_composite {
                    assignments.push((owner.id.clone(), Key::Attribute(attribute.id.clone())));
                }
            }
        }

        for composite in &self.composites {
            assignments.push((composite.owner.clone(), Key::Composite(composite.id.clone())));
        }

        for (owner, key) in assignments {
            if let Some(&i) = self.vertex_index.get(&owner) {
                self.vertices[i].push_key(key);
            }
        }
    }
}

#[derive(Debug, Default)]
/// Collects diagram elements and produces a normalized [`Diagram`].
pub struct DiagramBuilder {
    /// Vertices added so far.
    vertices:   Vec<Vertex>,
    /// Edges added so far.
    edges:      Vec<Edge>,
    /// Composites added so far.
    composites: Vec<Composite>,
    /// Every id handed out so far.
    ids:        HashSet<String>,
}

impl DiagramBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `id`, failing if it was used before.
    fn claim(&mut self, id: &str) -> Result<(), DiagramError> {
        if self.ids.insert(id.to_string()) {
            Ok(())
        } else {
            Err(DiagramError::DuplicateId(id.to_string()))
        }
    }

    /// Adds a vertex.
    pub fn add_vertex(&mut self, vertex: Vertex) -> Result<&mut Self, DiagramError> {
        self.claim(&vertex.id)?;
        self.vertices.push(vertex);
        Ok(self)
    }

    /// Adds an edge.
    pub fn add_edge(&mut self, edge: Edge) -> Result<&mut Self, DiagramError> {
        self.claim(&edge.id)?;
        self.edges.push(edge);
        Ok(self)
    }

    /// Adds a composite key.
    pub fn add_composite(&mut self, composite: Composite) -> Result<&mut Self, DiagramError> {
        self.claim(&composite.id)?;
        self.composites.push(composite);
        Ok(self)
    }

    /// Adds an entity.
    pub fn entity(&mut self, id: &str, name: &str) -> Result<&mut Self, DiagramError> {
        self.add_vertex(Vertex::entity(id, name))
    }

    /// Adds a relationship.
    pub fn relationship(&mut self, id: &str, name: &str) -> Result<&mut Self, DiagramError> {
        self.add_vertex(Vertex::relationship(id, name))
    }

    /// Adds an attribute.
    pub fn attribute(
        &mut self,
        id: &str,
        name: &str,
        is_key: bool,
    ) -> Result<&mut Self, DiagramError> {
        self.add_vertex(Vertex::attribute(id, name, is_key))
    }

    /// Adds a connection between two vertices, in either orientation.
    pub fn connect(
        &mut self,
        id: &str,
        a: &str,
        b: &str,
        cardinality: Cardinality,
    ) -> Result<&mut Self, DiagramError> {
        self.add_edge(Edge::connection(id, Some(a), Some(b)).with_cardinality(cardinality))
    }

    /// Adds a generalization from `child` to `parent`.
    pub fn generalize(
        &mut self,
        id: &str,
        child: &str,
        parent: &str,
        coverage: Coverage,
        disjointness: Disjointness,
    ) -> Result<&mut Self, DiagramError> {
        self.add_edge(Edge::generalization(
            id,
            Some(child),
            Some(parent),
            coverage,
            disjointness,
        ))
    }

    /// Adds a composite key of `owner` over `edges`.
    pub fn composite(
        &mut self,
        id: &str,
        owner: &str,
        edges: &[&str],
    ) -> Result<&mut Self, DiagramError> {
        self.add_composite(Composite::new(id, owner, edges.iter().copied()))
    }

    /// Normalizes and enriches the collected elements.
    pub fn build(self) -> Result<Diagram, DiagramError> {
        let mut diagram = Diagram {
            vertices: self.vertices,
            edges: self.edges,
            composites: self.composites,
            ..Diagram::default()
        };
        diagram.index();
        diagram.resolve_endpoints();
        diagram.organize();
        diagram.link_edges();
        diagram.resolve_composites()?;
        diagram.add_keys_to_entities();
        diagram.identify_weak_entities();
        Ok(diagram)
    }
}
