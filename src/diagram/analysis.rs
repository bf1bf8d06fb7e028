#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use super::{Cardinality, Composite, Diagram, Edge, Key, Vertex};

impl Diagram {
    /// A connection whose source is an attribute.
    pub fn is_attribute_connection(&self, edge: &Edge) -> bool {
        !edge.is_generalization() && self.source_of(edge).is_some_and(Vertex::is_attribute)
    }

    /// A connection from a relationship to an entity.
    pub fn is_relationship_connection(&self, edge: &Edge) -> bool {
        !edge.is_generalization()
            && self.source_of(edge).is_some_and(Vertex::is_relationship)
            && self.target_of(edge).is_some_and(Vertex::is_entity)
    }

    /// An attribute connection carrying a drawn cardinality.
    pub fn is_multivalued(&self, edge: &Edge) -> bool {
        self.is_attribute_connection(edge) && edge.cardinality().has_cardinality()
    }

    /// Vertices not reachable from the first vertex, following any edge in
    /// either direction. Empty for an empty diagram.
    pub fn missing_from_main_component(&self) -> Vec<&Vertex> {
        let Some(first) = self.vertices().first() else {
            return Vec::new();
        };

        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack = vec![first];
        while let Some(vertex) = stack.pop() {
            if !visited.insert(vertex.id()) {
                continue;
            }
            for next in self.adjacent(vertex) {
                if !visited.contains(next.id()) {
                    stack.push(next);
                }
            }
        }

        self.vertices()
            .iter()
            .filter(|v| !visited.contains(v.id()))
            .collect()
    }

    /// Distinct parents of `entity`, reached through generalizations where it
    /// is the child.
    pub fn ancestors<'a>(&'a self, entity: &'a Vertex) -> Vec<&'a Vertex> {
        let mut seen = HashSet::new();
        self.incident_edges(entity)
            .filter(|e| e.is_generalization() && e.source() == Some(entity.id()))
            .filter_map(|e| self.target_of(e))
            .filter(|v| v.is_entity() && v.id() != entity.id() && seen.insert(v.id()))
            .collect()
    }

    /// Distinct entities sharing any edge with `vertex`.
    pub fn adjacent_entities<'a>(&'a self, vertex: &'a Vertex) -> Vec<&'a Vertex> {
        self.adjacent(vertex)
            .into_iter()
            .filter(|v| v.is_entity())
            .collect()
    }

    /// True if the entity has a key, or inherits one from an ancestor.
    pub fn has_identifier(&self, entity: &Vertex) -> bool {
        self.has_identifier_guarded(entity, &mut HashSet::new())
    }

    /// `has_identifier` with a guard against cyclic hierarchies.
    fn has_identifier_guarded<'a>(
        &'a self,
        entity: &'a Vertex,
        visiting: &mut HashSet<&'a str>,
    ) -> bool {
        if !entity.keys().is_empty() {
            return true;
        }
        if !visiting.insert(entity.id()) {
            return false;
        }
        self.ancestors(entity)
            .into_iter()
            .any(|ancestor| self.has_identifier_guarded(ancestor, visiting))
    }

    /// True if a relationship takes part in the composite.
    pub fn is_relationship_based(&self, composite: &Composite) -> bool {
        composite
            .members()
            .iter()
            .any(|m| self.vertex(&m.vertex).is_some_and(Vertex::is_relationship))
    }

    /// True if the composite can identify a weak entity: it needs an
    /// attribute part (no cardinality, `ONE` or `ONE_OR_MANY`) and an
    /// identifying relationship edge of cardinality `ONE`.
    pub fn is_weak_identifier(&self, composite: &Composite) -> bool {
        let edges = || composite.members().iter().filter_map(|m| self.edge(&m.edge));

        let has_attribute_part = edges().any(|e| {
            self.is_attribute_connection(e)
                && matches!(
                    e.cardinality(),
                    Cardinality::None | Cardinality::OneOrMany | Cardinality::One
                )
        });
        let has_identifying_edge = edges()
            .any(|e| self.is_relationship_connection(e) && e.cardinality() == Cardinality::One);

        has_attribute_part && has_identifying_edge
    }

    /// True if two or more entity edges of the relationship lead to the same
    /// entity.
    pub fn is_recursive(&self, relationship: &Vertex) -> bool {
        let ends: Vec<&str> = self
            .incident_edges(relationship)
            .filter(|e| !e.is_generalization())
            .filter_map(|e| e.other_end(relationship.id()))
            .filter(|id| self.vertex(id).is_some_and(Vertex::is_entity))
            .collect();
        ends.iter().unique().count() < ends.len()
    }

    /// An attribute hanging off an entity or relationship that has attributes
    /// of its own.
    pub fn is_structured(&self, attribute: &Vertex) -> bool {
        if !attribute.is_attribute() {
            return false;
        }
        let adjacent = self.adjacent(attribute);
        adjacent
            .iter()
            .any(|v| v.is_entity() || v.is_relationship())
            && adjacent.iter().any(|v| v.is_attribute())
    }

    /// Decides, once, which entities are weak.
    ///
    /// Every candidate starts out weak; any entity with a non-weak adjacent
    /// entity is then cleared until nothing changes. Adjacent means any edge,
    /// not only generalizations.
    pub(super) fn identify_weak_entities(&mut self) {
        let mut weak: HashSet<&str> = self
            .entities()
            .filter(|e| self.is_weak_candidate(e))
            .map(|e| e.id())
            .collect();

        loop {
            let cleared: Vec<&str> = weak
                .iter()
                .copied()
                .filter(|id| {
                    self.vertex(id).is_some_and(|e| {
                        self.adjacent_entities(e)
                            .iter()
                            .any(|n| !weak.contains(n.id()))
                    })
                })
                .collect();
            if cleared.is_empty() {
                break;
            }
            for id in cleared {
                weak.remove(id);
            }
        }

        let verdicts: HashMap<String, bool> = self
            .entities()
            .map(|e| (e.id().to_string(), weak.contains(e.id())))
            .collect();
        self.weak = verdicts;
    }

    /// True if the entity has keys and all of them are relationship-based
    /// composites.
    fn is_weak_candidate(&self, entity: &Vertex) -> bool {
        !entity.keys().is_empty()
            && entity.keys().iter().all(|key| match key {
                Key::Attribute(_) => false,
                Key::Composite(id) => self
                    .composite(id)
                    .is_some_and(|c| self.is_relationship_based(c)),
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::diagram::{
        Cardinality, Coverage, Diagram, DiagramBuilder, DiagramError, Disjointness,
    };

    /// `room` is identified by its number plus the building it belongs to.
    fn building_and_room() -> Result<Diagram, DiagramError> {
        let mut b = Diagram::builder();
        b.entity("building", "Building")?
            .attribute("bname", "name", true)?
            .connect("b-name", "bname", "building", Cardinality::None)?
            .entity("room", "Room")?
            .attribute("number", "number", false)?
            .connect("r-number", "number", "room", Cardinality::None)?
            .relationship("in", "Located in")?
            .connect("in-room", "room", "in", Cardinality::One)?
            .connect("in-building", "in", "building", Cardinality::ZeroOrMany)?
            .composite("room-key", "room", &["r-number", "in-room"])?;
        b.build()
    }

    #[test]
    fn relationship_based_composite_makes_an_entity_weak() {
        let d = building_and_room().expect("diagram");
        assert!(d.is_weak("room"));
        assert!(!d.is_weak("building"));

        let key = d.composite("room-key").expect("composite");
        assert!(d.is_relationship_based(key));
        assert!(d.is_weak_identifier(key));
    }

    #[test]
    fn identifying_edge_must_be_one() -> Result<(), DiagramError> {
        let mut b = Diagram::builder();
        b.entity("room", "Room")?
            .attribute("number", "number", false)?
            .connect("r-number", "number", "room", Cardinality::None)?
            .relationship("in", "In")?
            .connect("in-room", "in", "room", Cardinality::ZeroOrMany)?
            .composite("k", "room", &["r-number", "in-room"])?;
        let d = b.build()?;
        let key = d.composite("k").expect("composite");
        assert!(!d.is_weak_identifier(key));
        assert!(d.is_weak("room"));
        Ok(())
    }

    #[test]
    fn entity_without_keys_or_neighbours_is_not_weak() -> Result<(), DiagramError> {
        let mut b = Diagram::builder();
        b.entity("lonely", "Lonely")?;
        let d = b.build()?;
        assert!(!d.is_weak("lonely"));
        assert!(!d.has_identifier(d.vertex("lonely").expect("vertex")));
        Ok(())
    }

    #[test]
    fn identification_is_inherited_from_ancestors() -> Result<(), DiagramError> {
        let mut b = Diagram::builder();
        b.entity("person", "Person")?
            .attribute("ssn", "ssn", true)?
            .connect("p-ssn", "ssn", "person", Cardinality::None)?
            .entity("student", "Student")?
            .generalize("isa", "student", "person", Coverage::Partial, Disjointness::Exclusive)?;
        let d = b.build()?;
        let student = d.vertex("student").expect("student");
        assert_eq!(d.ancestors(student).len(), 1);
        assert!(d.has_identifier(student));
        assert!(!d.is_weak("student"));
        Ok(())
    }

    #[test]
    fn cyclic_hierarchies_terminate() -> Result<(), DiagramError> {
        let mut b = Diagram::builder();
        b.entity("a", "A")?
            .entity("b", "B")?
            .generalize("ab", "a", "b", Coverage::Complete, Disjointness::Exclusive)?
            .generalize("ba", "b", "a", Coverage::Complete, Disjointness::Exclusive)?;
        let d = b.build()?;
        let a = d.vertex("a").expect("a");
        assert!(!d.has_identifier(a));
        assert!(!d.is_weak("a"));
        assert!(!d.is_weak("b"));
        Ok(())
    }

    #[test]
    fn disconnected_vertices_are_reported() -> Result<(), DiagramError> {
        let mut b = Diagram::builder();
        b.entity("a", "A")?.entity("b", "B")?;
        let d = b.build()?;
        let missing: Vec<&str> = d.missing_from_main_component().into_iter().map(|v| v.id()).collect();
        assert_eq!(missing, vec!["b"]);

        let mut b = Diagram::builder();
        b.entity("a", "A")?
            .relationship("r", "R")?
            .entity("b", "B")?
            .connect("e1", "a", "r", Cardinality::One)?
            .connect("e2", "r", "b", Cardinality::One)?;
        assert!(b.build()?.missing_from_main_component().is_empty());
        Ok(())
    }

    #[test]
    fn recursive_relationships_reach_one_entity_twice() -> Result<(), DiagramError> {
        let mut b = Diagram::builder();
        b.entity("emp", "Employee")?
            .relationship("manages", "Manages")?
            .connect("m1", "manages", "emp", Cardinality::ZeroOrOne)?
            .connect("m2", "emp", "manages", Cardinality::ZeroOrMany)?;
        let d = b.build()?;
        assert!(d.is_recursive(d.vertex("manages").expect("manages")));
        Ok(())
    }

    #[test]
    fn structured_attributes_have_sub_attributes() -> Result<(), DiagramError> {
        let mut b = Diagram::builder();
        b.entity("p", "Person")?
            .attribute("addr", "address", false)?
            .attribute("street", "street", false)?
            .connect("pa", "addr", "p", Cardinality::None)?
            .connect("as", "street", "addr", Cardinality::None)?;
        let d = b.build()?;
        assert!(d.is_structured(d.vertex("addr").expect("addr")));
        assert!(!d.is_structured(d.vertex("street").expect("street")));
        Ok(())
    }

    /// Adds an entity identified by a number plus a relationship of `ONE`.
    fn add_dependent(b: &mut DiagramBuilder, id: &str) -> Result<(), DiagramError> {
        let number = format!("{id}-number");
        let owner = format!("{id}-owner");
        let by_number = format!("{id}-by-number");
        let by_owner = format!("{id}-by-owner");
        b.entity(id, id)?
            .attribute(&number, "number", false)?
            .connect(&by_number, &number, id, Cardinality::None)?
            .relationship(&owner, &format!("Owns {id}"))?
            .connect(&by_owner, &owner, id, Cardinality::One)?
            .composite(&format!("{id}-key"), id, &[by_number.as_str(), by_owner.as_str()])?;
        Ok(())
    }

    /// `k` is-a `p`, both keyed by relationship-based composites; with
    /// `strong_parent`, `p` is-a `g`, which has a key attribute.
    fn dependent_hierarchy(order: &[&str], strong_parent: bool) -> Result<Diagram, DiagramError> {
        let mut b = Diagram::builder();
        for id in order {
            add_dependent(&mut b, id)?;
        }
        b.generalize("k-isa-p", "k", "p", Coverage::Partial, Disjointness::Exclusive)?;
        if strong_parent {
            b.entity("g", "g")?
                .attribute("g-id", "id", true)?
                .connect("g-by-id", "g-id", "g", Cardinality::None)?
                .generalize("p-isa-g", "p", "g", Coverage::Partial, Disjointness::Exclusive)?;
        }
        b.build()
    }

    /// Every weak entity has only weak adjacent entities.
    fn assert_weak_neighbours_are_weak(d: &Diagram) {
        for entity in d.entities().filter(|e| d.is_weak(e.id())) {
            for neighbour in d.adjacent_entities(entity) {
                assert!(d.is_weak(neighbour.id()), "{} next to {}", entity.id(), neighbour.id());
            }
        }
    }

    #[test]
    fn weak_inference_ignores_insertion_order() -> Result<(), DiagramError> {
        for strong_parent in [true, false] {
            let parent_first = dependent_hierarchy(&["p", "k"], strong_parent)?;
            let child_first = dependent_hierarchy(&["k", "p"], strong_parent)?;
            for d in [&parent_first, &child_first] {
                assert_weak_neighbours_are_weak(d);
                assert_eq!(d.is_weak("p"), !strong_parent);
                assert_eq!(d.is_weak("k"), !strong_parent);
            }
            for id in ["k", "p"] {
                assert_eq!(parent_first.is_weak(id), child_first.is_weak(id), "{id}");
            }
        }
        Ok(())
    }
}
