#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::Serialize;

/// One participant of a composite key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// The edge linking the owner to the participant.
    pub edge:   String,
    /// The vertex at the other end of `edge`: an attribute or a relationship.
    pub vertex: String,
}

#[derive(Debug, Clone, Serialize)]
/// A multi-part identifier owned by one entity.
pub struct Composite {
    /// Diagram-unique id.
    pub(crate) id:      String,
    /// Id of the owning entity.
    pub(crate) owner:   String,
    /// Edge ids as declared by the exporter.
    pub(crate) edges:   Vec<String>,
    /// Participants resolved while building the diagram.
    pub(crate) members: Vec<Member>,
}

impl Composite {
    /// Creates a composite for `owner` over the given edges.
    pub fn new<I, S>(id: impl Into<String>, owner: impl Into<String>, edges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id:      id.into(),
            owner:   owner.into(),
            edges:   edges.into_iter().map(Into::into).collect(),
            members: Vec::new(),
        }
    }

    /// Returns the composite id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the id of the owning entity.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the resolved participants.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// True if `vertex_id` takes part in this composite.
    pub fn includes_vertex(&self, vertex_id: &str) -> bool {
        self.members.iter().any(|m| m.vertex == vertex_id)
    }
}
