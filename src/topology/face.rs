use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the topology graph.
    pub struct FaceId;
}

/// Data associated with a graph face.
///
/// The boundary loop is cyclic and orientation-preserving: consecutive
/// entries (and the last/first pair) are the face's edges.
#[derive(Debug, Clone, Default)]
pub struct FaceData {
    vertices: Vec<VertexId>,
}

impl FaceData {
    /// Creates a face with the given boundary loop.
    #[must_use]
    pub fn new(vertices: Vec<VertexId>) -> Self {
        Self { vertices }
    }

    /// The ordered boundary loop.
    #[must_use]
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Number of corners on the loop.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the loop has no vertices yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns `true` if `vertex` lies on this face's loop.
    #[must_use]
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }

    pub(crate) fn push(&mut self, vertex: VertexId) {
        self.vertices.push(vertex);
    }
}
