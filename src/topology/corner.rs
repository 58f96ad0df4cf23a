use super::face::FaceId;
use super::vertex::VertexId;

/// A vertex paired with a face whose loop passes through it.
///
/// Well-formedness depends on the graph at hand; see
/// [`TopologyGraph::is_corner`](super::TopologyGraph::is_corner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Corner {
    /// The corner's vertex.
    pub vertex: VertexId,
    /// The face the corner belongs to.
    pub face: FaceId,
}

impl Corner {
    /// Creates a new corner.
    #[must_use]
    pub fn new(vertex: VertexId, face: FaceId) -> Self {
        Self { vertex, face }
    }
}
