mod dlfl;

pub use dlfl::Dlfl;

use crate::error::OperationError;
use crate::topology::{Corner, FaceId, TopologyGraph};

/// Mesh algebra operating on a topology graph.
///
/// Every operation keeps the graph's incidence sets consistent with its face
/// loops and invalidates the IDs of the faces it consumes. On error the graph
/// may be partially modified and must be discarded. Callers rely on these
/// contracts only; [`Dlfl`] is the bundled implementation.
pub trait TopologyAlgebra {
    /// Replaces `face` with triangles covering it.
    ///
    /// # Errors
    ///
    /// Fails if the face does not exist or has fewer than three vertices.
    fn triangulate_face(
        &self,
        graph: &mut TopologyGraph,
        face: FaceId,
    ) -> Result<Vec<FaceId>, OperationError>;

    /// Removes the edge between the vertices of `a` and `b`, where `a.face`
    /// and `b.face` are the faces on either side of it.
    ///
    /// # Errors
    ///
    /// Fails if a corner is not well-formed or the corners do not span an
    /// edge shared by their faces.
    fn delete_edge(
        &self,
        graph: &mut TopologyGraph,
        a: Corner,
        b: Corner,
    ) -> Result<Vec<FaceId>, OperationError>;

    /// Adds an edge from the vertex of `a` to the vertex of `b`, cutting
    /// through `a.face` and `b.face`.
    ///
    /// # Errors
    ///
    /// Fails if a corner is not well-formed or both corners name the same
    /// vertex.
    fn insert_edge(
        &self,
        graph: &mut TopologyGraph,
        a: Corner,
        b: Corner,
    ) -> Result<Vec<FaceId>, OperationError>;
}
