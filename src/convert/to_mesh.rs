use slotmap::SecondaryMap;
use tracing::debug;

use crate::brep::BRepMesh;
use crate::error::{ConversionError, Result};
use crate::topology::{FaceId, TopologyGraph, VertexId};

/// Converts a topology graph back into a boundary mesh.
///
/// Vertices are emitted in graph storage order, which fixes the new mesh's
/// vertex indices; faces keep their exact loops. Edges, loops and radial
/// cycles are rebuilt by the mesh itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct ToMesh;

impl ToMesh {
    /// Creates a new `ToMesh` conversion.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the conversion.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::DegenerateFace`] if a face has fewer than
    /// three vertices or visits a vertex twice.
    pub fn execute(&self, graph: &TopologyGraph) -> Result<BRepMesh> {
        let mut index_of: SecondaryMap<VertexId, usize> = SecondaryMap::new();
        let mut points = Vec::with_capacity(graph.vertex_count());
        for (id, vertex) in graph.vertices() {
            index_of.insert(id, points.len());
            points.push(vertex.point);
        }

        let mut polygons = Vec::with_capacity(graph.face_count());
        for (fid, face) in graph.faces() {
            check_face(fid, face.vertices())?;
            let polygon = face
                .vertices()
                .iter()
                .map(|&v| {
                    index_of.get(v).copied().ok_or_else(|| ConversionError::DegenerateFace {
                        face: format!("{fid:?}"),
                        reason: format!("references missing vertex {v:?}"),
                    })
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            polygons.push(polygon);
        }

        let mesh = BRepMesh::from_polygons(points, &polygons)?;
        debug!(
            verts = mesh.vert_count(),
            faces = mesh.face_count(),
            "converted topology graph to mesh"
        );
        Ok(mesh)
    }
}

fn check_face(face: FaceId, loop_verts: &[VertexId]) -> std::result::Result<(), ConversionError> {
    if loop_verts.len() < 3 {
        return Err(ConversionError::DegenerateFace {
            face: format!("{face:?}"),
            reason: format!("{} vertices, need at least 3", loop_verts.len()),
        });
    }
    for (k, v) in loop_verts.iter().enumerate() {
        if loop_verts[k + 1..].contains(v) {
            return Err(ConversionError::DegenerateFace {
                face: format!("{face:?}"),
                reason: format!("vertex {v:?} repeats on the loop"),
            });
        }
    }
    Ok(())
}
