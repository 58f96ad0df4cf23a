use std::collections::BTreeSet;

use tracing::debug;

use crate::brep::BRepMesh;
use crate::error::Result;
use crate::incidence::BuildIncidence;
use crate::topology::TopologyGraph;

use super::IdTranslation;

/// Converts a boundary mesh into a fresh topology graph.
#[derive(Debug, Default, Clone, Copy)]
pub struct ToGraph;

impl ToGraph {
    /// Creates a new `ToGraph` conversion.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the conversion, returning the graph and the table mapping
    /// mesh indices to graph IDs.
    ///
    /// Every mesh vertex and face gets exactly one graph counterpart, face
    /// loops keep their order, and incidence is installed from
    /// [`BuildIncidence`] and verified before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh topology is malformed.
    pub fn execute(&self, mesh: &BRepMesh) -> Result<(TopologyGraph, IdTranslation)> {
        let mut graph = TopologyGraph::new();
        let mut table = IdTranslation::new();

        for (_, vert) in mesh.verts() {
            table.push_vert(graph.create_vertex(vert.co));
        }
        for _ in mesh.faces() {
            table.push_face(graph.create_face());
        }

        for (fi, _) in mesh.faces() {
            let face = table.face_id(fi)?;
            for vi in mesh.face_verts(fi) {
                graph.append_face_vertex(face, table.vertex_id(vi)?)?;
            }
        }

        let incidence = BuildIncidence::new().execute(mesh)?;
        for (vi, faces) in incidence.iter() {
            let translated = faces
                .iter()
                .map(|&fi| table.face_id(fi))
                .collect::<std::result::Result<BTreeSet<_>, _>>()?;
            graph.set_incidence(table.vertex_id(vi)?, translated)?;
        }
        graph.verify_incidence()?;

        debug!(
            verts = graph.vertex_count(),
            faces = graph.face_count(),
            "converted mesh to topology graph"
        );
        Ok((graph, table))
    }
}
