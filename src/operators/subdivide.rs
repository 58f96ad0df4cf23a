use tracing::debug;

use crate::algebra::TopologyAlgebra;
use crate::error::{OperationError, Result};
use crate::host::{Host, HostMode};

use super::commit::commit;

/// Triangulates every face of the host's mesh.
#[derive(Debug, Default, Clone, Copy)]
pub struct Subdivide;

impl Subdivide {
    /// Creates a new `Subdivide` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the subdivision and replaces the host's mesh.
    ///
    /// The faces to triangulate are the ones present before the first
    /// mutation; triangles created along the way are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::WrongMode`] outside object mode, or any
    /// conversion or algebra error. The host mesh is untouched on error.
    pub fn execute<H, A>(&self, host: &mut H, algebra: &A) -> Result<()>
    where
        H: Host + ?Sized,
        A: TopologyAlgebra + ?Sized,
    {
        if host.mode() != HostMode::Object {
            return Err(OperationError::WrongMode {
                action: "subdivide",
                mode: host.mode().name(),
            }
            .into());
        }
        commit(host, |graph, _| {
            let faces = graph.face_ids();
            let mut created = 0;
            for face in faces {
                created += algebra.triangulate_face(graph, face)?.len();
            }
            debug!(created, "triangulated faces");
            Ok(())
        })
    }
}
