use tracing::info;

use crate::convert::{IdTranslation, ToGraph, ToMesh};
use crate::error::Result;
use crate::host::Host;
use crate::topology::TopologyGraph;

/// Runs one edit against the host's mesh: convert to a graph, apply
/// `mutate`, convert back and hand the result to the host.
///
/// The host mesh is replaced only if every step succeeds. The graph and
/// translation table are dropped on return either way.
///
/// # Errors
///
/// Returns the first error from conversion, the mutation, the incidence
/// check, or the conversion back.
pub fn commit<H, F>(host: &mut H, mutate: F) -> Result<()>
where
    H: Host + ?Sized,
    F: FnOnce(&mut TopologyGraph, &IdTranslation) -> Result<()>,
{
    let (mut graph, table) = ToGraph::new().execute(host.mesh())?;
    mutate(&mut graph, &table)?;
    graph.verify_incidence()?;
    let mesh = ToMesh::new().execute(&graph)?;
    info!(
        verts = mesh.vert_count(),
        faces = mesh.face_count(),
        "committed topology edit"
    );
    host.replace_mesh(mesh);
    Ok(())
}
