use std::collections::BTreeSet;

use tracing::debug;

use crate::brep::{BRepMesh, FaceIndex, LoopIndex, VertIndex};
use crate::error::TopologyError;

/// The faces incident to each vertex, indexed by vertex.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Incidence {
    sets: Vec<BTreeSet<FaceIndex>>,
}

impl Incidence {
    /// Faces incident to `vert`, or `None` if the vertex is out of range.
    #[must_use]
    pub fn faces_of(&self, vert: VertIndex) -> Option<&BTreeSet<FaceIndex>> {
        self.sets.get(vert.0)
    }

    /// Iterates over `(vertex, incident faces)` in vertex order.
    pub fn iter(&self) -> impl Iterator<Item = (VertIndex, &BTreeSet<FaceIndex>)> {
        self.sets.iter().enumerate().map(|(i, s)| (VertIndex(i), s))
    }

    /// Number of vertices covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` if the mesh had no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Builds [`Incidence`] for every vertex of a boundary mesh.
///
/// Each face is recorded on the vertex of each of its loops. From every loop
/// the radial cycle around the loop's edge is also walked, and each face met
/// on the way is recorded on the loop's vertex as well, since every one of
/// those faces runs along an edge ending at that vertex.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildIncidence;

impl BuildIncidence {
    /// Creates a new `BuildIncidence` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the query against `mesh`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MalformedTopology`] if a face loop does not
    /// close, a link points outside the mesh, a radial neighbour lies on a
    /// different edge, or a radial walk fails to return to its start within
    /// as many steps as the mesh has loops.
    pub fn execute(&self, mesh: &BRepMesh) -> Result<Incidence, TopologyError> {
        let mut sets = vec![BTreeSet::new(); mesh.vert_count()];

        for (fi, face) in mesh.faces() {
            let loops = mesh.face_loops(fi);
            let closes = loops
                .last()
                .and_then(|&l| mesh.loop_at(l))
                .is_some_and(|l| l.next == face.loop_first);
            if loops.len() != face.loop_len || !closes {
                return Err(malformed(face.loop_first, format!("boundary of {fi} does not close")));
            }

            for li in loops {
                let (vert, ends) = edge_ends(mesh, li)?;
                sets.get_mut(vert.0)
                    .ok_or_else(|| malformed(li, format!("{vert} is out of range")))?
                    .insert(fi);

                let radial_faces = walk_radial(mesh, li, ends)?;
                sets[vert.0].extend(radial_faces);
            }
        }

        debug!(
            verts = mesh.vert_count(),
            faces = mesh.face_count(),
            "built vertex-face incidence"
        );
        Ok(Incidence { sets })
    }
}

/// Returns the loop's vertex and its edge endpoints as an unordered pair.
fn edge_ends(mesh: &BRepMesh, li: LoopIndex) -> Result<(VertIndex, [VertIndex; 2]), TopologyError> {
    let l = mesh
        .loop_at(li)
        .ok_or_else(|| malformed(li, "loop does not exist".into()))?;
    let next = mesh
        .loop_at(l.next)
        .ok_or_else(|| malformed(li, format!("next link to missing {}", l.next)))?;
    let mut ends = [l.vert, next.vert];
    ends.sort_unstable();
    Ok((l.vert, ends))
}

/// Collects the faces around the edge of `start`, excluding its own.
fn walk_radial(
    mesh: &BRepMesh,
    start: LoopIndex,
    ends: [VertIndex; 2],
) -> Result<Vec<FaceIndex>, TopologyError> {
    let bound = mesh.loop_count();
    let mut faces = Vec::new();
    let mut current = mesh
        .loop_at(start)
        .map(|l| l.radial_next)
        .ok_or_else(|| malformed(start, "loop does not exist".into()))?;
    let mut steps = 0;

    while current != start {
        steps += 1;
        if steps > bound {
            return Err(malformed(start, "radial walk does not return to its start".into()));
        }
        let (_, other) = edge_ends(mesh, current)?;
        if other != ends {
            return Err(malformed(
                start,
                format!("radial neighbour {current} lies on a different edge"),
            ));
        }
        let Some(l) = mesh.loop_at(current) else {
            return Err(malformed(start, format!("radial link to missing {current}")));
        };
        if mesh.face(l.face).is_none() {
            return Err(malformed(current, format!("{} does not exist", l.face)));
        }
        faces.push(l.face);
        current = l.radial_next;
    }
    Ok(faces)
}

fn malformed(at: LoopIndex, reason: String) -> TopologyError {
    TopologyError::MalformedTopology {
        loop_index: at.0,
        reason,
    }
}
