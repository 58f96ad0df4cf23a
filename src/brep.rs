use std::collections::HashMap;
use std::fmt;

use crate::error::ConversionError;
use crate::math::Point3;

macro_rules! index_type {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", $kind, self.0)
            }
        }
    };
}

index_type!(
    /// Index of a vertex in a [`BRepMesh`].
    VertIndex,
    "vertex"
);
index_type!(
    /// Index of an edge in a [`BRepMesh`].
    EdgeIndex,
    "edge"
);
index_type!(
    /// Index of a face in a [`BRepMesh`].
    FaceIndex,
    "face"
);
index_type!(
    /// Index of a loop (face corner) in a [`BRepMesh`].
    LoopIndex,
    "loop"
);

/// A mesh vertex.
#[derive(Debug, Clone)]
pub struct BVert {
    /// Position.
    pub co: Point3,
    /// Selected in the viewer.
    pub select: bool,
}

/// An undirected mesh edge. `link_loop` is any loop running along it.
#[derive(Debug, Clone)]
pub struct BEdge {
    /// End vertices, in the order the first face walks them.
    pub verts: [VertIndex; 2],
    pub link_loop: Option<LoopIndex>,
}

/// A mesh face. Its loops are the `loop_len` loops reachable from
/// `loop_first` through `next`.
#[derive(Debug, Clone)]
pub struct BFace {
    pub loop_first: LoopIndex,
    pub loop_len: usize,
    /// Selected in the viewer.
    pub select: bool,
}

/// A face corner: the vertex it starts at, the edge to the next corner,
/// and its neighbours around the face and around the edge.
#[derive(Debug, Clone)]
pub struct BLoop {
    pub vert: VertIndex,
    pub edge: EdgeIndex,
    pub face: FaceIndex,
    pub next: LoopIndex,
    pub prev: LoopIndex,
    /// Next loop along the same edge; a boundary loop points at itself.
    pub radial_next: LoopIndex,
}

/// Boundary-representation mesh owned by the host.
///
/// Mirrors what a viewer keeps for an editable mesh: vertices, derived edges,
/// faces, and one loop per face corner. Loops around the same edge are linked
/// in a cycle through `radial_next`. Element indices are only stable until
/// the mesh is replaced.
#[derive(Debug, Clone, Default)]
pub struct BRepMesh {
    verts: Vec<BVert>,
    edges: Vec<BEdge>,
    faces: Vec<BFace>,
    loops: Vec<BLoop>,
}

impl BRepMesh {
    /// Builds a mesh from raw vertex positions and face index lists,
    /// deriving edges, loops and radial cycles.
    ///
    /// Loops around an edge are linked in the order their faces appear.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::IndexOutOfRange`] if a face references a
    /// missing vertex, and [`ConversionError::DegenerateFace`] if a face has
    /// fewer than three vertices or repeats one.
    pub fn from_polygons(points: Vec<Point3>, polygons: &[Vec<usize>]) -> Result<Self, ConversionError> {
        let verts: Vec<BVert> = points
            .into_iter()
            .map(|co| BVert { co, select: false })
            .collect();

        let mut edges: Vec<BEdge> = Vec::new();
        let mut edge_lookup: HashMap<(usize, usize), EdgeIndex> = HashMap::new();
        let mut radial: Vec<Vec<LoopIndex>> = Vec::new();
        let mut faces = Vec::with_capacity(polygons.len());
        let mut loops = Vec::with_capacity(polygons.iter().map(Vec::len).sum());

        for (fi, poly) in polygons.iter().enumerate() {
            check_polygon(fi, poly, verts.len())?;
            let first = loops.len();
            let n = poly.len();
            for (k, &v) in poly.iter().enumerate() {
                let w = poly[(k + 1) % n];
                let key = (v.min(w), v.max(w));
                let edge = *edge_lookup.entry(key).or_insert_with(|| {
                    edges.push(BEdge {
                        verts: [VertIndex(v), VertIndex(w)],
                        link_loop: None,
                    });
                    radial.push(Vec::new());
                    EdgeIndex(edges.len() - 1)
                });
                let li = LoopIndex(first + k);
                radial[edge.0].push(li);
                loops.push(BLoop {
                    vert: VertIndex(v),
                    edge,
                    face: FaceIndex(fi),
                    next: LoopIndex(first + (k + 1) % n),
                    prev: LoopIndex(first + (k + n - 1) % n),
                    radial_next: li,
                });
            }
            faces.push(BFace {
                loop_first: LoopIndex(first),
                loop_len: n,
                select: false,
            });
        }

        for (edge, cycle) in edges.iter_mut().zip(&radial) {
            edge.link_loop = cycle.first().copied();
            for (k, &li) in cycle.iter().enumerate() {
                loops[li.0].radial_next = cycle[(k + 1) % cycle.len()];
            }
        }

        Ok(Self {
            verts,
            edges,
            faces,
            loops,
        })
    }

    /// Assembles a mesh from host-provided element tables without deriving
    /// anything. Consistency is checked by the consumers that walk it.
    #[must_use]
    pub fn from_raw_parts(
        verts: Vec<BVert>,
        edges: Vec<BEdge>,
        faces: Vec<BFace>,
        loops: Vec<BLoop>,
    ) -> Self {
        Self {
            verts,
            edges,
            faces,
            loops,
        }
    }

    /// Splits the mesh back into its element tables, in the order
    /// [`from_raw_parts`](Self::from_raw_parts) takes them.
    #[must_use]
    pub fn into_raw_parts(self) -> (Vec<BVert>, Vec<BEdge>, Vec<BFace>, Vec<BLoop>) {
        (self.verts, self.edges, self.faces, self.loops)
    }

    /// Number of vertices.
    #[must_use]
    pub fn vert_count(&self) -> usize {
        self.verts.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of loops, one per face corner.
    #[must_use]
    pub fn loop_count(&self) -> usize {
        self.loops.len()
    }

    /// Returns the vertex at `index`, if any.
    #[must_use]
    pub fn vert(&self, index: VertIndex) -> Option<&BVert> {
        self.verts.get(index.0)
    }

    /// Returns the edge at `index`, if any.
    #[must_use]
    pub fn edge(&self, index: EdgeIndex) -> Option<&BEdge> {
        self.edges.get(index.0)
    }

    /// Returns the face at `index`, if any.
    #[must_use]
    pub fn face(&self, index: FaceIndex) -> Option<&BFace> {
        self.faces.get(index.0)
    }

    /// Returns the loop at `index`, if any.
    #[must_use]
    pub fn loop_at(&self, index: LoopIndex) -> Option<&BLoop> {
        self.loops.get(index.0)
    }

    /// Iterates over all vertices with their indices.
    pub fn verts(&self) -> impl Iterator<Item = (VertIndex, &BVert)> {
        self.verts.iter().enumerate().map(|(i, v)| (VertIndex(i), v))
    }

    /// Iterates over all faces with their indices.
    pub fn faces(&self) -> impl Iterator<Item = (FaceIndex, &BFace)> {
        self.faces.iter().enumerate().map(|(i, f)| (FaceIndex(i), f))
    }

    /// Collects the loops of `face` in boundary order by following `next`.
    ///
    /// Stops early if a `next` link leaves the loop table.
    #[must_use]
    pub fn face_loops(&self, face: FaceIndex) -> Vec<LoopIndex> {
        let Some(f) = self.face(face) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(f.loop_len);
        let mut current = f.loop_first;
        for _ in 0..f.loop_len {
            let Some(l) = self.loop_at(current) else {
                break;
            };
            out.push(current);
            current = l.next;
        }
        out
    }

    /// The vertices of `face` in boundary order.
    #[must_use]
    pub fn face_verts(&self, face: FaceIndex) -> Vec<VertIndex> {
        self.face_loops(face)
            .into_iter()
            .filter_map(|l| self.loop_at(l).map(|l| l.vert))
            .collect()
    }

    /// Returns `true` if `vert` lies on the boundary of `face`.
    #[must_use]
    pub fn face_contains(&self, face: FaceIndex, vert: VertIndex) -> bool {
        self.face_verts(face).contains(&vert)
    }

    /// Sets the selection flag of a vertex. Returns `false` if it does not exist.
    pub fn select_vert(&mut self, index: VertIndex, select: bool) -> bool {
        self.verts
            .get_mut(index.0)
            .map(|v| v.select = select)
            .is_some()
    }

    /// Sets the selection flag of a face. Returns `false` if it does not exist.
    pub fn select_face(&mut self, index: FaceIndex, select: bool) -> bool {
        self.faces
            .get_mut(index.0)
            .map(|f| f.select = select)
            .is_some()
    }

    /// Clears every selection flag.
    pub fn deselect_all(&mut self) {
        self.verts.iter_mut().for_each(|v| v.select = false);
        self.faces.iter_mut().for_each(|f| f.select = false);
    }

    /// Indices of selected vertices, ascending.
    #[must_use]
    pub fn selected_verts(&self) -> Vec<VertIndex> {
        self.verts()
            .filter(|(_, v)| v.select)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of selected faces, ascending.
    #[must_use]
    pub fn selected_faces(&self) -> Vec<FaceIndex> {
        self.faces()
            .filter(|(_, f)| f.select)
            .map(|(i, _)| i)
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn loop_mut(&mut self, index: LoopIndex) -> &mut BLoop {
        &mut self.loops[index.0]
    }
}

fn check_polygon(face: usize, poly: &[usize], vert_count: usize) -> Result<(), ConversionError> {
    if let Some(&bad) = poly.iter().find(|&&v| v >= vert_count) {
        return Err(ConversionError::IndexOutOfRange {
            kind: "vertex",
            index: bad,
            len: vert_count,
        });
    }
    if poly.len() < 3 {
        return Err(ConversionError::DegenerateFace {
            face: format!("face {face}"),
            reason: format!("{} vertices, need at least 3", poly.len()),
        });
    }
    for (k, v) in poly.iter().enumerate() {
        if poly[k + 1..].contains(v) {
            return Err(ConversionError::DegenerateFace {
                face: format!("face {face}"),
                reason: format!("vertex {v} repeats on the loop"),
            });
        }
    }
    Ok(())
}
