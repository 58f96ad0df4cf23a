pub mod corner;
pub mod face;
pub mod vertex;

pub use corner::Corner;
pub use face::{FaceData, FaceId};
pub use vertex::{VertexData, VertexId};

use std::collections::BTreeSet;

use crate::error::TopologyError;
use crate::math::Point3;
use slotmap::{SecondaryMap, SlotMap};

/// Face-vertex incidence graph operated on by the topology algebra.
///
/// Vertices and faces are owned by arenas and reference each other via typed
/// IDs (generational indices). IDs are only meaningful for the lifetime of
/// one graph; a graph is built per edit and discarded afterwards.
///
/// The per-vertex incidence sets are a cache of the face loops. Faces added
/// with [`add_face`](Self::add_face) and removed with
/// [`remove_face`](Self::remove_face) keep the cache current; the raw
/// building calls used during conversion ([`create_face`](Self::create_face),
/// [`append_face_vertex`](Self::append_face_vertex)) do not, and the caller
/// installs incidence with [`set_incidence`](Self::set_incidence).
#[derive(Debug, Default)]
pub struct TopologyGraph {
    vertices: SlotMap<VertexId, VertexData>,
    faces: SlotMap<FaceId, FaceData>,
    incidence: SecondaryMap<VertexId, BTreeSet<FaceId>>,
}

impl TopologyGraph {
    /// Creates a new, empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex with no incident faces and returns its ID.
    pub fn create_vertex(&mut self, point: Point3) -> VertexId {
        let id = self.vertices.insert(VertexData::new(point));
        self.incidence.insert(id, BTreeSet::new());
        id
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("vertex {id:?}")))
    }

    /// Returns a mutable reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData, TopologyError> {
        self.vertices
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("vertex {id:?}")))
    }

    /// Iterates over all vertices in storage order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    /// Number of vertices in the graph.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the set of faces incident to `vertex`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not found in the graph.
    pub fn vertex_faces(&self, vertex: VertexId) -> Result<&BTreeSet<FaceId>, TopologyError> {
        self.incidence
            .get(vertex)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("vertex {vertex:?}")))
    }

    /// Replaces the incidence set of `vertex`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex or any of the faces is not in the graph.
    pub fn set_incidence(
        &mut self,
        vertex: VertexId,
        faces: BTreeSet<FaceId>,
    ) -> Result<(), TopologyError> {
        self.vertex(vertex)?;
        for &face in &faces {
            self.face(face)?;
        }
        self.incidence.insert(vertex, faces);
        Ok(())
    }

    // --- Face operations ---

    /// Inserts a face with an empty boundary loop and returns its ID.
    pub fn create_face(&mut self) -> FaceId {
        self.faces.insert(FaceData::default())
    }

    /// Appends `vertex` to the boundary loop of `face` without touching
    /// the incidence sets.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or vertex is not found in the graph.
    pub fn append_face_vertex(&mut self, face: FaceId, vertex: VertexId) -> Result<(), TopologyError> {
        self.vertex(vertex)?;
        self.faces
            .get_mut(face)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("face {face:?}")))?
            .push(vertex);
        Ok(())
    }

    /// Inserts a face with the given loop and records it on every vertex
    /// of the loop.
    ///
    /// # Errors
    ///
    /// Returns an error if any vertex is not found in the graph.
    pub fn add_face(&mut self, vertices: Vec<VertexId>) -> Result<FaceId, TopologyError> {
        for &v in &vertices {
            self.vertex(v)?;
        }
        let id = self.faces.insert(FaceData::new(vertices));
        for &v in self.faces[id].vertices() {
            if let Some(set) = self.incidence.get_mut(v) {
                set.insert(id);
            }
        }
        Ok(id)
    }

    /// Removes a face and drops it from the incidence sets of its vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not found in the graph.
    pub fn remove_face(&mut self, face: FaceId) -> Result<FaceData, TopologyError> {
        let data = self
            .faces
            .remove(face)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("face {face:?}")))?;
        for &v in data.vertices() {
            if let Some(set) = self.incidence.get_mut(v) {
                set.remove(&face);
            }
        }
        Ok(data)
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("face {id:?}")))
    }

    /// Iterates over all faces in storage order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &FaceData)> {
        self.faces.iter()
    }

    /// Snapshot of the current face IDs.
    #[must_use]
    pub fn face_ids(&self) -> Vec<FaceId> {
        self.faces.keys().collect()
    }

    /// Number of faces in the graph.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if both elements of `corner` exist and the vertex lies
    /// on the face's loop.
    #[must_use]
    pub fn is_corner(&self, corner: Corner) -> bool {
        self.vertices.contains_key(corner.vertex)
            && self
                .faces
                .get(corner.face)
                .is_some_and(|f| f.contains(corner.vertex))
    }

    /// Checks that every vertex's incidence set is exactly the set of faces
    /// whose loop contains it.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::IncidenceMismatch`] for the first vertex
    /// whose cached set disagrees with the face loops.
    pub fn verify_incidence(&self) -> Result<(), TopologyError> {
        let mut expected: SecondaryMap<VertexId, BTreeSet<FaceId>> = self
            .vertices
            .keys()
            .map(|v| (v, BTreeSet::new()))
            .collect();
        for (fid, face) in &self.faces {
            for &v in face.vertices() {
                let set = expected.get_mut(v).ok_or_else(|| {
                    TopologyError::IncidenceMismatch {
                        vertex: format!("{v:?}"),
                        reason: format!("referenced by face {fid:?} but not in the graph"),
                    }
                })?;
                set.insert(fid);
            }
        }
        for (v, want) in &expected {
            let have = self.incidence.get(v);
            if have != Some(want) {
                return Err(TopologyError::IncidenceMismatch {
                    vertex: format!("{v:?}"),
                    reason: format!("cached {have:?}, loops give {want:?}"),
                });
            }
        }
        Ok(())
    }
}
