use slotmap::SecondaryMap;

use crate::brep::{FaceIndex, VertIndex};
use crate::error::ConversionError;
use crate::topology::{FaceId, VertexId};

/// Two-way mapping between boundary mesh indices and graph IDs.
///
/// Valid for a single conversion only: mesh indices change when the host
/// replaces its mesh and graph IDs die with the graph.
#[derive(Debug, Default, Clone)]
pub struct IdTranslation {
    verts: Vec<VertexId>,
    faces: Vec<FaceId>,
    vert_lookup: SecondaryMap<VertexId, VertIndex>,
    face_lookup: SecondaryMap<FaceId, FaceIndex>,
}

impl IdTranslation {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the graph vertex created for the next mesh vertex.
    pub(crate) fn push_vert(&mut self, id: VertexId) -> VertIndex {
        let index = VertIndex(self.verts.len());
        self.verts.push(id);
        self.vert_lookup.insert(id, index);
        index
    }

    /// Records the graph face created for the next mesh face.
    pub(crate) fn push_face(&mut self, id: FaceId) -> FaceIndex {
        let index = FaceIndex(self.faces.len());
        self.faces.push(id);
        self.face_lookup.insert(id, index);
        index
    }

    /// Graph ID of a mesh vertex.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::IndexOutOfRange`] if the index was not converted.
    pub fn vertex_id(&self, index: VertIndex) -> Result<VertexId, ConversionError> {
        self.verts
            .get(index.0)
            .copied()
            .ok_or(ConversionError::IndexOutOfRange {
                kind: "vertex",
                index: index.0,
                len: self.verts.len(),
            })
    }

    /// Graph ID of a mesh face.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::IndexOutOfRange`] if the index was not converted.
    pub fn face_id(&self, index: FaceIndex) -> Result<FaceId, ConversionError> {
        self.faces
            .get(index.0)
            .copied()
            .ok_or(ConversionError::IndexOutOfRange {
                kind: "face",
                index: index.0,
                len: self.faces.len(),
            })
    }

    /// Mesh index a graph vertex was created for.
    #[must_use]
    pub fn vert_index(&self, id: VertexId) -> Option<VertIndex> {
        self.vert_lookup.get(id).copied()
    }

    /// Mesh index a graph face was created for.
    #[must_use]
    pub fn face_index(&self, id: FaceId) -> Option<FaceIndex> {
        self.face_lookup.get(id).copied()
    }

    /// Number of translated vertices.
    #[must_use]
    pub fn vert_count(&self) -> usize {
        self.verts.len()
    }

    /// Number of translated faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}
