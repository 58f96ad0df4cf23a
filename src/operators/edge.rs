use crate::algebra::TopologyAlgebra;
use crate::brep::{BRepMesh, FaceIndex, VertIndex};
use crate::error::{OperationError, Result, SelectionError};
use crate::host::{Host, HostMode};
use crate::topology::Corner;

use super::commit::commit;

/// The two corner-based edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeOperation {
    Delete,
    Insert,
}

impl EdgeOperation {
    /// Short name used in logs and messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Delete => "delete edge",
            Self::Insert => "insert edge",
        }
    }
}

/// Checks that `vert` and `face` exist in `mesh` and the vertex lies on the
/// face's boundary.
///
/// # Errors
///
/// Returns [`SelectionError::StaleElement`] if either index no longer
/// exists, or [`SelectionError::InvalidCorner`] if the face does not pass
/// through the vertex.
pub fn check_corner(
    mesh: &BRepMesh,
    vert: VertIndex,
    face: FaceIndex,
) -> std::result::Result<(), SelectionError> {
    if mesh.vert(vert).is_none() {
        return Err(SelectionError::StaleElement {
            kind: "vertex",
            index: vert.0,
        });
    }
    if mesh.face(face).is_none() {
        return Err(SelectionError::StaleElement {
            kind: "face",
            index: face.0,
        });
    }
    if !mesh.face_contains(face, vert) {
        return Err(SelectionError::InvalidCorner {
            vertex: vert.0,
            face: face.0,
        });
    }
    Ok(())
}

/// Deletes or inserts the edge between two corners of the host's mesh.
pub struct EdgeEdit {
    operation: EdgeOperation,
    first: (VertIndex, FaceIndex),
    second: (VertIndex, FaceIndex),
}

impl EdgeEdit {
    /// Creates a new `EdgeEdit` operation.
    #[must_use]
    pub fn new(
        operation: EdgeOperation,
        first: (VertIndex, FaceIndex),
        second: (VertIndex, FaceIndex),
    ) -> Self {
        Self {
            operation,
            first,
            second,
        }
    }

    /// Deletes the edge shared by the faces of both corners.
    #[must_use]
    pub fn delete(first: (VertIndex, FaceIndex), second: (VertIndex, FaceIndex)) -> Self {
        Self::new(EdgeOperation::Delete, first, second)
    }

    /// Inserts an edge between the vertices of both corners.
    #[must_use]
    pub fn insert(first: (VertIndex, FaceIndex), second: (VertIndex, FaceIndex)) -> Self {
        Self::new(EdgeOperation::Insert, first, second)
    }

    /// Which edge edit this is.
    #[must_use]
    pub fn operation(&self) -> EdgeOperation {
        self.operation
    }

    /// Executes the edit and replaces the host's mesh.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::WrongMode`] outside edit mode, a
    /// [`SelectionError`] if a corner does not hold in the current mesh, or
    /// any conversion or algebra error. The host mesh is untouched on error.
    pub fn execute<H, A>(&self, host: &mut H, algebra: &A) -> Result<()>
    where
        H: Host + ?Sized,
        A: TopologyAlgebra + ?Sized,
    {
        if host.mode() != HostMode::Edit {
            return Err(OperationError::WrongMode {
                action: self.operation.name(),
                mode: host.mode().name(),
            }
            .into());
        }
        check_corner(host.mesh(), self.first.0, self.first.1)?;
        check_corner(host.mesh(), self.second.0, self.second.1)?;

        commit(host, |graph, table| {
            let a = Corner::new(table.vertex_id(self.first.0)?, table.face_id(self.first.1)?);
            let b = Corner::new(table.vertex_id(self.second.0)?, table.face_id(self.second.1)?);
            match self.operation {
                EdgeOperation::Delete => algebra.delete_edge(graph, a, b)?,
                EdgeOperation::Insert => algebra.insert_edge(graph, a, b)?,
            };
            Ok(())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::algebra::Dlfl;
    use crate::error::TopmodError;
    use crate::host::SceneObject;
    use crate::math::Point3;
    use std::collections::BTreeSet;

    /// Square split along its 0-2 diagonal.
    fn split_square(mode: HostMode) -> SceneObject {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = BRepMesh::from_polygons(points, &[vec![0, 1, 2], vec![0, 2, 3]]).unwrap();
        SceneObject::new(mesh, mode)
    }

    fn face_sets(mesh: &BRepMesh) -> BTreeSet<BTreeSet<usize>> {
        mesh.faces()
            .map(|(fi, _)| mesh.face_verts(fi).iter().map(|v| v.0).collect())
            .collect()
    }

    #[test]
    fn delete_diagonal() {
        let mut host = split_square(HostMode::Edit);
        let edit = EdgeEdit::delete((VertIndex(0), FaceIndex(0)), (VertIndex(2), FaceIndex(1)));
        assert_eq!(edit.operation(), EdgeOperation::Delete);
        edit.execute(&mut host, &Dlfl::new()).unwrap();

        let mesh = host.mesh();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.edge_count(), 4);
        assert_eq!(face_sets(mesh), BTreeSet::from([BTreeSet::from([0, 1, 2, 3])]));
    }

    #[test]
    fn insert_other_diagonal() {
        let mut host = split_square(HostMode::Edit);
        EdgeEdit::delete((VertIndex(0), FaceIndex(0)), (VertIndex(2), FaceIndex(1)))
            .execute(&mut host, &Dlfl::new())
            .unwrap();
        EdgeEdit::insert((VertIndex(1), FaceIndex(0)), (VertIndex(3), FaceIndex(0)))
            .execute(&mut host, &Dlfl::new())
            .unwrap();

        let mesh = host.mesh();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.edge_count(), 5);
        assert_eq!(
            face_sets(mesh),
            BTreeSet::from([BTreeSet::from([1, 2, 3]), BTreeSet::from([3, 0, 1])])
        );
        assert_eq!(host.revision(), 2);
    }

    #[test]
    fn requires_edit_mode() {
        let mut host = split_square(HostMode::Object);
        let err = EdgeEdit::delete((VertIndex(0), FaceIndex(0)), (VertIndex(2), FaceIndex(1)))
            .execute(&mut host, &Dlfl::new())
            .unwrap_err();
        assert!(matches!(
            err,
            TopmodError::Operation(OperationError::WrongMode { .. })
        ));
    }

    #[test]
    fn invalid_corner_is_a_selection_error() {
        let mut host = split_square(HostMode::Edit);
        let err = EdgeEdit::delete((VertIndex(1), FaceIndex(1)), (VertIndex(2), FaceIndex(1)))
            .execute(&mut host, &Dlfl::new())
            .unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(host.revision(), 0);
    }

    #[test]
    fn joining_two_faces_cannot_be_shown() {
        // the joined face walks the new edge twice, which the host cannot hold
        let mut host = split_square(HostMode::Edit);
        let err = EdgeEdit::insert((VertIndex(1), FaceIndex(0)), (VertIndex(3), FaceIndex(1)))
            .execute(&mut host, &Dlfl::new())
            .unwrap_err();
        assert!(matches!(err, TopmodError::Conversion(_)));
        assert_eq!(host.revision(), 0);
        assert_eq!(host.mesh().face_count(), 2);
    }

    #[test]
    fn check_corner_reports_stale_indices() {
        let host = split_square(HostMode::Edit);
        assert!(matches!(
            check_corner(host.mesh(), VertIndex(9), FaceIndex(0)),
            Err(SelectionError::StaleElement { kind: "vertex", .. })
        ));
        assert!(matches!(
            check_corner(host.mesh(), VertIndex(0), FaceIndex(5)),
            Err(SelectionError::StaleElement { kind: "face", .. })
        ));
        assert!(check_corner(host.mesh(), VertIndex(3), FaceIndex(1)).is_ok());
    }
}
