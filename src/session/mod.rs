mod keymap;
mod slots;

pub use keymap::{Command, InputEvent, Key, KeyBinding, Keymap, SelectionPolicy, SessionConfig};
pub use slots::{
    transition, ElementKind, SessionState, Slot, Slots, Step, BOTH_CORNERS, FIRST_CORNER,
    SECOND_CORNER,
};

use tracing::{debug, info, warn};

use crate::algebra::TopologyAlgebra;
use crate::brep::BRepMesh;
use crate::error::SelectionError;
use crate::host::{Host, ReportLevel};
use crate::operators::{check_corner, EdgeEdit, EdgeOperation};

/// How the host should treat an event after the session has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Not for the session; the host handles it as usual.
    PassThrough,
    /// Used by the session; the session stays open.
    Consumed,
    /// The edit was committed; the session is over.
    Finished,
    /// The session was cancelled or aborted; the mesh is unchanged.
    Cancelled,
}

/// Resumable state of one interactive edge edit.
///
/// Collects `v1`, `f1`, `v2`, `f2` over any number of input events. Events it
/// does not recognise pass through to the host, so viewport navigation keeps
/// working. Once all four slots are filled the corners are checked against
/// the mesh as it is at that moment and the edit is committed.
#[derive(Debug, Clone)]
pub struct SelectionSession {
    operation: EdgeOperation,
    config: SessionConfig,
    state: SessionState,
    slots: Slots,
}

impl SelectionSession {
    /// Starts an empty session for `operation`.
    #[must_use]
    pub fn new(operation: EdgeOperation, config: SessionConfig) -> Self {
        Self {
            operation,
            config,
            state: SessionState::Empty,
            slots: Slots::default(),
        }
    }

    /// The edit this session will apply.
    #[must_use]
    pub fn operation(&self) -> EdgeOperation {
        self.operation
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Selections collected so far.
    #[must_use]
    pub fn slots(&self) -> &Slots {
        &self.slots
    }

    /// Returns `true` once the session was committed or cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Feeds one input event to the session.
    ///
    /// Selection events read the element currently selected in the host's
    /// mesh. When the last slot is filled the corners are validated and, if
    /// they hold, the edit is committed through `algebra`.
    pub fn handle_event<H, A>(&mut self, event: &InputEvent, host: &mut H, algebra: &A) -> Response
    where
        H: Host + ?Sized,
        A: TopologyAlgebra + ?Sized,
    {
        if self.state.is_terminal() {
            return Response::PassThrough;
        }
        match self.config.keymap.command(event) {
            None => Response::PassThrough,
            Some(Command::Cancel) => {
                self.apply(Step::Cancel);
                info!(operation = self.operation.name(), "selection cancelled");
                Response::Cancelled
            }
            Some(Command::Select(slot)) => match self.pick(host.mesh(), slot.kind()) {
                Ok(index) => {
                    self.apply(Step::Select { slot, index });
                    debug!(slot = slot.label(), index, "slot filled");
                    if self.state == SessionState::Ready {
                        self.resolve(host, algebra)
                    } else {
                        Response::Consumed
                    }
                }
                Err(err) => {
                    host.report(ReportLevel::Warning, &format!("{}: {err}", slot.label()));
                    Response::Consumed
                }
            },
        }
    }

    fn apply(&mut self, step: Step) {
        let (state, slots) = transition(self.state, self.slots, step);
        self.state = state;
        self.slots = slots;
    }

    /// The single element of `kind` the host has selected, per policy.
    fn pick(&self, mesh: &BRepMesh, kind: ElementKind) -> Result<usize, SelectionError> {
        let selected: Vec<usize> = match kind {
            ElementKind::Vertex => mesh.selected_verts().into_iter().map(|v| v.0).collect(),
            ElementKind::Face => mesh.selected_faces().into_iter().map(|f| f.0).collect(),
        };
        match (selected.as_slice(), self.config.policy) {
            ([], _) => Err(SelectionError::NothingSelected { kind: kind.name() }),
            ([only], _) => Ok(*only),
            ([first, ..], SelectionPolicy::FirstSelected) => Ok(*first),
            (many, SelectionPolicy::RequireSingle) => Err(SelectionError::AmbiguousSelection {
                kind: kind.name(),
                count: many.len(),
            }),
        }
    }

    /// Validates the filled corners against the current mesh and commits.
    fn resolve<H, A>(&mut self, host: &mut H, algebra: &A) -> Response
    where
        H: Host + ?Sized,
        A: TopologyAlgebra + ?Sized,
    {
        let Some([first, second]) = self.slots.corners() else {
            return Response::Consumed;
        };

        let first_check = check_corner(host.mesh(), first.0, first.1);
        let second_check = check_corner(host.mesh(), second.0, second.1);
        let rejected = match (&first_check, &second_check) {
            (Ok(()), Ok(())) => None,
            (Err(_), Ok(())) => Some(FIRST_CORNER),
            (Ok(()), Err(_)) => Some(SECOND_CORNER),
            (Err(_), Err(_)) => Some(BOTH_CORNERS),
        };
        if let Some(cleared) = rejected {
            for err in [first_check, second_check].into_iter().filter_map(Result::err) {
                warn!(%err, "corner rejected");
                host.report(ReportLevel::Warning, &err.to_string());
            }
            self.apply(Step::Reject(cleared));
            return Response::Consumed;
        }

        match EdgeEdit::new(self.operation, first, second).execute(host, algebra) {
            Ok(()) => {
                self.apply(Step::Commit);
                info!(operation = self.operation.name(), "edit committed");
                Response::Finished
            }
            Err(err) => {
                self.apply(Step::Abort);
                warn!(%err, operation = self.operation.name(), "edit aborted");
                host.report(ReportLevel::Error, &err.to_string());
                Response::Cancelled
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::algebra::Dlfl;
    use crate::brep::{FaceIndex, VertIndex};
    use crate::host::{HostMode, SceneObject};
    use crate::math::Point3;

    /// Square split along its 0-2 diagonal.
    fn host() -> SceneObject {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = BRepMesh::from_polygons(points, &[vec![0, 1, 2], vec![0, 2, 3]]).unwrap();
        SceneObject::new(mesh, HostMode::Edit)
    }

    fn select(
        session: &mut SelectionSession,
        host: &mut SceneObject,
        slot: Slot,
        index: usize,
    ) -> Response {
        let mesh = host.mesh_mut();
        mesh.deselect_all();
        match slot.kind() {
            ElementKind::Vertex => mesh.select_vert(VertIndex(index), true),
            ElementKind::Face => mesh.select_face(FaceIndex(index), true),
        };
        let key = match slot {
            Slot::Vertex1 => 1,
            Slot::Face1 => 2,
            Slot::Vertex2 => 3,
            Slot::Face2 => 4,
        };
        session.handle_event(&InputEvent::alt(Key::Digit(key)), host, &Dlfl::new())
    }

    #[test]
    fn navigation_passes_through() {
        let mut host = host();
        let mut session = SelectionSession::new(EdgeOperation::Delete, SessionConfig::default());
        for key in [Key::MouseMove, Key::LeftMouse, Key::WheelDown, Key::Digit(1)] {
            let r = session.handle_event(&InputEvent::plain(key), &mut host, &Dlfl::new());
            assert_eq!(r, Response::PassThrough);
        }
        assert_eq!(session.state(), SessionState::Empty);
    }

    #[test]
    fn delete_edge_commits_on_fourth_selection() {
        let mut host = host();
        let mut session = SelectionSession::new(EdgeOperation::Delete, SessionConfig::default());
        assert_eq!(select(&mut session, &mut host, Slot::Vertex1, 0), Response::Consumed);
        assert_eq!(session.state(), SessionState::Collecting);
        assert_eq!(select(&mut session, &mut host, Slot::Face2, 1), Response::Consumed);
        assert_eq!(select(&mut session, &mut host, Slot::Vertex2, 2), Response::Consumed);
        assert_eq!(select(&mut session, &mut host, Slot::Face1, 0), Response::Finished);

        assert_eq!(session.state(), SessionState::Committed);
        assert_eq!(host.mesh().face_count(), 1);
        assert!(host.mesh().selected_verts().is_empty());
    }

    #[test]
    fn invalid_corner_clears_only_that_corner() {
        let mut host = host();
        let mut session = SelectionSession::new(EdgeOperation::Delete, SessionConfig::default());
        select(&mut session, &mut host, Slot::Vertex1, 0);
        select(&mut session, &mut host, Slot::Face1, 0);
        select(&mut session, &mut host, Slot::Vertex2, 1);
        let r = select(&mut session, &mut host, Slot::Face2, 1);

        assert_eq!(r, Response::Consumed);
        assert_eq!(session.state(), SessionState::Collecting);
        assert!(session.slots().is_filled(Slot::Vertex1));
        assert!(session.slots().is_filled(Slot::Face1));
        assert!(!session.slots().is_filled(Slot::Vertex2));
        assert!(!session.slots().is_filled(Slot::Face2));
        assert_eq!(host.revision(), 0);
        assert_eq!(host.reports().len(), 1);

        select(&mut session, &mut host, Slot::Vertex2, 2);
        let r = select(&mut session, &mut host, Slot::Face2, 1);
        assert_eq!(r, Response::Finished);
    }

    #[test]
    fn cancel_discards_selection() {
        let mut host = host();
        let mut session = SelectionSession::new(EdgeOperation::Insert, SessionConfig::default());
        select(&mut session, &mut host, Slot::Vertex1, 1);
        let r = session.handle_event(&InputEvent::plain(Key::Esc), &mut host, &Dlfl::new());
        assert_eq!(r, Response::Cancelled);
        assert_eq!(session.state(), SessionState::Cancelled);
        assert_eq!(*session.slots(), Slots::default());

        let r = select(&mut session, &mut host, Slot::Face1, 0);
        assert_eq!(r, Response::PassThrough);
    }

    #[test]
    fn ambiguous_selection_is_refused() {
        let mut host = host();
        let mut session = SelectionSession::new(EdgeOperation::Delete, SessionConfig::default());
        host.mesh_mut().select_vert(VertIndex(0), true);
        host.mesh_mut().select_vert(VertIndex(2), true);
        let r = session.handle_event(&InputEvent::alt(Key::Digit(1)), &mut host, &Dlfl::new());
        assert_eq!(r, Response::Consumed);
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(host.reports()[0].0, ReportLevel::Warning);
    }

    #[test]
    fn first_selected_policy_takes_lowest_index() {
        let mut host = host();
        let config = SessionConfig {
            policy: SelectionPolicy::FirstSelected,
            ..SessionConfig::default()
        };
        let mut session = SelectionSession::new(EdgeOperation::Delete, config);
        host.mesh_mut().select_vert(VertIndex(2), true);
        host.mesh_mut().select_vert(VertIndex(0), true);
        session.handle_event(&InputEvent::alt(Key::Digit(1)), &mut host, &Dlfl::new());
        assert_eq!(session.slots().vertex1, Some(VertIndex(0)));
    }

    #[test]
    fn nothing_selected_leaves_slot_empty() {
        let mut host = host();
        let mut session = SelectionSession::new(EdgeOperation::Delete, SessionConfig::default());
        let r = session.handle_event(&InputEvent::alt(Key::Digit(2)), &mut host, &Dlfl::new());
        assert_eq!(r, Response::Consumed);
        assert!(!session.slots().is_filled(Slot::Face1));
    }

    #[test]
    fn algebra_failure_aborts_session() {
        let mut host = host();
        let mut session = SelectionSession::new(EdgeOperation::Delete, SessionConfig::default());
        // corners are well-formed but 1 and 3 share no edge
        select(&mut session, &mut host, Slot::Vertex1, 1);
        select(&mut session, &mut host, Slot::Face1, 0);
        select(&mut session, &mut host, Slot::Vertex2, 3);
        let r = select(&mut session, &mut host, Slot::Face2, 1);

        assert_eq!(r, Response::Cancelled);
        assert_eq!(session.state(), SessionState::Cancelled);
        assert_eq!(host.revision(), 0);
        assert_eq!(host.reports().last().unwrap().0, ReportLevel::Error);
    }
}
