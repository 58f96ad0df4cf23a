use crate::algebra::TopologyAlgebra;
use crate::host::{Host, HostMode, ReportLevel};
use crate::session::{SelectionSession, SessionConfig};

use super::edge::EdgeOperation;
use super::subdivide::Subdivide;

/// User-facing actions a host can register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Subdivide,
    DeleteEdge,
    InsertEdge,
}

impl Action {
    /// Every action, in menu order.
    pub const ALL: [Action; 3] = [Action::Subdivide, Action::DeleteEdge, Action::InsertEdge];

    /// Stable identifier for registration with the host.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Subdivide => "mesh.triangular_subdivision",
            Self::DeleteEdge => "mesh.topmod_delete_edge",
            Self::InsertEdge => "mesh.topmod_insert_edge",
        }
    }

    /// Menu label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Subdivide => "Triangular Subdivision",
            Self::DeleteEdge => "Delete Edge",
            Self::InsertEdge => "Insert Edge",
        }
    }

    /// Tooltip text.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Subdivide => "Subdivides every face of the active object into triangles.",
            Self::DeleteEdge => "Deletes the edge between two selected corners.",
            Self::InsertEdge => "Inserts an edge between two selected corners.",
        }
    }

    /// Mode the active object must be in for the action to run.
    #[must_use]
    pub fn required_mode(self) -> HostMode {
        match self {
            Self::Subdivide => HostMode::Object,
            Self::DeleteEdge | Self::InsertEdge => HostMode::Edit,
        }
    }

    /// Edge operation behind the action, if it needs a selection session.
    #[must_use]
    pub fn edge_operation(self) -> Option<EdgeOperation> {
        match self {
            Self::Subdivide => None,
            Self::DeleteEdge => Some(EdgeOperation::Delete),
            Self::InsertEdge => Some(EdgeOperation::Insert),
        }
    }

    /// Returns `true` if the action can run on `host` right now.
    #[must_use]
    pub fn poll<H: Host + ?Sized>(self, host: &H) -> bool {
        host.mode() == self.required_mode()
    }

    /// Starts the action.
    ///
    /// Subdivision runs to completion; the edge actions return a session
    /// that the host must feed input events until it ends. Failures are
    /// reported to the host.
    pub fn invoke<H, A>(self, host: &mut H, algebra: &A, config: &SessionConfig) -> Invocation
    where
        H: Host + ?Sized,
        A: TopologyAlgebra + ?Sized,
    {
        if !self.poll(host) {
            let message = format!(
                "{} needs {} mode, object is in {} mode",
                self.label(),
                self.required_mode(),
                host.mode()
            );
            host.report(ReportLevel::Error, &message);
            return Invocation::Cancelled;
        }
        match self.edge_operation() {
            None => match Subdivide::new().execute(host, algebra) {
                Ok(()) => Invocation::Finished,
                Err(err) => {
                    host.report(ReportLevel::Error, &err.to_string());
                    Invocation::Cancelled
                }
            },
            Some(operation) => {
                Invocation::Modal(SelectionSession::new(operation, config.clone()))
            }
        }
    }
}

/// Outcome of [`Action::invoke`].
#[derive(Debug)]
pub enum Invocation {
    Finished,
    Cancelled,
    /// The action waits for corner selections.
    Modal(SelectionSession),
}

/// What the environment provides to the actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Whether a topology algebra backend is available.
    pub algebra_available: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            algebra_available: true,
        }
    }
}

/// Actions to register with the host. Without an algebra backend nothing
/// is registered.
#[must_use]
pub fn registered_actions(capabilities: &Capabilities) -> Vec<Action> {
    if capabilities.algebra_available {
        Action::ALL.to_vec()
    } else {
        Vec::new()
    }
}
