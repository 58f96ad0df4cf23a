use std::fmt;

use tracing::{info, warn};

use crate::brep::BRepMesh;

/// Interaction mode of the active object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostMode {
    /// Whole-object manipulation.
    Object,
    /// Element-level editing with vertex/face selection.
    Edit,
}

impl HostMode {
    /// Lower-case name used in messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for HostMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Severity of a message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportLevel {
    Info,
    Warning,
    Error,
}

/// A viewer holding the active object's mesh: what the editing core needs
/// from its host.
pub trait Host {
    /// The active object's current mesh.
    fn mesh(&self) -> &BRepMesh;

    /// Replaces the active object's mesh wholesale.
    fn replace_mesh(&mut self, mesh: BRepMesh);

    /// Current interaction mode.
    fn mode(&self) -> HostMode;

    /// Shows a message to the user.
    fn report(&mut self, level: ReportLevel, message: &str);
}

/// In-memory host: a single object with a mesh and a mode.
///
/// Reports are kept in order so callers can surface them later.
#[derive(Debug, Clone)]
pub struct SceneObject {
    mesh: BRepMesh,
    mode: HostMode,
    revision: u64,
    reports: Vec<(ReportLevel, String)>,
}

impl SceneObject {
    /// Creates an object holding `mesh` in the given mode.
    #[must_use]
    pub fn new(mesh: BRepMesh, mode: HostMode) -> Self {
        Self {
            mesh,
            mode,
            revision: 0,
            reports: Vec::new(),
        }
    }

    /// Mutable access to the mesh, for element selection between events.
    pub fn mesh_mut(&mut self) -> &mut BRepMesh {
        &mut self.mesh
    }

    /// Switches the interaction mode.
    pub fn set_mode(&mut self, mode: HostMode) {
        self.mode = mode;
    }

    /// Number of times the mesh has been replaced.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Messages reported so far, oldest first.
    #[must_use]
    pub fn reports(&self) -> &[(ReportLevel, String)] {
        &self.reports
    }

    /// Drains the collected reports.
    pub fn take_reports(&mut self) -> Vec<(ReportLevel, String)> {
        std::mem::take(&mut self.reports)
    }
}

impl Host for SceneObject {
    fn mesh(&self) -> &BRepMesh {
        &self.mesh
    }

    fn replace_mesh(&mut self, mesh: BRepMesh) {
        self.mesh = mesh;
        self.revision += 1;
    }

    fn mode(&self) -> HostMode {
        self.mode
    }

    fn report(&mut self, level: ReportLevel, message: &str) {
        match level {
            ReportLevel::Info => info!(text = message, "host report"),
            ReportLevel::Warning | ReportLevel::Error => warn!(?level, text = message, "host report"),
        }
        self.reports.push((level, message.to_owned()));
    }
}
