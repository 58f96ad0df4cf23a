use thiserror::Error;

/// Top-level error type for topology editing.
#[derive(Debug, Error)]
pub enum TopmodError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl TopmodError {
    /// Returns `true` if the error leaves the interaction recoverable,
    /// i.e. the user may fix the selection and try again.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Selection(_))
    }
}

/// Errors related to the topology graph and the boundary mesh structure.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("malformed topology at loop {loop_index}: {reason}")]
    MalformedTopology { loop_index: usize, reason: String },

    #[error("incidence mismatch for vertex {vertex}: {reason}")]
    IncidenceMismatch { vertex: String, reason: String },
}

/// Errors raised while converting between the boundary mesh and the graph.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("degenerate face {face}: {reason}")]
    DegenerateFace { face: String, reason: String },

    #[error("{kind} index {index} is out of range (mesh has {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },
}

/// Errors related to corner selection.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("vertex {vertex} does not lie on face {face}")]
    InvalidCorner { vertex: usize, face: usize },

    #[error("{kind} index {index} no longer exists in the mesh")]
    StaleElement { kind: &'static str, index: usize },

    #[error("expected exactly one selected {kind}, found {count}")]
    AmbiguousSelection { kind: &'static str, count: usize },

    #[error("no {kind} is selected")]
    NothingSelected { kind: &'static str },
}

/// Errors related to editing operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("topology operation failed: {0}")]
    External(String),

    #[error("{action} is not available in {mode} mode")]
    WrongMode {
        action: &'static str,
        mode: &'static str,
    },
}

/// Convenience type alias for results using [`TopmodError`].
pub type Result<T> = std::result::Result<T, TopmodError>;
