mod action;
mod commit;
mod edge;
mod subdivide;

pub use action::{registered_actions, Action, Capabilities, Invocation};
pub use commit::commit;
pub use edge::{check_corner, EdgeEdit, EdgeOperation};
pub use subdivide::Subdivide;
