pub mod algebra;
pub mod brep;
pub mod convert;
pub mod error;
pub mod host;
pub mod incidence;
pub mod math;
pub mod operators;
pub mod session;
pub mod topology;

pub use error::{Result, TopmodError};
