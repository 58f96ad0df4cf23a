mod to_graph;
mod to_mesh;
mod translation;

pub use to_graph::ToGraph;
pub use to_mesh::ToMesh;
pub use translation::IdTranslation;
