use tracing::debug;

use crate::error::OperationError;
use crate::math::{centroid, Point3};
use crate::topology::{Corner, FaceId, TopologyGraph, VertexId};

use super::TopologyAlgebra;

/// Doubly-linked face list algebra.
///
/// Faces may pass through a vertex or an edge more than once, which is how
/// an edge between two different faces is represented: the joined face walks
/// the new edge in both directions.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dlfl;

impl Dlfl {
    /// Creates the algebra.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TopologyAlgebra for Dlfl {
    fn triangulate_face(
        &self,
        graph: &mut TopologyGraph,
        face: FaceId,
    ) -> Result<Vec<FaceId>, OperationError> {
        let loop_verts = loop_of(graph, face)?;
        if loop_verts.len() < 3 {
            return Err(OperationError::External(format!(
                "cannot triangulate face {face:?} with {} vertices",
                loop_verts.len()
            )));
        }

        let points = loop_verts
            .iter()
            .map(|&v| graph.vertex(v).map(|d| d.point))
            .collect::<Result<Vec<Point3>, _>>()
            .map_err(external)?;
        let center_point = centroid(&points)
            .ok_or_else(|| OperationError::External("empty face".into()))?;

        graph.remove_face(face).map_err(external)?;
        let center = graph.create_vertex(center_point);
        let n = loop_verts.len();
        let mut created = Vec::with_capacity(n);
        for i in 0..n {
            let tri = vec![center, loop_verts[i], loop_verts[(i + 1) % n]];
            created.push(graph.add_face(tri).map_err(external)?);
        }
        Ok(created)
    }

    fn delete_edge(
        &self,
        graph: &mut TopologyGraph,
        a: Corner,
        b: Corner,
    ) -> Result<Vec<FaceId>, OperationError> {
        check_corners(graph, a, b)?;
        if a.vertex == b.vertex {
            return Err(OperationError::External(
                "an edge needs two distinct end vertices".into(),
            ));
        }
        let first = loop_of(graph, a.face)?;

        let (i, x, y) = if let Some(i) = find_edge(&first, a.vertex, b.vertex) {
            (i, a.vertex, b.vertex)
        } else if let Some(i) = find_edge(&first, b.vertex, a.vertex) {
            (i, b.vertex, a.vertex)
        } else {
            return Err(OperationError::External(format!(
                "vertices {:?} and {:?} are not adjacent on face {:?}",
                a.vertex, b.vertex, a.face
            )));
        };

        if a.face == b.face {
            let Some(j) = find_edge(&first, y, x) else {
                return Err(OperationError::External(format!(
                    "edge is not shared: face {:?} runs along it only once",
                    a.face
                )));
            };
            let n = first.len();
            let upper = cyclic(&first, i + 1, (j + n - i - 1) % n);
            let lower = cyclic(&first, j + 1, (i + n - j - 1) % n);

            graph.remove_face(a.face).map_err(external)?;
            let mut created = Vec::with_capacity(2);
            for part in [upper, lower] {
                if !part.is_empty() {
                    created.push(graph.add_face(part).map_err(external)?);
                }
            }
            debug!(faces = created.len(), "deleted edge, split face");
            return Ok(created);
        }

        let mut second = loop_of(graph, b.face)?;
        let j = if let Some(j) = find_edge(&second, y, x) {
            j
        } else if find_edge(&second, x, y).is_some() {
            // opposite winding: walk the other face backwards
            second.reverse();
            find_edge(&second, y, x).unwrap_or_default()
        } else {
            return Err(OperationError::External(format!(
                "faces {:?} and {:?} do not share the edge",
                a.face, b.face
            )));
        };

        let mut merged = cyclic(&first, i + 1, first.len());
        let around = cyclic(&second, j + 1, second.len());
        merged.extend_from_slice(&around[1..around.len() - 1]);

        graph.remove_face(a.face).map_err(external)?;
        graph.remove_face(b.face).map_err(external)?;
        let face = graph.add_face(merged).map_err(external)?;
        debug!(?face, "deleted edge, merged faces");
        Ok(vec![face])
    }

    fn insert_edge(
        &self,
        graph: &mut TopologyGraph,
        a: Corner,
        b: Corner,
    ) -> Result<Vec<FaceId>, OperationError> {
        check_corners(graph, a, b)?;
        if a.vertex == b.vertex {
            return Err(OperationError::External(
                "cannot insert an edge from a vertex to itself".into(),
            ));
        }
        let first = loop_of(graph, a.face)?;
        let i = position(&first, a.vertex)?;

        if a.face == b.face {
            let j = position(&first, b.vertex)?;
            let n = first.len();
            let left = cyclic(&first, i, (j + n - i) % n + 1);
            let right = cyclic(&first, j, (i + n - j) % n + 1);

            graph.remove_face(a.face).map_err(external)?;
            let left = graph.add_face(left).map_err(external)?;
            let right = graph.add_face(right).map_err(external)?;
            debug!(?left, ?right, "inserted edge, split face");
            return Ok(vec![left, right]);
        }

        let second = loop_of(graph, b.face)?;
        let j = position(&second, b.vertex)?;
        let mut joined = cyclic(&first, i, first.len());
        joined.push(a.vertex);
        joined.extend(cyclic(&second, j, second.len()));
        joined.push(b.vertex);

        graph.remove_face(a.face).map_err(external)?;
        graph.remove_face(b.face).map_err(external)?;
        let face = graph.add_face(joined).map_err(external)?;
        debug!(?face, "inserted edge, joined faces");
        Ok(vec![face])
    }
}

fn loop_of(graph: &TopologyGraph, face: FaceId) -> Result<Vec<VertexId>, OperationError> {
    graph
        .face(face)
        .map(|f| f.vertices().to_vec())
        .map_err(external)
}

fn check_corners(graph: &TopologyGraph, a: Corner, b: Corner) -> Result<(), OperationError> {
    for corner in [a, b] {
        if !graph.is_corner(corner) {
            return Err(OperationError::External(format!(
                "vertex {:?} is not a corner of face {:?}",
                corner.vertex, corner.face
            )));
        }
    }
    Ok(())
}

fn position(loop_verts: &[VertexId], vertex: VertexId) -> Result<usize, OperationError> {
    loop_verts
        .iter()
        .position(|&v| v == vertex)
        .ok_or_else(|| OperationError::External(format!("vertex {vertex:?} is not on the loop")))
}

/// Position `i` of the first directed edge `loop[i] -> loop[i + 1] == from -> to`.
fn find_edge(loop_verts: &[VertexId], from: VertexId, to: VertexId) -> Option<usize> {
    let n = loop_verts.len();
    (0..n).find(|&i| loop_verts[i] == from && loop_verts[(i + 1) % n] == to)
}

/// `count` entries of the cyclic loop starting at `start`.
fn cyclic(loop_verts: &[VertexId], start: usize, count: usize) -> Vec<VertexId> {
    let n = loop_verts.len();
    (0..count).map(|k| loop_verts[(start + k) % n]).collect()
}

#[allow(clippy::needless_pass_by_value)]
fn external(err: crate::error::TopologyError) -> OperationError {
    OperationError::External(err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn vertex_set(graph: &TopologyGraph, face: FaceId) -> BTreeSet<VertexId> {
        graph.face(face).unwrap().vertices().iter().copied().collect()
    }

    fn partition(graph: &TopologyGraph) -> BTreeSet<BTreeSet<VertexId>> {
        graph
            .faces()
            .map(|(_, f)| f.vertices().iter().copied().collect())
            .collect()
    }

    /// Square a-b-c-d split into F1 = [a, b, c] and F2 = [a, c, d].
    fn split_square() -> (TopologyGraph, [VertexId; 4], [FaceId; 2]) {
        let mut g = TopologyGraph::new();
        let a = g.create_vertex(p(0.0, 0.0, 0.0));
        let b = g.create_vertex(p(1.0, 0.0, 0.0));
        let c = g.create_vertex(p(1.0, 1.0, 0.0));
        let d = g.create_vertex(p(0.0, 1.0, 0.0));
        let f1 = g.add_face(vec![a, b, c]).unwrap();
        let f2 = g.add_face(vec![a, c, d]).unwrap();
        (g, [a, b, c, d], [f1, f2])
    }

    #[test]
    fn triangulate_quad() {
        let mut g = TopologyGraph::new();
        let vs: Vec<_> = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]
            .iter()
            .map(|&(x, y)| g.create_vertex(p(x, y, 0.0)))
            .collect();
        let quad = g.add_face(vs.clone()).unwrap();

        let tris = Dlfl::new().triangulate_face(&mut g, quad).unwrap();
        assert_eq!(tris.len(), 4);
        assert!(g.face(quad).is_err());
        assert_eq!(g.vertex_count(), 5);
        for &t in &tris {
            assert_eq!(g.face(t).unwrap().len(), 3);
        }
        g.verify_incidence().unwrap();

        let center = g.face(tris[0]).unwrap().vertices()[0];
        approx::assert_relative_eq!(g.vertex(center).unwrap().point, p(1.0, 1.0, 0.0));
        assert_eq!(g.vertex_faces(center).unwrap().len(), 4);
    }

    #[test]
    fn triangulate_rejects_short_face() {
        let mut g = TopologyGraph::new();
        let a = g.create_vertex(p(0.0, 0.0, 0.0));
        let b = g.create_vertex(p(1.0, 0.0, 0.0));
        let f = g.add_face(vec![a, b]).unwrap();
        assert!(Dlfl::new().triangulate_face(&mut g, f).is_err());
    }

    #[test]
    fn delete_shared_edge_merges_faces() {
        let (mut g, [a, b, c, d], [f1, f2]) = split_square();
        let out = Dlfl::new()
            .delete_edge(&mut g, Corner::new(a, f1), Corner::new(c, f2))
            .unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(g.face_count(), 1);
        assert_eq!(vertex_set(&g, out[0]), BTreeSet::from([a, b, c, d]));
        assert_eq!(g.face(out[0]).unwrap().vertices(), &[a, b, c, d]);
        assert!(g.face(f1).is_err());
        assert!(g.face(f2).is_err());
        g.verify_incidence().unwrap();
    }

    #[test]
    fn delete_edge_handles_opposite_winding() {
        let mut g = TopologyGraph::new();
        let a = g.create_vertex(p(0.0, 0.0, 0.0));
        let b = g.create_vertex(p(1.0, 0.0, 0.0));
        let c = g.create_vertex(p(1.0, 1.0, 0.0));
        let d = g.create_vertex(p(0.0, 1.0, 0.0));
        let f1 = g.add_face(vec![a, b, c]).unwrap();
        let f2 = g.add_face(vec![d, c, a]).unwrap();
        let out = Dlfl::new()
            .delete_edge(&mut g, Corner::new(c, f1), Corner::new(a, f2))
            .unwrap();
        assert_eq!(g.face(out[0]).unwrap().vertices(), &[a, b, c, d]);
        g.verify_incidence().unwrap();
    }

    #[test]
    fn delete_non_adjacent_vertices_fails() {
        let (mut g, [_, b, _, d], [f1, f2]) = split_square();
        let err = Dlfl::new()
            .delete_edge(&mut g, Corner::new(b, f1), Corner::new(d, f2))
            .unwrap_err();
        assert!(matches!(err, OperationError::External(_)));
    }

    #[test]
    fn delete_rejects_ill_formed_corner() {
        let (mut g, [a, b, _, d], [f1, _]) = split_square();
        assert!(Dlfl::new()
            .delete_edge(&mut g, Corner::new(a, f1), Corner::new(d, f1))
            .is_err());
        assert!(Dlfl::new()
            .delete_edge(&mut g, Corner::new(b, f1), Corner::new(d, f1))
            .is_err());
    }

    #[test]
    fn insert_within_face_splits_it() {
        let mut g = TopologyGraph::new();
        let vs: Vec<_> = (0..4)
            .map(|i| g.create_vertex(p(f64::from(i), 0.0, 0.0)))
            .collect();
        let quad = g.add_face(vs.clone()).unwrap();

        let out = Dlfl::new()
            .insert_edge(&mut g, Corner::new(vs[0], quad), Corner::new(vs[2], quad))
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(g.face(out[0]).unwrap().vertices(), &[vs[0], vs[1], vs[2]]);
        assert_eq!(g.face(out[1]).unwrap().vertices(), &[vs[2], vs[3], vs[0]]);
        assert!(g.face(quad).is_err());
        g.verify_incidence().unwrap();
    }

    #[test]
    fn insert_then_delete_within_face_restores_partition() {
        let mut g = TopologyGraph::new();
        let vs: Vec<_> = (0..5)
            .map(|i| g.create_vertex(p(f64::from(i), f64::from(i * i), 0.0)))
            .collect();
        g.add_face(vs.clone()).unwrap();
        let before = partition(&g);
        let face = g.face_ids()[0];

        let algebra = Dlfl::new();
        let split = algebra
            .insert_edge(&mut g, Corner::new(vs[1], face), Corner::new(vs[3], face))
            .unwrap();
        assert_eq!(g.face_count(), 2);
        algebra
            .delete_edge(&mut g, Corner::new(vs[1], split[0]), Corner::new(vs[3], split[1]))
            .unwrap();

        assert_eq!(partition(&g), before);
        g.verify_incidence().unwrap();
    }

    #[test]
    fn insert_then_delete_across_faces_restores_partition() {
        let mut g = TopologyGraph::new();
        let vs: Vec<_> = (0..6)
            .map(|i| g.create_vertex(p(f64::from(i), 0.0, 1.0)))
            .collect();
        let f1 = g.add_face(vec![vs[0], vs[1], vs[2]]).unwrap();
        let f2 = g.add_face(vec![vs[3], vs[4], vs[5]]).unwrap();
        let before = partition(&g);

        let algebra = Dlfl::new();
        let joined = algebra
            .insert_edge(&mut g, Corner::new(vs[1], f1), Corner::new(vs[4], f2))
            .unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(
            g.face(joined[0]).unwrap().vertices(),
            &[vs[1], vs[2], vs[0], vs[1], vs[4], vs[5], vs[3], vs[4]]
        );
        g.verify_incidence().unwrap();

        let out = algebra
            .delete_edge(
                &mut g,
                Corner::new(vs[1], joined[0]),
                Corner::new(vs[4], joined[0]),
            )
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(partition(&g), before);
        g.verify_incidence().unwrap();
    }

    #[test]
    fn insert_to_same_vertex_fails() {
        let (mut g, [a, ..], [f1, f2]) = split_square();
        assert!(Dlfl::new()
            .insert_edge(&mut g, Corner::new(a, f1), Corner::new(a, f2))
            .is_err());
    }
}
