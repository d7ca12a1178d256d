//! Reference cell definitions

use crate::cell::connectivity;
use crate::traits::types::{CellType, ReferenceCell};
use crate::types::{Error, Result};

/// A point in reference coordinates; unused trailing components are zero
pub type Point = [f64; 3];

/// The vertices of the reference cell
///
/// Intervals, quadrilaterals and hexahedra span `[-1, 1]` in each direction, simplices
/// span the unit simplex, the prism is the unit triangle extruded over `[-1, 1]` and the
/// pyramid has its base on `[-1, 1]^2` and apex at `z = 1`.
pub fn vertices(cell: ReferenceCell) -> &'static [Point] {
    match cell {
        ReferenceCell::Point => &[[0.0, 0.0, 0.0]],
        ReferenceCell::Interval => &[[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
        ReferenceCell::Triangle => &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        ReferenceCell::Quadrilateral => &[
            [-1.0, -1.0, 0.0],
            [1.0, -1.0, 0.0],
            [1.0, 1.0, 0.0],
            [-1.0, 1.0, 0.0],
        ],
        ReferenceCell::Tetrahedron => &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
        ReferenceCell::Hexahedron => &[
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, 1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ],
        ReferenceCell::Prism => &[
            [0.0, 0.0, -1.0],
            [1.0, 0.0, -1.0],
            [0.0, 1.0, -1.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
        ],
        ReferenceCell::Pyramid => &[
            [-1.0, -1.0, 0.0],
            [1.0, -1.0, 0.0],
            [1.0, 1.0, 0.0],
            [-1.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
    }
}

/// The number of subentities of each dimension
pub fn entity_counts(cell: ReferenceCell) -> [usize; 4] {
    match cell {
        ReferenceCell::Point => [1, 0, 0, 0],
        ReferenceCell::Interval => [2, 1, 0, 0],
        ReferenceCell::Triangle => [3, 3, 1, 0],
        ReferenceCell::Quadrilateral => [4, 4, 1, 0],
        ReferenceCell::Tetrahedron => [4, 6, 4, 1],
        ReferenceCell::Hexahedron => [8, 12, 6, 1],
        ReferenceCell::Prism => [6, 9, 5, 1],
        ReferenceCell::Pyramid => [5, 8, 5, 1],
    }
}

/// The number of children produced by one refinement
pub fn child_count(cell: ReferenceCell) -> usize {
    match cell {
        ReferenceCell::Point => 0,
        ReferenceCell::Interval => 2,
        ReferenceCell::Triangle => 4,
        ReferenceCell::Quadrilateral => 4,
        ReferenceCell::Tetrahedron => 8,
        ReferenceCell::Hexahedron => 8,
        ReferenceCell::Prism => 8,
        ReferenceCell::Pyramid => 0,
    }
}

/// The midpoint of the cell's vertices
pub fn midpoint(cell: ReferenceCell) -> Point {
    centroid(vertices(cell).iter())
}

fn centroid<'a>(points: impl Iterator<Item = &'a Point>) -> Point {
    let mut sum = [0.0; 3];
    let mut count = 0;
    for p in points {
        for (s, c) in sum.iter_mut().zip(p.iter()) {
            *s += c;
        }
        count += 1;
    }
    sum.map(|s| s / count as f64)
}

/// Side indices whose centres carry a node, in node order
fn face_centre_sides(cell_type: CellType) -> &'static [usize] {
    match cell_type {
        CellType::Hex27 => &[0, 1, 2, 3, 4, 5],
        CellType::Prism18 => &[1, 2, 3],
        _ => &[],
    }
}

/// The number of vertices of a cell type
pub fn vertex_count(cell_type: CellType) -> usize {
    entity_counts(cell_type.reference_cell())[0]
}

/// Is the local node a vertex?
pub fn is_vertex(cell_type: CellType, node: usize) -> bool {
    node < vertex_count(cell_type)
}

/// The reference coordinates of a local node
///
/// Higher order nodes sit at the midpoints of edges, the centres of faces and the centre
/// of the cell, in that order.
pub fn reference_point(cell_type: CellType, node: usize) -> Result<Point> {
    let cell = cell_type.reference_cell();
    let verts = vertices(cell);
    if node >= cell_type.node_count() {
        return Err(Error::IndexOutOfRange {
            what: "cell node",
            index: node,
            len: cell_type.node_count(),
        });
    }
    if node < verts.len() {
        return Ok(verts[node]);
    }

    let mut extra = node - verts.len();
    let edges = connectivity::edge_nodes(cell_type.first_order_equivalent());
    if extra < edges.len() {
        return Ok(centroid(edges[extra].iter().map(|v| &verts[*v])));
    }
    extra -= edges.len();

    let centres = face_centre_sides(cell_type);
    if extra < centres.len() {
        let side = connectivity::side_nodes(cell_type.first_order_equivalent())[centres[extra]];
        return Ok(centroid(side.iter().map(|v| &verts[*v])));
    }
    Ok(midpoint(cell))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::traits::types::ALL_CELL_TYPES;
    use approx::*;

    #[test]
    fn test_vertex_counts() {
        for cell in [
            ReferenceCell::Point,
            ReferenceCell::Interval,
            ReferenceCell::Triangle,
            ReferenceCell::Quadrilateral,
            ReferenceCell::Tetrahedron,
            ReferenceCell::Hexahedron,
            ReferenceCell::Prism,
            ReferenceCell::Pyramid,
        ] {
            assert_eq!(vertices(cell).len(), entity_counts(cell)[0]);
        }
    }

    #[test]
    fn test_reference_points_are_distinct() {
        for cell_type in ALL_CELL_TYPES {
            let points = (0..cell_type.node_count())
                .map(|n| reference_point(cell_type, n).unwrap())
                .collect::<Vec<_>>();
            for (i, p) in points.iter().enumerate() {
                for q in points.iter().skip(i + 1) {
                    let distance: f64 = p.iter().zip(q).map(|(a, b)| (a - b).abs()).sum();
                    assert!(distance > 1e-12, "{cell_type:?} has coincident nodes");
                }
            }
        }
    }

    #[test]
    fn test_hex27_points() {
        let p = reference_point(CellType::Hex27, 8).unwrap();
        assert_relative_eq!(p[0], 0.0);
        assert_relative_eq!(p[1], -1.0);
        assert_relative_eq!(p[2], -1.0);

        let p = reference_point(CellType::Hex27, 22).unwrap();
        assert_relative_eq!(p[0], 1.0);
        assert_relative_eq!(p[1], 0.0);
        assert_relative_eq!(p[2], 0.0);

        let p = reference_point(CellType::Hex27, 26).unwrap();
        for c in p {
            assert_relative_eq!(c, 0.0);
        }
    }

    #[test]
    fn test_prism18_face_centres() {
        let p = reference_point(CellType::Prism18, 16).unwrap();
        assert_relative_eq!(p[0], 0.5);
        assert_relative_eq!(p[1], 0.5);
        assert_relative_eq!(p[2], 0.0);
    }

    #[test]
    fn test_node_out_of_range() {
        assert_eq!(
            reference_point(CellType::Tri3, 3),
            Err(Error::IndexOutOfRange {
                what: "cell node",
                index: 3,
                len: 3
            })
        );
    }
}
