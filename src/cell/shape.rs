//! Nodal shape functions and child maps

use crate::cell::reference_cell::{self, reference_point, Point};
use crate::traits::types::{CellType, ReferenceCell};
use crate::types::{Error, Result};

const TOL: f64 = 1e-12;

/// Triangle children as Tri6 nodes: three corner children, then the middle one
const TRIANGLE_CHILDREN: [[usize; 3]; 4] = [[0, 3, 5], [3, 1, 4], [5, 4, 2], [3, 4, 5]];

/// Tetrahedron children as Tet10 nodes: four corner children, then the inner octahedron
/// split along the diagonal between nodes 6 and 8
const TETRAHEDRON_CHILDREN: [[usize; 4]; 8] = [
    [0, 4, 6, 7],
    [4, 1, 5, 8],
    [6, 5, 2, 9],
    [7, 8, 9, 3],
    [6, 8, 4, 5],
    [6, 8, 5, 9],
    [6, 8, 9, 7],
    [6, 8, 7, 4],
];

/// One-dimensional Lagrange polynomial on the nodes {-1, 1} or {-1, 0, 1}
fn lagrange_1d(quadratic: bool, node: f64, x: f64) -> f64 {
    let nodes: &[f64] = if quadratic {
        &[-1.0, 0.0, 1.0]
    } else {
        &[-1.0, 1.0]
    };
    nodes
        .iter()
        .filter(|t| (**t - node).abs() > TOL)
        .map(|t| (x - t) / (node - t))
        .product()
}

/// Barycentric coordinates of the first `dim` components of a point
fn barycentric(dim: usize, p: &Point) -> Vec<f64> {
    let mut lambda = Vec::with_capacity(dim + 1);
    lambda.push(1.0 - p[..dim].iter().sum::<f64>());
    lambda.extend_from_slice(&p[..dim]);
    lambda
}

/// Lagrange shape function on a simplex
///
/// `at_node` holds the barycentric coordinates of the function's own node; it picks out the
/// vertex or edge the node belongs to.
fn simplex_shape(quadratic: bool, at_node: &[f64], lambda: &[f64]) -> Result<f64> {
    let support = at_node
        .iter()
        .enumerate()
        .filter(|(_, l)| **l > 0.25)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    match (quadratic, support.as_slice()) {
        (false, [i]) => Ok(lambda[*i]),
        (true, [i]) => Ok(lambda[*i] * (2.0 * lambda[*i] - 1.0)),
        (true, [i, j]) => Ok(4.0 * lambda[*i] * lambda[*j]),
        _ => Err(Error::InvariantViolation(format!(
            "no simplex shape function for node at {at_node:?}"
        ))),
    }
}

/// Serendipity shape function on `[-1, 1]^dim`
fn serendipity_shape(dim: usize, q: &Point, p: &Point) -> f64 {
    let zero_axes = (0..dim).filter(|a| q[*a].abs() < TOL).collect::<Vec<_>>();
    match zero_axes.as_slice() {
        [] => {
            let scale = 0.5f64.powi(dim as i32);
            let linear = (0..dim).map(|a| 1.0 + p[a] * q[a]).product::<f64>();
            let sum = (0..dim).map(|a| p[a] * q[a]).sum::<f64>();
            scale * linear * (sum - (dim as f64 - 1.0))
        }
        [axis] => {
            let scale = 0.5f64.powi(dim as i32 - 1);
            let others = (0..dim)
                .filter(|a| a != axis)
                .map(|a| 1.0 + p[a] * q[a])
                .product::<f64>();
            scale * (1.0 - p[*axis] * p[*axis]) * others
        }
        _ => 0.0,
    }
}

/// Shape function of the fifteen-node prism
fn prism15_shape(q: &Point, p: &Point) -> Result<f64> {
    let at_node = barycentric(2, q);
    let lambda = barycentric(2, p);
    let support = at_node
        .iter()
        .enumerate()
        .filter(|(_, l)| **l > 0.25)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    let z = p[2];
    let zq = q[2];
    match support.as_slice() {
        [i] if zq.abs() < TOL => Ok(lambda[*i] * (1.0 - z * z)),
        [i] => {
            let li = lambda[*i];
            Ok(0.5 * li * (1.0 + zq * z) * (2.0 * li - 2.0 + zq * z))
        }
        [i, j] => Ok(2.0 * lambda[*i] * lambda[*j] * (1.0 + zq * z)),
        _ => Err(Error::InvariantViolation(format!(
            "no prism shape function for node at {q:?}"
        ))),
    }
}

/// Evaluate the shape function of a local node at a reference point
pub fn shape(cell_type: CellType, node: usize, p: &Point) -> Result<f64> {
    let q = reference_point(cell_type, node)?;
    let quadratic = !cell_type.is_linear();
    match cell_type {
        CellType::NodeElem => Ok(1.0),
        CellType::Edge2 | CellType::Edge3 => Ok(lagrange_1d(quadratic, q[0], p[0])),
        CellType::Quad4 | CellType::Quad9 => {
            Ok(lagrange_1d(quadratic, q[0], p[0]) * lagrange_1d(quadratic, q[1], p[1]))
        }
        CellType::Hex8 | CellType::Hex27 => Ok((0..3)
            .map(|a| lagrange_1d(quadratic, q[a], p[a]))
            .product()),
        CellType::Quad8 => Ok(serendipity_shape(2, &q, p)),
        CellType::Hex20 => Ok(serendipity_shape(3, &q, p)),
        CellType::Tri3 | CellType::Tri6 => {
            simplex_shape(quadratic, &barycentric(2, &q), &barycentric(2, p))
        }
        CellType::Tet4 | CellType::Tet10 => {
            simplex_shape(quadratic, &barycentric(3, &q), &barycentric(3, p))
        }
        CellType::Prism6 | CellType::Prism18 => Ok(simplex_shape(
            quadratic,
            &barycentric(2, &q),
            &barycentric(2, p),
        )? * lagrange_1d(quadratic, q[2], p[2])),
        CellType::Prism15 => prism15_shape(&q, p),
        CellType::Pyramid5 => Err(Error::UnsupportedOperation {
            cell_type,
            operation: "shape functions",
        }),
    }
}

/// Map a point of a child's reference cell into the parent's reference cell
///
/// Intervals, quadrilaterals and hexahedra are halved in each direction with the children
/// numbered in tensor order (x fastest). Prism children are the triangle children of the
/// bottom half followed by those of the top half.
pub fn child_point(cell_type: CellType, child: usize, xi: &Point) -> Result<Point> {
    let cell = cell_type.reference_cell();
    let count = reference_cell::child_count(cell);
    if count == 0 {
        return Err(Error::UnsupportedOperation {
            cell_type,
            operation: "refinement",
        });
    }
    if child >= count {
        return Err(Error::IndexOutOfRange {
            what: "child",
            index: child,
            len: count,
        });
    }

    let half = |x: f64, bit: usize| {
        if (child >> bit) & 1 == 1 {
            (x + 1.0) / 2.0
        } else {
            (x - 1.0) / 2.0
        }
    };

    match cell {
        ReferenceCell::Interval => Ok([half(xi[0], 0), 0.0, 0.0]),
        ReferenceCell::Quadrilateral => Ok([half(xi[0], 0), half(xi[1], 1), 0.0]),
        ReferenceCell::Hexahedron => Ok([half(xi[0], 0), half(xi[1], 1), half(xi[2], 2)]),
        ReferenceCell::Triangle => affine_child(CellType::Tri6, &TRIANGLE_CHILDREN[child], xi),
        ReferenceCell::Tetrahedron => {
            affine_child(CellType::Tet10, &TETRAHEDRON_CHILDREN[child], xi)
        }
        ReferenceCell::Prism => {
            let base = affine_child(CellType::Tri6, &TRIANGLE_CHILDREN[child % 4], xi)?;
            let z = if child < 4 {
                (xi[2] - 1.0) / 2.0
            } else {
                (xi[2] + 1.0) / 2.0
            };
            Ok([base[0], base[1], z])
        }
        ReferenceCell::Point | ReferenceCell::Pyramid => Err(Error::UnsupportedOperation {
            cell_type,
            operation: "refinement",
        }),
    }
}

/// Map a point through the affine map sending the reference simplex onto the given nodes
fn affine_child(nodes_of: CellType, corners: &[usize], xi: &Point) -> Result<Point> {
    let origin = reference_point(nodes_of, corners[0])?;
    let mut x = origin;
    for (a, corner) in corners.iter().skip(1).enumerate() {
        let c = reference_point(nodes_of, *corner)?;
        for d in 0..3 {
            x[d] += xi[a] * (c[d] - origin[d]);
        }
    }
    Ok(x)
}
