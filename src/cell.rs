//! Finite element cells
//!
//! Cell connectivity tables, side and edge building and refinement embeddings for every
//! [CellType].

pub mod connectivity;
pub mod element;
pub mod embedding;
pub mod reference_cell;
pub mod shape;

pub use element::Cell;
pub use embedding::{embedding_matrix, embedding_weight, EmbeddingMatrix};
pub use reference_cell::Point;

use crate::traits::types::{CellType, IoPackage, ALL_CELL_TYPES};
use crate::types::{Error, Result};
use itertools::Itertools;
use rayon::prelude::*;

impl CellType {
    /// The number of vertices
    pub fn vertex_count(&self) -> usize {
        reference_cell::vertex_count(*self)
    }

    /// The number of sides
    pub fn side_count(&self) -> usize {
        connectivity::side_count(*self)
    }

    /// The number of edges
    pub fn edge_count(&self) -> usize {
        connectivity::edge_count(*self)
    }

    /// The number of children one refinement creates, 0 if the cell cannot be refined
    pub fn child_count(&self) -> usize {
        if self.supports_refinement() {
            reference_cell::child_count(self.reference_cell())
        } else {
            0
        }
    }

    /// The cell type of a side
    pub fn side_type(&self, side: usize) -> Result<CellType> {
        connectivity::side_type(*self, side)
    }

    /// The cell type of the edges
    pub fn edge_type(&self) -> Option<CellType> {
        connectivity::edge_type(*self)
    }

    /// Is the local node a vertex?
    pub fn is_vertex(&self, node: usize) -> bool {
        reference_cell::is_vertex(*self, node)
    }

    /// Is the local node on the given side?
    pub fn is_node_on_side(&self, node: usize, side: usize) -> Result<bool> {
        connectivity::is_node_on_side(*self, node, side)
    }

    /// The reference coordinates of a local node
    pub fn reference_point(&self, node: usize) -> Result<Point> {
        reference_cell::reference_point(*self, node)
    }
}

fn check(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::InvariantViolation(message()))
    }
}

fn check_table(cell_type: CellType, name: &str, table: &[&[usize]]) -> Result<()> {
    for (i, row) in table.iter().enumerate() {
        check(row.iter().all(|n| *n < cell_type.node_count()), || {
            format!("{cell_type:?} {name} {i} references a missing node")
        })?;
        check(row.iter().all_unique(), || {
            format!("{cell_type:?} {name} {i} repeats a node")
        })?;
    }
    Ok(())
}

fn centroid(points: &[Point]) -> Point {
    [0, 1, 2].map(|d| points.iter().map(|p| p[d]).sum::<f64>() / points.len() as f64)
}

/// Every side of a 3D cell has a right-handed normal pointing out of the cell, apart
/// from the pyramid base
fn check_side_orientation(cell_type: CellType) -> Result<()> {
    let vertices = (0..cell_type.vertex_count())
        .map(|v| cell_type.reference_point(v))
        .collect::<Result<Vec<_>>>()?;
    let centre = centroid(&vertices);
    for (side, row) in connectivity::side_nodes(cell_type).iter().enumerate() {
        let corners = row
            .iter()
            .take(cell_type.side_type(side)?.vertex_count())
            .map(|n| cell_type.reference_point(*n))
            .collect::<Result<Vec<_>>>()?;
        let a = [0, 1, 2].map(|d| corners[1][d] - corners[0][d]);
        let b = [0, 1, 2].map(|d| corners[2][d] - corners[0][d]);
        let normal = [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ];
        let side_centre = centroid(&corners);
        let outwards = (0..3)
            .map(|d| normal[d] * (side_centre[d] - centre[d]))
            .sum::<f64>();
        let inward_base = cell_type == CellType::Pyramid5 && side == 0;
        check((outwards > 0.0) != inward_base, || {
            format!("side {side} of {cell_type:?} has the wrong orientation")
        })?;
    }
    Ok(())
}

fn check_cell_type(cell_type: CellType) -> Result<()> {
    check_table(cell_type, "side", connectivity::side_nodes(cell_type))?;
    check_table(cell_type, "edge", connectivity::edge_nodes(cell_type))?;

    if cell_type != CellType::NodeElem {
        for (side, row) in connectivity::side_nodes(cell_type).iter().enumerate() {
            let side_type = cell_type.side_type(side)?;
            check(side_type.node_count() == row.len(), || {
                format!(
                    "side {side} of {cell_type:?} has {} nodes but {side_type:?} needs {}",
                    row.len(),
                    side_type.node_count()
                )
            })?;
        }
    }
    if cell_type.dim() == 3 {
        check_side_orientation(cell_type)?;
    }
    if let Some(edge_type) = cell_type.edge_type() {
        for row in connectivity::edge_nodes(cell_type) {
            check(row.len() == edge_type.node_count(), || {
                format!("{cell_type:?} has an edge that is not a {edge_type:?}")
            })?;
        }
    }

    for io in [IoPackage::Native, IoPackage::Tecplot, IoPackage::Vtk, IoPackage::Gmsh] {
        if let Some(perm) = connectivity::node_permutation(cell_type, io) {
            check(
                perm.len() == cell_type.node_count()
                    && perm.iter().all(|n| *n < cell_type.node_count())
                    && perm.iter().all_unique(),
                || format!("{io:?} permutation of {cell_type:?} is not a bijection"),
            )?;
        }
    }

    if cell_type.supports_refinement() {
        let matrix = embedding::EmbeddingMatrix::new(cell_type)?;
        for child in 0..matrix.child_count() {
            for child_node in 0..matrix.node_count() {
                let row = matrix.row(child, child_node)?;
                let sum = row.iter().sum::<f64>();
                check(approx::abs_diff_eq!(sum, 1.0, epsilon = 1e-9), || {
                    format!("embedding of {cell_type:?} child {child} node {child_node} sums to {sum}")
                })?;
                if cell_type.is_linear() {
                    check(row.iter().all(|w| (0.0..=1.0).contains(w)), || {
                        format!("embedding of {cell_type:?} child {child} has a weight outside [0, 1]")
                    })?;
                }
            }
        }
    } else {
        check(embedding::embedding_matrix(cell_type).is_err(), || {
            format!("{cell_type:?} cannot be refined but has an embedding")
        })?;
    }
    Ok(())
}

/// Verify the static tables of every cell type
///
/// Cell types are checked in parallel. The first violation found is returned.
pub fn check_invariants() -> Result<()> {
    ALL_CELL_TYPES
        .par_iter()
        .map(|cell_type| check_cell_type(*cell_type))
        .collect::<Result<Vec<_>>>()
        .map(|_| ())
}

#[cfg(test)]
mod test {
    use super::*;
    use paste::paste;

    #[test]
    fn test_invariants() {
        check_invariants().unwrap();
    }

    #[test]
    fn test_side_orientation() {
        for cell_type in [
            CellType::Tet4,
            CellType::Tet10,
            CellType::Hex8,
            CellType::Hex20,
            CellType::Hex27,
            CellType::Prism6,
            CellType::Prism15,
            CellType::Prism18,
            CellType::Pyramid5,
        ] {
            check_side_orientation(cell_type).unwrap();
        }
    }

    macro_rules! test_cell {

        ($($cell:ident),+) => {

        $(
            paste! {

                #[test]
                fn [<test_ $cell:lower>]() {
                    let c = CellType::[<$cell>];
                    let counts = reference_cell::entity_counts(c.reference_cell());
                    assert_eq!(c.vertex_count(), counts[0]);
                    assert_eq!(c.edge_count(), counts[1]);
                    assert_eq!(c.side_count() > 0, c.dim() > 0);

                    for side in 0..c.side_count() {
                        let st = c.side_type(side).unwrap();
                        assert_eq!(st.dim() + 1, c.dim());
                        for node in connectivity::side_nodes(c)[side] {
                            assert!(c.is_node_on_side(*node, side).unwrap());
                        }
                    }
                    assert!(c.side_type(c.side_count()).is_err());

                    for node in 0..c.node_count() {
                        assert_eq!(c.is_vertex(node), node < c.vertex_count());
                        assert!(c.reference_point(node).is_ok());
                    }
                    assert!(c.reference_point(c.node_count()).is_err());

                    let cell = Cell::new(c, None);
                    assert_eq!(cell.nodes().len(), c.node_count());
                    assert_eq!(cell.child_count(), c.child_count());
                    assert_eq!(embedding_matrix(c).is_ok(), c.supports_refinement());
                }

            }
        )*
        };
    }

    test_cell!(
        NodeElem, Edge2, Edge3, Tri3, Tri6, Quad4, Quad8, Quad9, Tet4, Tet10, Hex8, Hex20, Hex27,
        Prism6, Prism15, Prism18, Pyramid5
    );

    #[test]
    fn test_child_counts() {
        assert_eq!(CellType::Edge3.child_count(), 2);
        assert_eq!(CellType::Quad8.child_count(), 4);
        assert_eq!(CellType::Prism15.child_count(), 8);
        assert_eq!(CellType::Pyramid5.child_count(), 0);
        assert_eq!(CellType::NodeElem.child_count(), 0);
    }
}
