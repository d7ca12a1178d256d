//! Refinement embedding matrices
//!
//! The embedding matrix of a cell type holds, for each child and each child node, the
//! weights that express the child node as a combination of the parent's nodes. The weight
//! of parent node `p` for node `n` of child `c` is the value of the parent shape function
//! `p` at the position of `n` mapped into the parent.

use crate::cell::reference_cell::{self, reference_point};
use crate::cell::shape::{child_point, shape};
use crate::traits::types::{CellType, ALL_CELL_TYPES};
use crate::types::{Error, Result};
use num::Float;

/// Weights below this magnitude are stored as exactly zero
const ZERO_TOLERANCE: f64 = 1e-14;

/// The embedding weights of one cell type
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    cell_type: CellType,
    child_count: usize,
    node_count: usize,
    weights: Vec<f64>,
}

impl EmbeddingMatrix {
    /// Generate the embedding matrix of a cell type
    pub fn new(cell_type: CellType) -> Result<Self> {
        if !cell_type.supports_refinement() {
            return Err(Error::UnsupportedOperation {
                cell_type,
                operation: "refinement",
            });
        }
        let child_count = reference_cell::child_count(cell_type.reference_cell());
        let node_count = cell_type.node_count();
        let mut weights = vec![0.0; child_count * node_count * node_count];

        for child in 0..child_count {
            for child_node in 0..node_count {
                let x = child_point(cell_type, child, &reference_point(cell_type, child_node)?)?;
                let row = &mut weights[(child * node_count + child_node) * node_count..]
                    [..node_count];
                for (parent_node, w) in row.iter_mut().enumerate() {
                    let value = shape(cell_type, parent_node, &x)?;
                    *w = if value.abs() < ZERO_TOLERANCE {
                        0.0
                    } else {
                        value
                    };
                }
                let sum = row.iter().sum::<f64>();
                if (sum - 1.0).abs() > 1e-12 {
                    return Err(Error::InvariantViolation(format!(
                        "embedding row {child_node} of child {child} of {cell_type:?} sums to {sum}"
                    )));
                }
            }
        }
        log::debug!(
            "Generated embedding matrix for {cell_type:?}: {child_count} children, {node_count} nodes"
        );

        Ok(Self {
            cell_type,
            child_count,
            node_count,
            weights,
        })
    }

    /// The cell type
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// The number of children
    pub fn child_count(&self) -> usize {
        self.child_count
    }

    /// The number of nodes of the parent and of each child
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    fn check(&self, what: &'static str, index: usize, len: usize) -> Result<()> {
        if index >= len {
            Err(Error::IndexOutOfRange { what, index, len })
        } else {
            Ok(())
        }
    }

    /// The weight of a parent node for a node of a child
    pub fn weight(&self, child: usize, child_node: usize, parent_node: usize) -> Result<f64> {
        self.check("child", child, self.child_count)?;
        self.check("child node", child_node, self.node_count)?;
        self.check("parent node", parent_node, self.node_count)?;
        Ok(self.weights[(child * self.node_count + child_node) * self.node_count + parent_node])
    }

    /// The weights of every parent node for a node of a child
    pub fn row(&self, child: usize, child_node: usize) -> Result<&[f64]> {
        self.check("child", child, self.child_count)?;
        self.check("child node", child_node, self.node_count)?;
        let start = (child * self.node_count + child_node) * self.node_count;
        Ok(&self.weights[start..start + self.node_count])
    }

    /// Interpolate nodal values of the parent onto the nodes of a child
    pub fn apply<T: Float>(&self, child: usize, parent_values: &[T]) -> Result<Vec<T>> {
        self.check("child", child, self.child_count)?;
        if parent_values.len() != self.node_count {
            return Err(Error::NodeCountMismatch {
                cell_type: self.cell_type,
                expected: self.node_count,
                found: parent_values.len(),
            });
        }
        (0..self.node_count)
            .map(|child_node| {
                let mut value = T::zero();
                for (w, v) in self.row(child, child_node)?.iter().zip(parent_values) {
                    if *w != 0.0 {
                        let w = T::from(*w).ok_or_else(|| {
                            Error::InvariantViolation(format!("weight {w} is not representable"))
                        })?;
                        value = value + w * *v;
                    }
                }
                Ok(value)
            })
            .collect()
    }
}

lazy_static! {
    static ref EMBEDDINGS: Vec<Option<EmbeddingMatrix>> = ALL_CELL_TYPES
        .iter()
        .map(|cell_type| {
            if cell_type.supports_refinement() {
                match EmbeddingMatrix::new(*cell_type) {
                    Ok(matrix) => Some(matrix),
                    Err(e) => panic!("Corrupt embedding table: {e}"),
                }
            } else {
                None
            }
        })
        .collect();
}

/// The embedding matrix of a cell type
pub fn embedding_matrix(cell_type: CellType) -> Result<&'static EmbeddingMatrix> {
    EMBEDDINGS[cell_type as usize]
        .as_ref()
        .ok_or(Error::UnsupportedOperation {
            cell_type,
            operation: "refinement",
        })
}

/// The weight of parent node `parent_node` for node `child_node` of child `child`
pub fn embedding_weight(
    cell_type: CellType,
    child: usize,
    child_node: usize,
    parent_node: usize,
) -> Result<f64> {
    embedding_matrix(cell_type)?.weight(child, child_node, parent_node)
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::*;

    #[test]
    fn test_edge2() {
        let e = embedding_matrix(CellType::Edge2).unwrap();
        assert_eq!(e.child_count(), 2);
        assert_relative_eq!(e.weight(0, 0, 0).unwrap(), 1.0);
        assert_relative_eq!(e.weight(0, 1, 0).unwrap(), 0.5);
        assert_relative_eq!(e.weight(0, 1, 1).unwrap(), 0.5);
        assert_relative_eq!(e.weight(1, 1, 1).unwrap(), 1.0);
        assert_eq!(e.weight(1, 1, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_quad4_centre() {
        // Node 2 of child 0 is the centre of the parent
        for p in 0..4 {
            assert_relative_eq!(
                embedding_weight(CellType::Quad4, 0, 2, p).unwrap(),
                0.25
            );
        }
    }

    #[test]
    fn test_tri6_corner_child() {
        // Child 0 keeps vertex 0 and places its vertices 1 and 2 on parent mid-nodes
        let e = embedding_matrix(CellType::Tri6).unwrap();
        assert_eq!(e.row(0, 0).unwrap(), &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(e.row(0, 1).unwrap(), &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_relative_eq!(e.weight(0, 3, 0).unwrap(), 0.375);
        assert_relative_eq!(e.weight(0, 3, 1).unwrap(), -0.125);
        assert_relative_eq!(e.weight(0, 3, 3).unwrap(), 0.75);
    }

    #[test]
    fn test_hex27_interior_node() {
        // Child 7 has its node 0 at the parent centre
        let e = embedding_matrix(CellType::Hex27).unwrap();
        let row = e.row(7, 0).unwrap();
        assert_eq!(row[26], 1.0);
        assert_eq!(row.iter().filter(|w| **w != 0.0).count(), 1);
    }

    #[test]
    fn test_apply() {
        let e = embedding_matrix(CellType::Edge2).unwrap();
        let values = e.apply(1, &[2.0f32, 4.0]).unwrap();
        assert_relative_eq!(values[0], 3.0);
        assert_relative_eq!(values[1], 4.0);
        assert!(matches!(
            e.apply(0, &[1.0f64]),
            Err(Error::NodeCountMismatch { .. })
        ));
    }

    #[test]
    fn test_unsupported() {
        for cell_type in [CellType::Pyramid5, CellType::NodeElem] {
            assert!(matches!(
                embedding_matrix(cell_type),
                Err(Error::UnsupportedOperation { .. })
            ));
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            embedding_weight(CellType::Tri3, 4, 0, 0),
            Err(Error::IndexOutOfRange { what: "child", .. })
        ));
        assert!(matches!(
            embedding_weight(CellType::Tri3, 0, 3, 0),
            Err(Error::IndexOutOfRange {
                what: "child node",
                ..
            })
        ));
    }
}
