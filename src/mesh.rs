//! Mesh storage and refinement
//!
//! A [Mesh] owns its nodes and cells; cells refer to nodes and to each other by index.

use crate::cell::{embedding_matrix, Cell};
use crate::traits::types::{CellType, IoPackage};
use crate::types::{Error, Result};
use itertools::Itertools;
use num::Float;
use rayon::prelude::*;
use std::collections::HashMap;

/// A mesh node
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T: Float> {
    index: usize,
    point: [T; 3],
}

impl<T: Float> Node<T> {
    /// The index of the node in its mesh
    pub fn index(&self) -> usize {
        self.index
    }

    /// The physical coordinates
    pub fn point(&self) -> &[T; 3] {
        &self.point
    }
}

/// A mesh with a refinement tree
#[derive(Debug)]
pub struct Mesh<T: Float> {
    nodes: Vec<Node<T>>,
    cells: Vec<Cell>,
    /// Nodes created by refinement, keyed by the parent nodes and weights that place them
    ///
    /// Entries are kept for the lifetime of the mesh, including those of parents whose
    /// neighbours are all refined. Use [Mesh::clear_refinement_nodes] to release them.
    refinement_nodes: HashMap<Vec<(usize, u64)>, usize>,
}

impl<T: Float> Default for Mesh<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> Mesh<T> {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self {
            nodes: vec![],
            cells: vec![],
            refinement_nodes: HashMap::new(),
        }
    }

    /// Add a node and return its index
    pub fn add_node(&mut self, point: [T; 3]) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node { index, point });
        index
    }

    /// Add a root cell with its nodes in native order and return its index
    pub fn add_cell(&mut self, cell_type: CellType, nodes: &[usize]) -> Result<usize> {
        if nodes.len() != cell_type.node_count() {
            return Err(Error::NodeCountMismatch {
                cell_type,
                expected: cell_type.node_count(),
                found: nodes.len(),
            });
        }
        let mut cell = Cell::new(cell_type, None);
        for (i, n) in nodes.iter().enumerate() {
            self.check_node(*n)?;
            cell.set_node(i, *n)?;
        }
        self.cells.push(cell);
        Ok(self.cells.len() - 1)
    }

    /// Add a root cell with every node unset and return its index
    pub fn add_unbound_cell(&mut self, cell_type: CellType) -> usize {
        self.cells.push(Cell::new(cell_type, None));
        self.cells.len() - 1
    }

    /// Bind local node `local` of a cell to a mesh node
    pub fn bind(&mut self, cell: usize, local: usize, node: usize) -> Result<()> {
        self.check_node(node)?;
        let ncells = self.cells.len();
        self.cells
            .get_mut(cell)
            .ok_or(Error::IndexOutOfRange {
                what: "cell",
                index: cell,
                len: ncells,
            })?
            .set_node(local, node)
    }

    fn check_node(&self, node: usize) -> Result<()> {
        if node < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                what: "node",
                index: node,
                len: self.nodes.len(),
            })
        }
    }

    /// The number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The number of cells, including refined ones
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// A node
    pub fn node(&self, index: usize) -> Option<&Node<T>> {
        self.nodes.get(index)
    }

    /// A cell
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// The indices of the cells that have not been refined
    pub fn active_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_active())
            .map(|(i, _)| i)
            .collect()
    }

    /// The bound nodes of a cell, failing on the first unset reference
    fn bound_nodes(&self, index: usize) -> Result<Vec<usize>> {
        let cell = self.cell(index).ok_or(Error::IndexOutOfRange {
            what: "cell",
            index,
            len: self.cells.len(),
        })?;
        cell.nodes()
            .iter()
            .enumerate()
            .map(|(node, n)| n.ok_or(Error::UnboundNode { cell: index, node }))
            .collect()
    }

    /// Refine a cell and return the indices of its children
    ///
    /// Child nodes are placed by interpolating the parent's node coordinates with the
    /// embedding matrix. A child node lying on a parent node reuses it, and new nodes are
    /// shared with neighbouring cells that create the same combination of parent nodes.
    pub fn refine(&mut self, index: usize) -> Result<Vec<usize>> {
        let parent_nodes = self.bound_nodes(index)?;
        let parent = &self.cells[index];
        if !parent.is_active() {
            return Err(Error::InvalidState(format!("cell {index} is already refined")));
        }
        let cell_type = parent.cell_type();
        let level = parent.level() + 1;
        let matrix = embedding_matrix(cell_type)?;

        let mut children = Vec::with_capacity(matrix.child_count());
        let mut created = 0;
        for child in 0..matrix.child_count() {
            let mut cell = Cell::new(cell_type, Some(index)).with_level(level);
            let mut coordinates = vec![];
            for d in 0..3 {
                let values = parent_nodes
                    .iter()
                    .map(|n| self.nodes[*n].point[d])
                    .collect::<Vec<_>>();
                coordinates.push(matrix.apply(child, &values)?);
            }
            for child_node in 0..matrix.node_count() {
                let weights = matrix
                    .row(child, child_node)?
                    .iter()
                    .zip(&parent_nodes)
                    .filter(|(w, _)| **w != 0.0)
                    .map(|(w, n)| (*n, *w))
                    .collect::<Vec<_>>();
                let node = match weights.as_slice() {
                    [(n, w)] if *w == 1.0 => *n,
                    _ => {
                        let key = weights
                            .iter()
                            .map(|(n, w)| (*n, w.to_bits()))
                            .sorted()
                            .collect::<Vec<_>>();
                        if let Some(n) = self.refinement_nodes.get(&key).copied() {
                            n
                        } else {
                            let n = self.add_node([0, 1, 2].map(|d| coordinates[d][child_node]));
                            self.refinement_nodes.insert(key, n);
                            created += 1;
                            n
                        }
                    }
                };
                cell.set_node(child_node, node)?;
            }
            self.cells.push(cell);
            children.push(self.cells.len() - 1);
        }
        self.cells[index].children = children.clone();

        log::debug!(
            "Refined {cell_type:?} cell {index} into {} children ({created} new nodes)",
            children.len()
        );
        Ok(children)
    }

    /// The number of refinement-created nodes that later refinements can still share
    pub fn refinement_node_count(&self) -> usize {
        self.refinement_nodes.len()
    }

    /// Forget which nodes refinement created
    ///
    /// Nodes and cells are unchanged. Cells refined afterwards no longer share new nodes
    /// with cells refined before the call, so only clear between refinement levels of a
    /// mesh whose active cells are all refined together.
    pub fn clear_refinement_nodes(&mut self) {
        self.refinement_nodes.clear();
    }

    /// Refine every active cell
    pub fn refine_all(&mut self) -> Result<()> {
        for index in self.active_cells() {
            if self.cells[index].cell_type().supports_refinement() {
                self.refine(index)?;
            }
        }
        Ok(())
    }

    /// Build every side of every active cell
    ///
    /// The result holds, for each active cell in index order, its sides in side order.
    pub fn build_all_sides(&self, io: IoPackage) -> Result<Vec<Vec<Cell>>> {
        self.cells
            .par_iter()
            .filter(|c| c.is_active())
            .map(|c| {
                (0..c.side_count())
                    .map(|s| c.build_side(s, io))
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }

    /// The sides of active cells that no other active cell shares, as (cell, side) pairs
    ///
    /// Sides are matched by their vertex nodes, so the result is exact for conforming
    /// meshes.
    pub fn boundary_sides(&self) -> Result<Vec<(usize, usize)>> {
        let mut keys = vec![];
        for index in self.active_cells() {
            let cell = &self.cells[index];
            for side in 0..cell.side_count() {
                let side_cell = cell.build_side(side, IoPackage::Native)?;
                let key = side_cell
                    .nodes()
                    .iter()
                    .take(side_cell.cell_type().vertex_count())
                    .enumerate()
                    .map(|(node, n)| n.ok_or(Error::UnboundNode { cell: index, node }))
                    .collect::<Result<Vec<_>>>()?
                    .into_iter()
                    .sorted()
                    .collect::<Vec<_>>();
                keys.push(((index, side), key));
            }
        }
        let counts = keys.iter().map(|(_, k)| k.clone()).counts();
        Ok(keys
            .into_iter()
            .filter(|(_, k)| counts[k] == 1)
            .map(|(s, _)| s)
            .collect())
    }
}
