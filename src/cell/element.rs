//! Mesh cells

use crate::cell::connectivity;
use crate::cell::embedding;
use crate::traits::types::{CellType, IoPackage};
use crate::types::{Error, Result};

/// A cell of a mesh
///
/// A cell holds one reference per local node. References are indices into the owning
/// mesh's node storage and are unset until bound.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    cell_type: CellType,
    nodes: Vec<Option<usize>>,
    parent: Option<usize>,
    pub(crate) children: Vec<usize>,
    level: usize,
}

impl Cell {
    /// Create a cell with every node unset
    pub fn new(cell_type: CellType, parent: Option<usize>) -> Self {
        Self {
            cell_type,
            nodes: vec![None; cell_type.node_count()],
            parent,
            children: vec![],
            level: 0,
        }
    }

    pub(crate) fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    /// The cell type
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// The node references, in the order they were bound
    pub fn nodes(&self) -> &[Option<usize>] {
        &self.nodes
    }

    /// The node bound at local position `i`
    pub fn node(&self, i: usize) -> Result<Option<usize>> {
        self.nodes.get(i).copied().ok_or(Error::IndexOutOfRange {
            what: "cell node",
            index: i,
            len: self.nodes.len(),
        })
    }

    /// Bind local position `i` to a mesh node
    pub fn set_node(&mut self, i: usize, node: usize) -> Result<()> {
        let len = self.nodes.len();
        match self.nodes.get_mut(i) {
            Some(slot) => {
                *slot = Some(node);
                Ok(())
            }
            None => Err(Error::IndexOutOfRange {
                what: "cell node",
                index: i,
                len,
            }),
        }
    }

    /// The parent of this cell in the refinement tree
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// The children of this cell in the refinement tree
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// The refinement depth (0 for cells that were not created by refinement)
    pub fn level(&self) -> usize {
        self.level
    }

    /// Has this cell been refined?
    pub fn is_active(&self) -> bool {
        self.children.is_empty()
    }

    /// The number of sides
    pub fn side_count(&self) -> usize {
        connectivity::side_count(self.cell_type)
    }

    /// The number of edges
    pub fn edge_count(&self) -> usize {
        connectivity::edge_count(self.cell_type)
    }

    /// The number of children one refinement creates
    pub fn child_count(&self) -> usize {
        self.cell_type.child_count()
    }

    /// Build a side of this cell as a new cell
    ///
    /// The node references of this cell are read as stored in `io`'s ordering. The side
    /// is a root cell with no refinement history.
    pub fn build_side(&self, side: usize, io: IoPackage) -> Result<Cell> {
        let side_type = connectivity::side_type(self.cell_type, side)?;
        let mut cell = Cell::new(side_type, None);
        for (i, position) in connectivity::side_row(self.cell_type, side, io)?
            .into_iter()
            .enumerate()
        {
            cell.nodes[i] = self.nodes[position];
        }
        Ok(cell)
    }

    /// Build an edge of this cell as a new cell
    pub fn build_edge(&self, edge: usize) -> Result<Cell> {
        let edges = connectivity::edge_nodes(self.cell_type);
        let row = edges.get(edge).ok_or(Error::IndexOutOfRange {
            what: "edge",
            index: edge,
            len: edges.len(),
        })?;
        let edge_type = connectivity::edge_type(self.cell_type).ok_or(
            Error::UnsupportedOperation {
                cell_type: self.cell_type,
                operation: "edges",
            },
        )?;
        let mut cell = Cell::new(edge_type, None);
        for (i, n) in row.iter().enumerate() {
            cell.nodes[i] = self.nodes[*n];
        }
        Ok(cell)
    }

    /// The node references of a side, in side order
    pub fn side_nodes(&self, side: usize) -> Result<Vec<Option<usize>>> {
        Ok(self.build_side(side, IoPackage::Native)?.nodes)
    }

    /// The weight of a parent node for a node of a child of this cell
    pub fn embedding_weight(
        &self,
        child: usize,
        child_node: usize,
        parent_node: usize,
    ) -> Result<f64> {
        embedding::embedding_weight(self.cell_type, child, child_node, parent_node)
    }

    /// The node references of a sub-element, in the order a codec writes them
    pub fn connectivity(&self, sub: usize, io: IoPackage) -> Result<Vec<Option<usize>>> {
        Ok(connectivity::sub_element_nodes(self.cell_type, sub, io)?
            .into_iter()
            .map(|n| self.nodes[n])
            .collect())
    }
}
