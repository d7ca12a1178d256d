//! Types specific to meshgeom

use crate::traits::types::CellType;

/// Error type
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The cell type refuses the operation
    #[error("{cell_type:?} does not support {operation}")]
    UnsupportedOperation {
        /// The refusing cell type
        cell_type: CellType,
        /// The refused operation
        operation: &'static str,
    },
    /// An index lies outside a table or container
    #[error("{what} index {index} is out of range (length {len})")]
    IndexOutOfRange {
        /// The indexed table or container
        what: &'static str,
        /// The requested index
        index: usize,
        /// The number of valid entries
        len: usize,
    },
    /// A static table breaks one of its invariants
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    /// An operation was called in the wrong state
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// A cell was given the wrong number of nodes
    #[error("{cell_type:?} needs {expected} nodes, {found} given")]
    NodeCountMismatch {
        /// The cell type
        cell_type: CellType,
        /// The canonical node count
        expected: usize,
        /// The number of nodes given
        found: usize,
    },
    /// A node reference of a cell has not been bound
    #[error("Node {node} of cell {cell} is not bound")]
    UnboundNode {
        /// The cell index
        cell: usize,
        /// The local node
        node: usize,
    },
    /// The external eigensolver failed
    #[error("Solver Error: {0}")]
    Solver(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
