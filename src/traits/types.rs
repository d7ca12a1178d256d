//! General type definitions
pub mod cell;
pub mod eigen;

pub use cell::{CellType, ReferenceCell, ALL_CELL_TYPES};
pub use eigen::{EigenProblemType, EigenSolverType};

/// Interpolation order
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Order {
    /// Linear
    First,
    /// Quadratic
    Second,
}

/// Node ordering convention of an external codec
///
/// A cell's node list is interpreted in the convention's ordering. `Native` is the
/// ordering the connectivity tables are written in.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub enum IoPackage {
    /// The library's own ordering
    #[default]
    Native,
    /// Tecplot: native ordering, linear sub-elements written as quads and bricks
    Tecplot,
    /// VTK legacy and XML cells
    Vtk,
    /// Gmsh `.msh` elements
    Gmsh,
}
