//! Trait definitions

mod eigen;
pub mod types;

pub use eigen::{EigenSolver, SystemMatrix};
