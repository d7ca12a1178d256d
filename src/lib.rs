//! Meshgeom
//!
//! Canonical finite element cell shapes, their side and edge connectivity,
//! side building, refinement embeddings and the eigenproblem system that
//! consumes assembled matrices downstream.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

pub mod cell;
pub mod eigen_system;
pub mod mesh;
pub mod traits;
pub mod types;

pub use types::{Error, Result};
