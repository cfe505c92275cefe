//! Structural reordering of port-Hamiltonian system cores.
//!
//! A [`model::Core`] holds the variables of a physical network in four
//! categories (storage, dissipation, port, connector) together with the
//! block structure matrix that couples them. This crate moves a variable to a
//! new position inside its category while keeping every vector, the matrix
//! rows/columns and the dissipation-local matrix in step.
//!
//! The binary `phscore` applies moves to cores stored as JSON.

pub mod editor;
pub mod error;
pub mod model;
pub mod script;
pub mod structure;

pub use error::{Result, StructureError};
pub use model::{Category, Core, Dims, StructureMatrix};
