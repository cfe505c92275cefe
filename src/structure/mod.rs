//! Structural reordering of a [`Core`](crate::model::Core).
//!
//! Sub-modules:
//!
//! - [`permutation`] – move permutations and their application to vectors and matrices
//! - [`offsets`] – where each category's block starts in the structure matrix
//! - [`moves`] – the four category moves
//! - [`splits`] – stable partition of a category by a caller test

pub mod moves;
pub mod offsets;
pub mod permutation;
pub mod splits;

pub use moves::{move_connector, move_diss, move_in, move_port, move_stor};
pub use offsets::{offset, offset_by_name, window};
pub use permutation::{
    embed_permutation, is_permutation, move_permutation, permute_columns, permute_square,
    permute_structure, permute_vec,
};
pub use splits::{Alignment, Split, split_by_criterion, split_category};
