//! Error type shared by the structure operations.

use crate::model::Category;
use thiserror::Error;

/// Failures raised while inspecting or reordering a [`crate::model::Core`].
///
/// All of them are detected before any state is touched, so a caller that
/// receives one can keep using the core as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// A raw permutation index is outside `0..len`.
    #[error("index {index} out of range for length {len}")]
    PermutationIndex { index: usize, len: usize },

    /// A category-relative index is outside `0..dim(category)`.
    #[error("{category} index {index} out of range (dimension {dim})")]
    IndexOutOfRange {
        category: Category,
        index: usize,
        dim: usize,
    },

    /// A category name that does not match any block.
    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    /// A matrix that must be square is not.
    #[error("matrix is not square ({rows}x{cols})")]
    NotSquare { rows: usize, cols: usize },

    /// A vector or matrix disagrees with the length implied by the core.
    #[error("{what}: expected length {expected}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// An index sequence that is not a bijection on `0..len`.
    #[error("sequence of length {len} is not a permutation")]
    NotAPermutation { len: usize },

    /// A textual move that does not follow `category:from:to`.
    #[error("invalid move '{0}': expected <category>:<from>:<to>")]
    InvalidMove(String),
}

pub type Result<T> = std::result::Result<T, StructureError>;
