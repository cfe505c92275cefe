//! Index permutations that relocate one element while keeping the others in order.
//!
//! A permutation here is a `Vec<usize>` read as "position `a` of the result
//! takes element `perm[a]` of the input", so applying it to a vector gives
//! `v'[a] = v[perm[a]]` and applying it symmetrically to a square matrix gives
//! `M'[a, b] = M[perm[a], perm[b]]`.

use crate::error::{Result, StructureError};
use crate::model::StructureMatrix;
use ndarray::{Array2, Axis};

/// Return `0..n` with the element at `from` relocated to position `to`.
///
/// Elements between the two positions shift by one slot toward `from`;
/// everything outside `[min(from, to), max(from, to)]` stays fixed.
///
/// ```
/// use phscore::structure::move_permutation;
/// assert_eq!(move_permutation(4, 0, 2).unwrap(), vec![1, 2, 0, 3]);
/// assert_eq!(move_permutation(4, 3, 1).unwrap(), vec![0, 3, 1, 2]);
/// ```
pub fn move_permutation(n: usize, from: usize, to: usize) -> Result<Vec<usize>> {
    for index in [from, to] {
        if index >= n {
            return Err(StructureError::PermutationIndex { index, len: n });
        }
    }
    let mut perm: Vec<usize> = (0..n).collect();
    let moved = perm.remove(from);
    perm.insert(to, moved);
    Ok(perm)
}

/// Lift a permutation of a block into the index space of the full matrix.
///
/// Positions outside `[offset, offset + perm.len())` map to themselves.
pub fn embed_permutation(perm: &[usize], offset: usize, total: usize) -> Result<Vec<usize>> {
    if offset + perm.len() > total {
        return Err(StructureError::LengthMismatch {
            what: "embedded window",
            expected: total,
            found: offset + perm.len(),
        });
    }
    let mut full: Vec<usize> = (0..total).collect();
    for (k, &p) in perm.iter().enumerate() {
        full[offset + k] = offset + p;
    }
    Ok(full)
}

/// True when `perm` is a bijection on `0..perm.len()`.
pub fn is_permutation(perm: &[usize]) -> bool {
    let mut seen = vec![false; perm.len()];
    for &p in perm {
        match seen.get_mut(p) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

fn check_permutation(perm: &[usize], len: usize, what: &'static str) -> Result<()> {
    if perm.len() != len {
        return Err(StructureError::LengthMismatch {
            what,
            expected: len,
            found: perm.len(),
        });
    }
    if !is_permutation(perm) {
        return Err(StructureError::NotAPermutation { len });
    }
    Ok(())
}

/// Reorder a vector: `v'[a] = v[perm[a]]`.
pub fn permute_vec<T: Clone>(values: &[T], perm: &[usize]) -> Result<Vec<T>> {
    check_permutation(perm, values.len(), "vector")?;
    Ok(perm.iter().map(|&p| values[p].clone()).collect())
}

/// Reorder rows and columns of a square matrix identically.
pub fn permute_square<E: Clone>(matrix: &Array2<E>, perm: &[usize]) -> Result<Array2<E>> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(StructureError::NotSquare { rows, cols });
    }
    check_permutation(perm, rows, "matrix")?;
    Ok(matrix.select(Axis(0), perm).select(Axis(1), perm))
}

/// Symmetric reorder of a [`StructureMatrix`]. A zero matrix is returned as is
/// after a length check, without touching any entries.
pub fn permute_structure<E: Clone>(
    matrix: &StructureMatrix<E>,
    perm: &[usize],
) -> Result<StructureMatrix<E>> {
    match matrix {
        StructureMatrix::Zero { dim } => {
            if perm.len() != *dim {
                return Err(StructureError::LengthMismatch {
                    what: "matrix",
                    expected: *dim,
                    found: perm.len(),
                });
            }
            Ok(StructureMatrix::Zero { dim: *dim })
        }
        StructureMatrix::Dense(m) => Ok(StructureMatrix::Dense(permute_square(m, perm)?)),
    }
}

/// Reorder only the columns of a (possibly rectangular) matrix.
pub fn permute_columns<E: Clone>(matrix: &Array2<E>, perm: &[usize]) -> Result<Array2<E>> {
    check_permutation(perm, matrix.ncols(), "matrix columns")?;
    Ok(matrix.select(Axis(1), perm))
}
