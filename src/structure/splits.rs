//! Stable two-way partition of a category, built from single-variable moves.
//!
//! Each element that fails the caller's test is moved to the end of its
//! category, so the elements that pass end up first and both groups keep
//! their original relative order. Typical use is sorting linear components
//! ahead of nonlinear ones before building the linear sub-matrices.

use crate::error::Result;
use crate::model::{Category, Core, expect_len};
use crate::structure::moves::move_in;
use crate::structure::permutation::{move_permutation, permute_columns, permute_square};
use ndarray::{Array2, ArrayView1};

/// Sizes of the two groups produced by a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Split {
    /// Elements that passed, now at the start of the category.
    pub leading: usize,
    /// Elements that failed, now at the end of the category.
    pub trailing: usize,
}

/// How a caller-side criterion matrix is kept aligned with the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Only columns follow the category (rows index something else).
    Columns,
    /// Square matrix whose rows and columns both follow the category.
    Symmetric,
}

/// Partition `category` so that every element for which `keep(core, index)`
/// holds comes first.
///
/// `keep` sees the core as it is at the moment of the test, with the element
/// under test at `index`.
pub fn split_category<S, E, F>(core: &mut Core<S, E>, category: Category, mut keep: F) -> Result<Split>
where
    S: Clone,
    E: Clone,
    F: FnMut(&Core<S, E>, usize) -> bool,
{
    let dim = core.dims().get(category);
    let mut leading = 0;
    for _ in 0..dim {
        if keep(core, leading) {
            leading += 1;
        } else {
            move_in(core, category, leading, dim - 1)?;
        }
    }
    Ok(Split {
        leading,
        trailing: dim - leading,
    })
}

/// Partition `category` by testing columns of a criterion matrix, which is
/// reordered along with the core.
///
/// The criterion must have one column per element of the category.
pub fn split_by_criterion<S, E, C, F>(
    core: &mut Core<S, E>,
    category: Category,
    criterion: &mut Array2<C>,
    alignment: Alignment,
    mut keep: F,
) -> Result<Split>
where
    S: Clone,
    E: Clone,
    C: Clone,
    F: FnMut(ArrayView1<'_, C>) -> bool,
{
    let dim = core.dims().get(category);
    expect_len("criterion columns", dim, criterion.ncols())?;
    let mut leading = 0;
    for _ in 0..dim {
        if keep(criterion.column(leading)) {
            leading += 1;
            continue;
        }
        let perm = move_permutation(dim, leading, dim - 1)?;
        let next = match alignment {
            Alignment::Columns => permute_columns(criterion, &perm)?,
            Alignment::Symmetric => permute_square(criterion, &perm)?,
        };
        move_in(core, category, leading, dim - 1)?;
        *criterion = next;
    }
    Ok(Split {
        leading,
        trailing: dim - leading,
    })
}
