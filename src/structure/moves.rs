//! Moving one variable within its own category.
//!
//! Every move reorders the category's vectors and the matching rows/columns
//! of the structure matrix with the same permutation. The structure matrix is
//! permuted in absolute indices (the category block sits at its offset), while
//! the dissipation-local `zl` matrix is permuted in category-relative indices.
//!
//! A move either succeeds completely or leaves the core untouched: all new
//! values are computed first and only then written back.

use crate::error::{Result, StructureError};
use crate::model::{Category, Core, StructureMatrix};
use crate::structure::offsets::offset;
use crate::structure::permutation::{
    embed_permutation, move_permutation, permute_square, permute_structure, permute_vec,
};
use tracing::debug;

/// New contents of one category, ready to be written back into a core.
enum Reordered<S, E> {
    Storage {
        x: Vec<S>,
        dx_h: Option<Vec<E>>,
    },
    Dissipation {
        w: Vec<S>,
        z: Vec<E>,
        zl: Option<StructureMatrix<E>>,
    },
    Port {
        u: Vec<S>,
        y: Vec<S>,
    },
    Connector {
        cu: Vec<S>,
        cy: Vec<S>,
    },
}

impl<S: Clone, E: Clone> Reordered<S, E> {
    fn compute(core: &Core<S, E>, category: Category, perm: &[usize]) -> Result<Self> {
        Ok(match category {
            Category::Storage => Reordered::Storage {
                x: permute_vec(&core.x, perm)?,
                dx_h: core
                    .dx_h
                    .as_deref()
                    .map(|g| permute_vec(g, perm))
                    .transpose()?,
            },
            Category::Dissipation => Reordered::Dissipation {
                w: permute_vec(&core.w, perm)?,
                z: permute_vec(&core.z, perm)?,
                zl: core
                    .zl
                    .as_ref()
                    .map(|zl| permute_structure(zl, perm))
                    .transpose()?,
            },
            Category::Port => Reordered::Port {
                u: permute_vec(&core.u, perm)?,
                y: permute_vec(&core.y, perm)?,
            },
            Category::Connector => Reordered::Connector {
                cu: permute_vec(&core.cu, perm)?,
                cy: permute_vec(&core.cy, perm)?,
            },
        })
    }

    fn commit(self, core: &mut Core<S, E>) {
        match self {
            Reordered::Storage { x, dx_h } => {
                core.x = x;
                core.dx_h = dx_h;
            }
            Reordered::Dissipation { w, z, zl } => {
                core.w = w;
                core.z = z;
                core.zl = zl;
            }
            Reordered::Port { u, y } => {
                core.u = u;
                core.y = y;
            }
            Reordered::Connector { cu, cy } => {
                core.cu = cu;
                core.cy = cy;
            }
        }
    }
}

/// Move the `category` variable at relative index `from` to relative index `to`.
pub fn move_in<S: Clone, E: Clone>(
    core: &mut Core<S, E>,
    category: Category,
    from: usize,
    to: usize,
) -> Result<()> {
    let dims = core.dims();
    let dim = dims.get(category);
    for index in [from, to] {
        if index >= dim {
            return Err(StructureError::IndexOutOfRange {
                category,
                index,
                dim,
            });
        }
    }
    core.check()?;

    let perm = move_permutation(dim, from, to)?;
    let reordered = Reordered::compute(core, category, &perm)?;
    let m = match &core.m {
        StructureMatrix::Zero { .. } => None,
        StructureMatrix::Dense(matrix) => {
            let global = embed_permutation(&perm, offset(&dims, category), dims.total())?;
            Some(StructureMatrix::Dense(permute_square(matrix, &global)?))
        }
    };

    reordered.commit(core);
    if let Some(m) = m {
        core.m = m;
    }
    debug!(core = %core.label, %category, from, to, "moved variable");
    Ok(())
}

/// Move a storage state (and its cached gradient) from `from` to `to`.
pub fn move_stor<S: Clone, E: Clone>(core: &mut Core<S, E>, from: usize, to: usize) -> Result<()> {
    move_in(core, Category::Storage, from, to)
}

/// Move a dissipation variable together with its output and its `zl` row/column.
pub fn move_diss<S: Clone, E: Clone>(core: &mut Core<S, E>, from: usize, to: usize) -> Result<()> {
    move_in(core, Category::Dissipation, from, to)
}

/// Move a port input/output pair.
pub fn move_port<S: Clone, E: Clone>(core: &mut Core<S, E>, from: usize, to: usize) -> Result<()> {
    move_in(core, Category::Port, from, to)
}

/// Move a connector input/output pair.
pub fn move_connector<S: Clone, E: Clone>(
    core: &mut Core<S, E>,
    from: usize,
    to: usize,
) -> Result<()> {
    move_in(core, Category::Connector, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    /// Core with one variable per position and `m[a, b] = 10 * a + b`.
    fn sample_core() -> Core<&'static str, i32> {
        let mut core = Core::new("sample");
        core.x = vec!["x0", "x1", "x2"];
        core.dx_h = Some(vec![100, 101, 102]);
        core.w = vec!["w0", "w1"];
        core.z = vec![200, 201];
        core.u = vec!["u0", "u1"];
        core.y = vec!["y0", "y1"];
        core.cu = vec!["cu0"];
        core.cy = vec!["cy0"];
        let n = core.dims().total();
        core.m = StructureMatrix::Dense(Array2::from_shape_fn((n, n), |(a, b)| {
            (10 * a + b) as i32
        }));
        core.zl = Some(StructureMatrix::Dense(array![[1, 2], [3, 4]]));
        core
    }

    #[test]
    fn storage_move_carries_gradient() {
        let mut core = sample_core();
        move_stor(&mut core, 0, 2).unwrap();
        assert_eq!(core.x, vec!["x1", "x2", "x0"]);
        assert_eq!(core.dx_h, Some(vec![101, 102, 100]));
        assert_eq!(core.m.get(2, 2), Some(&0));
        assert_eq!(core.m.get(0, 0), Some(&11));
    }

    #[test]
    fn dissipation_move_uses_offset_and_local_indices() {
        let mut core = sample_core();
        move_diss(&mut core, 0, 1).unwrap();
        assert_eq!(core.w, vec!["w1", "w0"]);
        assert_eq!(core.z, vec![201, 200]);
        // dissipation block is rows/cols 3..5
        assert_eq!(core.m.get(3, 3), Some(&44));
        assert_eq!(core.m.get(4, 4), Some(&33));
        assert_eq!(core.m.get(3, 4), Some(&43));
        assert_eq!(core.m.get(0, 3), Some(&4));
        assert_eq!(core.zl, Some(StructureMatrix::Dense(array![[4, 3], [2, 1]])));
    }

    #[test]
    fn connector_move_on_single_element_is_noop() {
        let mut core = sample_core();
        let before = core.clone();
        move_connector(&mut core, 0, 0).unwrap();
        assert_eq!(core, before);
    }

    #[test]
    fn port_rejects_out_of_range_without_mutation() {
        let mut core = sample_core();
        let before = core.clone();
        assert_eq!(
            move_port(&mut core, 5, 0),
            Err(StructureError::IndexOutOfRange {
                category: Category::Port,
                index: 5,
                dim: 2
            })
        );
        assert_eq!(core, before);
    }

    #[test]
    fn inconsistent_core_is_rejected_before_mutation() {
        let mut core = sample_core();
        core.y.pop();
        core.u.pop();
        core.z.pop();
        let before = core.clone();
        assert!(matches!(
            move_stor(&mut core, 0, 1),
            Err(StructureError::LengthMismatch { .. })
        ));
        assert_eq!(core, before);
    }

    #[test]
    fn zero_matrix_stays_zero() {
        let mut core = sample_core();
        core.m = StructureMatrix::zeros(core.dims().total());
        core.zl = Some(StructureMatrix::zeros(2));
        move_diss(&mut core, 1, 0).unwrap();
        assert!(core.m.is_zero());
        assert_eq!(core.zl, Some(StructureMatrix::zeros(2)));
        assert_eq!(core.w, vec!["w1", "w0"]);
    }
}
