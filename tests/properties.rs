use ndarray::Array2;
use phscore::model::{Category, Core, StructureMatrix};
use phscore::structure::{is_permutation, move_in, move_permutation, window};
use proptest::prelude::*;

/// Core with the given category sizes; every symbol and entry is unique.
fn core_with(x: usize, w: usize, y: usize, cy: usize) -> Core<String, String> {
    let names = |p: &str, n: usize| (0..n).map(|k| format!("{p}{k}")).collect::<Vec<_>>();
    let mut core = Core::new("prop");
    core.x = names("x", x);
    core.dx_h = Some(names("dx", x));
    core.w = names("w", w);
    core.z = names("z", w);
    core.u = names("u", y);
    core.y = names("y", y);
    core.cu = names("cu", cy);
    core.cy = names("cy", cy);
    let n = core.dims().total();
    core.m = StructureMatrix::Dense(Array2::from_shape_fn((n, n), |(a, b)| format!("{a}/{b}")));
    core.zl = Some(StructureMatrix::Dense(Array2::from_shape_fn((w, w), |(a, b)| {
        format!("zl{a}/{b}")
    })));
    core
}

fn category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Storage),
        Just(Category::Dissipation),
        Just(Category::Port),
        Just(Category::Connector),
    ]
}

/// A core plus a category and a valid (from, to) pair inside it.
fn core_and_move() -> impl Strategy<Value = (Core<String, String>, Category, usize, usize)> {
    (1usize..5, 1usize..5, 1usize..5, 1usize..5, category()).prop_flat_map(
        |(x, w, y, cy, cat)| {
            let core = core_with(x, w, y, cy);
            let dim = core.dims().get(cat);
            (Just(core), Just(cat), 0..dim, 0..dim)
        },
    )
}

proptest! {
    #[test]
    fn move_permutation_is_a_bijection((n, i, j) in (1usize..40).prop_flat_map(|n| (Just(n), 0..n, 0..n))) {
        let perm = move_permutation(n, i, j).unwrap();
        prop_assert_eq!(perm.len(), n);
        prop_assert!(is_permutation(&perm));
        prop_assert_eq!(perm[j], i);
        let (lo, hi) = (i.min(j), i.max(j));
        for (k, &p) in perm.iter().enumerate() {
            if k < lo || k > hi {
                prop_assert_eq!(p, k);
            }
        }
    }

    #[test]
    fn same_index_is_identity((n, i) in (1usize..40).prop_flat_map(|n| (Just(n), 0..n))) {
        let perm = move_permutation(n, i, i).unwrap();
        prop_assert_eq!(perm, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn move_then_inverse_restores_core((core, cat, i, j) in core_and_move()) {
        let mut moved = core.clone();
        move_in(&mut moved, cat, i, j).unwrap();
        move_in(&mut moved, cat, j, i).unwrap();
        prop_assert_eq!(moved, core);
    }

    #[test]
    fn move_never_leaks_outside_its_category((core, cat, i, j) in core_and_move()) {
        let mut moved = core.clone();
        move_in(&mut moved, cat, i, j).unwrap();
        prop_assert_eq!(moved.dims(), core.dims());

        if cat != Category::Storage {
            prop_assert_eq!(&moved.x, &core.x);
            prop_assert_eq!(&moved.dx_h, &core.dx_h);
        }
        if cat != Category::Dissipation {
            prop_assert_eq!(&moved.w, &core.w);
            prop_assert_eq!(&moved.z, &core.z);
            prop_assert_eq!(&moved.zl, &core.zl);
        }
        if cat != Category::Port {
            prop_assert_eq!(&moved.u, &core.u);
            prop_assert_eq!(&moved.y, &core.y);
        }
        if cat != Category::Connector {
            prop_assert_eq!(&moved.cu, &core.cu);
            prop_assert_eq!(&moved.cy, &core.cy);
        }

        let block = window(&core.dims(), cat);
        let n = core.dims().total();
        for a in 0..n {
            for b in 0..n {
                if !block.contains(&a) && !block.contains(&b) {
                    prop_assert_eq!(moved.m.get(a, b), core.m.get(a, b));
                }
            }
        }
    }

    #[test]
    fn diagonal_travels_with_its_variable((core, cat, i, j) in core_and_move()) {
        let mut moved = core.clone();
        move_in(&mut moved, cat, i, j).unwrap();
        let start = window(&core.dims(), cat).start;
        prop_assert_eq!(moved.m.get(start + j, start + j), core.m.get(start + i, start + i));
    }

    #[test]
    fn out_of_range_never_mutates((core, cat) in (1usize..4, 1usize..4, 1usize..4, 1usize..4, category())
        .prop_map(|(x, w, y, cy, cat)| (core_with(x, w, y, cy), cat)), extra in 0usize..10) {
        let mut moved = core.clone();
        let dim = core.dims().get(cat);
        prop_assert!(move_in(&mut moved, cat, dim + extra, 0).is_err());
        prop_assert!(move_in(&mut moved, cat, 0, dim + extra).is_err());
        prop_assert_eq!(moved, core);
    }
}
