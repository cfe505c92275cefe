//! Absolute block offsets within the structure matrix.

use crate::error::Result;
use crate::model::{Category, Dims};
use std::ops::Range;

/// Row/column index at which `category`'s block starts.
pub fn offset(dims: &Dims, category: Category) -> usize {
    match category {
        Category::Storage => 0,
        Category::Dissipation => dims.x,
        Category::Port => dims.x + dims.w,
        Category::Connector => dims.x + dims.w + dims.y,
    }
}

/// Same as [`offset`], with the category given by name (`"storage"`, `"w"`, ...).
pub fn offset_by_name(dims: &Dims, name: &str) -> Result<usize> {
    Ok(offset(dims, name.parse()?))
}

/// Absolute index range covered by `category`'s block.
pub fn window(dims: &Dims, category: Category) -> Range<usize> {
    let start = offset(dims, category);
    start..start + dims.get(category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StructureError;

    const DIMS: Dims = Dims { x: 3, w: 2, y: 1, cy: 4 };

    #[test]
    fn offsets_accumulate_in_block_order() {
        assert_eq!(offset(&DIMS, Category::Storage), 0);
        assert_eq!(offset(&DIMS, Category::Dissipation), 3);
        assert_eq!(offset(&DIMS, Category::Port), 5);
        assert_eq!(offset(&DIMS, Category::Connector), 6);
    }

    #[test]
    fn windows_tile_the_matrix() {
        let mut next = 0;
        for category in Category::ALL {
            let w = window(&DIMS, category);
            assert_eq!(w.start, next);
            next = w.end;
        }
        assert_eq!(next, DIMS.total());
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(offset_by_name(&DIMS, "port").unwrap(), 5);
        assert_eq!(offset_by_name(&DIMS, "cy").unwrap(), 6);
        assert_eq!(
            offset_by_name(&DIMS, "gyrator"),
            Err(StructureError::UnknownCategory("gyrator".to_string()))
        );
    }
}
