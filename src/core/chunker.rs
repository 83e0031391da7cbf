use crate::domain::model::{NormalizedNutrient, NutritionGrid};

/// Group width for the barcode and scan nutrition grids.
pub const GRID_WIDTH: usize = 6;

/// Split `items` into consecutive groups of `size`; the last group holds the remainder.
///
/// An empty input yields a single empty group, which existing clients render as an empty
/// page. `size` must be non-zero.
pub fn chunk<T>(items: Vec<T>, size: usize) -> Vec<Vec<T>> {
    assert!(size > 0, "chunk size must be positive");

    let mut chunks = Vec::with_capacity(items.len() / size + 1);
    let mut rest = items;
    while rest.len() > size {
        let tail = rest.split_off(size);
        chunks.push(rest);
        rest = tail;
    }
    chunks.push(rest);
    chunks
}

pub fn nutrition_grid(nutrients: Vec<NormalizedNutrient>) -> NutritionGrid {
    chunk(nutrients, GRID_WIDTH)
}

/// Re-chunk every group into `size`-wide pieces and flatten each back into one group.
///
/// Element order and group boundaries come out unchanged.
pub fn regroup<T>(grid: Vec<Vec<T>>, size: usize) -> Vec<Vec<T>> {
    grid.into_iter()
        .map(|group| chunk(group, size).into_iter().flatten().collect())
        .collect()
}
