//! Windowed statistics over NaN-padded images.

use ndarray::{Array2, ArrayBase, Data, Ix2};
use num_traits::Float;
use rayon::prelude::*;

/// Copy of `v` surrounded by `pad` rows and columns of NaN.
pub fn pad_nan<T, S>(v: &ArrayBase<S, Ix2>, pad: usize) -> Array2<T>
where
    T: Float,
    S: Data<Elem = T>,
{
    let (rows, cols) = v.dim();
    let mut vp = Array2::from_elem((rows + 2 * pad, cols + 2 * pad), T::nan());
    vp.slice_mut(s![pad..pad + rows, pad..pad + cols]).assign(v);
    vp
}

/// Replaces every target pixel by `reducer` over the valid values of its
/// `(2 * pad_width + 1)` square window.
///
/// All windows are read from the image as it was before the call, so targets
/// never see each other's new values. A target whose window holds no valid
/// value keeps its current value.
pub fn apply_reducer<T, F>(
    mut image: Array2<T>,
    pad_width: usize,
    targets: &[(usize, usize)],
    reducer: F,
) -> Array2<T>
where
    T: Float + Send + Sync,
    F: Fn(&[T]) -> T + Sync,
{
    let vp = pad_nan(&image, pad_width);
    let side = 2 * pad_width + 1;

    let updates: Vec<((usize, usize), T)> = targets
        .par_iter()
        .filter_map(|&(i, j)| {
            let window = vp.slice(s![i..i + side, j..j + side]);
            let values: Vec<T> = window.iter().cloned().filter(|v| !v.is_nan()).collect();
            if values.is_empty() {
                None
            } else {
                Some(((i, j), reducer(&values)))
            }
        })
        .collect();

    for (idx, value) in updates {
        image[idx] = value;
    }
    image
}
