//! Locating the masked pixels that touch at least one valid pixel.
//!
//! The validity grid is padded with `false` by `window_size / 2` on every side,
//! so pixels beyond the image edge count as invalid and no window needs bounds
//! checks.

use ndarray::{Array2, ArrayBase, Data, Ix2};

/// `true` where the pixel holds a real value, `false` where it is NaN.
pub fn validity<T, S>(image: &ArrayBase<S, Ix2>) -> Array2<bool>
where
    T: num_traits::Float,
    S: Data<Elem = T>,
{
    image.map(|v| !v.is_nan())
}

fn pad_validity<S>(valid: &ArrayBase<S, Ix2>, pad: usize) -> Array2<bool>
where
    S: Data<Elem = bool>,
{
    let (rows, cols) = valid.dim();
    let mut vp = Array2::from_elem((rows + 2 * pad, cols + 2 * pad), false);
    vp.slice_mut(s![pad..pad + rows, pad..pad + cols]).assign(valid);
    vp
}

/// Number of valid pixels in the `window_size` square around each pixel,
/// the pixel itself excluded.
pub fn neighbor_counts<S>(valid: &ArrayBase<S, Ix2>, window_size: usize) -> Array2<usize>
where
    S: Data<Elem = bool>,
{
    let pad = window_size / 2;
    let vp = pad_validity(valid, pad);
    Array2::from_shape_fn(valid.dim(), |(i, j)| {
        let window = vp.slice(s![i..i + 2 * pad + 1, j..j + 2 * pad + 1]);
        let n = window.iter().filter(|&&v| v).count();
        if valid[(i, j)] {
            n - 1
        } else {
            n
        }
    })
}

/// Invalid pixels with at least one valid neighbour, in row-major order.
pub fn find_boundary<S>(valid: &ArrayBase<S, Ix2>, window_size: usize) -> Vec<(usize, usize)>
where
    S: Data<Elem = bool>,
{
    let counts = neighbor_counts(valid, window_size);
    valid
        .indexed_iter()
        .zip(counts.iter())
        .filter(|&((_, &v), &n)| !v && n > 0)
        .map(|((idx, _), _)| idx)
        .collect()
}
