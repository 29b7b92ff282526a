use ndarray::Array2;

/// Flat sky with a gentle gradient and a few gaussian sources.
pub fn star_field(rows: usize, cols: usize) -> Array2<f64> {
    assert!(rows > 0 && cols > 0, "image dimensions must be positive");
    let stars = [(0.3, 0.25, 40.0, 1.5), (0.6, 0.7, 90.0, 2.5), (0.8, 0.2, 25.0, 1.0)];
    Array2::from_shape_fn((rows, cols), |(y, x)| {
        let sky = 10.0 + 0.05 * x as f64 + 0.02 * y as f64;
        stars.iter().fold(sky, |acc, &(fy, fx, amp, sigma)| {
            let dy = y as f64 - fy * rows as f64;
            let dx = x as f64 - fx * cols as f64;
            acc + amp * (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp()
        })
    })
}

/// A bad column, a saturated blob and a corner cut, as a detector mask.
pub fn defect_mask(rows: usize, cols: usize) -> Array2<bool> {
    let (cy, cx) = (rows as f64 * 0.6, cols as f64 * 0.7);
    let bad_col = cols / 4;
    Array2::from_shape_fn((rows, cols), |(y, x)| {
        let dy = y as f64 - cy;
        let dx = x as f64 - cx;
        x == bad_col || dx * dx + dy * dy <= 9.0 || (y < 3 && x + 3 >= cols)
    })
}
