mod common;

use common::synthetic_image::{defect_mask, star_field};
use maskfill::{fill, FillConfig, FillDriver, MaskFillError, Operator};
use ndarray::{array, Array2};

#[test]
fn synthetic_defects_are_filled() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (rows, cols) = (48usize, 64usize);
    let image = star_field(rows, cols);
    let mask = defect_mask(rows, cols);
    let cfg = FillConfig::default().with_verbose(true);

    let out = fill(image.view(), mask.view(), &cfg).unwrap();

    assert!(out.iterations > 0);
    assert!(
        out.iterations <= rows.max(cols),
        "took {} iterations",
        out.iterations
    );
    assert!(out.smoothed.iter().all(|v| !v.is_nan()));
    assert!(out.unsmoothed.iter().all(|v| !v.is_nan()));
    for (((y, x), &m), (&s, &u)) in mask
        .indexed_iter()
        .zip(out.smoothed.iter().zip(out.unsmoothed.iter()))
    {
        if !m {
            assert_eq!(u, image[(y, x)], "unmasked pixel ({}, {}) changed", y, x);
            assert_eq!(s, u);
        }
    }
    let lo = image.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = image.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert!(out.smoothed.iter().all(|&v| v >= lo && v <= hi));
}

#[test]
fn single_seed_spreads_layer_by_layer() {
    let (rows, cols) = (5usize, 7usize);
    let mut image = Array2::from_elem((rows, cols), 0.0f64);
    image[(0, 0)] = 4.5;
    let mut mask = Array2::from_elem((rows, cols), true);
    mask[(0, 0)] = false;

    for &op in &[Operator::Mean, Operator::Median] {
        let cfg = FillConfig::default().with_operator(op);
        let out = fill(image.view(), mask.view(), &cfg).unwrap();
        assert_eq!(out.iterations, cols - 1);
        assert!(out.smoothed.iter().all(|&v| v == 4.5));
    }

    // a wider reducer window still advances one layer per iteration
    let cfg = FillConfig::default().with_size(5);
    let out = fill(image.view(), mask.view(), &cfg).unwrap();
    assert_eq!(out.iterations, cols - 1);
    assert!(out.smoothed.iter().all(|&v| v == 4.5));
}

#[test]
fn driver_counts_down_to_zero() {
    let image = star_field(20, 20);
    let mask = defect_mask(20, 20);
    let total = mask.iter().filter(|&&m| m).count();
    let mut driver = FillDriver::new(image.view(), mask.view(), &FillConfig::default()).unwrap();
    assert_eq!(driver.remaining(), total);

    let mut filled = 0;
    let mut last = driver.remaining();
    while driver.remaining() > 0 {
        filled += driver.step().unwrap();
        assert!(driver.remaining() < last);
        last = driver.remaining();
    }
    assert_eq!(filled, total);
}

#[test]
fn mean_and_median_disagree_on_skewed_windows() {
    let image = array![[1.0f64, 1.0, 3.0], [1.0, 0.0, 3.0]];
    let mask = array![[false, false, false], [false, true, false]];

    let median = FillConfig::default().with_smooth(false);
    let out = fill(image.view(), mask.view(), &median).unwrap();
    assert_eq!(out.smoothed[(1, 1)], 1.0);

    let mean = median.with_operator(Operator::Mean);
    let out = fill(image.view(), mask.view(), &mean).unwrap();
    assert!((out.smoothed[(1, 1)] - 1.8_f64).abs() < 1e-12);

    let pair = array![[1.0f64, 0.0, 3.0]];
    let gap = array![[false, true, false]];
    for &op in &[Operator::Mean, Operator::Median] {
        let cfg = FillConfig::default().with_operator(op).with_smooth(false);
        let out = fill(pair.view(), gap.view(), &cfg).unwrap();
        assert_eq!(out.smoothed[(0, 1)], 2.0);
    }
}

#[test]
fn works_on_single_precision() {
    let image = star_field(16, 16).mapv(|v| v as f32);
    let mask = defect_mask(16, 16);
    let out = fill(image.view(), mask.view(), &FillConfig::default()).unwrap();
    assert!(out.smoothed.iter().all(|v| v.is_finite()));
}

#[test]
fn all_masked_fails_fast() {
    let image = star_field(8, 8);
    let mask = Array2::from_elem((8, 8), true);
    let err = fill(image.view(), mask.view(), &FillConfig::default()).unwrap_err();
    assert!(matches!(err, MaskFillError::NoProgress { .. }));
    assert!(err.to_string().contains("no valid seed"));
}
