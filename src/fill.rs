//! Iterative fill of masked pixels.
//!
//! Every iteration finds the masked pixels that touch a valid pixel, replaces
//! them by the configured statistic of their valid neighbours, and repeats
//! until nothing is missing. The filled region grows by one layer per
//! iteration. Afterwards the originally masked pixels can be boxcar smoothed
//! once with a mean over the same window.

use crate::boundary::{find_boundary, validity};
use crate::config::{self, FillConfig};
use crate::error::{MaskFillError, Result};
use crate::reducer::apply_reducer;
use log::{debug, log, warn};
use ndarray::{Array2, ArrayView2, Zip};
use num_traits::Float;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillState {
    Filling,
    /// Nothing is missing; `finish` smooths if configured.
    Filled,
}

/// Masked pixels are found by their direct 8 neighbours, whatever the
/// reducer window, so the filled region grows by one layer per iteration.
const BOUNDARY_WINDOW: usize = 3;

/// Receives the partially filled image after each iteration.
pub trait SnapshotSink<T> {
    fn write_snapshot(&mut self, iteration: usize, image: &Array2<T>) -> Result<()>;
}

impl<T, F> SnapshotSink<T> for F
where
    F: FnMut(usize, &Array2<T>) -> Result<()>,
{
    fn write_snapshot(&mut self, iteration: usize, image: &Array2<T>) -> Result<()> {
        self(iteration, image)
    }
}

/// Sink that drops every snapshot.
pub struct NoSnapshots;

impl<T> SnapshotSink<T> for NoSnapshots {
    fn write_snapshot(&mut self, _iteration: usize, _image: &Array2<T>) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FilledImage<T> {
    /// Equal to `unsmoothed` when smoothing was off.
    pub smoothed: Array2<T>,
    pub unsmoothed: Array2<T>,
    pub iterations: usize,
    pub was_smoothed: bool,
}

impl<T> FilledImage<T> {
    /// The image to store first: smoothed if smoothing ran.
    pub fn primary(&self) -> &Array2<T> {
        &self.smoothed
    }

    /// The unsmoothed image, only when it differs in role from `primary`.
    pub fn secondary(&self) -> Option<&Array2<T>> {
        if self.was_smoothed {
            Some(&self.unsmoothed)
        } else {
            None
        }
    }
}

fn count_nan<T: Float>(image: &Array2<T>) -> usize {
    image.iter().filter(|v| v.is_nan()).count()
}

/// Mask positions in row-major order.
pub fn mask_targets(mask: ArrayView2<bool>) -> Vec<(usize, usize)> {
    mask.indexed_iter()
        .filter(|(_, &m)| m)
        .map(|(idx, _)| idx)
        .collect()
}

/// Boxcar mean over the pixels flagged in `mask`.
pub fn smooth_masked<T>(image: Array2<T>, mask: ArrayView2<bool>, pad_width: usize) -> Array2<T>
where
    T: Float + Send + Sync,
{
    let targets = mask_targets(mask);
    apply_reducer(image, pad_width, &targets, config::mean::<T>)
}

pub struct FillDriver<'a, T> {
    original: ArrayView2<'a, T>,
    mask: ArrayView2<'a, bool>,
    image: Array2<T>,
    config: FillConfig,
    reducer: fn(&[T]) -> T,
    state: FillState,
    iteration: usize,
    remaining: usize,
}

impl<'a, T> FillDriver<'a, T>
where
    T: Float + Send + Sync,
{
    pub fn new(
        image: ArrayView2<'a, T>,
        mask: ArrayView2<'a, bool>,
        config: &FillConfig,
    ) -> Result<Self> {
        config.validate()?;
        if image.dim() != mask.dim() {
            return Err(MaskFillError::ShapeMismatch {
                image: image.dim(),
                mask: mask.dim(),
            });
        }

        let mut buffer = image.to_owned();
        Zip::from(&mut buffer).and(&mask).for_each(|v, &m| {
            if m {
                *v = T::nan();
            }
        });
        let remaining = count_nan(&buffer);
        let state = if remaining == 0 {
            FillState::Filled
        } else {
            FillState::Filling
        };

        Ok(FillDriver {
            original: image,
            mask,
            image: buffer,
            config: config.clone(),
            reducer: config.operator.reducer(),
            state,
            iteration: 0,
            remaining,
        })
    }

    pub fn state(&self) -> FillState {
        self.state
    }

    /// Completed iterations.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Pixels still missing.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn image(&self) -> &Array2<T> {
        &self.image
    }

    /// Runs one fill iteration and returns the number of pixels it filled.
    ///
    /// Does nothing once the image is filled.
    pub fn step(&mut self) -> Result<usize> {
        if self.state != FillState::Filling {
            return Ok(0);
        }
        if let Some(limit) = self.config.max_iterations {
            if self.iteration >= limit {
                return Err(MaskFillError::IterationLimit {
                    limit,
                    remaining: self.remaining,
                });
            }
        }

        self.iteration += 1;
        log!(
            self.config.progress_level(),
            "iteration {} | masked pixels remaining: {}",
            self.iteration,
            self.remaining
        );

        // targets come from the grid as it stands before any update
        let targets = find_boundary(&validity(&self.image), BOUNDARY_WINDOW);
        let image = std::mem::replace(&mut self.image, Array2::zeros((0, 0)));
        self.image = apply_reducer(image, self.config.pad_width(), &targets, self.reducer);

        let remaining = count_nan(&self.image);
        let filled = self.remaining.saturating_sub(remaining);
        if filled == 0 {
            return Err(MaskFillError::NoProgress {
                iteration: self.iteration,
                remaining,
            });
        }
        self.remaining = remaining;
        if remaining == 0 {
            self.state = FillState::Filled;
        }
        Ok(filled)
    }

    /// Filled values at masked pixels, input values everywhere else.
    pub fn snapshot(&self) -> Array2<T> {
        let mut out = self.original.to_owned();
        Zip::from(&mut out)
            .and(&self.image)
            .and(&self.mask)
            .for_each(|o, &v, &m| {
                if m {
                    *o = v;
                }
            });
        out
    }

    /// Fills until no pixel is missing, then smooths if configured.
    pub fn run<S>(mut self, sink: &mut S) -> Result<FilledImage<T>>
    where
        S: SnapshotSink<T>,
    {
        let level = self.config.progress_level();
        log!(
            level,
            "starting masked pixel fill: {} pixels, size {}, operator {}",
            self.remaining,
            self.config.size,
            self.config.operator
        );

        while self.state == FillState::Filling {
            self.step()?;
            if self.config.writesteps {
                if let Err(e) = sink.write_snapshot(self.iteration, &self.snapshot()) {
                    warn!("snapshot for iteration {} not written: {}", self.iteration, e);
                }
            }
        }
        self.finish()
    }

    /// Completes the fill without snapshots and applies the smoothing pass.
    pub fn finish(mut self) -> Result<FilledImage<T>> {
        while self.state == FillState::Filling {
            self.step()?;
        }
        let level = self.config.progress_level();
        log!(
            level,
            "pixel replacement complete after {} iterations",
            self.iteration
        );

        let unsmoothed = self.image;
        let smoothed = if self.config.smooth {
            log!(level, "boxcar smoothing the masked areas");
            let out = smooth_masked(unsmoothed.clone(), self.mask, self.config.pad_width());
            debug!("smoothing complete");
            out
        } else {
            unsmoothed.clone()
        };

        Ok(FilledImage {
            smoothed,
            unsmoothed,
            iterations: self.iteration,
            was_smoothed: self.config.smooth,
        })
    }
}

/// Fills the pixels flagged in `mask` (and any NaN) in `image`.
pub fn fill<'a, T>(
    image: ArrayView2<'a, T>,
    mask: ArrayView2<'a, bool>,
    config: &FillConfig,
) -> Result<FilledImage<T>>
where
    T: Float + Send + Sync,
{
    fill_with_snapshots(image, mask, config, &mut NoSnapshots)
}

pub fn fill_with_snapshots<'a, T, S>(
    image: ArrayView2<'a, T>,
    mask: ArrayView2<'a, bool>,
    config: &FillConfig,
    sink: &mut S,
) -> Result<FilledImage<T>>
where
    T: Float + Send + Sync,
    S: SnapshotSink<T>,
{
    FillDriver::new(image, mask, config)?.run(sink)
}
