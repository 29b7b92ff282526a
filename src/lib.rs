#[macro_use]
extern crate ndarray;
extern crate num_traits;

pub mod boundary;
pub mod config;
pub mod error;
pub mod fill;
#[cfg(feature = "fits")]
pub mod io;
pub mod reducer;

pub use crate::boundary::{find_boundary, neighbor_counts, validity};
pub use crate::config::{FillConfig, Operator};
pub use crate::error::{MaskFillError, Result};
pub use crate::fill::{
    fill, fill_with_snapshots, smooth_masked, FillDriver, FillState, FilledImage, NoSnapshots,
    SnapshotSink,
};
pub use crate::reducer::apply_reducer;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
