//! FITS input and output.

use crate::error::{MaskFillError, Result};
use crate::fill::{FilledImage, SnapshotSink};
use fitsio::images::{ImageDescription, ImageType};
use fitsio::FitsFile;
use ndarray::{Array2, ArrayD, Ix2};
use std::path::{Path, PathBuf};

/// Appends `.fits` unless the name already ends with it.
pub fn with_fits_suffix(name: &str) -> String {
    if name.ends_with(".fits") {
        name.to_string()
    } else {
        format!("{}.fits", name)
    }
}

fn read_2d(path: &str, ext: usize) -> Result<Array2<f64>> {
    let path = with_fits_suffix(path);
    let mut f = FitsFile::open(&path)?;
    let hdu = f.hdu(ext)?;
    let data: ArrayD<f64> = hdu.read_image(&mut f)?;
    let ndim = data.ndim();
    data.into_dimensionality::<Ix2>()
        .map_err(|_| MaskFillError::NotAnImage { path, ndim })
}

pub fn read_image(path: &str, ext: usize) -> Result<Array2<f64>> {
    read_2d(path, ext)
}

/// Nonzero pixels are masked.
pub fn read_mask(path: &str, ext: usize) -> Result<Array2<bool>> {
    Ok(read_2d(path, ext)?.map(|&v| v != 0.0))
}

fn flat(image: &Array2<f64>) -> Vec<f64> {
    image.iter().cloned().collect()
}

fn create(path: &Path, image: &Array2<f64>) -> Result<FitsFile> {
    let (rows, cols) = image.dim();
    let description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: &[rows, cols],
    };
    let f = FitsFile::create(path)
        .with_custom_primary(&description)
        .overwrite()
        .open()?;
    Ok(f)
}

/// Writes a single image to the primary HDU, replacing any existing file.
pub fn write_image<P: AsRef<Path>>(path: P, image: &Array2<f64>) -> Result<()> {
    let mut f = create(path.as_ref(), image)?;
    let hdu = f.primary_hdu()?;
    hdu.write_image(&mut f, &flat(image))?;
    Ok(())
}

/// Writes the fill result. With smoothing the primary HDU holds the smoothed
/// image and the first extension the unsmoothed one.
pub fn write_output(path: &str, result: &FilledImage<f64>) -> Result<()> {
    let path = with_fits_suffix(path);
    let secondary = match result.secondary() {
        Some(s) => s,
        None => return write_image(&path, result.primary()),
    };

    let primary = result.primary();
    let mut f = create(Path::new(&path), primary)?;
    let hdu = f.primary_hdu()?;
    hdu.write_key(&mut f, "EXT0", "Filled Smoothed Image")?;
    hdu.write_key(&mut f, "EXT1", "Filled Image (no smoothing)")?;
    hdu.write_image(&mut f, &flat(primary))?;

    let (rows, cols) = secondary.dim();
    let description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: &[rows, cols],
    };
    let ext = f.create_image("UNSMOOTHED".to_string(), &description)?;
    ext.write_image(&mut f, &flat(secondary))?;
    Ok(())
}

/// Writes every iteration to `_iter_<n>.fits` inside `dir`.
pub struct FitsSnapshots {
    dir: PathBuf,
}

impl FitsSnapshots {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        FitsSnapshots { dir: dir.into() }
    }

    pub fn path_for(&self, iteration: usize) -> PathBuf {
        self.dir.join(format!("_iter_{}.fits", iteration))
    }
}

impl SnapshotSink<f64> for FitsSnapshots {
    fn write_snapshot(&mut self, iteration: usize, image: &Array2<f64>) -> Result<()> {
        let path = self.path_for(iteration);
        write_image(&path, image)?;
        log::info!("intermediate fits written to: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_added_once() {
        assert_eq!(with_fits_suffix("out"), "out.fits");
        assert_eq!(with_fits_suffix("out.fits"), "out.fits");
    }

    #[test]
    fn snapshots_are_numbered() {
        let sink = FitsSnapshots::new("steps");
        assert_eq!(sink.path_for(3), PathBuf::from("steps/_iter_3.fits"));
    }

    #[test]
    fn output_keeps_both_images() {
        let dir = std::env::temp_dir().join(format!("maskfill-io-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.fits");
        let path = path.to_str().unwrap();

        let smoothed = Array2::from_shape_fn((3, 4), |(i, j)| (i * 4 + j) as f64);
        let unsmoothed = smoothed.map(|v| v + 100.0);
        let result = FilledImage {
            smoothed: smoothed.clone(),
            unsmoothed: unsmoothed.clone(),
            iterations: 1,
            was_smoothed: true,
        };
        write_output(path, &result).unwrap();

        assert_eq!(read_image(path, 0).unwrap(), smoothed);
        assert_eq!(read_image(path, 1).unwrap(), unsmoothed);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
