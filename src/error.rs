use std::fmt;

#[derive(Debug)]
pub enum MaskFillError {
    /// image and mask dims, as (rows, cols)
    ShapeMismatch {
        image: (usize, usize),
        mask: (usize, usize),
    },
    InvalidOperator(String),
    InvalidSize(usize),
    /// an iteration filled nothing while pixels were still missing
    NoProgress { iteration: usize, remaining: usize },
    IterationLimit { limit: usize, remaining: usize },
    /// an input file whose data is not a 2D image
    NotAnImage { path: String, ndim: usize },
    Usage(String),
    #[cfg(feature = "fits")]
    Fits(fitsio::errors::Error),
}

impl fmt::Display for MaskFillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch { image, mask } => write!(
                f,
                "image shape {}x{} does not match mask shape {}x{}",
                image.0, image.1, mask.0, mask.1
            ),
            Self::InvalidOperator(op) => {
                write!(f, "operator must be mean or median, got {:?}", op)
            }
            Self::InvalidSize(size) => {
                write!(f, "window size must be odd and >= 3, got {}", size)
            }
            Self::NoProgress {
                iteration,
                remaining,
            } => write!(
                f,
                "no pixels filled on iteration {} ({} still masked); the image has no valid seed",
                iteration, remaining
            ),
            Self::IterationLimit { limit, remaining } => write!(
                f,
                "iteration limit {} reached with {} pixels still masked",
                limit, remaining
            ),
            Self::NotAnImage { path, ndim } => {
                write!(f, "{} holds {}-dimensional data, expected a 2D image", path, ndim)
            }
            Self::Usage(msg) => write!(f, "{}", msg),
            #[cfg(feature = "fits")]
            Self::Fits(e) => write!(f, "fits: {}", e),
        }
    }
}

impl std::error::Error for MaskFillError {}

#[cfg(feature = "fits")]
impl From<fitsio::errors::Error> for MaskFillError {
    fn from(e: fitsio::errors::Error) -> Self {
        Self::Fits(e)
    }
}

pub type Result<T> = std::result::Result<T, MaskFillError>;
