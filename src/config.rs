use crate::error::{MaskFillError, Result};
use std::fmt;
use std::str::FromStr;

/// Statistic used to replace a masked pixel by its valid neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Mean,
    /// Even counts take the average of the two middle values.
    Median,
}

impl Operator {
    /// Resolves the operator into the plain reducer applied to every window.
    pub fn reducer<T>(self) -> fn(&[T]) -> T
    where
        T: num_traits::Float,
    {
        match self {
            Operator::Mean => mean,
            Operator::Median => median,
        }
    }
}

pub fn mean<T>(values: &[T]) -> T
where
    T: num_traits::Float,
{
    statistical::mean(values)
}

pub fn median<T>(values: &[T]) -> T
where
    T: num_traits::Float,
{
    statistical::median(values)
}

impl Default for Operator {
    fn default() -> Self {
        Operator::Median
    }
}

impl FromStr for Operator {
    type Err = MaskFillError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(Operator::Mean),
            "median" => Ok(Operator::Median),
            _ => Err(MaskFillError::InvalidOperator(s.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Mean => write!(f, "mean"),
            Operator::Median => write!(f, "median"),
        }
    }
}

/// Parameters of one fill run.
#[derive(Debug, Clone, PartialEq)]
pub struct FillConfig {
    /// Window edge length, odd and >= 3. 3 means the 8 surrounding pixels.
    pub size: usize,
    pub operator: Operator,
    /// Boxcar smooth the filled pixels once filling converged.
    pub smooth: bool,
    /// Hand a snapshot of every iteration to the snapshot sink.
    pub writesteps: bool,
    /// Log progress at info instead of debug.
    pub verbose: bool,
    pub max_iterations: Option<usize>,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            size: 3,
            operator: Operator::Median,
            smooth: true,
            writesteps: false,
            verbose: false,
            max_iterations: None,
        }
    }
}

impl FillConfig {
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    pub fn with_writesteps(mut self, writesteps: bool) -> Self {
        self.writesteps = writesteps;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_max_iterations(mut self, limit: usize) -> Self {
        self.max_iterations = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.size < 3 || self.size % 2 == 0 {
            return Err(MaskFillError::InvalidSize(self.size));
        }
        Ok(())
    }

    pub fn pad_width(&self) -> usize {
        self.size / 2
    }

    pub(crate) fn progress_level(&self) -> log::Level {
        if self.verbose {
            log::Level::Info
        } else {
            log::Level::Debug
        }
    }
}
