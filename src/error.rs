use std::path::PathBuf;

use thiserror::Error;

use crate::slack::Metric;

#[derive(Debug, Error)]
pub enum ChartError {
    /// The previous value of a series is exactly zero, so the percentage
    /// change into `run` has no defined value.
    #[error("{metric} at run {run}: previous value is zero, percentage change is undefined")]
    ZeroBaseline { metric: Metric, run: u32 },

    #[error("{metric} has {actual} values but there are {expected} runs")]
    LengthMismatch {
        metric: Metric,
        expected: usize,
        actual: usize,
    },

    #[error("run index is empty")]
    EmptyRuns,

    #[error("unsupported output format {0:?} (expected .svg or .png)")]
    UnsupportedFormat(PathBuf),

    #[error("failed to draw chart: {0}")]
    Draw(String),

    #[error("failed to write annotation table: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Plotters errors are generic over the backend, so they are flattened to text.
pub fn draw_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Draw(e.to_string())
}

pub type Result<T> = std::result::Result<T, ChartError>;
