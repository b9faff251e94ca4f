use std::error::Error;
use std::fmt;

/// Custom error type for scoring-metric failures
#[derive(Debug, PartialEq)]
pub enum MetricError {
    NaNFound(usize), // Number of NaN values found
    LengthMismatch,
    EmptyInput,
    SingleClass,
}

impl fmt::Display for MetricError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MetricError::NaNFound(count) => {
                write!(f, "Found {} NaN values in scores array", count)
            }
            MetricError::LengthMismatch => {
                write!(f, "Scores and label arrays must have equal length")
            }
            MetricError::EmptyInput => {
                write!(f, "Cannot compute a metric on empty input")
            }
            MetricError::SingleClass => {
                write!(f, "Labels contain a single class; metric is undefined")
            }
        }
    }
}

impl Error for MetricError {}
