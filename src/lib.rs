use crate::linker::LinkerError;
use thiserror::Error;

/// Detected objects and the per-frame collections they live in
pub mod spot;

/// Linking cost functions
pub mod cost;

/// Sparse linear assignment problem solver and the Jaqaman-style linker built on it
pub mod linker;

/// Weighted graph of accepted links
pub mod graph;

/// Progress and status reporting
pub mod logger;

/// Frame-to-frame tracker and its settings
pub mod trackers;

/// Numeric helpers
pub mod utils;

/// Random spot generators used by tests and benchmarks
pub mod test_stuff;

pub mod prelude;

#[derive(Error, Debug, Clone)]
pub enum Errors {
    #[error("The spot collection is empty.")]
    EmptyCollection,
    #[error("The spot collection does not contain any visible spot.")]
    NoVisibleSpots,
    #[error("Invalid settings:\n{}", .0.join("\n"))]
    InvalidSettings(Vec<String>),
    #[error("Linking frame {source_frame} to frame {target_frame} failed: {source}")]
    Linking {
        source_frame: i32,
        target_frame: i32,
        #[source]
        source: LinkerError,
    },
    #[error("Unable to build the worker pool: {0}")]
    ThreadPool(String),
}

pub(crate) const EPS: f64 = 0.00001;
