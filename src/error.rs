use thiserror::Error;

/// Caller programming errors surfaced by the engine.
///
/// Data-quality problems (missing cells, unparseable numbers, out-of-range
/// points) never show up here; they are absorbed by the normalizer and the
/// aggregators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("page size must be positive, got {0}")]
    InvalidPageSize(usize),

    #[error("bucket count must be positive, got {0}")]
    InvalidBucketCount(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
