use thiserror::Error;

/// The bit stream ended, or held malformed data, before the expected value
/// could be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bit stream ended before the expected value could be read")]
pub struct SerdeErr;
