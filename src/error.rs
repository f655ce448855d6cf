/// Custom Result type for reverse-complement operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the crate, encompassing all possible error cases
/// that can occur while streaming records through the transformer.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    /// Errors related to the shape of the input records
    ReadError(#[from] ReadError),
    /// Errors related to an invalid processor configuration
    ConfigError(#[from] ConfigError),
    /// Standard I/O errors from the source or the sink
    IoError(#[from] std::io::Error),
    /// The worker pool could not be started
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),
}

/// Errors that can occur while reading records from the input stream
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    /// A record did not start with the `>` header marker
    ///
    /// # Arguments
    /// * `u8` - The byte found where the header marker was expected
    #[error("Record does not start with '>' (found byte {0:#04x})")]
    MissingHeader(u8),

    /// The number of line breaks in a record does not fit the configured line width
    ///
    /// # Fields
    /// * `lines` - Number of lines the data length implies at this width
    /// * `newlines` - Number of line breaks actually found in the data region
    /// * `line_width` - The configured line width
    #[error(
        "Record has {newlines} line breaks but {lines} lines are expected at line width {line_width}"
    )]
    IrregularLineWidth {
        lines: usize,
        newlines: usize,
        line_width: usize,
    },
}

/// Errors that can occur while configuring a [`Revcomp`](crate::Revcomp) processor
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Line width must be at least one byte
    #[error("Invalid line width: {0}")]
    InvalidLineWidth(usize),

    /// Chunk size must be at least one byte
    #[error("Invalid chunk size: {0}")]
    InvalidChunkSize(usize),
}
