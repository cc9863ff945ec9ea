//! Error types shared by every code in the crate.

use thiserror::Error;

/// Result type for coding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a code or moving data through it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed constructor or function argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A symbol handed to the encoder is not part of the basis.
    #[error("Symbol not found in basis: {symbol}")]
    SymbolNotFound {
        /// Debug rendering of the missing symbol
        symbol: String,
    },

    /// A codeword has the wrong width or indexes past the end of the basis.
    #[error("Malformed codeword {bits}: expected {expected} bits indexing the basis")]
    MalformedCodeword {
        /// The offending bits as '0'/'1' characters
        bits: String,
        /// Codeword width of the basis
        expected: usize,
    },

    /// Encoded input cannot be split into whole chunks.
    #[error("Malformed input: length {length} is not a multiple of chunk length {chunk}")]
    MalformedInput {
        /// Length of the offending input in bits
        length: usize,
        /// Chunk length of the code
        chunk: usize,
    },

    /// A textual bitstring contains something other than '0' or '1'.
    #[error("Invalid bit {found:?} at position {position}")]
    InvalidBit {
        /// Character offset of the bad character
        position: usize,
        /// The character found there
        found: char,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    /// Whether the error stems from the data being coded rather than from
    /// how the code was configured or called.
    pub fn is_data_error(&self) -> bool {
        !matches!(self, Error::InvalidInput(_))
    }
}
