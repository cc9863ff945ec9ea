//! Error-detecting line codes.
//!
//! This module provides:
//! - Bitstrings with a textual `'0'`/`'1'` form ([`BitString`])
//! - Hamming distance and weight ([`hamming`])
//! - A bijection between a finite basis of symbols and fixed-width codewords ([`Codex`])
//! - A code that repeats every codeword bit to widen the distance between
//!   codewords, with optional nearest-codeword recovery ([`ExpandingCode`])
//!
//! # Examples
//!
//! ```rust
//! use repcode::ecc::{ExpandingCode, Recovery};
//!
//! let code = ExpandingCode::new(vec![1, 2, 3, 4], 3).unwrap();
//! let encoded = code.encode(&[1, 2, 3, 4]).unwrap();
//! assert_eq!(encoded.len(), 4 * code.chunk_len());
//!
//! let decoded = code.decode_with(&encoded, Recovery::Enabled).unwrap();
//! assert_eq!(decoded, vec![Some(1), Some(2), Some(3), Some(4)]);
//! ```

pub use crate::error::Result;

/// Trait for codes mapping symbol streams to bitstrings
pub trait LineCode {
    /// Symbol type carried by the code
    type Symbol;

    /// Encode symbols into a bitstring
    fn encode(&self, symbols: &[Self::Symbol]) -> Result<BitString>;

    /// Decode a bitstring, yielding `None` for chunks that cannot be decoded
    fn decode(&self, bits: &Bits) -> Result<Vec<Option<Self::Symbol>>>;
}

pub mod bits;
pub use bits::{BitString, Bits};

pub mod hamming;

pub mod codex;
pub use codex::Codex;

pub mod expanding;
pub use expanding::{ExpandingCode, ExpandingCodeBuilder, Recovery, TieBreak};
