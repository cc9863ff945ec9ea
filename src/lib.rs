pub mod ecc;
pub mod error;

pub use ecc::{BitString, Bits, Codex, ExpandingCode, ExpandingCodeBuilder, LineCode, Recovery, TieBreak};
pub use error::{Error, Result};
