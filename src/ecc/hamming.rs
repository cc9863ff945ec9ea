//! Hamming distance and Hamming weight of bitstrings.
//!
//! The Hamming distance between two equal-length bitstrings is the number of
//! positions at which they differ; the Hamming weight of a bitstring is its
//! distance from the all-zero string of the same length. A code whose
//! codewords are pairwise at least `d` apart detects up to `d - 1` flipped
//! bits and can correct fewer than `d / 2` of them.

use crate::ecc::bits::Bits;
use crate::error::{Error, Result};

/// Returns the Hamming distance between `a` and `b`.
///
/// # Errors
///
/// `Error::InvalidInput` if the two bitstrings differ in length.
pub fn distance(a: &Bits, b: &Bits) -> Result<usize> {
    if a.len() != b.len() {
        return Err(Error::InvalidInput(format!(
            "Hamming distance needs equal lengths, got {} and {}",
            a.len(),
            b.len()
        )));
    }

    Ok(a.iter()
        .by_vals()
        .zip(b.iter().by_vals())
        .filter(|(x, y)| x != y)
        .count())
}

/// Returns the Hamming weight of `a`, the number of set bits.
pub fn weight(a: &Bits) -> usize {
    a.count_ones()
}

/// Smallest pairwise Hamming distance within `codewords`.
///
/// Returns `Ok(None)` when fewer than two codewords are given.
pub fn min_distance<B: AsRef<Bits>>(codewords: &[B]) -> Result<Option<usize>> {
    let mut best: Option<usize> = None;
    for (i, a) in codewords.iter().enumerate() {
        for b in &codewords[i + 1..] {
            let d = distance(a.as_ref(), b.as_ref())?;
            best = Some(best.map_or(d, |current| current.min(d)));
        }
    }
    Ok(best)
}
