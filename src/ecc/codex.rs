//! Bijection between a finite basis of symbols and fixed-width codewords.
//!
//! Every symbol is represented by its position in the basis, written in
//! unsigned binary and left-padded to the smallest width able to hold the
//! largest index. A basis of a single symbol still uses one bit, so its only
//! codeword is `0`.
//!
//! # Examples
//!
//! ```
//! use repcode::ecc::{BitString, Codex};
//!
//! let codex = Codex::new(vec!["duck", "Goose", "Horse"]).unwrap();
//! assert_eq!(codex.bit_width(), 2);
//! assert_eq!(codex.to_bits(&"Horse").unwrap().to_string(), "10");
//! assert_eq!(codex.from_bits(&"01".parse::<BitString>().unwrap()).unwrap(), &"Goose");
//! ```

use crate::ecc::bits::{self, BitString, Bits};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Maps basis symbols to their codewords and back.
#[derive(Debug, Clone)]
pub struct Codex<T> {
    /// Symbols in index order
    basis: Vec<T>,
    /// Position of each symbol in `basis`
    index: HashMap<T, usize>,
    /// Codeword of each symbol, aligned with `basis`
    codewords: Vec<BitString>,
    /// Width of every codeword
    bit_width: usize,
}

/// Number of bits needed to write `len - 1` in unsigned binary, at least one.
pub fn bit_width_for(len: usize) -> usize {
    let largest = len.saturating_sub(1);
    ((usize::BITS - largest.leading_zeros()) as usize).max(1)
}

impl<T> Codex<T>
where
    T: Clone + Eq + Hash + Debug,
{
    /// Builds the codex for `basis`, assigning codewords in order.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if `basis` is empty or holds the same symbol twice.
    pub fn new(basis: Vec<T>) -> Result<Self> {
        if basis.is_empty() {
            return Err(Error::invalid("basis must contain at least one symbol"));
        }

        let bit_width = bit_width_for(basis.len());
        let mut index = HashMap::with_capacity(basis.len());
        let mut codewords = Vec::with_capacity(basis.len());

        for (position, symbol) in basis.iter().enumerate() {
            if let Some(first) = index.insert(symbol.clone(), position) {
                return Err(Error::InvalidInput(format!(
                    "duplicate symbol {:?} at indices {} and {}",
                    symbol, first, position
                )));
            }
            codewords.push(BitString::from_index(position, bit_width));
        }

        Ok(Codex {
            basis,
            index,
            codewords,
            bit_width,
        })
    }

    /// Whether `symbol` belongs to the basis
    pub fn contains(&self, symbol: &T) -> bool {
        self.index.contains_key(symbol)
    }

    /// Position of `symbol` in the basis, if present
    pub fn index_of(&self, symbol: &T) -> Option<usize> {
        self.index.get(symbol).copied()
    }

    /// Returns the codeword of `symbol`.
    ///
    /// # Errors
    ///
    /// `Error::SymbolNotFound` if `symbol` is not in the basis.
    pub fn to_bits(&self, symbol: &T) -> Result<&BitString> {
        self.index_of(symbol)
            .map(|position| &self.codewords[position])
            .ok_or_else(|| Error::SymbolNotFound {
                symbol: format!("{:?}", symbol),
            })
    }

    /// Returns the symbol whose codeword is `bits`.
    ///
    /// # Errors
    ///
    /// `Error::MalformedCodeword` if `bits` is not exactly [`bit_width`](Self::bit_width)
    /// long or its value lies past the end of the basis.
    pub fn from_bits(&self, bits: &Bits) -> Result<&T> {
        let malformed = || Error::MalformedCodeword {
            bits: bits::render(bits),
            expected: self.bit_width,
        };

        if bits.len() != self.bit_width {
            return Err(malformed());
        }
        self.basis.get(bits::to_index(bits)).ok_or_else(malformed)
    }

    /// Codewords in basis order
    pub fn codewords(&self) -> &[BitString] {
        &self.codewords
    }

    /// Symbols in basis order
    pub fn basis(&self) -> &[T] {
        &self.basis
    }

    /// Number of symbols in the basis
    pub fn len(&self) -> usize {
        self.basis.len()
    }

    /// Always false: a codex is never built from an empty basis
    pub fn is_empty(&self) -> bool {
        self.basis.is_empty()
    }

    /// Width of every codeword in bits
    pub fn bit_width(&self) -> usize {
        self.bit_width
    }
}
