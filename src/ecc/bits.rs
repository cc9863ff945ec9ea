//! Owned bitstrings.
//!
//! Codewords travel as sequences of bits, most significant bit first, and are
//! written out as strings of `'0'` and `'1'` characters. [`BitString`] wraps a
//! [`BitVec`] with that textual form and dereferences to [`Bits`], so anything
//! that reads bits takes a plain `&Bits`.

use crate::error::{Error, Result};
use bitvec::prelude::*;
use std::borrow::Borrow;
use std::fmt::{self, Debug, Display, Formatter, Write};
use std::ops::Deref;
use std::str::FromStr;

/// Borrowed bit sequence, most significant bit first.
pub type Bits = BitSlice<u8, Msb0>;

/// Owned bit sequence, most significant bit first.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitString(BitVec<u8, Msb0>);

impl BitString {
    /// Creates an empty bitstring
    pub fn new() -> Self {
        BitString(BitVec::new())
    }

    /// Creates an empty bitstring with room for `capacity` bits
    pub fn with_capacity(capacity: usize) -> Self {
        BitString(BitVec::with_capacity(capacity))
    }

    /// Creates a bitstring of `len` zero bits
    pub fn zeros(len: usize) -> Self {
        BitString(bitvec![u8, Msb0; 0; len])
    }

    /// Binary representation of `index`, left-padded with zeros to `width` bits.
    ///
    /// Bits of `index` above `width` are dropped.
    pub fn from_index(index: usize, width: usize) -> Self {
        (0..width)
            .rev()
            .map(|shift| shift < usize::BITS as usize && (index >> shift) & 1 == 1)
            .collect()
    }

    /// Appends one bit
    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    /// Appends every bit of `bits`
    pub fn extend_from_bits(&mut self, bits: &Bits) {
        self.0.extend_from_bitslice(bits);
    }

    /// Inverts the bit at `position`.
    pub fn flip(&mut self, position: usize) -> Result<()> {
        if position >= self.0.len() {
            return Err(Error::invalid(format!(
                "cannot flip bit {} of a {}-bit string",
                position,
                self.0.len()
            )));
        }
        let current = self.0[position];
        self.0.set(position, !current);
        Ok(())
    }

    /// Borrows the underlying bits
    pub fn as_bits(&self) -> &Bits {
        self.0.as_bitslice()
    }
}

/// Unsigned integer value of `bits`, read most significant bit first.
///
/// Only the low `usize::BITS` bits survive for longer inputs.
pub fn to_index(bits: &Bits) -> usize {
    bits.iter()
        .by_vals()
        .fold(0usize, |acc, bit| (acc << 1) | usize::from(bit))
}

/// Renders `bits` as `'0'`/`'1'` characters.
pub fn render(bits: &Bits) -> String {
    let mut out = String::with_capacity(bits.len());
    for bit in bits.iter().by_vals() {
        out.push(if bit { '1' } else { '0' });
    }
    out
}

impl Deref for BitString {
    type Target = Bits;

    fn deref(&self) -> &Bits {
        self.0.as_bitslice()
    }
}

impl AsRef<Bits> for BitString {
    fn as_ref(&self) -> &Bits {
        self.0.as_bitslice()
    }
}

impl Borrow<Bits> for BitString {
    fn borrow(&self) -> &Bits {
        self.0.as_bitslice()
    }
}

impl From<&Bits> for BitString {
    fn from(bits: &Bits) -> Self {
        BitString(bits.to_bitvec())
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        BitString(iter.into_iter().collect())
    }
}

impl FromStr for BitString {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut bits = BitVec::with_capacity(s.len());
        for (position, found) in s.chars().enumerate() {
            match found {
                '0' => bits.push(false),
                '1' => bits.push(true),
                _ => return Err(Error::InvalidBit { position, found }),
            }
        }
        Ok(BitString(bits))
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for bit in self.0.iter().by_vals() {
            f.write_char(if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

impl Debug for BitString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "BitString(\"{}\")", self)
    }
}
