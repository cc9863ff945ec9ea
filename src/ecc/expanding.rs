//! Repetition-expanded line code over an arbitrary finite basis.
//!
//! Each symbol of the basis is first mapped to its fixed-width codeword by a
//! [`Codex`], then every bit of that codeword is repeated `distance` times.
//! Two distinct codewords differ in at least one bit, so after expansion they
//! differ in at least `distance` bits, and up to `distance - 1` flipped bits
//! inside a chunk can always be detected.
//!
//! Recovery repairs any single flipped bit once `distance` is at least 3. At
//! `distance == 2` a single flip can leave a chunk exactly halfway between two
//! codewords; [`TieBreak::Reject`] then reports it as unrecoverable and only
//! [`TieBreak::LowestIndex`] picks one of them.
//!
//! On decode a chunk that is exactly one of the expanded codewords is reduced
//! back by keeping the first bit of every run. Anything else is corruption:
//! with recovery disabled the chunk decodes to `None`; with recovery enabled
//! the nearest expanded codeword is used instead, provided it lies strictly
//! closer than `distance` and, under [`TieBreak::Reject`], no other codeword
//! is equally close.
//!
//! # Examples
//!
//! ```
//! use repcode::ecc::ExpandingCode;
//!
//! let mut code = ExpandingCode::new(vec!["duck", "Goose", "Horse"], 3).unwrap();
//! let mut encoded = code.encode(&["duck"]).unwrap();
//! assert_eq!(encoded.to_string(), "000000");
//!
//! encoded.flip(0).unwrap();
//! assert_eq!(code.decode(&encoded).unwrap(), vec![None]);
//!
//! code.set_recovery_enabled(true);
//! assert_eq!(code.decode(&encoded).unwrap(), vec![Some("duck")]);
//! ```

use crate::ecc::bits::{self, BitString, Bits};
use crate::ecc::codex::Codex;
use crate::ecc::hamming;
use crate::ecc::LineCode;
use crate::error::{Error, Result};
use log::{debug, trace};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// How nearest-codeword recovery treats several codewords at the same minimum distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// A tie is ambiguous and the chunk is unrecoverable
    #[default]
    Reject,
    /// The codeword of the lowest basis index wins
    LowestIndex,
}

/// Whether decoding attempts to repair corrupted chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Recovery {
    /// Only exact codewords decode
    #[default]
    Disabled,
    /// Corrupted chunks are replaced by their nearest codeword when unambiguous
    Enabled,
}

impl Recovery {
    /// Whether recovery is attempted
    pub fn is_enabled(self) -> bool {
        self == Recovery::Enabled
    }
}

impl From<bool> for Recovery {
    fn from(enabled: bool) -> Self {
        if enabled {
            Recovery::Enabled
        } else {
            Recovery::Disabled
        }
    }
}

/// Builder for [`ExpandingCode`].
///
/// Defaults to a distance of 1, recovery disabled and ties rejected.
#[derive(Debug, Clone)]
pub struct ExpandingCodeBuilder {
    distance: usize,
    recovery: Recovery,
    tie_break: TieBreak,
}

impl Default for ExpandingCodeBuilder {
    fn default() -> Self {
        Self {
            distance: 1,
            recovery: Recovery::Disabled,
            tie_break: TieBreak::Reject,
        }
    }
}

impl ExpandingCodeBuilder {
    /// Creates a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many times every codeword bit is repeated
    pub fn distance(mut self, distance: usize) -> Self {
        self.distance = distance;
        self
    }

    /// Sets whether decoding starts with recovery enabled
    pub fn recovery(mut self, enabled: bool) -> Self {
        self.recovery = Recovery::from(enabled);
        self
    }

    /// Sets the tie policy of nearest-codeword recovery
    pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Builds the code for `basis`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if the distance is zero, the basis is empty or
    /// holds duplicates, or the expanded codeword length overflows.
    pub fn build<T>(self, basis: Vec<T>) -> Result<ExpandingCode<T>>
    where
        T: Clone + Eq + Hash + Debug,
    {
        if self.distance < 1 {
            return Err(Error::invalid("distance must be at least 1"));
        }

        let codex = Codex::new(basis)?;
        let chunk_len = codex
            .bit_width()
            .checked_mul(self.distance)
            .ok_or_else(|| Error::invalid("expanded codeword length overflows"))?;

        let mut code = ExpandingCode {
            codex,
            distance: self.distance,
            chunk_len,
            expanded: Vec::new(),
            lookup: HashMap::new(),
            recovery: self.recovery,
            tie_break: self.tie_break,
        };

        let expanded: Vec<BitString> = code
            .codex
            .codewords()
            .iter()
            .map(|codeword| code.expand(codeword))
            .collect();
        code.lookup = expanded
            .iter()
            .enumerate()
            .map(|(index, codeword)| (codeword.clone(), index))
            .collect();
        code.expanded = expanded;

        debug!(
            "expanding code: {} symbols, {}-bit codewords, distance {}, {}-bit chunks",
            code.codex.len(),
            code.codex.bit_width(),
            code.distance,
            code.chunk_len
        );

        Ok(code)
    }
}

/// Symbol code whose codeword bits are each repeated `distance` times.
#[derive(Debug, Clone)]
pub struct ExpandingCode<T> {
    codex: Codex<T>,
    /// Repetitions of every codeword bit, also the recovery threshold
    distance: usize,
    /// `bit_width * distance`
    chunk_len: usize,
    /// Expanded codewords in basis order
    expanded: Vec<BitString>,
    /// Basis index of each expanded codeword
    lookup: HashMap<BitString, usize>,
    recovery: Recovery,
    tie_break: TieBreak,
}

impl<T> ExpandingCode<T>
where
    T: Clone + Eq + Hash + Debug,
{
    /// Creates a code over `basis` with recovery disabled.
    pub fn new(basis: Vec<T>, distance: usize) -> Result<Self> {
        ExpandingCodeBuilder::new().distance(distance).build(basis)
    }

    /// Repeats every bit of `bits` `distance` times, preserving order.
    pub fn expand(&self, bits: &Bits) -> BitString {
        let mut out = BitString::with_capacity(bits.len() * self.distance);
        self.expand_into(bits, &mut out);
        out
    }

    fn expand_into(&self, bits: &Bits, out: &mut BitString) {
        for bit in bits.iter().by_vals() {
            for _ in 0..self.distance {
                out.push(bit);
            }
        }
    }

    /// Keeps the first bit of every `distance`-long run.
    ///
    /// Inverse of [`expand`](Self::expand) for any input, codeword or not.
    pub fn contract(&self, expanded: &Bits) -> BitString {
        expanded.chunks(self.distance).map(|run| run[0]).collect()
    }

    /// Reduces an expanded chunk using the stored recovery setting.
    ///
    /// Returns `None` when the chunk is unrecoverable.
    pub fn reduce(&self, expanded: &Bits) -> Option<BitString> {
        self.reduce_with(expanded, self.recovery)
    }

    /// Reduces an expanded chunk with an explicit recovery setting.
    pub fn reduce_with(&self, expanded: &Bits, recovery: Recovery) -> Option<BitString> {
        if self.lookup.contains_key(expanded) {
            return Some(self.contract(expanded));
        }
        if !recovery.is_enabled() {
            return None;
        }
        self.closest_codeword(expanded)
            .map(|codeword| self.contract(codeword))
    }

    /// Finds the expanded codeword nearest to `unknown`.
    ///
    /// A candidate is accepted only when its Hamming distance is strictly
    /// below `distance`. Under [`TieBreak::Reject`] a second codeword at the
    /// same distance makes the result `None`; under [`TieBreak::LowestIndex`]
    /// the one with the lowest basis index is returned. Inputs whose length
    /// differs from [`chunk_len`](Self::chunk_len) have no nearest codeword.
    pub fn closest_codeword(&self, unknown: &Bits) -> Option<&BitString> {
        if unknown.len() != self.chunk_len {
            return None;
        }

        let mut best: Option<(usize, usize)> = None;
        let mut tied = false;
        for (index, codeword) in self.expanded.iter().enumerate() {
            let d = hamming::distance(codeword, unknown).ok()?;
            match best {
                Some((best_d, _)) if d > best_d => {}
                Some((best_d, _)) if d == best_d => tied = true,
                _ => {
                    best = Some((d, index));
                    tied = false;
                }
            }
        }

        let (best_d, index) = best?;
        if best_d >= self.distance {
            return None;
        }
        if tied && self.tie_break == TieBreak::Reject {
            trace!(
                "{} is equally close to several codewords",
                bits::render(unknown)
            );
            return None;
        }
        Some(&self.expanded[index])
    }

    /// Encodes `symbols` into one concatenated bitstring.
    ///
    /// # Errors
    ///
    /// `Error::SymbolNotFound` for the first symbol outside the basis; nothing
    /// is returned for the symbols before it.
    pub fn encode(&self, symbols: &[T]) -> Result<BitString> {
        let mut out = BitString::with_capacity(symbols.len() * self.chunk_len);
        for symbol in symbols {
            let codeword = self.codex.to_bits(symbol)?;
            self.expand_into(codeword, &mut out);
        }
        Ok(out)
    }

    /// Decodes `bits` using the stored recovery setting.
    pub fn decode(&self, bits: &Bits) -> Result<Vec<Option<T>>> {
        self.decode_with(bits, self.recovery)
    }

    /// Decodes `bits`, one output slot per chunk, with an explicit recovery setting.
    ///
    /// Unrecoverable chunks decode to `None` and never fail the call.
    ///
    /// # Errors
    ///
    /// `Error::MalformedInput` if the length of `bits` is not a multiple of
    /// [`chunk_len`](Self::chunk_len).
    pub fn decode_with(&self, bits: &Bits, recovery: Recovery) -> Result<Vec<Option<T>>> {
        self.check_length(bits)?;
        Ok(bits
            .chunks_exact(self.chunk_len)
            .enumerate()
            .map(|(position, chunk)| self.decode_chunk(position, chunk, recovery))
            .collect())
    }

    /// Parses a `'0'`/`'1'` string and decodes it using the stored recovery setting.
    ///
    /// # Errors
    ///
    /// `Error::InvalidBit` for any other character, otherwise as [`decode`](Self::decode).
    pub fn decode_str(&self, bits: &str) -> Result<Vec<Option<T>>> {
        let parsed: BitString = bits.parse()?;
        self.decode(&parsed)
    }

    fn check_length(&self, bits: &Bits) -> Result<()> {
        if bits.len() % self.chunk_len != 0 {
            return Err(Error::MalformedInput {
                length: bits.len(),
                chunk: self.chunk_len,
            });
        }
        Ok(())
    }

    fn decode_chunk(&self, position: usize, chunk: &Bits, recovery: Recovery) -> Option<T> {
        if let Some(&index) = self.lookup.get(chunk) {
            return self.codex.basis().get(index).cloned();
        }
        let Some(reduced) = self.reduce_with(chunk, recovery) else {
            debug!("chunk {} unrecoverable: {}", position, bits::render(chunk));
            return None;
        };
        trace!("chunk {} recovered from {}", position, bits::render(chunk));
        self.codex.from_bits(&reduced).ok().cloned()
    }

    /// Sets the stored recovery flag and returns the value it replaced.
    pub fn set_recovery_enabled(&mut self, enabled: bool) -> bool {
        let previous = self.recovery.is_enabled();
        self.recovery = Recovery::from(enabled);
        previous
    }

    /// Whether [`decode`](Self::decode) currently attempts recovery
    pub fn recovery_enabled(&self) -> bool {
        self.recovery.is_enabled()
    }

    /// Tie policy of nearest-codeword recovery
    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Repetitions per codeword bit
    pub fn distance(&self) -> usize {
        self.distance
    }

    /// Length in bits of one encoded symbol
    pub fn chunk_len(&self) -> usize {
        self.chunk_len
    }

    /// The underlying symbol map
    pub fn codex(&self) -> &Codex<T> {
        &self.codex
    }

    /// Expanded codewords in basis order
    pub fn expanded_codewords(&self) -> &[BitString] {
        &self.expanded
    }

    /// Measured minimum pairwise Hamming distance of the expanded codewords.
    ///
    /// `None` for a single-symbol basis.
    pub fn achieved_distance(&self) -> Option<usize> {
        hamming::min_distance(self.expanded.as_slice()).ok().flatten()
    }
}

#[cfg(feature = "parallel")]
impl<T> ExpandingCode<T>
where
    T: Clone + Eq + Hash + Debug + Send + Sync,
{
    /// Same as [`decode_with`](Self::decode_with), chunks decoded on the rayon pool.
    pub fn decode_par(&self, bits: &Bits, recovery: Recovery) -> Result<Vec<Option<T>>> {
        use rayon::prelude::*;

        self.check_length(bits)?;
        let chunks: Vec<&Bits> = bits.chunks_exact(self.chunk_len).collect();
        Ok(chunks
            .par_iter()
            .enumerate()
            .map(|(position, chunk)| self.decode_chunk(position, chunk, recovery))
            .collect())
    }
}

impl<T> LineCode for ExpandingCode<T>
where
    T: Clone + Eq + Hash + Debug,
{
    type Symbol = T;

    fn encode(&self, symbols: &[T]) -> Result<BitString> {
        ExpandingCode::encode(self, symbols)
    }

    fn decode(&self, bits: &Bits) -> Result<Vec<Option<T>>> {
        ExpandingCode::decode(self, bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitString {
        s.parse().unwrap()
    }

    fn farm() -> ExpandingCode<&'static str> {
        ExpandingCode::new(vec!["duck", "Goose", "Horse"], 3).unwrap()
    }

    #[test]
    fn test_code_creation() {
        let code = farm();
        assert_eq!(code.distance(), 3);
        assert_eq!(code.chunk_len(), 6);
        assert_eq!(code.codex().bit_width(), 2);
        assert!(!code.recovery_enabled());
        assert_eq!(code.tie_break(), TieBreak::Reject);
        let rendered: Vec<String> = code
            .expanded_codewords()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(rendered, vec!["000000", "000111", "111000"]);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            ExpandingCode::new(vec![1, 2], 0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            ExpandingCode::<u8>::new(Vec::new(), 2),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            ExpandingCode::new(vec![1, 1], 2),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_expansion() {
        let code = ExpandingCode::new(vec![1, 2, 3, 4], 3).unwrap();
        for (input, expected) in [("00", "000000"), ("10", "111000")] {
            let expanded = code.expand(&bits(input));
            assert_eq!(expanded.to_string(), expected);
            assert_eq!(code.reduce(&expanded), Some(bits(input)));
        }
    }

    #[test]
    fn test_contract_inverts_expand() {
        let code = ExpandingCode::new(vec!['a', 'b'], 4).unwrap();
        for input in ["", "1", "0110", "111"] {
            assert_eq!(code.contract(&code.expand(&bits(input))), bits(input));
        }
    }

    #[test]
    fn test_reduce_without_recovery() {
        let code = farm();
        assert_eq!(code.reduce(&bits("000111")), Some(bits("01")));
        assert_eq!(code.reduce(&bits("100000")), None);
        assert_eq!(code.reduce(&bits("0001")), None);
    }

    #[test]
    fn test_closest_codeword() {
        let code = farm();
        assert_eq!(code.closest_codeword(&bits("100000")), Some(&bits("000000")));
        assert_eq!(code.closest_codeword(&bits("011111")), Some(&bits("000111")));
        assert_eq!(code.closest_codeword(&bits("10000")), None);
    }

    #[test]
    fn test_closest_codeword_threshold() {
        let code = farm();
        // 2 from duck, 3 from the others
        assert_eq!(code.closest_codeword(&bits("100100")), Some(&bits("000000")));
        // 3 from both Goose and Horse
        assert_eq!(code.closest_codeword(&bits("110110")), None);
    }

    #[test]
    fn test_tie_break() {
        let rejecting = ExpandingCode::new(vec!["a", "b"], 2).unwrap();
        assert_eq!(rejecting.closest_codeword(&bits("01")), None);

        let lowest = ExpandingCodeBuilder::new()
            .distance(2)
            .tie_break(TieBreak::LowestIndex)
            .recovery(true)
            .build(vec!["a", "b"])
            .unwrap();
        assert_eq!(lowest.closest_codeword(&bits("01")), Some(&bits("00")));
        assert_eq!(lowest.decode(&bits("0110")).unwrap(), vec![Some("a"), Some("a")]);
    }

    #[test]
    fn test_builder_without_type_annotations() {
        let defaults = ExpandingCodeBuilder::new().build(vec!['x', 'y']).unwrap();
        assert_eq!(defaults.distance(), 1);
        assert!(!defaults.recovery_enabled());
        assert_eq!(defaults.tie_break(), TieBreak::Reject);

        let configured = ExpandingCodeBuilder::default()
            .distance(4)
            .recovery(true)
            .build(vec![10u16, 20, 30])
            .unwrap();
        assert_eq!(configured.chunk_len(), 8);
        assert!(configured.recovery_enabled());
        assert_eq!(
            configured.decode_str("1000000011110001").unwrap(),
            vec![Some(10), Some(30)]
        );
    }

    #[test]
    fn test_single_flip_at_distance_two() {
        let mut code = ExpandingCode::new(vec![1, 2, 3, 4], 2).unwrap();
        code.set_recovery_enabled(true);
        // 1 -> "0000"; flipping bit 2 ties with 2 -> "0011"
        let mut encoded = code.encode(&[1]).unwrap();
        encoded.flip(2).unwrap();
        assert_eq!(code.decode(&encoded).unwrap(), vec![None]);

        let lenient = ExpandingCodeBuilder::new()
            .distance(2)
            .recovery(true)
            .tie_break(TieBreak::LowestIndex)
            .build(vec![1, 2, 3, 4])
            .unwrap();
        assert_eq!(lenient.decode(&encoded).unwrap(), vec![Some(1)]);
    }

    #[test]
    fn test_distance_one_never_recovers() {
        let mut code = ExpandingCode::new(vec![0u8, 1, 2], 1).unwrap();
        code.set_recovery_enabled(true);
        assert_eq!(code.decode(&bits("11")).unwrap(), vec![None]);
        assert_eq!(code.decode(&bits("10")).unwrap(), vec![Some(2)]);
    }

    #[test]
    fn test_ruined_message() {
        let mut code = farm();
        let mut encoded = code.encode(&["duck"]).unwrap();
        encoded.flip(0).unwrap();

        assert_eq!(code.decode(&encoded).unwrap(), vec![None]);
        code.set_recovery_enabled(true);
        assert_eq!(code.decode(&encoded).unwrap(), vec![Some("duck")]);
    }

    #[test]
    fn test_recovery_toggle() {
        let mut code = farm();
        assert!(!code.set_recovery_enabled(true));
        assert!(code.set_recovery_enabled(false));
        assert!(!code.set_recovery_enabled(false));
    }

    #[test]
    fn test_decode_with_leaves_flag_alone() {
        let code = farm();
        let corrupted = bits("100000000111");
        assert_eq!(
            code.decode_with(&corrupted, Recovery::Enabled).unwrap(),
            vec![Some("duck"), Some("Goose")]
        );
        assert!(!code.recovery_enabled());
        assert_eq!(code.decode(&corrupted).unwrap(), vec![None, Some("Goose")]);
    }

    #[test]
    fn test_encode_not_in_basis() {
        let code = farm();
        assert_eq!(
            code.encode(&["duck", "human"]).unwrap_err(),
            Error::SymbolNotFound {
                symbol: "\"human\"".to_string()
            }
        );
    }

    #[test]
    fn test_decode_malformed_input() {
        let code = farm();
        assert_eq!(
            code.decode(&bits("0000000")).unwrap_err(),
            Error::MalformedInput {
                length: 7,
                chunk: 6
            }
        );
        assert!(code.decode(&BitString::new()).unwrap().is_empty());
    }

    #[test]
    fn test_decode_str() {
        let code = farm();
        assert_eq!(
            code.decode_str("111000000000").unwrap(),
            vec![Some("Horse"), Some("duck")]
        );
        assert!(matches!(
            code.decode_str("11100a"),
            Err(Error::InvalidBit { position: 5, .. })
        ));
    }

    #[test]
    fn test_unused_codeword_index_is_unrecoverable() {
        // "11" indexes past a three-symbol basis, so "111111" is never a codeword
        let mut code = farm();
        code.set_recovery_enabled(true);
        assert_eq!(code.decode(&bits("111111")).unwrap(), vec![None]);
    }

    #[test]
    fn test_achieved_distance() {
        assert_eq!(farm().achieved_distance(), Some(3));
        let single = ExpandingCode::new(vec!["only"], 5).unwrap();
        assert_eq!(single.achieved_distance(), None);
        assert_eq!(single.encode(&["only"]).unwrap().to_string(), "00000");
    }

    #[test]
    fn test_line_code_trait() {
        fn roundtrip<C: LineCode>(code: &C, symbols: &[C::Symbol]) -> Vec<Option<C::Symbol>> {
            code.decode(&code.encode(symbols).unwrap()).unwrap()
        }

        let code = farm();
        assert_eq!(
            roundtrip(&code, &["Horse", "duck"]),
            vec![Some("Horse"), Some("duck")]
        );
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_decode_par_matches_sequential() {
        let code = farm();
        let mut encoded = code.encode(&["duck", "Goose", "Horse", "duck"]).unwrap();
        encoded.flip(7).unwrap();
        for recovery in [Recovery::Disabled, Recovery::Enabled] {
            assert_eq!(
                code.decode_par(&encoded, recovery).unwrap(),
                code.decode_with(&encoded, recovery).unwrap()
            );
        }
    }
}
