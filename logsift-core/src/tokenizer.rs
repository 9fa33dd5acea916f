//! Tokenizers
//!
//! A tokenizer maps text to a sequence of unit ids and back. Units are what
//! the analysis service counts against its input limit, so chunking is done
//! on units rather than on characters or bytes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tiktoken_rs::CoreBPE;

/// Errors raised while encoding or decoding units
#[derive(Debug, Error)]
pub enum TokenizerError {
    /// The encoding tables could not be loaded
    #[error("Failed to initialize tokenizer: {0}")]
    Init(String),

    /// A unit sequence did not decode to valid text
    #[error("Failed to decode units: {0}")]
    Decode(String),

    /// A unit id outside the tokenizer's vocabulary
    #[error("Unknown unit id: {0}")]
    UnknownUnit(u32),
}

/// Converts text to units and back
///
/// Implementations must be deterministic, and decoding the encoding of a
/// text must give the text back. A unit is not required to hold whole
/// characters: byte-level encodings split multibyte characters across
/// several units, so only some unit sequences decode to valid text.
pub trait Tokenizer: Send + Sync {
    /// Encodes text into its unit sequence
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError>;

    /// Raw bytes of every unit, in order
    fn unit_bytes(&self, units: &[u32]) -> Result<Vec<Vec<u8>>, TokenizerError>;

    /// Decodes a unit sequence back into text
    ///
    /// Fails when the sequence starts or ends inside a character.
    fn decode(&self, units: &[u32]) -> Result<String, TokenizerError> {
        let bytes = self.unit_bytes(units)?.concat();
        String::from_utf8(bytes).map_err(|e| TokenizerError::Decode(e.to_string()))
    }

    /// Number of units in a text
    fn count(&self, text: &str) -> Result<usize, TokenizerError> {
        Ok(self.encode(text)?.len())
    }

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Ids of the `cl100k_base` byte-pair ranks
const CL100K_RANKS: u32 = 100_256;

/// Ids of the `cl100k_base` special tokens
const CL100K_SPECIALS: [u32; 5] = [100_257, 100_258, 100_259, 100_260, 100_276];

/// The `cl100k_base` byte-pair encoding
pub struct Cl100kTokenizer {
    bpe: CoreBPE,
}

impl Cl100kTokenizer {
    pub fn new() -> Result<Self, TokenizerError> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| TokenizerError::Init(e.to_string()))?;
        Ok(Self { bpe })
    }
}

impl Tokenizer for Cl100kTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
        Ok(self
            .bpe
            .encode_ordinary(text)
            .into_iter()
            .map(|rank| rank as u32)
            .collect())
    }

    fn unit_bytes(&self, units: &[u32]) -> Result<Vec<Vec<u8>>, TokenizerError> {
        if let Some(&unknown) = units
            .iter()
            .find(|&&unit| unit >= CL100K_RANKS && !CL100K_SPECIALS.contains(&unit))
        {
            return Err(TokenizerError::UnknownUnit(unknown));
        }

        let ranks = units.iter().map(|&unit| unit as _).collect();
        Ok(self.bpe._decode_native_and_split(ranks).collect())
    }

    fn name(&self) -> &'static str {
        "cl100k"
    }
}

/// One unit per Unicode scalar value
///
/// Every cut between units falls on a character boundary, which makes the
/// chunk sizes exact and easy to reason about.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharTokenizer;

impl Tokenizer for CharTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
        Ok(text.chars().map(u32::from).collect())
    }

    fn unit_bytes(&self, units: &[u32]) -> Result<Vec<Vec<u8>>, TokenizerError> {
        units
            .iter()
            .map(|&unit| {
                let c = char::from_u32(unit).ok_or(TokenizerError::UnknownUnit(unit))?;
                Ok(c.to_string().into_bytes())
            })
            .collect()
    }

    fn decode(&self, units: &[u32]) -> Result<String, TokenizerError> {
        units
            .iter()
            .map(|&unit| char::from_u32(unit).ok_or(TokenizerError::UnknownUnit(unit)))
            .collect()
    }

    fn count(&self, text: &str) -> Result<usize, TokenizerError> {
        Ok(text.chars().count())
    }

    fn name(&self) -> &'static str {
        "chars"
    }
}

/// Selects a tokenizer by name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenizerKind {
    #[default]
    Cl100k,
    Chars,
}

impl TokenizerKind {
    pub fn build(self) -> Result<Box<dyn Tokenizer>, TokenizerError> {
        match self {
            TokenizerKind::Cl100k => Ok(Box::new(Cl100kTokenizer::new()?)),
            TokenizerKind::Chars => Ok(Box::new(CharTokenizer)),
        }
    }
}

impl FromStr for TokenizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cl100k" | "cl100k_base" => Ok(TokenizerKind::Cl100k),
            "chars" | "char" => Ok(TokenizerKind::Chars),
            other => Err(format!(
                "unknown tokenizer '{}' (expected 'cl100k' or 'chars')",
                other
            )),
        }
    }
}

impl fmt::Display for TokenizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerKind::Cl100k => write!(f, "cl100k"),
            TokenizerKind::Chars => write!(f, "chars"),
        }
    }
}
