//! Token-bounded chunking
//!
//! Text is encoded once, the unit sequence is cut into consecutive windows of
//! at most `max_units`, and every window is decoded on its own. Cuts happen
//! on unit boundaries only; a unit may span several characters and a
//! character may span several units, so cutting in character space would not
//! respect the limit.
//!
//! A cut that would fall inside a character is moved back to the closest
//! earlier unit boundary that ends on a whole character. Only when the
//! window holds no such boundary at all (a single character wider than
//! `max_units`) does it grow forward to the end of that character. Chunks
//! are therefore always valid text and concatenate back to the input.

use std::num::NonZeroUsize;
use std::ops::Range;

use crate::tokenizer::{Tokenizer, TokenizerError};

/// Default unit budget per chunk
pub const DEFAULT_MAX_UNITS: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Splits text into chunks of at most `max_units` units
///
/// Empty text yields no chunks. When every unit boundary is also a character
/// boundary, every chunk except possibly the last holds exactly `max_units`
/// units.
pub fn chunk_text(
    text: &str,
    max_units: NonZeroUsize,
    tokenizer: &dyn Tokenizer,
) -> Result<Vec<String>, TokenizerError> {
    let units = tokenizer.encode(text)?;
    chunk_units(&units, max_units, tokenizer)
}

/// Decodes consecutive windows of an already encoded unit sequence
pub fn chunk_units(
    units: &[u32],
    max_units: NonZeroUsize,
    tokenizer: &dyn Tokenizer,
) -> Result<Vec<String>, TokenizerError> {
    let layout = Layout::new(units, tokenizer)?;
    Ok(layout
        .windows(max_units)
        .into_iter()
        .map(|window| layout.slice(window).to_string())
        .collect())
}

/// Unit ranges of the chunks [`chunk_units`] produces
pub fn window_bounds(
    units: &[u32],
    max_units: NonZeroUsize,
    tokenizer: &dyn Tokenizer,
) -> Result<Vec<Range<usize>>, TokenizerError> {
    Ok(Layout::new(units, tokenizer)?.windows(max_units))
}

/// Number of chunks [`chunk_text`] produces for a unit count
///
/// Exact when every unit boundary is a character boundary.
pub fn chunk_count(unit_count: usize, max_units: NonZeroUsize) -> usize {
    unit_count.div_ceil(max_units.get())
}

/// Decoded text with the byte offset of every unit boundary
struct Layout {
    text: String,
    // offsets[i] is where unit i starts; the last entry is text.len()
    offsets: Vec<usize>,
}

impl Layout {
    fn new(units: &[u32], tokenizer: &dyn Tokenizer) -> Result<Self, TokenizerError> {
        let bytes = tokenizer.unit_bytes(units)?;

        let mut offsets = Vec::with_capacity(bytes.len() + 1);
        let mut end = 0;
        offsets.push(end);
        for unit in &bytes {
            end += unit.len();
            offsets.push(end);
        }

        let text = String::from_utf8(bytes.concat())
            .map_err(|e| TokenizerError::Decode(e.to_string()))?;

        Ok(Self { text, offsets })
    }

    fn unit_count(&self) -> usize {
        self.offsets.len() - 1
    }

    fn is_cut(&self, unit: usize) -> bool {
        self.text.is_char_boundary(self.offsets[unit])
    }

    fn windows(&self, max_units: NonZeroUsize) -> Vec<Range<usize>> {
        let count = self.unit_count();
        let mut windows = Vec::with_capacity(chunk_count(count, max_units));
        let mut start = 0;

        while start < count {
            let limit = (start + max_units.get()).min(count);

            let mut end = limit;
            while end > start && !self.is_cut(end) {
                end -= 1;
            }
            if end == start {
                end = limit;
                while !self.is_cut(end) {
                    end += 1;
                }
            }

            windows.push(start..end);
            start = end;
        }

        windows
    }

    fn slice(&self, window: Range<usize>) -> &str {
        &self.text[self.offsets[window.start]..self.offsets[window.end]]
    }
}
