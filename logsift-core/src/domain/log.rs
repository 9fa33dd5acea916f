//! Log domain types

use std::borrow::Cow;

/// Raw log of one job as returned by the provider
///
/// The bytes are kept as received; [`RawLog::text`] decodes them lossily so
/// that a log with stray invalid UTF-8 can still be analysed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLog {
    bytes: Vec<u8>,
}

impl RawLog {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
