//! UTF-16 coordinates.
//!
//! The Bot API measures entity offsets and lengths in UTF-16 code units, so a
//! character outside the Basic Multilingual Plane (most emoji) counts as two.

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// UTF-16 offset of every char boundary of `text`, including the end.
///
/// `offsets[i]` is where the `i`-th code point starts; the last element equals
/// [`utf16_len`].
pub fn code_point_offsets(text: &str) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(text.len() + 1);
    let mut pos = 0usize;
    offsets.push(pos);
    for c in text.chars() {
        pos += c.len_utf16();
        offsets.push(pos);
    }
    offsets
}

/// A text encoded once as UTF-16 so many spans can be cut from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Utf16Text {
    units: Vec<u16>,
}

impl Utf16Text {
    pub fn new(text: &str) -> Self {
        Self {
            units: text.encode_utf16().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The span `[offset, offset + length)`.
    ///
    /// `None` if the span runs past the end or cuts a surrogate pair in half.
    pub fn slice(&self, offset: usize, length: usize) -> Option<String> {
        let end = offset.checked_add(length)?;
        let units = self.units.get(offset..end)?;
        String::from_utf16(units).ok()
    }

    /// The span `[start, end)` clamped to the text; broken surrogates become U+FFFD.
    pub fn slice_lossy(&self, start: usize, end: usize) -> String {
        let end = end.min(self.units.len());
        let start = start.min(end);
        String::from_utf16_lossy(&self.units[start..end])
    }
}
