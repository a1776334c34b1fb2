//! Fixed-width field extraction.
//!
//! Every decoder in this crate reads the dump through [`extract`]. Positions
//! follow the format documentation: 1-based, counted in characters. The
//! extractor is total: out-of-range requests shrink to what exists instead of
//! failing, so a truncated upload degrades to empty fields.

/// Returns up to `length` characters starting at the 1-based `position`.
///
/// `position == 0` yields an empty string. Requests that run past the end of
/// `buffer` return the characters that exist (possibly none).
///
/// ```rust
/// use abnt_rs::layout::extract;
///
/// assert_eq!(extract("12345678", 3, 2), "34");
/// assert_eq!(extract("12345678", 7, 5), "78");
/// assert_eq!(extract("12345678", 0, 2), "");
/// ```
pub fn extract(buffer: &str, position: usize, length: usize) -> &str {
    if position == 0 || length == 0 {
        return "";
    }
    let first = position - 1;
    let last = first.saturating_add(length);

    if buffer.is_ascii() {
        let start = first.min(buffer.len());
        let end = last.min(buffer.len());
        return &buffer[start..end];
    }

    let start = char_to_byte(buffer, first);
    let end = char_to_byte(buffer, last);
    &buffer[start..end]
}

fn char_to_byte(buffer: &str, char_index: usize) -> usize {
    buffer
        .char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(buffer.len())
}

/// The uploaded dump with every line break removed.
///
/// Offsets of the general parameters block and of the repeating sections are
/// defined against this flattened view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBuffer {
    data: String,
}

impl RawBuffer {
    /// Flattens an upload by dropping `\n` and `\r`.
    pub fn from_upload(text: &str) -> Self {
        let data = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        Self { data }
    }

    /// See [`extract`].
    pub fn field(&self, position: usize, length: usize) -> &str {
        extract(&self.data, position, length)
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Decodes a file body the way the portal exports it: one byte, one character.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extract_inside_buffer() {
        assert_eq!(extract("ABCDEFGH", 1, 8), "ABCDEFGH");
        assert_eq!(extract("ABCDEFGH", 2, 3), "BCD");
    }

    #[test]
    fn test_extract_past_end_is_partial() {
        assert_eq!(extract("ABCDEFGH", 8, 4), "H");
        assert_eq!(extract("ABCDEFGH", 9, 4), "");
        assert_eq!(extract("", 1, 4), "");
    }

    #[test]
    fn test_extract_zero_position() {
        assert_eq!(extract("ABCDEFGH", 0, 4), "");
    }

    #[test]
    fn test_extract_counts_characters_not_bytes() {
        // Latin-1 uploads decode to multi-byte chars in UTF-8.
        let s = "ÁBÇDÉ";
        assert_eq!(extract(s, 2, 2), "BÇ");
        assert_eq!(extract(s, 5, 3), "É");
    }

    #[test]
    fn test_raw_buffer_strips_line_breaks() {
        let buf = RawBuffer::from_upload("1234\r\n5678\n90");
        assert_eq!(buf.as_str(), "1234567890");
        assert_eq!(buf.field(4, 3), "456");
        assert_eq!(buf.len(), 10);
    }

    #[test]
    fn test_decode_latin1() {
        assert_eq!(decode_latin1(&[0x41, 0xC7, 0x30]), "AÇ0");
    }

    proptest! {
        #[test]
        fn prop_extract_is_total_and_bounded(
            s in "\\PC{0,64}",
            position in 0usize..100,
            length in 0usize..100,
        ) {
            let out = extract(&s, position, length);
            prop_assert!(out.chars().count() <= length);
        }

        #[test]
        fn prop_extract_matches_char_slice(
            s in "[0-9A-Z]{0,40}",
            position in 1usize..50,
            length in 0usize..50,
        ) {
            let expected: String = s.chars().skip(position - 1).take(length).collect();
            prop_assert_eq!(extract(&s, position, length), expected.as_str());
        }
    }
}
