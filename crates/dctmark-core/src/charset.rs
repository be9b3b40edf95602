//! The 6-bit message alphabet.
//!
//! Text payloads are restricted to a fixed 64-symbol charset so that each
//! character costs exactly six bits of the very small embedding capacity.

use crate::bits::BitSequence;

/// Valid characters and their order in the 6-bit charset.
pub const VALID_CHARS: &str =
    " abcdefghijklmnopqrstuvwxyz0123456789.-,:/()?!\"'#*+_%$&=<>[];@§\n";

/// Bits per encoded character.
pub const BITS_PER_CHAR: usize = 6;

fn symbol_index(c: char) -> Option<usize> {
    VALID_CHARS.chars().position(|v| v == c)
}

fn symbol_at(index: usize) -> char {
    // the 6-bit index always lands inside the 64-symbol charset
    VALID_CHARS.chars().nth(index & 0x3F).unwrap_or(' ')
}

/// Encode `text` to exactly `max_text_len * 6` bits.
///
/// The text is lowercased, characters outside [`VALID_CHARS`] are dropped,
/// overlong input is cut at `max_text_len` and short input is space-padded.
pub fn text_to_bits(text: &str, max_text_len: usize) -> BitSequence {
    let mut symbols: Vec<usize> = text
        .to_lowercase()
        .chars()
        .filter_map(symbol_index)
        .take(max_text_len)
        .collect();
    symbols.resize(max_text_len, 0); // index 0 is the space character

    let mut bits = BitSequence::new();
    for index in symbols {
        bits.add_value(index as u32, BITS_PER_CHAR);
    }
    bits
}

/// Decode `max_text_len` characters from `bits`, including any padding.
///
/// Callers trim the surrounding padding; see `Watermarker::extract_text`.
pub fn bits_to_text(bits: &BitSequence, max_text_len: usize) -> String {
    (0..max_text_len)
        .map(|i| symbol_at(bits.value(i * BITS_PER_CHAR, BITS_PER_CHAR) as usize))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_has_64_symbols() {
        assert_eq!(VALID_CHARS.chars().count(), 64);
    }

    #[test]
    fn charset_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for c in VALID_CHARS.chars() {
            assert!(seen.insert(c), "duplicate symbol {c:?}");
        }
    }

    #[test]
    fn round_trip_simple_text() {
        let bits = text_to_bits("hello world", 24);
        assert_eq!(bits.len(), 24 * BITS_PER_CHAR);
        let text = bits_to_text(&bits, 24);
        assert_eq!(text.trim(), "hello world");
        assert_eq!(text.len(), 24);
    }

    #[test]
    fn uppercase_is_folded() {
        let a = text_to_bits("Hello World", 24);
        let b = text_to_bits("hello world", 24);
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_characters_are_dropped() {
        let a = text_to_bits("h~e|l\\lo", 16);
        let b = text_to_bits("hello", 16);
        assert_eq!(a, b);
    }

    #[test]
    fn overlong_text_is_cut() {
        let bits = text_to_bits("abcdefgh", 4);
        assert_eq!(bits_to_text(&bits, 4), "abcd");
    }

    #[test]
    fn every_symbol_round_trips() {
        let all: String = VALID_CHARS.chars().collect();
        let bits = text_to_bits(&all, 64);
        assert_eq!(bits_to_text(&bits, 64), all);
    }
}
