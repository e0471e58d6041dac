//! Streaming UTF-8 decoding.
//!
//! [`Utf8Decoder`] is a table-driven DFA (after Bjoern Hoehrmann's decoder)
//! that consumes one byte at a time. Malformed input never stalls it: a
//! rejected byte resets the automaton and is dropped, so decoding resumes at
//! the next byte.

const ACCEPT: u8 = 0;
const REJECT: u8 = 12;

/// Byte classes (first 256 entries) followed by the state transition table.
#[rustfmt::skip]
static UTF8D: [u8; 364] = [
    // Character classes.
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,  0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,  0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,  0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,  0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
    1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,  9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,
    7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,  7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,
    8,8,2,2,2,2,2,2,2,2,2,2,2,2,2,2,  2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,
    10,3,3,3,3,3,3,3,3,3,3,3,3,4,3,3, 11,6,6,6,5,8,8,8,8,8,8,8,8,8,8,8,

    // Transitions: state + class -> state.
    0,12,24,36,60,96,84,12,12,12,48,72, 12,12,12,12,12,12,12,12,12,12,12,12,
    12, 0,12,12,12,12,12, 0,12, 0,12,12, 12,24,12,12,12,12,12,24,12,24,12,12,
    12,12,12,12,12,12,12,24,12,12,12,12, 12,24,12,12,12,12,12,12,12,24,12,12,
    12,12,12,12,12,12,12,36,12,36,12,12, 12,36,12,12,12,12,12,36,12,36,12,12,
    12,36,12,12,12,12,12,12,12,12,12,12,
];

/// Result of feeding one byte to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStep {
    /// More bytes are needed to complete the current sequence.
    Incomplete,
    /// A full codepoint was decoded.
    Accept(u32),
    /// The byte does not continue a valid sequence. The decoder has already
    /// been reset and the byte is dropped.
    Reject,
}

/// Byte-at-a-time UTF-8 decoder state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf8Decoder {
    state: u8,
    codepoint: u32,
}

impl Utf8Decoder {
    /// Create a decoder in the initial state.
    pub const fn new() -> Self {
        Self {
            state: ACCEPT,
            codepoint: 0,
        }
    }

    /// Feed one byte.
    pub fn feed(&mut self, byte: u8) -> DecodeStep {
        let class = UTF8D[usize::from(byte)];

        self.codepoint = if self.state != ACCEPT {
            u32::from(byte & 0x3f) | (self.codepoint << 6)
        } else {
            (0xff_u32 >> class) & u32::from(byte)
        };

        self.state = UTF8D[256 + usize::from(self.state) + usize::from(class)];

        match self.state {
            ACCEPT => DecodeStep::Accept(self.codepoint),
            REJECT => {
                self.reset();
                DecodeStep::Reject
            }
            _ => DecodeStep::Incomplete,
        }
    }

    /// Return to the initial state, discarding any partial sequence.
    pub fn reset(&mut self) {
        self.state = ACCEPT;
        self.codepoint = 0;
    }

    /// Whether a multi-byte sequence is in progress.
    pub fn is_pending(&self) -> bool {
        self.state != ACCEPT
    }
}

/// Lazy iterator of codepoints over a byte slice.
///
/// Invalid bytes are skipped. A truncated sequence at the end of the slice
/// yields nothing.
#[derive(Debug, Clone)]
pub struct Codepoints<'a> {
    bytes: &'a [u8],
    pos: usize,
    decoder: Utf8Decoder,
}

impl<'a> Codepoints<'a> {
    /// Decode every byte of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            decoder: Utf8Decoder::new(),
        }
    }

    /// Decode `bytes` up to (not including) the first NUL byte.
    pub fn until_nul(bytes: &'a [u8]) -> Self {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Self::new(&bytes[..end])
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

impl Iterator for Codepoints<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        while let Some(&byte) = self.bytes.get(self.pos) {
            self.pos += 1;
            match self.decoder.feed(byte) {
                DecodeStep::Accept(codepoint) => return Some(codepoint),
                DecodeStep::Incomplete | DecodeStep::Reject => {}
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.bytes.len() - self.pos))
    }
}

/// Shorthand for [`Codepoints::new`].
pub fn codepoints(bytes: &[u8]) -> Codepoints<'_> {
    Codepoints::new(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Vec<u32> {
        codepoints(bytes).collect()
    }

    #[test]
    fn test_ascii() {
        assert_eq!(decode(b"Hi!"), vec![0x48, 0x69, 0x21]);
    }

    #[test]
    fn test_multibyte_matches_std() {
        let text = "h\u{e9}llo \u{4e2d}\u{6587} \u{1f600}";
        let expected: Vec<u32> = text.chars().map(u32::from).collect();
        assert_eq!(decode(text.as_bytes()), expected);
    }

    #[test]
    fn test_invalid_bytes_are_skipped() {
        // Stray continuation byte and an invalid lead byte.
        assert_eq!(decode(&[b'a', 0x80, b'b', 0xFF, b'c']), vec![0x61, 0x62, 0x63]);
    }

    #[test]
    fn test_overlong_encoding_rejected() {
        // 0xC0 0xAF is an overlong '/'.
        let out = decode(&[0xC0, 0xAF, b'x']);
        assert_eq!(out, vec![u32::from(b'x')]);
    }

    #[test]
    fn test_surrogates_rejected() {
        // U+D800 encoded as ED A0 80.
        let out = decode(&[0xED, 0xA0, 0x80, b'z']);
        assert!(!out.contains(&0xD800));
        assert_eq!(out.last(), Some(&u32::from(b'z')));
    }

    #[test]
    fn test_truncated_tail_yields_nothing() {
        assert_eq!(decode(&[b'a', 0xE4, 0xB8]), vec![0x61]);
    }

    #[test]
    fn test_until_nul() {
        let out: Vec<u32> = Codepoints::until_nul(b"ab\0cd").collect();
        assert_eq!(out, vec![0x61, 0x62]);
    }

    #[test]
    fn test_decoder_resynchronizes_within_four_bytes() {
        // No lead byte may keep the decoder pending for more than three
        // continuation bytes.
        for lead in 0u8..=255 {
            for filler in [0x80u8, 0x9F, 0xA0, 0xBF] {
                let mut decoder = Utf8Decoder::new();
                let mut pending_run = 0;
                let mut max_run = 0;
                for byte in std::iter::once(lead).chain(std::iter::repeat_n(filler, 8)) {
                    match decoder.feed(byte) {
                        DecodeStep::Incomplete => {
                            pending_run += 1;
                            max_run = max_run.max(pending_run);
                        }
                        DecodeStep::Accept(_) | DecodeStep::Reject => pending_run = 0,
                    }
                }
                assert!(max_run <= 3, "lead {lead:#04x} stayed pending for {max_run} bytes");
            }
        }
    }

    #[test]
    fn test_reject_resets_state() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.feed(0xE4), DecodeStep::Incomplete);
        assert!(decoder.is_pending());
        assert_eq!(decoder.feed(b'A'), DecodeStep::Reject);
        assert!(!decoder.is_pending());
        assert_eq!(decoder.feed(b'A'), DecodeStep::Accept(0x41));
    }
}
