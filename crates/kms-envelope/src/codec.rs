//! Byte-buffer ⇄ text conversion under a configurable encoding.
//!
//! Every externally visible field of an envelope is text; this module owns
//! the conversion. The encoding is chosen once, at [`Codec`] construction,
//! and must match between the producer and the consumer of an envelope.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;

use crate::error::Result;

/// Supported text encodings for envelope fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Standard base64 alphabet with padding. The default.
    #[default]
    Base64,
    /// URL-safe base64 alphabet without padding, for envelopes embedded in
    /// URLs or filenames.
    Base64Url,
}

/// Stateless converter between binary buffers and their text representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    encoding: Encoding,
}

impl Codec {
    /// Create a codec for the given encoding.
    pub fn new(encoding: Encoding) -> Self {
        Self { encoding }
    }

    /// The encoding this codec was constructed with.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Encode a byte buffer as text. Total — cannot fail.
    pub fn buffer_to_string(&self, bytes: &[u8]) -> String {
        match self.encoding {
            Encoding::Base64 => STANDARD.encode(bytes),
            Encoding::Base64Url => URL_SAFE_NO_PAD.encode(bytes),
        }
    }

    /// Decode text back into a byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Decode`] if `text` is not valid under this
    /// codec's encoding.
    ///
    /// [`EnvelopeError::Decode`]: crate::error::EnvelopeError::Decode
    pub fn string_to_buffer(&self, text: &str) -> Result<Vec<u8>> {
        let bytes = match self.encoding {
            Encoding::Base64 => STANDARD.decode(text)?,
            Encoding::Base64Url => URL_SAFE_NO_PAD.decode(text)?,
        };
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnvelopeError;

    #[test]
    fn round_trip_default_encoding() {
        let codec = Codec::default();
        let bytes = [0u8, 1, 2, 0xFE, 0xFF];
        let text = codec.buffer_to_string(&bytes);
        assert_eq!(codec.string_to_buffer(&text).unwrap(), bytes);
    }

    #[test]
    fn round_trip_url_safe() {
        let codec = Codec::new(Encoding::Base64Url);
        let bytes: Vec<u8> = (0..=255).collect();
        let text = codec.buffer_to_string(&bytes);
        assert!(!text.contains('+'));
        assert!(!text.contains('/'));
        assert_eq!(codec.string_to_buffer(&text).unwrap(), bytes);
    }

    #[test]
    fn empty_buffer_round_trips() {
        let codec = Codec::default();
        let text = codec.buffer_to_string(&[]);
        assert_eq!(text, "");
        assert_eq!(codec.string_to_buffer(&text).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn malformed_text_is_a_decode_error() {
        let codec = Codec::default();
        let err = codec.string_to_buffer("not valid base64 !!!").unwrap_err();
        assert!(matches!(err, EnvelopeError::Decode(_)));
    }

    #[test]
    fn encodings_are_not_interchangeable() {
        let standard = Codec::new(Encoding::Base64);
        let url_safe = Codec::new(Encoding::Base64Url);
        // 0xFB 0xEF forces '+'/'/' characters under the standard alphabet.
        let text = standard.buffer_to_string(&[0xFB, 0xEF, 0xBE]);
        assert!(url_safe.string_to_buffer(&text).is_err());
    }
}
