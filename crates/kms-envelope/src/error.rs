//! Error taxonomy for envelope operations.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnvelopeError>;

/// Top-level error type for all envelope, cipher, codec, and key-management
/// operations.
///
/// None of these are recovered internally — the crate is a one-call-deep
/// orchestration layer and every failure surfaces to the immediate caller.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The envelope is not a well-formed two-field structure. Raised locally,
    /// before any key-management call is attempted.
    #[error("invalid encryption envelope: {0}")]
    InvalidEnvelope(String),

    /// The key-management service rejected or failed a call: bad master key,
    /// revoked access, or a wrapped key it cannot decrypt.
    #[error("key management service error: {0}")]
    Service(String),

    /// The key-management service could not be reached (timeout or transport
    /// failure before a service response).
    #[error("key management service unavailable: {0}")]
    Unavailable(String),

    /// Payload encryption failed inside the AEAD.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Payload decryption failed: truncated or tampered ciphertext, a wrong
    /// key, an unsupported ciphertext version, or non-UTF-8 plaintext.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Text-to-bytes conversion failed due to malformed encoding.
    #[error("decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// A data key has the wrong length for the payload cipher.
    #[error("invalid data key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message() {
        let e = EnvelopeError::InvalidEnvelope("expected exactly two fields, got 3".into());
        assert!(e.to_string().contains("expected exactly two fields"));
    }

    #[test]
    fn key_length_message_names_both_lengths() {
        let e = EnvelopeError::InvalidKeyLength {
            expected: 32,
            got: 16,
        };
        let msg = e.to_string();
        assert!(msg.contains("32"));
        assert!(msg.contains("16"));
    }
}
