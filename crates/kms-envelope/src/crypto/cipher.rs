//! Symmetric seal/open of payload text under a raw data key.
//!
//! **Algorithm choice:** AES-256-GCM-SIV (RFC 8452). Authentication is part
//! of the contract: a tampered ciphertext or a wrong key fails cleanly with
//! [`EnvelopeError::Decryption`] instead of decrypting to garbage.
//!
//! Each call draws a fresh 96-bit nonce from the OS CSPRNG. A data key is
//! only ever expected to protect one payload at a time, but GCM-SIV keeps
//! nonce handling misuse-resistant regardless.

use aes_gcm_siv::{
    aead::{Aead, KeyInit, OsRng},
    Aes256GcmSiv, Nonce,
};

use crate::codec::Codec;
use crate::error::{EnvelopeError, Result};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Version byte at the start of every ciphertext blob.
pub const FORMAT_VERSION: u8 = 1;

/// Encrypt payload text under a raw data key.
///
/// Produces `[version][nonce][ciphertext + tag]` encoded as text with
/// `codec`.
///
/// # Errors
///
/// Returns [`EnvelopeError::InvalidKeyLength`] if `key` is not [`KEY_LEN`]
/// bytes, or [`EnvelopeError::Encryption`] on an internal AEAD error.
pub fn encrypt(plaintext: &str, key: &[u8], codec: &Codec) -> Result<String> {
    let cipher = build_cipher(key)?;

    use aes_gcm_siv::aead::rand_core::RngCore;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| EnvelopeError::Encryption("aead seal failed".into()))?;

    let mut blob = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
    blob.push(FORMAT_VERSION);
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);

    Ok(codec.buffer_to_string(&blob))
}

/// Decrypt ciphertext text produced by [`encrypt`] back to payload text.
///
/// # Errors
///
/// Returns [`EnvelopeError::Decode`] if `ciphertext` is not valid under the
/// codec's encoding, [`EnvelopeError::InvalidKeyLength`] if `key` is not
/// [`KEY_LEN`] bytes, and [`EnvelopeError::Decryption`] if the blob is
/// truncated, carries an unknown version, fails authentication (wrong key or
/// tampered data), or does not decrypt to UTF-8 text.
pub fn decrypt(ciphertext: &str, key: &[u8], codec: &Codec) -> Result<String> {
    let cipher = build_cipher(key)?;
    let blob = codec.string_to_buffer(ciphertext)?;

    if blob.len() < 1 + NONCE_LEN {
        return Err(EnvelopeError::Decryption("ciphertext is truncated".into()));
    }
    if blob[0] != FORMAT_VERSION {
        return Err(EnvelopeError::Decryption(format!(
            "unsupported ciphertext version {}",
            blob[0]
        )));
    }

    let nonce = Nonce::from_slice(&blob[1..1 + NONCE_LEN]);
    let plaintext = cipher
        .decrypt(nonce, &blob[1 + NONCE_LEN..])
        .map_err(|_| {
            EnvelopeError::Decryption("authentication failed: wrong key or tampered ciphertext".into())
        })?;

    String::from_utf8(plaintext)
        .map_err(|_| EnvelopeError::Decryption("recovered plaintext is not valid UTF-8".into()))
}

fn build_cipher(key: &[u8]) -> Result<Aes256GcmSiv> {
    Aes256GcmSiv::new_from_slice(key).map_err(|_| EnvelopeError::InvalidKeyLength {
        expected: KEY_LEN,
        got: key.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PlaintextKey;

    fn codec() -> Codec {
        Codec::default()
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let key = PlaintextKey::generate();
        let ciphertext = encrypt("hello world", key.as_bytes(), &codec()).unwrap();
        let plaintext = decrypt(&ciphertext, key.as_bytes(), &codec()).unwrap();
        assert_eq!(plaintext, "hello world");
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let key = PlaintextKey::generate();
        let ciphertext = encrypt("", key.as_bytes(), &codec()).unwrap();
        assert_eq!(decrypt(&ciphertext, key.as_bytes(), &codec()).unwrap(), "");
    }

    #[test]
    fn ciphertext_is_fresh_per_call() {
        let key = PlaintextKey::generate();
        let a = encrypt("same input", key.as_bytes(), &codec()).unwrap();
        let b = encrypt("same input", key.as_bytes(), &codec()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let key1 = PlaintextKey::generate();
        let key2 = PlaintextKey::generate();
        let ciphertext = encrypt("secret", key1.as_bytes(), &codec()).unwrap();
        let err = decrypt(&ciphertext, key2.as_bytes(), &codec()).unwrap_err();
        assert!(matches!(err, EnvelopeError::Decryption(_)));
    }

    #[test]
    fn tampered_ciphertext_fails_auth() {
        let key = PlaintextKey::generate();
        let ciphertext = encrypt("tamper me", key.as_bytes(), &codec()).unwrap();
        let mut blob = codec().string_to_buffer(&ciphertext).unwrap();
        // Flip a byte in the ciphertext body.
        let last = blob.len() - 1;
        blob[last] ^= 0xFF;
        let tampered = codec().buffer_to_string(&blob);
        let err = decrypt(&tampered, key.as_bytes(), &codec()).unwrap_err();
        assert!(matches!(err, EnvelopeError::Decryption(_)));
    }

    #[test]
    fn truncated_blob_rejected() {
        let key = PlaintextKey::generate();
        let short = codec().buffer_to_string(&[FORMAT_VERSION, 0, 1, 2]);
        let err = decrypt(&short, key.as_bytes(), &codec()).unwrap_err();
        assert!(matches!(err, EnvelopeError::Decryption(_)));
    }

    #[test]
    fn unknown_version_rejected() {
        let key = PlaintextKey::generate();
        let ciphertext = encrypt("versioned", key.as_bytes(), &codec()).unwrap();
        let mut blob = codec().string_to_buffer(&ciphertext).unwrap();
        blob[0] = 9;
        let altered = codec().buffer_to_string(&blob);
        let err = decrypt(&altered, key.as_bytes(), &codec()).unwrap_err();
        assert!(matches!(err, EnvelopeError::Decryption(_)));
    }

    #[test]
    fn malformed_encoding_is_a_decode_error() {
        let key = PlaintextKey::generate();
        let err = decrypt("%%% not base64 %%%", key.as_bytes(), &codec()).unwrap_err();
        assert!(matches!(err, EnvelopeError::Decode(_)));
    }

    #[test]
    fn invalid_key_length_rejected() {
        let err = encrypt("x", &[0u8; 16], &codec()).unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidKeyLength { got: 16, .. }));
    }
}
