//! [`PlaintextKey`]: fixed-size buffer for raw data-key material.

use aes_gcm_siv::aead::OsRng;

use crate::error::{EnvelopeError, Result};

use super::cipher::KEY_LEN;

/// Raw data-key bytes, held only for the duration of a single encrypt or
/// decrypt operation.
///
/// When this type is dropped, the memory is overwritten with zeroes to
/// minimise the window during which plaintext key material lives in RAM.
/// The key never appears in any persisted structure, log line, or `Debug`
/// output.
pub struct PlaintextKey(Box<[u8; KEY_LEN]>);

impl PlaintextKey {
    /// Copy key material out of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidKeyLength`] if the slice is not
    /// exactly [`KEY_LEN`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_LEN {
            return Err(EnvelopeError::InvalidKeyLength {
                expected: KEY_LEN,
                got: bytes.len(),
            });
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Generate a fresh random key from the OS CSPRNG.
    pub fn generate() -> Self {
        use aes_gcm_siv::aead::rand_core::RngCore;
        let mut buf = Box::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(&mut buf[..]);
        Self(buf)
    }

    /// Borrow the raw key bytes for a single cipher call.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Drop for PlaintextKey {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for PlaintextKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("PlaintextKey([REDACTED])")
    }
}
