//! Deterministic in-memory [`KeyManagement`] backend.
//!
//! Holds a random master key in process memory and performs wrap/unwrap
//! locally with the same AEAD used for payloads. Substitutes for the AWS
//! backend in tests and offline development; two instances model two
//! distinct master keys.

use aes_gcm_siv::{
    aead::{Aead, KeyInit, OsRng},
    Aes256GcmSiv, Nonce,
};
use async_trait::async_trait;

use crate::crypto::cipher::NONCE_LEN;
use crate::crypto::PlaintextKey;
use crate::error::{EnvelopeError, Result};

use super::{DataKeyPair, KeyManagement};

/// In-memory master key with local wrap/unwrap.
///
/// Wrapped-key layout is `[nonce][ciphertext + tag]`; the blob is opaque to
/// callers, exactly like a service-issued ciphertext blob.
pub struct MemoryKeyManagement {
    master_key: PlaintextKey,
    master_key_id: String,
}

impl MemoryKeyManagement {
    /// Create a backend with a fresh random master key.
    pub fn new() -> Self {
        Self::with_master_key_id("memory-master")
    }

    /// Create a backend with a fresh random master key and the given id.
    ///
    /// The id only appears in error messages; it is a handle, not key
    /// material.
    pub fn with_master_key_id(master_key_id: impl Into<String>) -> Self {
        Self {
            master_key: PlaintextKey::generate(),
            master_key_id: master_key_id.into(),
        }
    }

    /// The configured master key id.
    pub fn master_key_id(&self) -> &str {
        &self.master_key_id
    }

    fn master_cipher(&self) -> Result<Aes256GcmSiv> {
        Aes256GcmSiv::new_from_slice(self.master_key.as_bytes())
            .map_err(|_| EnvelopeError::Service("master key unusable".into()))
    }
}

impl Default for MemoryKeyManagement {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyManagement for MemoryKeyManagement {
    async fn generate_data_key(&self) -> Result<DataKeyPair> {
        let plaintext = PlaintextKey::generate();
        let wrapped = self.wrap_data_key(plaintext.as_bytes()).await?;
        Ok(DataKeyPair { plaintext, wrapped })
    }

    async fn wrap_data_key(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = self.master_cipher()?;

        use aes_gcm_siv::aead::rand_core::RngCore;
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| EnvelopeError::Service("wrap failed".into()))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    async fn unwrap_data_key(&self, wrapped: &[u8]) -> Result<PlaintextKey> {
        if wrapped.len() < NONCE_LEN {
            return Err(EnvelopeError::Service(
                "wrapped data key blob is truncated".into(),
            ));
        }
        let cipher = self.master_cipher()?;
        let (nonce_bytes, ciphertext) = wrapped.split_at(NONCE_LEN);
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| {
                EnvelopeError::Service(format!(
                    "wrapped data key rejected under master key {}",
                    self.master_key_id
                ))
            })?;
        PlaintextKey::from_bytes(&plaintext)
    }
}
