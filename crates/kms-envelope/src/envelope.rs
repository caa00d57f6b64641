//! Envelope create/open/update orchestration.
//!
//! An envelope is the pair `(encrypted payload, wrapped data key)`; together
//! with access to the master key it is sufficient to recover the plaintext.
//! The manager wires the key-management backend, the payload cipher, and the
//! codec into the three envelope operations.
//!
//! # Invariants
//!
//! - Every `create` uses a fresh data key; the plaintext form is dropped
//!   (and zeroed) immediately after the single cipher call that consumes it.
//! - `update` reuses the existing wrapped key byte-for-byte: no new key is
//!   generated and no re-wrap call is made, so the wrapped-key field is
//!   stable across updates to the same envelope.
//! - Shape validation happens locally, before any network call.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::Codec;
use crate::crypto::cipher;
use crate::error::{EnvelopeError, Result};
use crate::kms::{DataKeyPair, KeyManagement};

/// A persisted/transmittable pair of encrypted payload and wrapped data key.
///
/// The external representation is an ordered pair of text strings,
/// `[encryptedPayloadText, wrappedKeyText]`; serde maps to and from exactly
/// that shape, rejecting anything that is not a two-element array of
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "(String, String)")]
pub struct Envelope {
    encrypted_payload: String,
    wrapped_key: String,
}

impl Envelope {
    /// Reassemble an envelope from its two stored fields.
    ///
    /// No validation happens here; the read and update operations enforce
    /// the shape invariant at their boundary.
    pub fn new(encrypted_payload: impl Into<String>, wrapped_key: impl Into<String>) -> Self {
        Self {
            encrypted_payload: encrypted_payload.into(),
            wrapped_key: wrapped_key.into(),
        }
    }

    /// Build an envelope from an ordered list of fields, enforcing the
    /// two-field shape.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidEnvelope`] unless `parts` is exactly
    /// two non-empty strings.
    pub fn from_parts(parts: Vec<String>) -> Result<Self> {
        let parts: [String; 2] = parts.try_into().map_err(|parts: Vec<String>| {
            EnvelopeError::InvalidEnvelope(format!(
                "expected exactly two fields, got {}",
                parts.len()
            ))
        })?;
        let [encrypted_payload, wrapped_key] = parts;
        let envelope = Self {
            encrypted_payload,
            wrapped_key,
        };
        envelope.validate()?;
        Ok(envelope)
    }

    /// The encrypted payload field.
    pub fn encrypted_payload(&self) -> &str {
        &self.encrypted_payload
    }

    /// The wrapped data-key field.
    pub fn wrapped_key(&self) -> &str {
        &self.wrapped_key
    }

    /// Consume the envelope, yielding `(encrypted_payload, wrapped_key)`.
    pub fn into_parts(self) -> (String, String) {
        (self.encrypted_payload, self.wrapped_key)
    }

    fn validate(&self) -> Result<()> {
        if self.encrypted_payload.is_empty() {
            return Err(EnvelopeError::InvalidEnvelope(
                "encrypted payload field is empty".into(),
            ));
        }
        if self.wrapped_key.is_empty() {
            return Err(EnvelopeError::InvalidEnvelope(
                "wrapped key field is empty".into(),
            ));
        }
        Ok(())
    }
}

impl From<Envelope> for (String, String) {
    fn from(envelope: Envelope) -> Self {
        envelope.into_parts()
    }
}

impl TryFrom<Vec<String>> for Envelope {
    type Error = EnvelopeError;

    fn try_from(parts: Vec<String>) -> Result<Self> {
        Self::from_parts(parts)
    }
}

/// Orchestrates envelope operations over a [`KeyManagement`] backend.
///
/// Holds no per-call mutable state; one manager may serve concurrent
/// operations without coordination.
pub struct EnvelopeManager<K> {
    kms: K,
    codec: Codec,
}

impl<K: KeyManagement> EnvelopeManager<K> {
    /// Create a manager using the default (base64) codec.
    pub fn new(kms: K) -> Self {
        Self::with_codec(kms, Codec::default())
    }

    /// Create a manager with an explicit codec.
    ///
    /// The same codec must be used to decrypt every envelope this manager
    /// produces.
    pub fn with_codec(kms: K, codec: Codec) -> Self {
        Self { kms, codec }
    }

    /// The codec used for envelope text fields.
    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Encrypt `data` into a new envelope under a fresh data key.
    ///
    /// # Errors
    ///
    /// Propagates [`EnvelopeError::Service`] / [`EnvelopeError::Unavailable`]
    /// from the key-management backend and cipher-layer errors unchanged.
    pub async fn create_envelope(&self, data: &str) -> Result<Envelope> {
        let DataKeyPair { plaintext, wrapped } = self.kms.generate_data_key().await?;

        let encrypted_payload = cipher::encrypt(data, plaintext.as_bytes(), &self.codec)?;
        // The plaintext key has served its one cipher call; zero it now.
        drop(plaintext);

        let wrapped_key = self.codec.buffer_to_string(&wrapped);
        debug!(
            payload_len = encrypted_payload.len(),
            wrapped_key_len = wrapped_key.len(),
            "envelope created"
        );
        Ok(Envelope {
            encrypted_payload,
            wrapped_key,
        })
    }

    /// Recover the plaintext payload from an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidEnvelope`] for a malformed envelope
    /// (no network call is made), [`EnvelopeError::Decode`] if a field is
    /// not valid under the codec, and otherwise propagates key-management
    /// and cipher errors unchanged.
    pub async fn decrypt_envelope(&self, envelope: &Envelope) -> Result<String> {
        envelope.validate()?;
        let wrapped = self.codec.string_to_buffer(&envelope.wrapped_key)?;

        let key = self.kms.unwrap_data_key(&wrapped).await?;
        cipher::decrypt(&envelope.encrypted_payload, key.as_bytes(), &self.codec)
    }

    /// Replace the payload of an envelope, keeping its data key.
    ///
    /// The existing wrapped key is unwrapped and reused; the returned
    /// envelope carries the byte-identical wrapped-key field. This is the
    /// "stable key slot, rotating content" usage pattern.
    ///
    /// # Errors
    ///
    /// Same failure surface as [`decrypt_envelope`](Self::decrypt_envelope).
    pub async fn update_envelope(&self, envelope: &Envelope, new_data: &str) -> Result<Envelope> {
        envelope.validate()?;
        let wrapped = self.codec.string_to_buffer(&envelope.wrapped_key)?;

        let key = self.kms.unwrap_data_key(&wrapped).await?;
        let encrypted_payload = cipher::encrypt(new_data, key.as_bytes(), &self.codec)?;
        drop(key);

        debug!(payload_len = encrypted_payload.len(), "envelope updated");
        Ok(Envelope {
            encrypted_payload,
            wrapped_key: envelope.wrapped_key.clone(),
        })
    }
}
