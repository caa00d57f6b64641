//! Key-management capability: generate, wrap, and unwrap data keys.
//!
//! The capability is a trait rather than a concrete client so that the
//! deterministic [`MemoryKeyManagement`] backend can stand in for the real
//! network service in tests, keeping protocol correctness independent of
//! network availability.
//!
//! # Key-handling invariants
//!
//! - Backends hold no per-call mutable state; concurrent envelope operations
//!   may share one instance without coordination.
//! - No caching of plaintext or wrapped keys across calls — every operation
//!   that needs a plaintext key performs a fresh unwrap.
//! - Plaintext key material travels only inside [`PlaintextKey`], which
//!   zeroes its buffer on drop and redacts itself from `Debug` output.

pub mod aws;
pub mod memory;

pub use aws::AwsKeyManagement;
pub use memory::MemoryKeyManagement;

use async_trait::async_trait;

use crate::crypto::PlaintextKey;
use crate::error::Result;

/// Both forms of a freshly generated data key.
///
/// The plaintext form must be consumed by exactly one cipher call and then
/// dropped; only the wrapped form is safe to persist.
#[derive(Debug)]
pub struct DataKeyPair {
    /// Raw key bytes, zeroed on drop.
    pub plaintext: PlaintextKey,
    /// The same key encrypted under the master key.
    pub wrapped: Vec<u8>,
}

/// Data-key lifecycle operations backed by a master key.
///
/// All operations are asynchronous calls to the backing service and fail
/// with [`EnvelopeError::Service`] or [`EnvelopeError::Unavailable`]; no
/// retries or fallbacks happen at this layer.
///
/// [`EnvelopeError::Service`]: crate::error::EnvelopeError::Service
/// [`EnvelopeError::Unavailable`]: crate::error::EnvelopeError::Unavailable
#[async_trait]
pub trait KeyManagement: Send + Sync {
    /// Request a fresh random data key under the configured master key,
    /// returned in both plaintext and wrapped forms.
    ///
    /// The key is sized for the payload cipher
    /// ([`KEY_LEN`](crate::crypto::KEY_LEN) bytes).
    async fn generate_data_key(&self) -> Result<DataKeyPair>;

    /// Encrypt an externally supplied raw data key under the master key.
    async fn wrap_data_key(&self, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Recover a raw data key from its wrapped form.
    ///
    /// Fails with [`EnvelopeError::Service`] if the wrapped key is invalid,
    /// tampered, or was wrapped under a different master key.
    ///
    /// [`EnvelopeError::Service`]: crate::error::EnvelopeError::Service
    async fn unwrap_data_key(&self, wrapped: &[u8]) -> Result<PlaintextKey>;
}
