//! Envelope encryption backed by an external key-management service.
//!
//! Plaintext data is encrypted with a randomly generated, single-use data
//! key; the data key itself is wrapped by a master key that never leaves the
//! key-management boundary. The result is a self-contained two-part
//! [`Envelope`] — encrypted payload plus wrapped data key — that can be
//! stored or transmitted independently.
//!
//! The key-management side is the [`kms::KeyManagement`] capability:
//! [`kms::AwsKeyManagement`] talks to AWS KMS, and
//! [`kms::MemoryKeyManagement`] is a deterministic local backend for tests
//! and offline development.
//!
//! ```
//! use kms_envelope::{EnvelopeManager, kms::MemoryKeyManagement};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> kms_envelope::Result<()> {
//! let manager = EnvelopeManager::new(MemoryKeyManagement::new());
//!
//! let envelope = manager.create_envelope("hello world").await?;
//! assert_eq!(manager.decrypt_envelope(&envelope).await?, "hello world");
//!
//! // Same data key, new payload — the wrapped-key field does not change.
//! let updated = manager.update_envelope(&envelope, "goodbye").await?;
//! assert_eq!(updated.wrapped_key(), envelope.wrapped_key());
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod kms;

pub use codec::{Codec, Encoding};
pub use config::KmsConfig;
pub use envelope::{Envelope, EnvelopeManager};
pub use error::{EnvelopeError, Result};
