//! AES-256-GCM-SIV payload encryption primitives.
//!
//! This module is intentionally free of AWS and configuration dependencies.
//! It provides the low-level seal/open operations consumed by the envelope
//! layer, plus the zero-on-drop buffer type for plaintext data keys.
//!
//! # Ciphertext format
//!
//! ```text
//! [version: 1 byte][nonce: 12 bytes][ciphertext + tag]
//! ```
//!
//! encoded as text by the caller's [`Codec`](crate::codec::Codec). The
//! version byte enables future algorithm migration without breaking
//! existing envelopes.

pub mod cipher;
pub mod key;

pub use cipher::KEY_LEN;
pub use key::PlaintextKey;
