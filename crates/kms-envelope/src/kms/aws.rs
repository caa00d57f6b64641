//! AWS KMS backend for the [`KeyManagement`] capability.
//!
//! A thin typed façade over `aws-sdk-kms`: every call is one network round
//! trip, with no local caching and no retry policy beyond what the SDK
//! client provides natively. Failures propagate unchanged to the caller.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_kms::config::Credentials;
use aws_sdk_kms::error::{DisplayErrorContext, SdkError};
use aws_sdk_kms::primitives::Blob;
use aws_sdk_kms::types::DataKeySpec;
use tracing::debug;

use crate::config::KmsConfig;
use crate::crypto::PlaintextKey;
use crate::error::{EnvelopeError, Result};

use super::{DataKeyPair, KeyManagement};

/// KMS client bound to one master key.
///
/// The master key id is a handle resolved by the service, configured once at
/// construction; it is never treated as key material. `Decrypt` omits it —
/// KMS resolves the wrapping key from the ciphertext blob itself.
pub struct AwsKeyManagement {
    client: aws_sdk_kms::Client,
    master_key_id: String,
}

impl AwsKeyManagement {
    /// Build a client from an explicit [`KmsConfig`].
    ///
    /// Credentials and region are scoped to this instance; nothing mutates
    /// process-wide SDK state.
    pub async fn new(cfg: &KmsConfig) -> Self {
        let credentials = Credentials::new(
            cfg.access_key_id.clone(),
            cfg.secret_access_key.clone(),
            None,
            None,
            "kms-envelope",
        );
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        Self {
            client: aws_sdk_kms::Client::new(&sdk_config),
            master_key_id: cfg.master_key_id.clone(),
        }
    }

    /// Wrap an already-configured SDK client (custom endpoint, test stubs).
    pub fn from_client(client: aws_sdk_kms::Client, master_key_id: impl Into<String>) -> Self {
        Self {
            client,
            master_key_id: master_key_id.into(),
        }
    }

    /// The configured master key id.
    pub fn master_key_id(&self) -> &str {
        &self.master_key_id
    }
}

#[async_trait]
impl KeyManagement for AwsKeyManagement {
    async fn generate_data_key(&self) -> Result<DataKeyPair> {
        debug!(master_key_id = %self.master_key_id, "requesting data key from KMS");
        let resp = self
            .client
            .generate_data_key()
            .key_id(&self.master_key_id)
            .key_spec(DataKeySpec::Aes256)
            .send()
            .await
            .map_err(map_sdk_err)?;

        let plaintext = resp.plaintext().ok_or_else(|| {
            EnvelopeError::Service("GenerateDataKey response contained no plaintext key".into())
        })?;
        let wrapped = resp.ciphertext_blob().ok_or_else(|| {
            EnvelopeError::Service("GenerateDataKey response contained no ciphertext blob".into())
        })?;

        Ok(DataKeyPair {
            plaintext: PlaintextKey::from_bytes(plaintext.as_ref())?,
            wrapped: wrapped.as_ref().to_vec(),
        })
    }

    async fn wrap_data_key(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        debug!(master_key_id = %self.master_key_id, "wrapping data key via KMS");
        let resp = self
            .client
            .encrypt()
            .key_id(&self.master_key_id)
            .plaintext(Blob::new(plaintext.to_vec()))
            .send()
            .await
            .map_err(map_sdk_err)?;

        let wrapped = resp.ciphertext_blob().ok_or_else(|| {
            EnvelopeError::Service("Encrypt response contained no ciphertext blob".into())
        })?;
        Ok(wrapped.as_ref().to_vec())
    }

    async fn unwrap_data_key(&self, wrapped: &[u8]) -> Result<PlaintextKey> {
        debug!(wrapped_len = wrapped.len(), "unwrapping data key via KMS");
        let resp = self
            .client
            .decrypt()
            .ciphertext_blob(Blob::new(wrapped.to_vec()))
            .send()
            .await
            .map_err(map_sdk_err)?;

        let plaintext = resp.plaintext().ok_or_else(|| {
            EnvelopeError::Service("Decrypt response contained no plaintext key".into())
        })?;
        PlaintextKey::from_bytes(plaintext.as_ref())
    }
}

/// Split SDK failures into the two caller-visible classes: transport-level
/// failures where the service never answered ([`EnvelopeError::Unavailable`])
/// and everything the service itself rejected ([`EnvelopeError::Service`]).
fn map_sdk_err<E, R>(err: SdkError<E, R>) -> EnvelopeError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    let unavailable = matches!(
        err,
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_)
    );
    let detail = DisplayErrorContext(err).to_string();
    if unavailable {
        EnvelopeError::Unavailable(detail)
    } else {
        EnvelopeError::Service(detail)
    }
}
