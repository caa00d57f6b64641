//! Configuration surface for the AWS key-management backend.
//!
//! Configuration is an explicit value handed to
//! [`AwsKeyManagement::new`](crate::kms::AwsKeyManagement::new) — there is
//! no process-wide mutable state. [`KmsConfig::from_env`] is a convenience
//! for reading the same fields from `KMS_`-prefixed environment variables.

use serde::Deserialize;

use crate::error::{EnvelopeError, Result};

/// Credentials, region, and master-key handle for the KMS client.
#[derive(Clone, Deserialize)]
pub struct KmsConfig {
    /// AWS access key id. `KMS_ACCESS_KEY_ID`.
    pub access_key_id: String,

    /// AWS secret access key. `KMS_SECRET_ACCESS_KEY`.
    pub secret_access_key: String,

    /// AWS region. `KMS_REGION`.
    pub region: String,

    /// Id (or ARN/alias) of the KMS master key that backs all generate,
    /// wrap, and unwrap calls. `KMS_MASTER_KEY_ID`.
    pub master_key_id: String,
}

impl KmsConfig {
    /// Load and validate configuration from `KMS_`-prefixed environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Config`] if any variable is absent, cannot
    /// be deserialised, or is empty.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("KMS"))
            .build()
            .map_err(|e| EnvelopeError::Config(e.to_string()))?;

        let c: KmsConfig = cfg
            .try_deserialize()
            .map_err(|e| EnvelopeError::Config(e.to_string()))?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first
    /// failure.
    pub fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.access_key_id, "KMS_ACCESS_KEY_ID")?;
        ensure_non_empty(&self.secret_access_key, "KMS_SECRET_ACCESS_KEY")?;
        ensure_non_empty(&self.region, "KMS_REGION")?;
        ensure_non_empty(&self.master_key_id, "KMS_MASTER_KEY_ID")?;
        Ok(())
    }
}

impl std::fmt::Debug for KmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The secret never appears in Debug output.
        f.debug_struct("KmsConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("region", &self.region)
            .field("master_key_id", &self.master_key_id)
            .finish()
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EnvelopeError::Config(format!(
            "{name} is required and must not be empty"
        )));
    }
    Ok(())
}
