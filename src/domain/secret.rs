//! Proxy secret synthesis.
//!
//! A full secret is the fake-TLS tag `ee`, followed by 16 random bytes and the
//! masking domain, all hex encoded:
//!
//! ```text
//! ee | 32 hex chars (random) | 2 hex chars per domain byte
//! ```

use std::fmt;

use rand::{CryptoRng, RngCore};

use crate::domain::{AppError, TlsDomain};

/// Mode indicator for fake-TLS secrets.
pub const FAKE_TLS_TAG: &str = "ee";

/// Number of random bytes in a secret.
pub const SECRET_LEN: usize = 16;

/// Hex characters before the encoded domain starts.
pub const FULL_SECRET_PREFIX_LEN: usize = FAKE_TLS_TAG.len() + SECRET_LEN * 2;

/// Credential shared between the proxy and its clients.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    random: [u8; SECRET_LEN],
    domain: TlsDomain,
}

impl Secret {
    /// Draw a fresh secret for `domain`.
    pub fn generate<R: RngCore + CryptoRng>(domain: TlsDomain, rng: &mut R) -> Self {
        let mut random = [0u8; SECRET_LEN];
        rng.fill_bytes(&mut random);
        Self { random, domain }
    }

    /// Rebuild a secret from the raw hex credential stored in the service config.
    pub fn from_raw_hex(raw: &str, domain: TlsDomain) -> Result<Self, AppError> {
        let bytes = hex::decode(raw.trim())
            .map_err(|e| AppError::InvalidSecret(format!("raw secret is not hex: {}", e)))?;
        let random: [u8; SECRET_LEN] = bytes.try_into().map_err(|_| {
            AppError::InvalidSecret(format!("raw secret must be {} hex characters", SECRET_LEN * 2))
        })?;
        Ok(Self { random, domain })
    }

    /// 32-character credential the proxy itself is configured with.
    pub fn raw_hex(&self) -> String {
        hex::encode(self.random)
    }

    /// Masking domain encoded as lowercase hex.
    pub fn encoded_domain(&self) -> String {
        hex::encode(self.domain.as_str().as_bytes())
    }

    /// Client-facing secret: tag, random bytes, encoded domain.
    pub fn full(&self) -> String {
        format!("{}{}{}", FAKE_TLS_TAG, self.raw_hex(), self.encoded_domain())
    }

    pub fn domain(&self) -> &TlsDomain {
        &self.domain
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret").field("random", &"[REDACTED]").field("domain", &self.domain).finish()
    }
}
