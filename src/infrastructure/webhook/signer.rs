//! Webhook payload signing
//!
//! HMAC-SHA256 over the exact serialized payload bytes, hex-encoded. The
//! same routine serves both the dispatcher (signing) and receivers
//! (verification), so a payload that survives transport byte-for-byte
//! always verifies.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies webhook payloads with a shared secret
#[derive(Debug, Clone)]
pub struct WebhookSigner {
    secret: String,
}

impl WebhookSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Compute the hex HMAC-SHA256 signature of a payload
    pub fn sign(&self, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any size");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verify a hex signature against a payload
    ///
    /// The underlying comparison is constant-time; a malformed hex
    /// signature simply fails verification.
    pub fn verify(&self, payload: &[u8], signature: &str) -> bool {
        let Ok(signature_bytes) = hex::decode(signature) else {
            return false;
        };

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any size");
        mac.update(payload);
        mac.verify_slice(&signature_bytes).is_ok()
    }
}
