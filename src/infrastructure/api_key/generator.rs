//! API key generation
//!
//! Generates cryptographically secure API secrets and the derived values
//! that are actually persisted: an irreversible hash and a short display
//! preview. The raw secret leaves this module exactly once.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Length of the display preview taken from the front of the raw secret
const PREVIEW_LENGTH: usize = 12;

/// Result of generating a new API secret
#[derive(Debug, Clone)]
pub struct GeneratedSecret {
    /// The full secret (only shown once at creation)
    pub secret: String,
    /// Display preview: first characters of the secret plus a mask
    pub preview: String,
    /// The hashed secret for storage
    pub hash: String,
}

/// Generator for secure API secrets
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    /// Prefix for all generated secrets
    prefix: String,
    /// Number of random bytes behind the prefix
    secret_bytes: usize,
}

impl ApiKeyGenerator {
    /// Create a generator with a custom prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            secret_bytes: 32,
        }
    }

    /// Generate a new secret: prefix + hex-encoded random bytes
    pub fn generate(&self) -> GeneratedSecret {
        let mut random_bytes = vec![0u8; self.secret_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        let secret = format!("{}{}", self.prefix, hex::encode(&random_bytes));
        self.from_secret(&secret)
    }

    /// Derive preview and hash from a known secret
    ///
    /// Used by `generate` and by deterministic bootstrap/test seeding.
    pub fn from_secret(&self, secret: &str) -> GeneratedSecret {
        GeneratedSecret {
            secret: secret.to_string(),
            preview: preview_of(secret),
            hash: self.hash_secret(secret),
        }
    }

    /// Hash a secret for storage
    pub fn hash_secret(&self, secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        format!("sha256${}", hex::encode(hasher.finalize()))
    }

    /// Verify a presented secret against a stored hash
    ///
    /// The comparison covers the full hash regardless of where the first
    /// mismatch occurs, so verification time leaks nothing about how close
    /// the presented secret is.
    pub fn verify_secret(&self, secret: &str, stored_hash: &str) -> bool {
        let computed = self.hash_secret(secret);
        constant_time_compare(computed.as_bytes(), stored_hash.as_bytes())
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::new("spb_")
    }
}

/// Build the masked display preview of a secret
fn preview_of(secret: &str) -> String {
    let shown: String = secret.chars().take(PREVIEW_LENGTH).collect();
    format!("{}***", shown)
}

/// Constant-time byte comparison to prevent timing attacks
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;

    for i in 0..a.len() {
        result |= a[i] ^ b[i];
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret_format() {
        let generator = ApiKeyGenerator::default();
        let generated = generator.generate();

        assert!(generated.secret.starts_with("spb_"));
        // 32 random bytes hex-encoded behind the prefix
        assert_eq!(generated.secret.len(), 4 + 64);
        assert!(generated.secret[4..].chars().all(|c| c.is_ascii_hexdigit()));
        assert!(generated.hash.starts_with("sha256$"));
    }

    #[test]
    fn test_preview_masks_secret() {
        let generator = ApiKeyGenerator::default();
        let generated = generator.generate();

        assert_eq!(generated.preview.len(), PREVIEW_LENGTH + 3);
        assert!(generated.preview.ends_with("***"));
        assert!(generated.secret.starts_with(&generated.preview[..PREVIEW_LENGTH]));
    }

    #[test]
    fn test_secret_uniqueness() {
        let generator = ApiKeyGenerator::default();

        let a = generator.generate();
        let b = generator.generate();

        assert_ne!(a.secret, b.secret);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_hash_deterministic() {
        let generator = ApiKeyGenerator::default();

        assert_eq!(
            generator.hash_secret("spb_abc123"),
            generator.hash_secret("spb_abc123")
        );
    }

    #[test]
    fn test_verify_secret() {
        let generator = ApiKeyGenerator::default();
        let generated = generator.generate();

        assert!(generator.verify_secret(&generated.secret, &generated.hash));
        assert!(!generator.verify_secret("spb_wrong", &generated.hash));
    }

    #[test]
    fn test_from_secret_deterministic() {
        let generator = ApiKeyGenerator::default();

        let a = generator.from_secret("spb_fixed_secret_for_tests");
        let b = generator.from_secret("spb_fixed_secret_for_tests");

        assert_eq!(a.hash, b.hash);
        assert_eq!(a.preview, "spb_fixed_se***");
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare(b"hello", b"hello"));
        assert!(!constant_time_compare(b"hello", b"world"));
        assert!(!constant_time_compare(b"hello", b"hell"));
        assert!(constant_time_compare(b"", b""));
    }
}
