//! Content sealing at rest (AES-256-GCM).
//!
//! When sealing is enabled, the content column holds base64(ciphertext+tag)
//! and the nonce column holds base64 of a random 12-byte nonce; plaintext is
//! never persisted. Records without a nonce are plaintext, so a deployment
//! can turn sealing on without rewriting existing rows.

use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::errors::{Result, SnipbinError};

const NONCE_LEN: usize = 12;

/// Sealed form of a snippet body.
#[derive(Debug, Clone)]
pub struct SealedContent {
    pub ciphertext_b64: String,
    pub nonce_b64: String,
}

pub struct ContentSealer {
    cipher: Aes256Gcm,
}

impl ContentSealer {
    /// Build a sealer from a base64-encoded 32-byte key.
    pub fn new(key_base64: &str) -> Result<Self> {
        let key_bytes = BASE64
            .decode(key_base64.trim())
            .map_err(|e| SnipbinError::sealing(format!("Invalid sealing key encoding: {}", e)))?;

        if key_bytes.len() != 32 {
            return Err(SnipbinError::sealing(format!(
                "Sealing key must be 32 bytes, got {}",
                key_bytes.len()
            )));
        }

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
        Ok(Self { cipher })
    }

    pub fn seal(&self, plaintext: &str) -> Result<SealedContent> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        for b in nonce_bytes.iter_mut() {
            *b = rand::random::<u8>();
        }

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|e| SnipbinError::sealing(format!("Content encryption failed: {}", e)))?;

        Ok(SealedContent {
            ciphertext_b64: BASE64.encode(ciphertext),
            nonce_b64: BASE64.encode(nonce_bytes),
        })
    }

    pub fn open(&self, ciphertext_b64: &str, nonce_b64: &str) -> Result<String> {
        let ciphertext = BASE64
            .decode(ciphertext_b64)
            .map_err(|e| SnipbinError::sealing(format!("Invalid ciphertext encoding: {}", e)))?;
        let nonce_bytes = BASE64
            .decode(nonce_b64)
            .map_err(|e| SnipbinError::sealing(format!("Invalid nonce encoding: {}", e)))?;

        if nonce_bytes.len() != NONCE_LEN {
            return Err(SnipbinError::sealing(format!(
                "Nonce must be {} bytes, got {}",
                NONCE_LEN,
                nonce_bytes.len()
            )));
        }

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
            .map_err(|e| SnipbinError::sealing(format!("Content decryption failed: {}", e)))?;

        String::from_utf8(plaintext)
            .map_err(|e| SnipbinError::sealing(format!("Sealed content is not UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> String {
        BASE64.encode([7u8; 32])
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let sealer = ContentSealer::new(&test_key()).unwrap();
        let sealed = sealer.seal("fn main() { println!(\"hi\"); }").unwrap();

        assert_ne!(sealed.ciphertext_b64, "fn main() { println!(\"hi\"); }");
        let opened = sealer.open(&sealed.ciphertext_b64, &sealed.nonce_b64).unwrap();
        assert_eq!(opened, "fn main() { println!(\"hi\"); }");
    }

    #[test]
    fn test_open_with_wrong_key_fails() {
        let sealer = ContentSealer::new(&test_key()).unwrap();
        let sealed = sealer.seal("secret").unwrap();

        let other = ContentSealer::new(&BASE64.encode([8u8; 32])).unwrap();
        assert!(other.open(&sealed.ciphertext_b64, &sealed.nonce_b64).is_err());
    }

    #[test]
    fn test_rejects_bad_key() {
        assert!(ContentSealer::new("not base64!!!").is_err());
        assert!(ContentSealer::new(&BASE64.encode([1u8; 16])).is_err());
    }

    #[test]
    fn test_nonces_differ_between_seals() {
        let sealer = ContentSealer::new(&test_key()).unwrap();
        let a = sealer.seal("same").unwrap();
        let b = sealer.seal("same").unwrap();
        assert_ne!(a.nonce_b64, b.nonce_b64);
    }
}
