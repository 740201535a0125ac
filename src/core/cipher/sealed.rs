//! Anonymous sealed-box encryption.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use crypto_box::aead::OsRng;
use crypto_box::PublicKey;
use tracing::trace;

use super::{PublicKeyMaterial, SealedSecret};
use crate::core::types::KeyId;
use crate::error::{Result, SyncError};

/// X25519 public key length in bytes.
pub const KEY_SIZE: usize = 32;

/// Bytes added to the plaintext: ephemeral public key plus Poly1305 tag.
pub const SEAL_OVERHEAD: usize = KEY_SIZE + 16;

/// A platform public key decoded and ready to seal for.
#[derive(Debug, Clone)]
pub struct Recipient {
    key: PublicKey,
    key_id: KeyId,
}

impl Recipient {
    /// Seal `plaintext` for this key.
    pub fn seal(&self, plaintext: &str) -> Result<SealedSecret> {
        let ciphertext = seal_for(&self.key, plaintext.as_bytes())?;

        Ok(SealedSecret {
            encrypted_value: STANDARD.encode(ciphertext),
            key_id: self.key_id.clone(),
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

/// Decode and validate the key in `public_key`.
///
/// # Errors
///
/// Returns `SyncError::Encoding` if the key is not base64 or is not 32 bytes.
pub fn recipient(public_key: &PublicKeyMaterial) -> Result<Recipient> {
    let raw = STANDARD
        .decode(public_key.key.trim())
        .map_err(|e| SyncError::Encoding(format!("public key is not valid base64: {}", e)))?;

    Ok(Recipient {
        key: parse_key(&raw)?,
        key_id: public_key.key_id.clone(),
    })
}

/// Seal `plaintext` for the platform key in `public_key`.
///
/// # Errors
///
/// Returns `SyncError::Encoding` if the key is not base64 or is not 32 bytes.
pub fn seal(plaintext: &str, public_key: &PublicKeyMaterial) -> Result<SealedSecret> {
    recipient(public_key)?.seal(plaintext)
}

/// Seal raw bytes for a raw 32-byte recipient key.
///
/// # Errors
///
/// Returns `SyncError::Encoding` if `recipient` is not exactly 32 bytes.
pub fn seal_bytes(plaintext: &[u8], recipient: &[u8]) -> Result<Vec<u8>> {
    seal_for(&parse_key(recipient)?, plaintext)
}

fn parse_key(raw: &[u8]) -> Result<PublicKey> {
    let bytes: [u8; KEY_SIZE] = raw.try_into().map_err(|_| {
        SyncError::Encoding(format!(
            "public key must be {} bytes, got {}",
            KEY_SIZE,
            raw.len()
        ))
    })?;
    Ok(PublicKey::from(bytes))
}

fn seal_for(key: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    trace!(plaintext_len = plaintext.len(), "sealing");

    let ciphertext = key
        .seal(&mut OsRng, plaintext)
        .map_err(|e| SyncError::Encoding(format!("sealing failed: {}", e)))?;

    trace!(ciphertext_len = ciphertext.len(), "sealed");

    Ok(ciphertext)
}
