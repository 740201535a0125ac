//! Encryption for remote secrets.
//!
//! Secret values are encrypted client-side before they leave the machine,
//! using an anonymous sealed box for the public key the platform hands out
//! for the scope. Only the platform can open the result.
//!
//! ## Format
//!
//! libsodium `crypto_box_seal` compatible: an ephemeral X25519 key pair is
//! generated per call, the nonce is Blake2b(ephemeral_pk ‖ recipient_pk), and
//! the payload is XSalsa20-Poly1305. The wire form is
//! `ephemeral_pk (32) ‖ ciphertext ‖ tag (16)`, base64 encoded.

mod sealed;

pub use sealed::{recipient, seal, seal_bytes, Recipient, KEY_SIZE, SEAL_OVERHEAD};

use serde::{Deserialize, Serialize};

use crate::core::types::{EncryptedValue, KeyId};

/// A scope's public key as returned by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyMaterial {
    /// Base64 encoded X25519 public key
    pub key: String,
    /// Identifier echoed back with every secret write
    pub key_id: KeyId,
}

impl PublicKeyMaterial {
    pub fn new(key: impl Into<String>, key_id: impl Into<KeyId>) -> Self {
        Self {
            key: key.into(),
            key_id: key_id.into(),
        }
    }
}

/// Wire form of one secret write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedSecret {
    /// Base64 sealed-box ciphertext
    pub encrypted_value: EncryptedValue,
    /// Key the value was sealed for
    pub key_id: KeyId,
}
