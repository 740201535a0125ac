//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// An environment variable, secret, or variable name (e.g., DATABASE_URL).
///
/// Names are case-sensitive and never normalized.
pub type VarName = String;

/// A plaintext variable value.
pub type PlainValue = String;

/// A base64 sealed-box ciphertext as sent to the remote platform.
pub type EncryptedValue = String;

/// Identifier of the platform public key a ciphertext was sealed for.
pub type KeyId = String;
