//! # Etherlite Wallet
//!
//! Key management and transaction signing for the Etherlite client library.
//!
//! This crate provides:
//! - [`PrivateKey`] - secp256k1 key material with deterministic signing and
//!   address derivation
//! - [`Key`] - the signing capability consumed by the contract client, so
//!   hardware or remote signers can stand in for a local key
//! - [`Signature`] - 65-byte recoverable signatures over 32-byte digests
//! - [`sign_transaction`] - variant-aware transaction signing
//!
//! ## Example
//!
//! ```rust
//! use etherlite_types::{LegacyTx, Transaction};
//! use etherlite_wallet::{sign_transaction, PrivateKey};
//!
//! let key = PrivateKey::random();
//! let tx = Transaction::Legacy(LegacyTx {
//!     chain_id: Some(1),
//!     gas_price: 1_000_000_000,
//!     gas_limit: 21_000,
//!     to: Some(key.address()),
//!     ..Default::default()
//! });
//!
//! let signed = sign_transaction(tx, &key).unwrap();
//! assert_eq!(signed.sender().unwrap(), key.address());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod key;
pub mod signer;

// Re-export main types at crate root
pub use key::{Key, PrivateKey};
pub use signer::{hash_message, sign_transaction, Signature};

/// Result type alias for wallet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by key handling and signing
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The bytes do not form a valid secp256k1 private key
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    /// Invalid hex string
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Invalid length for a fixed-size input
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// The signing operation itself failed
    #[error("signing failed: {0}")]
    Signing(String),

    /// Public key recovery from a signature failed
    #[error("recovery failed: {0}")]
    Recovery(String),
}
