//! # Etherlite Types
//!
//! Primitive types and the transaction model for the Etherlite client library.
//!
//! This crate provides the value types shared by every other Etherlite crate:
//! - [`Address`] - Ethereum-compatible 20-byte addresses with EIP-55 checksums
//! - [`H256`] - 32-byte hashes with Keccak256 support
//! - [`Transaction`] - the legacy / access-list / dynamic-fee transaction model,
//!   including per-variant signing hashes and RLP wire encoding
//! - [`Receipt`] and [`Log`] - network-produced confirmation records
//! - [`BlockTag`] and [`CallMsg`] - block references and call messages consumed
//!   at the provider boundary
//!
//! ## Example
//!
//! ```rust
//! use etherlite_types::{Address, H256, LegacyTx, Transaction};
//!
//! // Parse an address from hex
//! let addr: Address = "0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb1".parse().unwrap();
//!
//! // Hash some data
//! let hash = H256::keccak256(b"hello world");
//! assert_ne!(hash, H256::ZERO);
//!
//! // A legacy transfer, ready for signing
//! let tx = Transaction::Legacy(LegacyTx {
//!     chain_id: Some(1),
//!     nonce: 0,
//!     gas_price: 1_000_000_000,
//!     gas_limit: 21_000,
//!     to: Some(addr),
//!     ..Default::default()
//! });
//! assert!(!tx.signing_hash().is_zero());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod address;
pub mod block;
pub mod hash;
pub mod receipt;
pub mod serde_hex;
pub mod transaction;

// Re-export main types at crate root
pub use address::Address;
pub use block::{BlockTag, CallMsg};
pub use hash::H256;
pub use receipt::{Log, Receipt};
pub use serde_hex::{HexBytes, HexU128, HexU64};
pub use transaction::{
    AccessListItem, AccessListTx, DynamicFeeTx, LegacyTx, Signature, SignedTransaction,
    Transaction, TxType,
};

/// Result type alias for Etherlite type operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when working with Etherlite types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid hex string
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Invalid length for a fixed-size type
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Invalid address format
    #[error("invalid address format: {0}")]
    InvalidAddress(String),

    /// Invalid hash format
    #[error("invalid hash format: {0}")]
    InvalidHash(String),

    /// Invalid transaction
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// RLP decoding error
    #[error("RLP decode error: {0}")]
    RlpDecode(#[from] rlp::DecoderError),

    /// Signature error
    #[error("signature error: {0}")]
    Signature(String),
}
