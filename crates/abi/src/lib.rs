//! # Etherlite ABI
//!
//! Contract ABI type system and codec for the Etherlite client library.
//!
//! This crate provides:
//! - [`Type`] - the recursive ABI type grammar (`uint256`, `bytes`, arrays,
//!   tuples, ...) with canonical rendering and static/dynamic classification
//! - [`Value`] - typed runtime values carried through encode and decode
//! - [`encode`] / [`decode`] - the head/tail call-data codec
//! - [`Method`] and [`Abi`] - parsed method signatures with selector
//!   computation, built from human-readable text or compiled artifacts
//!
//! ## Example
//!
//! ```rust
//! use alloy_primitives::U256;
//! use etherlite_abi::{Method, Value};
//!
//! let method = Method::parse("function transfer(address to, uint256 amount)").unwrap();
//! assert_eq!(method.selector(), [0xa9, 0x05, 0x9c, 0xbb]);
//!
//! let recipient: etherlite_types::Address =
//!     "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
//! let data = method
//!     .encode_call(&[Value::Address(recipient), Value::Uint(U256::from(1000u64))])
//!     .unwrap();
//! assert_eq!(&data[..4], &method.selector());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod artifact;
pub mod decode;
pub mod encode;
pub mod method;
pub mod ty;
pub mod value;

// Re-export main types at crate root
pub use artifact::Artifact;
pub use decode::decode;
pub use encode::encode;
pub use method::{Abi, Method, Param, StateMutability};
pub use ty::Type;
pub use value::Value;

/// Result type alias for ABI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while parsing, encoding or decoding ABI data
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unrecognized type token in a signature
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// Malformed method signature text
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// A value does not match the type it is encoded against
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The declared type
        expected: String,
        /// What the value actually was
        actual: String,
    },

    /// Argument count does not match the declared parameter count
    #[error("arity mismatch: expected {expected} values, got {actual}")]
    ArityMismatch {
        /// Declared parameter count
        expected: usize,
        /// Supplied value count
        actual: usize,
    },

    /// A numeric value does not fit in its declared fixed-width field
    #[error("value out of range for {0}")]
    ValueOutOfRange(String),

    /// The buffer is shorter than the decode requires
    #[error("buffer underrun: need {needed} bytes, have {available}")]
    BufferUnderrun {
        /// Bytes required to continue decoding
        needed: usize,
        /// Bytes remaining in the buffer
        available: usize,
    },

    /// A tail offset points outside the buffer
    #[error("offset {0} points outside the buffer")]
    InvalidOffset(usize),

    /// A decoded string is not valid UTF-8
    #[error("invalid UTF-8 in string value: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A compiled artifact could not be parsed
    #[error("invalid artifact: {0}")]
    Artifact(#[from] serde_json::Error),

    /// Invalid hex in an artifact's bytecode field
    #[error("invalid bytecode hex: {0}")]
    InvalidBytecode(#[from] hex::FromHexError),
}
