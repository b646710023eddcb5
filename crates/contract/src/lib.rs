//! # Etherlite Contract
//!
//! The contract client: binds an address, a parsed interface and a
//! provider, and drives calls and the transaction lifecycle end to end.
//!
//! This crate provides:
//! - [`Contract`] - method lookup, call-data encoding, read calls and
//!   transaction construction against a bound contract
//! - [`Txn`] - the in-flight transaction handle progressing through
//!   build, send and receipt confirmation
//! - [`FeeEstimator`] - pluggable fee derivation for dynamic-fee
//!   transactions
//! - [`builtin`] - well-known interfaces and deployed addresses
//!
//! ## Example
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use etherlite_abi::{Abi, Value};
//! # use etherlite_contract::Contract;
//! # use etherlite_types::BlockTag;
//! # fn demo(provider: Arc<dyn etherlite_provider::Provider>) -> Result<(), Box<dyn std::error::Error>> {
//! let abi = Abi::parse(&["function balanceOf(address) view returns (uint256)"])?;
//! let token = Contract::new(
//!     "0x6B175474E89094C44Da98b954EedeAC495271d0F".parse()?,
//!     abi,
//!     provider,
//! );
//!
//! let holder: etherlite_types::Address =
//!     "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse()?;
//! let out = token.call("balanceOf", BlockTag::Latest, &[Value::Address(holder)])?;
//! println!("balance: {:?}", out["0"]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod builtin;
pub mod contract;
pub mod txn;

// Re-export main types at crate root
pub use contract::Contract;
pub use txn::{CancelToken, FeeEstimator, GasPriceFee, Txn, TxnOpts, WaitOpts};

use std::time::Duration;

/// Result type alias for contract operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the contract client and transaction lifecycle
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The interface declares no method of the given name
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// A state-changing operation was requested without a signing key
    #[error("no signing key bound to this contract")]
    NoSigningKey,

    /// A lifecycle operation was invoked out of order
    #[error("invalid transaction state: {0}")]
    InvalidState(&'static str),

    /// Receipt confirmation exceeded its time bound
    #[error("confirmation timed out after {0:?}")]
    Timeout(Duration),

    /// Receipt confirmation was aborted by the caller
    #[error("confirmation cancelled")]
    Cancelled,

    /// ABI encode/decode failure
    #[error(transparent)]
    Abi(#[from] etherlite_abi::Error),

    /// Signing failure
    #[error(transparent)]
    Wallet(#[from] etherlite_wallet::Error),

    /// Provider round-trip failure
    #[error(transparent)]
    Provider(#[from] etherlite_provider::Error),
}
