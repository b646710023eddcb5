//! # Etherlite Provider
//!
//! The node-facing boundary of the Etherlite client library.
//!
//! This crate provides:
//! - [`Provider`] - the capability set the contract client consumes: raw
//!   calls, transaction submission, fee/nonce/chain queries and receipt
//!   lookup. Any transport (HTTP node connection, batching proxy, test
//!   double) satisfies it.
//! - [`SubscriptionHub`] - callback registration and dispatch for
//!   push-based notifications (new blocks, logs).
//!
//! No transport is implemented here; transports live behind the trait.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod provider;
pub mod subscribe;

// Re-export main types at crate root
pub use provider::Provider;
pub use subscribe::SubscriptionHub;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the provider boundary
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The round-trip to the node failed
    #[error("transport error: {0}")]
    Transport(String),

    /// The node answered with a protocol-level error
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// Numeric error code from the node
        code: i64,
        /// Human-readable message from the node
        message: String,
    },

    /// The node's response could not be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Dispatch or cancellation targeted a subscription id that is not
    /// registered
    #[error("unknown subscription id: {0}")]
    UnknownSubscription(u64),
}
