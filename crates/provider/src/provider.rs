//! The provider capability trait.

use crate::Result;
use etherlite_types::{Address, BlockTag, CallMsg, Receipt, H256};

/// The capability set the transaction pipeline consumes from a node.
///
/// Implementations are transports: a JSON-RPC connection, a batching
/// proxy, or an in-memory double in tests. Every operation blocks the
/// calling thread until its round-trip completes or fails.
pub trait Provider: Send + Sync {
    /// Executes a read-only call against the given block.
    fn call(&self, msg: &CallMsg, block: BlockTag) -> Result<Vec<u8>>;

    /// Submits a raw signed transaction, returning its hash.
    fn send_raw_transaction(&self, raw: &[u8]) -> Result<H256>;

    /// Current gas price in wei.
    fn gas_price(&self) -> Result<u128>;

    /// Gas estimate for a candidate message.
    fn estimate_gas(&self, msg: &CallMsg) -> Result<u64>;

    /// Account transaction count at the given block.
    fn nonce(&self, address: Address, block: BlockTag) -> Result<u64>;

    /// The chain id the node is serving.
    fn chain_id(&self) -> Result<u64>;

    /// Looks up a receipt by transaction hash.
    ///
    /// `Ok(None)` means the receipt does not exist yet; that is an
    /// expected condition while a transaction is pending, not a failure.
    fn receipt(&self, hash: H256) -> Result<Option<Receipt>>;
}
