//! Transaction receipts and event logs as returned over JSON-RPC.

use crate::serde_hex::{HexBytes, HexU64};
use crate::{Address, H256};
use serde::{Deserialize, Serialize};

/// An event log emitted during transaction execution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// The contract that emitted the log
    pub address: Address,
    /// Indexed event topics (topic 0 is the event signature hash)
    pub topics: Vec<H256>,
    /// Non-indexed event data
    #[serde(default)]
    pub data: HexBytes,
    /// Block number the log was included in
    #[serde(default)]
    pub block_number: HexU64,
    /// Hash of the transaction that produced the log
    #[serde(default)]
    pub transaction_hash: H256,
    /// Index of the log within the block
    #[serde(default)]
    pub log_index: HexU64,
    /// True if the log was removed by a chain reorganization
    #[serde(default)]
    pub removed: bool,
}

/// The receipt of an executed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Hash of the transaction
    pub transaction_hash: H256,
    /// Index of the transaction within its block
    #[serde(default)]
    pub transaction_index: HexU64,
    /// Hash of the block the transaction was included in
    #[serde(default)]
    pub block_hash: H256,
    /// Number of the block the transaction was included in
    #[serde(default)]
    pub block_number: HexU64,
    /// Gas used by this transaction alone
    #[serde(default)]
    pub gas_used: HexU64,
    /// Cumulative gas used in the block up to and including this transaction
    #[serde(default)]
    pub cumulative_gas_used: HexU64,
    /// Address of the created contract, for creation transactions
    #[serde(default)]
    pub contract_address: Option<Address>,
    /// Logs emitted during execution
    #[serde(default)]
    pub logs: Vec<Log>,
    /// Execution status: 1 for success, 0 for revert.
    ///
    /// Absent on chains that predate EIP-658.
    #[serde(default)]
    pub status: Option<HexU64>,
}

impl Receipt {
    /// Checks if the transaction executed successfully.
    ///
    /// A missing status field (pre-EIP-658) is treated as success.
    pub fn succeeded(&self) -> bool {
        match &self.status {
            Some(status) => status.0 == 1,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_success() {
        let receipt = Receipt {
            status: Some(HexU64(1)),
            ..Default::default()
        };
        assert!(receipt.succeeded());
    }

    #[test]
    fn test_status_revert() {
        let receipt = Receipt {
            status: Some(HexU64(0)),
            ..Default::default()
        };
        assert!(!receipt.succeeded());
    }

    #[test]
    fn test_missing_status_is_success() {
        assert!(Receipt::default().succeeded());
    }

    #[test]
    fn test_deserialize_receipt() {
        let json = r#"{
            "transactionHash": "0x1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8",
            "transactionIndex": "0x1",
            "blockHash": "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470",
            "blockNumber": "0xa",
            "gasUsed": "0x5208",
            "cumulativeGasUsed": "0x5208",
            "contractAddress": null,
            "logs": [],
            "status": "0x1"
        }"#;
        let receipt: Receipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.block_number.0, 10);
        assert_eq!(receipt.gas_used.0, 21_000);
        assert!(receipt.contract_address.is_none());
        assert!(receipt.succeeded());
    }

    #[test]
    fn test_deserialize_log() {
        let json = r#"{
            "address": "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "topics": ["0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"],
            "data": "0x01",
            "blockNumber": "0x2",
            "transactionHash": "0x1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8",
            "logIndex": "0x0",
            "removed": false
        }"#;
        let log: Log = serde_json::from_str(json).unwrap();
        assert_eq!(log.topics.len(), 1);
        assert_eq!(log.data.0, vec![1]);
        assert!(!log.removed);
    }
}
