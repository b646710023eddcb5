//! Block references and call messages.
//!
//! [`BlockTag`] names the ledger state a query runs against; [`CallMsg`] is
//! the candidate message handed to a provider for read-only execution and
//! gas estimation.

use crate::{Address, HexBytes, HexU128, HexU64};
use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Block identifier - a number or a tag like "latest".
///
/// Used throughout the provider boundary to specify which block state to
/// query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    /// The latest mined block
    Latest,
    /// The earliest/genesis block
    Earliest,
    /// The pending state (not yet mined)
    Pending,
    /// A specific block number
    Number(u64),
}

impl Default for BlockTag {
    fn default() -> Self {
        Self::Latest
    }
}

impl FromStr for BlockTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest" => Ok(Self::Latest),
            "earliest" => Ok(Self::Earliest),
            "pending" => Ok(Self::Pending),
            _ => {
                let t = s.strip_prefix("0x").unwrap_or(s);
                u64::from_str_radix(t, 16)
                    .map(Self::Number)
                    .map_err(|_| format!("invalid block tag: {}", s))
            }
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Earliest => write!(f, "earliest"),
            Self::Pending => write!(f, "pending"),
            Self::Number(n) => write!(f, "0x{:x}", n),
        }
    }
}

impl Serialize for BlockTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BlockTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A call message: the read-only execution / gas-estimation input consumed
/// by providers.
///
/// An absent `to` denotes contract creation (relevant for gas estimation of
/// deployments).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallMsg {
    /// Sender address, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Recipient address; `None` for contract creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Gas limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<HexU64>,
    /// Gas price in wei.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<HexU128>,
    /// Value to transfer in wei.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    /// Call data.
    #[serde(default, skip_serializing_if = "is_empty_bytes")]
    pub data: HexBytes,
}

fn is_empty_bytes(b: &HexBytes) -> bool {
    b.0.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_tag_display() {
        assert_eq!(BlockTag::Latest.to_string(), "latest");
        assert_eq!(BlockTag::Number(0x10).to_string(), "0x10");
    }

    #[test]
    fn test_block_tag_parse() {
        assert_eq!("latest".parse::<BlockTag>().unwrap(), BlockTag::Latest);
        assert_eq!("0x10".parse::<BlockTag>().unwrap(), BlockTag::Number(16));
        assert!("bogus".parse::<BlockTag>().is_err());
    }

    #[test]
    fn test_call_msg_serde_shape() {
        let msg = CallMsg {
            to: Some(Address::ZERO),
            data: HexBytes(vec![0xa9, 0x05, 0x9c, 0xbb]),
            ..Default::default()
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["to"], "0x0000000000000000000000000000000000000000");
        assert_eq!(json["data"], "0xa9059cbb");
        assert!(json.get("from").is_none());
        assert!(json.get("gasPrice").is_none());
    }
}
