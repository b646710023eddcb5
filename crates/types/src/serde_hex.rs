//! `0x`-prefixed hex wrappers for JSON quantities and byte strings.
//!
//! Ethereum-compatible JSON interfaces encode integers as minimal hex
//! quantities (`"0x0"`, `"0x4a817c800"`) and byte strings as even-length hex
//! (`"0x"`, `"0xdeadbeef"`). These newtypes carry that encoding through serde
//! without leaking it into the rest of the library.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A u64 serialized as a `0x`-prefixed hex quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HexU64(pub u64);

impl From<u64> for HexU64 {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl From<HexU64> for u64 {
    fn from(v: HexU64) -> Self {
        v.0
    }
}

impl Serialize for HexU64 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{:x}", self.0))
    }
}

impl<'de> Deserialize<'de> for HexU64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        u64::from_str_radix(s, 16)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// A u128 serialized as a `0x`-prefixed hex quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HexU128(pub u128);

impl From<u128> for HexU128 {
    fn from(v: u128) -> Self {
        Self(v)
    }
}

impl From<HexU128> for u128 {
    fn from(v: HexU128) -> Self {
        v.0
    }
}

impl Serialize for HexU128 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{:x}", self.0))
    }
}

impl<'de> Deserialize<'de> for HexU128 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        u128::from_str_radix(s, 16)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// A byte string serialized as `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HexBytes(pub Vec<u8>);

impl HexBytes {
    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the wrapper and returns the bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for HexBytes {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl From<&[u8]> for HexBytes {
    fn from(v: &[u8]) -> Self {
        Self(v.to_vec())
    }
}

impl AsRef<[u8]> for HexBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for HexBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(&self.0)))
    }
}

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(s).map(Self).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_u64() {
        let v = HexU64(0x4a817c800);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"0x4a817c800\"");
        let back: HexU64 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_hex_u64_zero() {
        assert_eq!(serde_json::to_string(&HexU64(0)).unwrap(), "\"0x0\"");
    }

    #[test]
    fn test_hex_bytes() {
        let v = HexBytes(vec![0xde, 0xad, 0xbe, 0xef]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"0xdeadbeef\"");
        let back: HexBytes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_hex_bytes_empty() {
        let back: HexBytes = serde_json::from_str("\"0x\"").unwrap();
        assert!(back.0.is_empty());
    }
}
