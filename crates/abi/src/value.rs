//! Typed runtime values carried through the codec.

use crate::ty::Type;
use alloy_primitives::{I256, U256};
use etherlite_types::Address;

/// A runtime value paired with an ABI [`Type`] during encode and decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Unsigned integer (any `uint<N>`)
    Uint(U256),
    /// Signed two's-complement integer (any `int<N>`)
    Int(I256),
    /// Boolean
    Bool(bool),
    /// 20-byte address
    Address(Address),
    /// Fixed-size byte sequence (`bytes<N>`)
    FixedBytes(Vec<u8>),
    /// Dynamic byte sequence
    Bytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Dynamic-length array
    Array(Vec<Value>),
    /// Fixed-length array
    FixedArray(Vec<Value>),
    /// Tuple of heterogeneous fields
    Tuple(Vec<Value>),
}

impl Value {
    /// Short name of the value's shape, used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Uint(_) => "uint",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Address(_) => "address",
            Self::FixedBytes(_) => "fixed bytes",
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::FixedArray(_) => "fixed array",
            Self::Tuple(_) => "tuple",
        }
    }

    /// Checks if the value's shape matches the given type.
    ///
    /// Shallow: composite element shapes are checked during encoding.
    pub fn matches(&self, ty: &Type) -> bool {
        matches!(
            (self, ty),
            (Self::Uint(_), Type::Uint(_))
                | (Self::Int(_), Type::Int(_))
                | (Self::Bool(_), Type::Bool)
                | (Self::Address(_), Type::Address)
                | (Self::FixedBytes(_), Type::FixedBytes(_))
                | (Self::Bytes(_), Type::Bytes)
                | (Self::String(_), Type::String)
                | (Self::Array(_), Type::Array(_))
                | (Self::FixedArray(_), Type::FixedArray(_, _))
                | (Self::Tuple(_), Type::Tuple(_))
        )
    }

    /// Extracts a uint, if this value is one.
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Extracts an address, if this value is one.
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(a) => Some(*a),
            _ => None,
        }
    }

    /// Extracts a bool, if this value is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the bytes, if this value is a `bytes` or `bytes<N>`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) | Self::FixedBytes(b) => Some(b),
            _ => None,
        }
    }

    /// Extracts the string, if this value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<U256> for Value {
    fn from(v: U256) -> Self {
        Self::Uint(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(U256::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Address> for Value {
    fn from(v: Address) -> Self {
        Self::Address(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        assert!(Value::Uint(U256::ZERO).matches(&Type::Uint(256)));
        assert!(Value::Uint(U256::ZERO).matches(&Type::Uint(8)));
        assert!(!Value::Uint(U256::ZERO).matches(&Type::Int(256)));
        assert!(Value::Array(vec![]).matches(&Type::Array(Box::new(Type::Bool))));
        assert!(!Value::Array(vec![]).matches(&Type::FixedArray(Box::new(Type::Bool), 2)));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(7u64), Value::Uint(U256::from(7u64)));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("hi"), Value::String("hi".to_string()));
    }
}
