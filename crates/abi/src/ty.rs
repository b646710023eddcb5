//! The recursive ABI type grammar.
//!
//! A [`Type`] is parsed from its canonical textual form (`uint256`,
//! `bytes32`, `(address,uint256)[]`, ...) and classifies itself as static
//! or dynamic, which drives the head/tail layout of the codec.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// An ABI type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// Unsigned integer with the given bit width (8..=256, multiple of 8)
    Uint(usize),
    /// Signed two's-complement integer with the given bit width
    Int(usize),
    /// Boolean, encoded as uint8 with value 0 or 1
    Bool,
    /// 20-byte address, left-padded to a 32-byte slot
    Address,
    /// Fixed-size byte sequence of the given length (1..=32)
    FixedBytes(usize),
    /// Dynamic byte sequence
    Bytes,
    /// Dynamic UTF-8 string
    String,
    /// Dynamic-length array of a single element type
    Array(Box<Type>),
    /// Fixed-length array of a single element type
    FixedArray(Box<Type>, usize),
    /// Tuple of heterogeneous field types
    Tuple(Vec<Type>),
}

impl Type {
    /// Checks if the type has a dynamic (length-dependent) encoding.
    ///
    /// `bytes`, `string` and dynamic arrays are dynamic, as is any
    /// composite containing a dynamic member.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Bytes | Self::String | Self::Array(_) => true,
            Self::FixedArray(elem, _) => elem.is_dynamic(),
            Self::Tuple(fields) => fields.iter().any(Type::is_dynamic),
            _ => false,
        }
    }

    /// Returns the number of bytes the type occupies in the head region.
    ///
    /// Dynamic types occupy a single 32-byte offset slot.
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            return 32;
        }
        match self {
            Self::FixedArray(elem, len) => elem.head_size() * len,
            Self::Tuple(fields) => fields.iter().map(Type::head_size).sum(),
            _ => 32,
        }
    }

    /// Renders the canonical form used for selector computation.
    ///
    /// Aliases are normalized (`uint` becomes `uint256`) and tuples render
    /// as a parenthesized field list.
    pub fn canonical(&self) -> String {
        match self {
            Self::Uint(bits) => format!("uint{}", bits),
            Self::Int(bits) => format!("int{}", bits),
            Self::Bool => "bool".to_string(),
            Self::Address => "address".to_string(),
            Self::FixedBytes(len) => format!("bytes{}", len),
            Self::Bytes => "bytes".to_string(),
            Self::String => "string".to_string(),
            Self::Array(elem) => format!("{}[]", elem.canonical()),
            Self::FixedArray(elem, len) => format!("{}[{}]", elem.canonical(), len),
            Self::Tuple(fields) => {
                let inner: Vec<String> = fields.iter().map(Type::canonical).collect();
                format!("({})", inner.join(","))
            }
        }
    }

    /// Parses a type from its textual form.
    ///
    /// Accepts canonical names, the `uint`/`int` aliases, parenthesized
    /// tuples and arbitrarily nested array suffixes.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::UnknownType(String::new()));
        }

        // Strip one array suffix, outermost first. The suffix body is empty
        // or digits, so the last '[' in the string always opens it.
        if let Some(stripped) = s.strip_suffix(']') {
            let open = stripped
                .rfind('[')
                .ok_or_else(|| Error::UnknownType(s.to_string()))?;
            let elem = Self::parse(&s[..open])?;
            let len_str = &stripped[open + 1..];
            return if len_str.is_empty() {
                Ok(Self::Array(Box::new(elem)))
            } else {
                let len: usize = len_str
                    .parse()
                    .map_err(|_| Error::UnknownType(s.to_string()))?;
                Ok(Self::FixedArray(Box::new(elem), len))
            };
        }

        if let Some(inner) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            let fields = split_top_level(inner)?
                .into_iter()
                .map(Self::parse)
                .collect::<Result<Vec<_>>>()?;
            return Ok(Self::Tuple(fields));
        }

        match s {
            "bool" => return Ok(Self::Bool),
            "address" => return Ok(Self::Address),
            "bytes" => return Ok(Self::Bytes),
            "string" => return Ok(Self::String),
            "uint" => return Ok(Self::Uint(256)),
            "int" => return Ok(Self::Int(256)),
            _ => {}
        }

        if let Some(bits) = s.strip_prefix("uint") {
            return Ok(Self::Uint(parse_bits(s, bits)?));
        }
        if let Some(bits) = s.strip_prefix("int") {
            return Ok(Self::Int(parse_bits(s, bits)?));
        }
        if let Some(len) = s.strip_prefix("bytes") {
            let len: usize = len.parse().map_err(|_| Error::UnknownType(s.to_string()))?;
            if !(1..=32).contains(&len) {
                return Err(Error::UnknownType(s.to_string()));
            }
            return Ok(Self::FixedBytes(len));
        }

        Err(Error::UnknownType(s.to_string()))
    }
}

impl FromStr for Type {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

fn parse_bits(full: &str, bits: &str) -> Result<usize> {
    let bits: usize = bits
        .parse()
        .map_err(|_| Error::UnknownType(full.to_string()))?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(Error::UnknownType(full.to_string()));
    }
    Ok(bits)
}

/// Splits a comma-separated list at depth zero, respecting nested parens
/// and brackets. An empty input yields an empty list.
pub(crate) fn split_top_level(s: &str) -> Result<Vec<&str>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Vec::new());
    }

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::InvalidSignature(s.to_string()))?;
            }
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(Error::InvalidSignature(s.to_string()));
    }
    parts.push(&s[start..]);
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalars() {
        assert_eq!(Type::parse("uint256").unwrap(), Type::Uint(256));
        assert_eq!(Type::parse("uint").unwrap(), Type::Uint(256));
        assert_eq!(Type::parse("int8").unwrap(), Type::Int(8));
        assert_eq!(Type::parse("bool").unwrap(), Type::Bool);
        assert_eq!(Type::parse("address").unwrap(), Type::Address);
        assert_eq!(Type::parse("bytes32").unwrap(), Type::FixedBytes(32));
        assert_eq!(Type::parse("bytes").unwrap(), Type::Bytes);
        assert_eq!(Type::parse("string").unwrap(), Type::String);
    }

    #[test]
    fn test_parse_rejects_bad_widths() {
        assert!(Type::parse("uint7").is_err());
        assert!(Type::parse("uint264").is_err());
        assert!(Type::parse("uint0").is_err());
        assert!(Type::parse("bytes0").is_err());
        assert!(Type::parse("bytes33").is_err());
        assert!(Type::parse("fixed128x18").is_err());
    }

    #[test]
    fn test_parse_arrays() {
        assert_eq!(
            Type::parse("uint256[]").unwrap(),
            Type::Array(Box::new(Type::Uint(256))),
        );
        assert_eq!(
            Type::parse("address[4]").unwrap(),
            Type::FixedArray(Box::new(Type::Address), 4),
        );
        assert_eq!(
            Type::parse("uint8[2][]").unwrap(),
            Type::Array(Box::new(Type::FixedArray(Box::new(Type::Uint(8)), 2))),
        );
    }

    #[test]
    fn test_parse_tuples() {
        assert_eq!(
            Type::parse("(address,uint256)").unwrap(),
            Type::Tuple(vec![Type::Address, Type::Uint(256)]),
        );
        assert_eq!(
            Type::parse("(address,(bool,string))[]").unwrap(),
            Type::Array(Box::new(Type::Tuple(vec![
                Type::Address,
                Type::Tuple(vec![Type::Bool, Type::String]),
            ]))),
        );
    }

    #[test]
    fn test_canonical_roundtrip() {
        for s in [
            "uint256",
            "int128",
            "bool",
            "address",
            "bytes4",
            "bytes",
            "string",
            "uint256[]",
            "address[4]",
            "(address,uint256)",
            "(address,(bool,string))[2]",
        ] {
            assert_eq!(Type::parse(s).unwrap().canonical(), s);
        }
        // alias normalization
        assert_eq!(Type::parse("uint").unwrap().canonical(), "uint256");
    }

    #[test]
    fn test_dynamic_classification() {
        assert!(!Type::parse("uint256").unwrap().is_dynamic());
        assert!(!Type::parse("bytes32").unwrap().is_dynamic());
        assert!(Type::parse("bytes").unwrap().is_dynamic());
        assert!(Type::parse("string").unwrap().is_dynamic());
        assert!(Type::parse("uint256[]").unwrap().is_dynamic());
        assert!(!Type::parse("uint256[2]").unwrap().is_dynamic());
        assert!(Type::parse("string[2]").unwrap().is_dynamic());
        assert!(!Type::parse("(address,uint256)").unwrap().is_dynamic());
        assert!(Type::parse("(address,bytes)").unwrap().is_dynamic());
    }

    #[test]
    fn test_head_size() {
        assert_eq!(Type::parse("uint256").unwrap().head_size(), 32);
        assert_eq!(Type::parse("bytes").unwrap().head_size(), 32);
        assert_eq!(Type::parse("uint256[3]").unwrap().head_size(), 96);
        assert_eq!(Type::parse("(address,uint256)").unwrap().head_size(), 64);
        assert_eq!(Type::parse("string[3]").unwrap().head_size(), 32);
    }
}
