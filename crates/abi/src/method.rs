//! Method signatures, selectors and the parsed contract interface.
//!
//! A [`Method`] is parsed from a restricted Solidity-like grammar:
//!
//! ```text
//! function name(type [name], ...) [view|pure|payable] [returns (type [name], ...)]
//! ```
//!
//! Its selector is the first four bytes of `keccak256("name(type,...)")`
//! with every parameter type rendered canonically. Two methods with the
//! same canonical signature always produce the same selector; that is a
//! property of the scheme, not a defect.

use crate::decode::decode;
use crate::encode::encode;
use crate::ty::{split_top_level, Type};
use crate::value::Value;
use crate::{Error, Result};
use etherlite_types::H256;
use std::collections::HashMap;

/// A named, typed parameter of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Declared parameter name; may be empty
    pub name: String,
    /// Parameter type
    pub ty: Type,
}

impl Param {
    /// Creates a new parameter.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Advisory state-mutability marker. Not enforced by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateMutability {
    /// May modify state and does not accept value
    #[default]
    NonPayable,
    /// Reads state, never modifies it
    View,
    /// Touches no state at all
    Pure,
    /// May modify state and accepts value
    Payable,
}

impl StateMutability {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "view" | "constant" => Some(Self::View),
            "pure" => Some(Self::Pure),
            "payable" => Some(Self::Payable),
            "nonpayable" => Some(Self::NonPayable),
            _ => None,
        }
    }
}

/// A contract method: name, inputs, outputs and mutability marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// Method name
    pub name: String,
    /// Ordered input parameters
    pub inputs: Vec<Param>,
    /// Ordered output parameters
    pub outputs: Vec<Param>,
    /// Advisory mutability marker
    pub state_mutability: StateMutability,
}

impl Method {
    /// Parses a method from its human-readable signature.
    ///
    /// The leading `function` keyword is optional.
    ///
    /// # Example
    ///
    /// ```rust
    /// use etherlite_abi::Method;
    ///
    /// let m = Method::parse("function balanceOf(address owner) view returns (uint256)").unwrap();
    /// assert_eq!(m.name, "balanceOf");
    /// assert_eq!(m.signature(), "balanceOf(address)");
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let text = text.strip_prefix("function ").unwrap_or(text).trim_start();

        let open = text
            .find('(')
            .ok_or_else(|| Error::InvalidSignature(text.to_string()))?;
        let name = text[..open].trim();
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(Error::InvalidSignature(text.to_string()));
        }

        let close = matching_paren(text, open)?;
        let inputs = parse_params(&text[open + 1..close])?;

        let mut state_mutability = StateMutability::default();
        let mut outputs = Vec::new();

        let rest = text[close + 1..].trim();
        if !rest.is_empty() {
            let (modifiers, returns) = match rest.find("returns") {
                Some(idx) => (&rest[..idx], Some(rest[idx + "returns".len()..].trim())),
                None => (rest, None),
            };

            for word in modifiers.split_whitespace() {
                if let Some(m) = StateMutability::parse(word) {
                    state_mutability = m;
                }
                // unknown modifiers (external, virtual, ...) are ignored
            }

            if let Some(returns) = returns {
                let inner = returns
                    .strip_prefix('(')
                    .and_then(|r| r.strip_suffix(')'))
                    .ok_or_else(|| Error::InvalidSignature(text.to_string()))?;
                outputs = parse_params(inner)?;
            }
        }

        Ok(Self {
            name: name.to_string(),
            inputs,
            outputs,
            state_mutability,
        })
    }

    /// Renders the canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(|p| p.ty.canonical()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// Computes the 4-byte selector: `keccak256(signature)[..4]`.
    pub fn selector(&self) -> [u8; 4] {
        let hash = H256::keccak256(self.signature().as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&hash.as_bytes()[..4]);
        selector
    }

    /// Encodes the argument list without the selector prefix.
    pub fn encode_args(&self, args: &[Value]) -> Result<Vec<u8>> {
        let types: Vec<Type> = self.inputs.iter().map(|p| p.ty.clone()).collect();
        encode(args, &types)
    }

    /// Encodes full call data: `selector || encode(args)`.
    pub fn encode_call(&self, args: &[Value]) -> Result<Vec<u8>> {
        let mut data = self.selector().to_vec();
        data.extend_from_slice(&self.encode_args(args)?);
        Ok(data)
    }

    /// Decodes return data against the declared output types.
    ///
    /// Values are addressable both positionally (`"0"`, `"1"`, ...) and by
    /// declared output name where one exists.
    pub fn decode_output(&self, data: &[u8]) -> Result<HashMap<String, Value>> {
        let types: Vec<Type> = self.outputs.iter().map(|p| p.ty.clone()).collect();
        let values = decode(data, &types)?;

        let mut named = HashMap::with_capacity(values.len() * 2);
        for (i, (param, value)) in self.outputs.iter().zip(values).enumerate() {
            if !param.name.is_empty() {
                named.insert(param.name.clone(), value.clone());
            }
            named.insert(i.to_string(), value);
        }
        Ok(named)
    }
}

/// A parsed contract interface: an optional constructor plus named methods.
#[derive(Debug, Clone, Default)]
pub struct Abi {
    /// The constructor, if the interface declares one
    pub constructor: Option<Method>,
    methods: HashMap<String, Method>,
}

impl Abi {
    /// Builds an interface from a list of human-readable signatures.
    ///
    /// A signature whose name is `constructor` becomes the constructor.
    pub fn parse(signatures: &[&str]) -> Result<Self> {
        let mut abi = Self::default();
        for sig in signatures {
            abi.add(Method::parse(sig)?);
        }
        Ok(abi)
    }

    /// Adds a method, replacing any previous method of the same name.
    pub fn add(&mut self, method: Method) {
        if method.name == "constructor" {
            self.constructor = Some(method);
        } else {
            self.methods.insert(method.name.clone(), method);
        }
    }

    /// Looks up a method by name.
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    /// Iterates over the non-constructor methods in unspecified order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.values()
    }

    /// Number of non-constructor methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Checks if the interface has no non-constructor methods.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

fn matching_paren(s: &str, open: usize) -> Result<usize> {
    let mut depth = 0usize;
    for (i, c) in s[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open + i);
                }
            }
            _ => {}
        }
    }
    Err(Error::InvalidSignature(s.to_string()))
}

/// Parses a `type [name], type [name], ...` parameter list.
fn parse_params(s: &str) -> Result<Vec<Param>> {
    split_top_level(s)?
        .into_iter()
        .map(|part| {
            let part = part.trim();
            // the name, if present, follows the last space outside parens
            match split_trailing_name(part) {
                Some((ty, name)) => Ok(Param::new(name, Type::parse(ty)?)),
                None => Ok(Param::new("", Type::parse(part)?)),
            }
        })
        .collect()
}

/// Splits `"uint256 amount"` into `("uint256", "amount")`. Returns `None`
/// when the part is a bare type. Keywords like `memory` are dropped.
fn split_trailing_name(part: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut split_at = None;
    for (i, c) in part.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => split_at = Some(i),
            _ => {}
        }
    }
    let idx = split_at?;
    let (ty, name) = (part[..idx].trim(), part[idx..].trim());
    match name {
        "memory" | "calldata" | "storage" | "indexed" => Some((ty, "")),
        _ => {
            // "uint256 memory amount" keeps the final token as the name
            let ty = ty
                .strip_suffix(" memory")
                .or_else(|| ty.strip_suffix(" calldata"))
                .unwrap_or(ty);
            Some((ty, name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    #[test]
    fn test_transfer_selector() {
        let m = Method::parse("function transfer(address to, uint256 amount)").unwrap();
        assert_eq!(m.signature(), "transfer(address,uint256)");
        assert_eq!(m.selector(), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_selector_uses_canonical_types() {
        // "uint" must normalize to uint256 before hashing
        let a = Method::parse("transfer(address to, uint amount)").unwrap();
        let b = Method::parse("transfer(address to, uint256 amount)").unwrap();
        assert_eq!(a.selector(), b.selector());
    }

    #[test]
    fn test_parse_full_grammar() {
        let m = Method::parse(
            "function balanceOf(address owner) view returns (uint256 balance)",
        )
        .unwrap();
        assert_eq!(m.name, "balanceOf");
        assert_eq!(m.state_mutability, StateMutability::View);
        assert_eq!(m.outputs.len(), 1);
        assert_eq!(m.outputs[0].name, "balance");
        assert_eq!(m.outputs[0].ty, Type::Uint(256));
    }

    #[test]
    fn test_parse_without_function_keyword() {
        let m = Method::parse("approve(address,uint256)").unwrap();
        assert_eq!(m.signature(), "approve(address,uint256)");
        assert!(m.inputs.iter().all(|p| p.name.is_empty()));
    }

    #[test]
    fn test_parse_tuple_params() {
        let m = Method::parse("submit((address,uint256)[] orders)").unwrap();
        assert_eq!(m.signature(), "submit((address,uint256)[])");
        assert_eq!(m.inputs[0].name, "orders");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Method::parse("").is_err());
        assert!(Method::parse("no parens here").is_err());
        assert!(Method::parse("f(uint999)").is_err());
        assert!(Method::parse("f(uint256").is_err());
    }

    #[test]
    fn test_decode_output_named_and_positional() {
        let m = Method::parse("f() returns (uint256 total, bool ok)").unwrap();
        let data = encode(
            &[Value::Uint(U256::from(10u64)), Value::Bool(true)],
            &[Type::Uint(256), Type::Bool],
        )
        .unwrap();
        let out = m.decode_output(&data).unwrap();
        assert_eq!(out["0"], Value::Uint(U256::from(10u64)));
        assert_eq!(out["total"], Value::Uint(U256::from(10u64)));
        assert_eq!(out["1"], Value::Bool(true));
        assert_eq!(out["ok"], Value::Bool(true));
    }

    #[test]
    fn test_abi_constructor_routing() {
        let abi = Abi::parse(&[
            "constructor(uint256 supply)",
            "function totalSupply() view returns (uint256)",
        ])
        .unwrap();
        assert!(abi.constructor.is_some());
        assert_eq!(abi.len(), 1);
        assert!(abi.method("totalSupply").is_some());
        assert!(abi.method("constructor").is_none());
    }

    #[test]
    fn test_encode_call_prefixes_selector() {
        let m = Method::parse("transfer(address,uint256)").unwrap();
        let addr: etherlite_types::Address =
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
        let data = m
            .encode_call(&[Value::Address(addr), Value::Uint(U256::from(1u64))])
            .unwrap();
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
    }
}
