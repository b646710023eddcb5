//! Loading interfaces from compiled contract artifacts.
//!
//! Accepts the JSON shapes produced by the common Solidity build tools:
//! either a bare ABI array, or an artifact object wrapping the array in
//! an `abi` field alongside the deployment bytecode.

use crate::method::{Abi, Method, Param, StateMutability};
use crate::ty::Type;
use crate::{Error, Result};
use serde::Deserialize;

/// A compiled contract artifact: the interface plus deployment bytecode.
#[derive(Debug, Clone, Default)]
pub struct Artifact {
    /// The parsed interface
    pub abi: Abi,
    /// Deployment (init) bytecode; empty if the artifact carries none
    pub bytecode: Vec<u8>,
}

impl Artifact {
    /// Parses an artifact from JSON.
    ///
    /// Both a full artifact object (`{"abi": [...], "bytecode": "0x..."}`)
    /// and a bare ABI array are accepted.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawArtifact = serde_json::from_str(json)?;
        let (entries, bytecode) = match raw {
            RawArtifact::Full { abi, bytecode } => (abi, bytecode),
            RawArtifact::BareAbi(entries) => (entries, None),
        };

        let bytecode = match bytecode {
            Some(RawBytecode::Hex(s)) => decode_bytecode(&s)?,
            // some tools nest the hex under an "object" field
            Some(RawBytecode::Wrapped { object }) => decode_bytecode(&object)?,
            None => Vec::new(),
        };

        Ok(Self {
            abi: build_abi(entries)?,
            bytecode,
        })
    }
}

impl Abi {
    /// Parses an interface from a bare ABI JSON array.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<RawEntry> = serde_json::from_str(json)?;
        build_abi(entries)
    }
}

fn decode_bytecode(s: &str) -> Result<Vec<u8>> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(s)?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawArtifact {
    Full {
        abi: Vec<RawEntry>,
        #[serde(default)]
        bytecode: Option<RawBytecode>,
    },
    BareAbi(Vec<RawEntry>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Wrapped { object: String },
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<RawParam>,
    #[serde(default)]
    outputs: Vec<RawParam>,
    #[serde(default, rename = "stateMutability")]
    state_mutability: Option<String>,
}

#[derive(Deserialize)]
struct RawParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    components: Vec<RawParam>,
}

fn build_abi(entries: Vec<RawEntry>) -> Result<Abi> {
    let mut abi = Abi::default();
    for entry in entries {
        match entry.kind.as_str() {
            "function" => {
                let name = entry
                    .name
                    .ok_or_else(|| Error::InvalidSignature("unnamed function".into()))?;
                abi.add(Method {
                    name,
                    inputs: build_params(entry.inputs)?,
                    outputs: build_params(entry.outputs)?,
                    state_mutability: entry
                        .state_mutability
                        .as_deref()
                        .and_then(parse_mutability)
                        .unwrap_or_default(),
                });
            }
            "constructor" => {
                abi.constructor = Some(Method {
                    name: "constructor".to_string(),
                    inputs: build_params(entry.inputs)?,
                    outputs: Vec::new(),
                    state_mutability: entry
                        .state_mutability
                        .as_deref()
                        .and_then(parse_mutability)
                        .unwrap_or_default(),
                });
            }
            // events, errors, fallback, receive: not part of the call surface
            _ => {}
        }
    }
    Ok(abi)
}

fn parse_mutability(s: &str) -> Option<StateMutability> {
    match s {
        "view" => Some(StateMutability::View),
        "pure" => Some(StateMutability::Pure),
        "payable" => Some(StateMutability::Payable),
        "nonpayable" => Some(StateMutability::NonPayable),
        _ => None,
    }
}

fn build_params(raw: Vec<RawParam>) -> Result<Vec<Param>> {
    raw.into_iter()
        .map(|p| {
            let ty = build_type(&p.ty, p.components)?;
            Ok(Param::new(p.name, ty))
        })
        .collect()
}

/// Resolves a parameter's type, expanding `tuple` (and tuple arrays)
/// through the `components` field.
fn build_type(ty: &str, components: Vec<RawParam>) -> Result<Type> {
    if let Some(suffix_start) = tuple_suffix_start(ty) {
        let fields = components
            .into_iter()
            .map(|c| build_type(&c.ty, c.components))
            .collect::<Result<Vec<_>>>()?;
        let mut resolved = Type::Tuple(fields);
        // re-apply array suffixes: "tuple[2][]" etc.
        let mut rest = &ty[suffix_start..];
        while let Some(close) = rest.find(']') {
            let body = &rest[1..close];
            resolved = if body.is_empty() {
                Type::Array(Box::new(resolved))
            } else {
                let len: usize = body
                    .parse()
                    .map_err(|_| Error::UnknownType(ty.to_string()))?;
                Type::FixedArray(Box::new(resolved), len)
            };
            rest = &rest[close + 1..];
        }
        Ok(resolved)
    } else {
        Type::parse(ty)
    }
}

/// Returns the index of the array-suffix start if `ty` is `tuple`,
/// `tuple[]`, `tuple[N]...`, else `None`.
fn tuple_suffix_start(ty: &str) -> Option<usize> {
    let rest = ty.strip_prefix("tuple")?;
    if rest.is_empty() || rest.starts_with('[') {
        Some("tuple".len())
    } else {
        None
    }
}
