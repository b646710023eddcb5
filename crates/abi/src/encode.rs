//! The head/tail call-data encoder.
//!
//! Arguments are partitioned into a head region (one slot per argument,
//! static values in place, dynamic values as tail offsets) and a tail
//! region holding the dynamic payloads in argument order. Composite types
//! apply the same rule recursively.

use crate::ty::Type;
use crate::value::Value;
use crate::{Error, Result};
use alloy_primitives::{I256, U256};

const WORD: usize = 32;

/// Encodes an argument list against its declared types.
///
/// Fails when the argument count or any value shape disagrees with the
/// types, or when a numeric value does not fit its declared width.
pub fn encode(values: &[Value], types: &[Type]) -> Result<Vec<u8>> {
    if values.len() != types.len() {
        return Err(Error::ArityMismatch {
            expected: types.len(),
            actual: values.len(),
        });
    }
    let pairs: Vec<(&Value, &Type)> = values.iter().zip(types.iter()).collect();
    encode_frame(&pairs)
}

/// Encodes one head/tail frame: a top-level argument list, a tuple body,
/// or the element list of an array.
fn encode_frame(pairs: &[(&Value, &Type)]) -> Result<Vec<u8>> {
    let head_size: usize = pairs.iter().map(|(_, ty)| ty.head_size()).sum();

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (value, ty) in pairs {
        if ty.is_dynamic() {
            head.extend_from_slice(&encode_word(U256::from(head_size + tail.len())));
            tail.extend_from_slice(&encode_value(value, ty)?);
        } else {
            head.extend_from_slice(&encode_value(value, ty)?);
        }
    }

    head.extend_from_slice(&tail);
    Ok(head)
}

/// Encodes a single value in isolation: the in-place bytes for a static
/// type, the tail payload for a dynamic one.
fn encode_value(value: &Value, ty: &Type) -> Result<Vec<u8>> {
    if !value.matches(ty) {
        return Err(Error::TypeMismatch {
            expected: ty.canonical(),
            actual: value.kind().to_string(),
        });
    }

    match (value, ty) {
        (Value::Uint(v), Type::Uint(bits)) => {
            if !uint_fits(v, *bits) {
                return Err(Error::ValueOutOfRange(ty.canonical()));
            }
            Ok(encode_word(*v).to_vec())
        }
        (Value::Int(v), Type::Int(bits)) => {
            if !int_fits(v, *bits) {
                return Err(Error::ValueOutOfRange(ty.canonical()));
            }
            // two's complement sign-extends naturally over the full word
            Ok(encode_word(v.into_raw()).to_vec())
        }
        (Value::Bool(v), Type::Bool) => {
            Ok(encode_word(U256::from(u64::from(*v))).to_vec())
        }
        (Value::Address(addr), Type::Address) => {
            let mut word = [0u8; WORD];
            word[12..].copy_from_slice(addr.as_bytes());
            Ok(word.to_vec())
        }
        (Value::FixedBytes(bytes), Type::FixedBytes(len)) => {
            if bytes.len() != *len {
                return Err(Error::ValueOutOfRange(ty.canonical()));
            }
            let mut word = [0u8; WORD];
            word[..bytes.len()].copy_from_slice(bytes);
            Ok(word.to_vec())
        }
        (Value::Bytes(bytes), Type::Bytes) => Ok(encode_len_prefixed(bytes)),
        (Value::String(s), Type::String) => Ok(encode_len_prefixed(s.as_bytes())),
        (Value::Array(elems), Type::Array(elem_ty)) => {
            let pairs: Vec<(&Value, &Type)> =
                elems.iter().map(|e| (e, elem_ty.as_ref())).collect();
            let mut out = encode_word(U256::from(elems.len())).to_vec();
            out.extend_from_slice(&encode_frame(&pairs)?);
            Ok(out)
        }
        (Value::FixedArray(elems), Type::FixedArray(elem_ty, len)) => {
            if elems.len() != *len {
                return Err(Error::ArityMismatch {
                    expected: *len,
                    actual: elems.len(),
                });
            }
            let pairs: Vec<(&Value, &Type)> =
                elems.iter().map(|e| (e, elem_ty.as_ref())).collect();
            encode_frame(&pairs)
        }
        (Value::Tuple(fields), Type::Tuple(field_tys)) => {
            if fields.len() != field_tys.len() {
                return Err(Error::ArityMismatch {
                    expected: field_tys.len(),
                    actual: fields.len(),
                });
            }
            let pairs: Vec<(&Value, &Type)> =
                fields.iter().zip(field_tys.iter()).collect();
            encode_frame(&pairs)
        }
        // matches() rules this out
        _ => Err(Error::TypeMismatch {
            expected: ty.canonical(),
            actual: value.kind().to_string(),
        }),
    }
}

fn encode_word(v: U256) -> [u8; WORD] {
    v.to_be_bytes()
}

fn encode_len_prefixed(bytes: &[u8]) -> Vec<u8> {
    let padded = bytes.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(WORD + padded);
    out.extend_from_slice(&encode_word(U256::from(bytes.len())));
    out.extend_from_slice(bytes);
    out.resize(WORD + padded, 0);
    out
}

fn uint_fits(v: &U256, bits: usize) -> bool {
    v.bit_len() <= bits
}

pub(crate) fn int_fits(v: &I256, bits: usize) -> bool {
    if bits == 256 {
        return true;
    }
    let bound = I256::from_raw(U256::ONE << (bits - 1));
    *v >= -bound && *v < bound
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(s: &str) -> Type {
        Type::parse(s).unwrap()
    }

    #[test]
    fn test_static_word_layout() {
        let out = encode(
            &[Value::from(1u64), Value::from(true)],
            &[ty("uint256"), ty("bool")],
        )
        .unwrap();
        assert_eq!(out.len(), 64);
        assert_eq!(out[31], 1);
        assert_eq!(out[63], 1);
    }

    #[test]
    fn test_address_left_padded() {
        let addr: etherlite_types::Address =
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
        let out = encode(&[Value::Address(addr)], &[ty("address")]).unwrap();
        assert_eq!(&out[..12], &[0u8; 12]);
        assert_eq!(&out[12..], addr.as_bytes());
    }

    #[test]
    fn test_head_tail_offset() {
        // (uint256, bytes) with a 40-byte payload: the second head slot
        // holds the tail offset 0x40, the tail starts with the length.
        let payload = vec![0xabu8; 40];
        let out = encode(
            &[Value::from(5u64), Value::Bytes(payload.clone())],
            &[ty("uint256"), ty("bytes")],
        )
        .unwrap();

        assert_eq!(out.len(), 64 + 32 + 64);
        assert_eq!(U256::try_from_be_slice(&out[32..64]).unwrap(), U256::from(0x40u64));
        assert_eq!(U256::try_from_be_slice(&out[64..96]).unwrap(), U256::from(40u64));
        assert_eq!(&out[96..136], payload.as_slice());
        assert_eq!(&out[136..160], &[0u8; 24]);
    }

    #[test]
    fn test_uint_overflow_errors() {
        let too_big = U256::from(256u64);
        let err = encode(&[Value::Uint(too_big)], &[ty("uint8")]).unwrap_err();
        assert!(matches!(err, Error::ValueOutOfRange(_)));

        // boundary value fits
        assert!(encode(&[Value::Uint(U256::from(255u64))], &[ty("uint8")]).is_ok());
    }

    #[test]
    fn test_int_bounds() {
        let min = I256::try_from(-128i64).unwrap();
        let max = I256::try_from(127i64).unwrap();
        assert!(encode(&[Value::Int(min)], &[ty("int8")]).is_ok());
        assert!(encode(&[Value::Int(max)], &[ty("int8")]).is_ok());

        let over = I256::try_from(128i64).unwrap();
        let under = I256::try_from(-129i64).unwrap();
        assert!(encode(&[Value::Int(over)], &[ty("int8")]).is_err());
        assert!(encode(&[Value::Int(under)], &[ty("int8")]).is_err());
    }

    #[test]
    fn test_negative_int_sign_extends() {
        let out = encode(
            &[Value::Int(I256::MINUS_ONE)],
            &[ty("int256")],
        )
        .unwrap();
        assert_eq!(out, vec![0xff; 32]);
    }

    #[test]
    fn test_type_mismatch_errors() {
        let err = encode(&[Value::from(true)], &[ty("uint256")]).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_arity_mismatch_errors() {
        let err = encode(&[Value::from(1u64)], &[ty("uint256"), ty("bool")]).unwrap_err();
        assert!(matches!(err, Error::ArityMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_fixed_bytes_right_padded() {
        let out = encode(
            &[Value::FixedBytes(vec![0xde, 0xad])],
            &[ty("bytes2")],
        )
        .unwrap();
        assert_eq!(&out[..2], &[0xde, 0xad]);
        assert_eq!(&out[2..], &[0u8; 30]);
    }

    #[test]
    fn test_fixed_bytes_wrong_length_errors() {
        assert!(encode(&[Value::FixedBytes(vec![1, 2, 3])], &[ty("bytes2")]).is_err());
    }
}
