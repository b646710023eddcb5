//! The bounds-checked call-data decoder.
//!
//! Decoding mirrors the encoder's head/tail layout: head slots are read
//! first, static values consumed in place, dynamic values reached through
//! their tail offsets. Every offset and declared length is validated
//! against the buffer before it is followed.

use crate::ty::Type;
use crate::value::Value;
use crate::{Error, Result};
use alloy_primitives::{I256, U256};
use etherlite_types::Address;

const WORD: usize = 32;

/// Decodes a buffer against a list of declared types.
///
/// Fails when the buffer is shorter than the head requires, an offset
/// points outside the buffer, or a declared length does not fit in the
/// remaining tail.
pub fn decode(data: &[u8], types: &[Type]) -> Result<Vec<Value>> {
    decode_frame(data, types)
}

/// Decodes one head/tail frame. `data` starts at the frame's head region;
/// tail offsets are relative to it.
fn decode_frame(data: &[u8], types: &[Type]) -> Result<Vec<Value>> {
    let head_size: usize = types.iter().map(Type::head_size).sum();
    if data.len() < head_size {
        return Err(Error::BufferUnderrun {
            needed: head_size,
            available: data.len(),
        });
    }

    let mut values = Vec::with_capacity(types.len());
    let mut pos = 0;
    for ty in types {
        if ty.is_dynamic() {
            let offset = read_offset(data, pos)?;
            values.push(decode_dynamic(&data[offset..], ty)?);
            pos += WORD;
        } else {
            values.push(decode_static(data, pos, ty)?);
            pos += ty.head_size();
        }
    }
    Ok(values)
}

/// Decodes a static value at `pos` within the head region.
fn decode_static(data: &[u8], pos: usize, ty: &Type) -> Result<Value> {
    match ty {
        Type::Uint(bits) => {
            let word = read_word(data, pos)?;
            let v = U256::from_be_slice(word);
            if v.bit_len() > *bits {
                return Err(Error::ValueOutOfRange(ty.canonical()));
            }
            Ok(Value::Uint(v))
        }
        Type::Int(bits) => {
            let word = read_word(data, pos)?;
            let v = I256::from_raw(U256::from_be_slice(word));
            if !crate::encode::int_fits(&v, *bits) {
                return Err(Error::ValueOutOfRange(ty.canonical()));
            }
            Ok(Value::Int(v))
        }
        Type::Bool => {
            let word = read_word(data, pos)?;
            Ok(Value::Bool(word[WORD - 1] != 0))
        }
        Type::Address => {
            let word = read_word(data, pos)?;
            // left-padded to the word: address occupies the low 20 bytes
            Ok(Value::Address(Address::from_slice(&word[12..]).map_err(
                |_| Error::ValueOutOfRange(ty.canonical()),
            )?))
        }
        Type::FixedBytes(len) => {
            // the parser caps widths at 32, but the variant is public
            if *len > WORD {
                return Err(Error::ValueOutOfRange(ty.canonical()));
            }
            let word = read_word(data, pos)?;
            Ok(Value::FixedBytes(word[..*len].to_vec()))
        }
        Type::FixedArray(elem_ty, len) => {
            let mut elems = Vec::with_capacity(*len);
            let mut elem_pos = pos;
            for _ in 0..*len {
                elems.push(decode_static(data, elem_pos, elem_ty)?);
                elem_pos += elem_ty.head_size();
            }
            Ok(Value::FixedArray(elems))
        }
        Type::Tuple(field_tys) => {
            let mut fields = Vec::with_capacity(field_tys.len());
            let mut field_pos = pos;
            for field_ty in field_tys {
                fields.push(decode_static(data, field_pos, field_ty)?);
                field_pos += field_ty.head_size();
            }
            Ok(Value::Tuple(fields))
        }
        // dynamic types never reach here
        Type::Bytes | Type::String | Type::Array(_) => Err(Error::InvalidOffset(pos)),
    }
}

/// Decodes a dynamic value whose tail payload starts at `data[0]`.
fn decode_dynamic(data: &[u8], ty: &Type) -> Result<Value> {
    match ty {
        Type::Bytes => Ok(Value::Bytes(read_len_prefixed(data)?.to_vec())),
        Type::String => {
            let bytes = read_len_prefixed(data)?.to_vec();
            Ok(Value::String(String::from_utf8(bytes)?))
        }
        Type::Array(elem_ty) => {
            let len = read_length(data, 0)?;
            // every element claims at least one head word
            let needed = len
                .checked_mul(WORD)
                .and_then(|n| n.checked_add(WORD))
                .ok_or(Error::InvalidOffset(len))?;
            if needed > data.len() {
                return Err(Error::BufferUnderrun {
                    needed,
                    available: data.len(),
                });
            }
            let elem_tys = vec![elem_ty.as_ref().clone(); len];
            let elems = decode_frame(&data[WORD..], &elem_tys)?;
            Ok(Value::Array(elems))
        }
        Type::FixedArray(elem_ty, len) => {
            let elem_tys = vec![elem_ty.as_ref().clone(); *len];
            Ok(Value::FixedArray(decode_frame(data, &elem_tys)?))
        }
        Type::Tuple(field_tys) => Ok(Value::Tuple(decode_frame(data, field_tys)?)),
        // static types never reach here
        _ => Err(Error::InvalidOffset(0)),
    }
}

fn read_word(data: &[u8], pos: usize) -> Result<&[u8]> {
    let end = pos.checked_add(WORD).ok_or(Error::InvalidOffset(pos))?;
    if end > data.len() {
        return Err(Error::BufferUnderrun {
            needed: end,
            available: data.len(),
        });
    }
    Ok(&data[pos..end])
}

/// Reads a word interpreted as an in-buffer offset or length.
fn read_offset(data: &[u8], pos: usize) -> Result<usize> {
    let word = read_word(data, pos)?;
    let v = U256::from_be_slice(word);
    let offset = usize::try_from(v).map_err(|_| Error::InvalidOffset(pos))?;
    if offset > data.len() {
        return Err(Error::InvalidOffset(offset));
    }
    Ok(offset)
}

/// Reads a word interpreted as a declared byte or element count. Unlike
/// offsets, a count may legitimately exceed the buffer length; overruns
/// surface as [`Error::BufferUnderrun`] at the consuming site.
fn read_length(data: &[u8], pos: usize) -> Result<usize> {
    let word = read_word(data, pos)?;
    let v = U256::from_be_slice(word);
    usize::try_from(v).map_err(|_| Error::BufferUnderrun {
        needed: usize::MAX,
        available: data.len(),
    })
}

fn read_len_prefixed(data: &[u8]) -> Result<&[u8]> {
    let len = read_length(data, 0)?;
    let end = WORD.checked_add(len).ok_or(Error::InvalidOffset(len))?;
    if end > data.len() {
        return Err(Error::BufferUnderrun {
            needed: end,
            available: data.len(),
        });
    }
    Ok(&data[WORD..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;

    fn ty(s: &str) -> Type {
        Type::parse(s).unwrap()
    }

    fn roundtrip(values: Vec<Value>, types: &[Type]) {
        let encoded = encode(&values, types).unwrap();
        let decoded = decode(&encoded, types).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_roundtrip_scalars() {
        roundtrip(
            vec![
                Value::Uint(U256::from(42u64)),
                Value::Int(I256::try_from(-42i64).unwrap()),
                Value::Bool(true),
                Value::FixedBytes(vec![1, 2, 3, 4]),
            ],
            &[ty("uint256"), ty("int64"), ty("bool"), ty("bytes4")],
        );
    }

    #[test]
    fn test_roundtrip_dynamic() {
        roundtrip(
            vec![
                Value::Bytes(vec![0xde; 50]),
                Value::String("hello world".to_string()),
                Value::Array(vec![Value::from(1u64), Value::from(2u64)]),
            ],
            &[ty("bytes"), ty("string"), ty("uint256[]")],
        );
    }

    #[test]
    fn test_roundtrip_nested() {
        roundtrip(
            vec![Value::Array(vec![
                Value::Tuple(vec![Value::from(1u64), Value::String("a".into())]),
                Value::Tuple(vec![Value::from(2u64), Value::String("bb".into())]),
            ])],
            &[ty("(uint256,string)[]")],
        );
    }

    #[test]
    fn test_roundtrip_static_composites() {
        roundtrip(
            vec![
                Value::FixedArray(vec![Value::from(9u64), Value::from(8u64)]),
                Value::Tuple(vec![Value::Bool(false), Value::from(3u64)]),
            ],
            &[ty("uint256[2]"), ty("(bool,uint256)")],
        );
    }

    #[test]
    fn test_empty_dynamic_values() {
        roundtrip(
            vec![
                Value::Bytes(vec![]),
                Value::String(String::new()),
                Value::Array(vec![]),
            ],
            &[ty("bytes"), ty("string"), ty("bool[]")],
        );
    }

    #[test]
    fn test_short_buffer_errors() {
        let err = decode(&[0u8; 16], &[ty("uint256")]).unwrap_err();
        assert!(matches!(err, Error::BufferUnderrun { .. }));
    }

    #[test]
    fn test_offset_out_of_bounds_errors() {
        // head slot claims the tail starts beyond the buffer
        let mut data = vec![0u8; 32];
        data[31] = 0xff;
        let err = decode(&data, &[ty("bytes")]).unwrap_err();
        assert!(matches!(err, Error::InvalidOffset(_)));
    }

    #[test]
    fn test_length_beyond_buffer_errors() {
        // valid offset, but the declared byte length overruns the tail
        let mut data = vec![0u8; 96];
        data[31] = 0x20; // offset = 32
        data[63] = 0xff; // length = 255, only 32 bytes remain
        let err = decode(&data, &[ty("bytes")]).unwrap_err();
        assert!(matches!(err, Error::BufferUnderrun { .. }));
    }

    #[test]
    fn test_array_count_beyond_buffer_errors() {
        // element count word claims more elements than the tail can hold
        let mut data = vec![0u8; 64];
        data[31] = 0x20; // offset = 32
        data[63] = 0xff; // count = 255, zero element words follow
        let err = decode(&data, &[ty("uint256[]")]).unwrap_err();
        assert!(matches!(err, Error::BufferUnderrun { .. }));
    }

    #[test]
    fn test_int_width_checked_on_decode() {
        // 2^72 does not fit in int64
        let mut data = vec![0u8; 32];
        data[22] = 0x01;
        let err = decode(&data, &[ty("int64")]).unwrap_err();
        assert!(matches!(err, Error::ValueOutOfRange(_)));

        // the same word is a valid int256
        let decoded = decode(&data, &[ty("int256")]).unwrap();
        assert_eq!(
            decoded,
            vec![Value::Int(I256::from_raw(U256::from(1u64) << 72usize))]
        );
    }

    #[test]
    fn test_oversized_fixed_bytes_rejected() {
        // the signature grammar stops at bytes32, but the variant is
        // constructible directly
        let err = decode(&[0u8; 32], &[Type::FixedBytes(40)]).unwrap_err();
        assert!(matches!(err, Error::ValueOutOfRange(_)));
    }

    #[test]
    fn test_invalid_utf8_errors() {
        let mut data = vec![0u8; 96];
        data[31] = 0x20;
        data[63] = 0x02;
        data[64] = 0xff;
        data[65] = 0xfe;
        let err = decode(&data, &[ty("string")]).unwrap_err();
        assert!(matches!(err, Error::InvalidUtf8(_)));
    }
}
