//! End-to-end codec tests against well-known reference encodings.

use alloy_primitives::{I256, U256};
use etherlite_abi::{decode, encode, Method, Type, Value};
use etherlite_types::Address;

fn ty(s: &str) -> Type {
    Type::parse(s).unwrap()
}

#[test]
fn erc20_transfer_call_data_matches_reference() {
    // transfer(0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed, 1000)
    let method = Method::parse("transfer(address,uint256)").unwrap();
    let to: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
    let data = method
        .encode_call(&[Value::Address(to), Value::Uint(U256::from(1000u64))])
        .unwrap();

    let expected = hex::decode(
        "a9059cbb\
         0000000000000000000000005aaeb6053f3e94c9b9a09f33669435e7ef1beaed\
         00000000000000000000000000000000000000000000000000000000000003e8",
    )
    .unwrap();
    assert_eq!(data, expected);
}

#[test]
fn string_encoding_matches_reference() {
    // encode(("hello")) per the canonical ABI examples
    let data = encode(&[Value::from("hello")], &[ty("string")]).unwrap();
    let expected = hex::decode(
        "0000000000000000000000000000000000000000000000000000000000000020\
         0000000000000000000000000000000000000000000000000000000000000005\
         68656c6c6f000000000000000000000000000000000000000000000000000000",
    )
    .unwrap();
    assert_eq!(data, expected);
}

#[test]
fn dynamic_array_encoding_matches_reference() {
    let data = encode(
        &[Value::Array(vec![Value::from(1u64), Value::from(2u64)])],
        &[ty("uint256[]")],
    )
    .unwrap();
    let expected = hex::decode(
        "0000000000000000000000000000000000000000000000000000000000000020\
         0000000000000000000000000000000000000000000000000000000000000002\
         0000000000000000000000000000000000000000000000000000000000000001\
         0000000000000000000000000000000000000000000000000000000000000002",
    )
    .unwrap();
    assert_eq!(data, expected);
}

#[test]
fn roundtrip_every_supported_shape() {
    let addr: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
    let cases: Vec<(Value, Type)> = vec![
        (Value::Uint(U256::MAX), ty("uint256")),
        (Value::Uint(U256::from(255u64)), ty("uint8")),
        (Value::Int(I256::try_from(-1234i64).unwrap()), ty("int64")),
        (Value::Bool(true), ty("bool")),
        (Value::Address(addr), ty("address")),
        (Value::FixedBytes(vec![7; 32]), ty("bytes32")),
        (Value::Bytes((0..100).collect()), ty("bytes")),
        (Value::String("héllo wörld".into()), ty("string")),
        (
            Value::Array(vec![Value::from("a"), Value::from("bb")]),
            ty("string[]"),
        ),
        (
            Value::FixedArray(vec![Value::from(1u64), Value::from(2u64), Value::from(3u64)]),
            ty("uint256[3]"),
        ),
        (
            Value::Tuple(vec![
                Value::Address(addr),
                Value::Bytes(vec![0xff; 33]),
                Value::Bool(false),
            ]),
            ty("(address,bytes,bool)"),
        ),
    ];

    for (value, t) in cases {
        let encoded = encode(std::slice::from_ref(&value), std::slice::from_ref(&t)).unwrap();
        let decoded = decode(&encoded, std::slice::from_ref(&t)).unwrap();
        assert_eq!(decoded, vec![value], "roundtrip failed for {}", t);
    }
}

#[test]
fn mixed_argument_list_roundtrip() {
    let values = vec![
        Value::from(42u64),
        Value::Bytes(vec![0xab; 40]),
        Value::Bool(true),
        Value::Array(vec![
            Value::Tuple(vec![Value::from(1u64), Value::from("x")]),
            Value::Tuple(vec![Value::from(2u64), Value::from("yy")]),
        ]),
    ];
    let types = vec![ty("uint256"), ty("bytes"), ty("bool"), ty("(uint256,string)[]")];

    let encoded = encode(&values, &types).unwrap();
    assert_eq!(decode(&encoded, &types).unwrap(), values);
}

#[test]
fn truncated_buffer_never_panics() {
    let values = vec![Value::from(1u64), Value::Bytes(vec![9; 64])];
    let types = vec![ty("uint256"), ty("bytes")];
    let encoded = encode(&values, &types).unwrap();

    // every proper prefix must fail cleanly, not panic
    for cut in 0..encoded.len() {
        assert!(decode(&encoded[..cut], &types).is_err());
    }
}
