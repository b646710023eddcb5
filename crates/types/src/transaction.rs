//! The transaction model: legacy, access-list and dynamic-fee variants.
//!
//! This module provides:
//! - [`Transaction`] - a tagged sum type over the three wire variants
//! - [`SignedTransaction`] - a transaction carrying a valid (v, r, s)
//! - [`Signature`] - network-encoded ECDSA signature components
//! - [`AccessListItem`] - EIP-2930/EIP-1559 access list entries
//!
//! Signing digests and broadcast encodings follow the respective network
//! specifications bit-for-bit: legacy transactions as a 6- or 9-item RLP
//! list (EIP-155), typed transactions as `type_byte || rlp(fields)`.

use crate::{Address, Error, Result, H256};
use alloy_primitives::U256;
use bytes::Bytes;
use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use std::fmt;

/// Transaction type identifier (EIP-2718).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TxType {
    /// Legacy transaction (pre-EIP-2718)
    #[default]
    Legacy = 0x00,
    /// EIP-2930 access list transaction
    AccessList = 0x01,
    /// EIP-1559 dynamic fee transaction
    DynamicFee = 0x02,
}

impl TxType {
    /// Returns the transaction type byte.
    pub const fn as_byte(&self) -> u8 {
        *self as u8
    }

    /// Creates a TxType from a byte.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(Self::Legacy),
            0x01 => Ok(Self::AccessList),
            0x02 => Ok(Self::DynamicFee),
            _ => Err(Error::InvalidTransaction(format!(
                "unknown transaction type: 0x{:02x}",
                byte
            ))),
        }
    }
}

/// An access list entry for typed transactions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessListItem {
    /// The address being accessed
    pub address: Address,
    /// Storage slots being accessed
    pub storage_keys: Vec<H256>,
}

impl Encodable for AccessListItem {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.address);
        s.begin_list(self.storage_keys.len());
        for key in &self.storage_keys {
            s.append(key);
        }
    }
}

impl Decodable for AccessListItem {
    fn decode(rlp: &Rlp<'_>) -> std::result::Result<Self, DecoderError> {
        if rlp.item_count()? != 2 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        Ok(Self {
            address: rlp.val_at(0)?,
            storage_keys: rlp.list_at(1)?,
        })
    }
}

/// Network-encoded ECDSA signature components.
///
/// `v` carries the variant-specific encoding: `recovery_id + 27` for
/// pre-EIP-155 legacy transactions, `chain_id * 2 + 35 + recovery_id` for
/// EIP-155, and the raw recovery id (0 or 1) for typed transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signature {
    /// The v value (variant-specific encoding of the recovery id)
    pub v: u64,
    /// R component (32 bytes)
    pub r: H256,
    /// S component (32 bytes)
    pub s: H256,
}

impl Signature {
    /// Creates a new signature from components.
    pub const fn new(v: u64, r: H256, s: H256) -> Self {
        Self { v, r, s }
    }

    /// Returns the normalized recovery id (0 or 1), undoing any legacy or
    /// EIP-155 offset.
    pub fn recovery_id(&self) -> u8 {
        if self.v == 0 || self.v == 1 {
            self.v as u8
        } else if self.v == 27 || self.v == 28 {
            (self.v - 27) as u8
        } else if self.v >= 35 {
            // EIP-155: v = chain_id * 2 + 35 + recovery_id
            ((self.v - 35) % 2) as u8
        } else {
            // out of range; recovery rejects anything above 3
            u8::MAX
        }
    }

}

/// A legacy transaction, optionally replay-protected (EIP-155).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LegacyTx {
    /// Chain id; `None` disables replay protection (pre-EIP-155 digest)
    pub chain_id: Option<u64>,
    /// Sender nonce
    pub nonce: u64,
    /// Gas price in wei
    pub gas_price: u128,
    /// Gas limit
    pub gas_limit: u64,
    /// Recipient; `None` for contract creation
    pub to: Option<Address>,
    /// Value in wei
    pub value: U256,
    /// Calldata or contract init code
    pub data: Bytes,
}

/// An EIP-2930 access list transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessListTx {
    /// Chain id (mandatory for typed transactions)
    pub chain_id: u64,
    /// Sender nonce
    pub nonce: u64,
    /// Gas price in wei
    pub gas_price: u128,
    /// Gas limit
    pub gas_limit: u64,
    /// Recipient; `None` for contract creation
    pub to: Option<Address>,
    /// Value in wei
    pub value: U256,
    /// Calldata or contract init code
    pub data: Bytes,
    /// Addresses and storage slots to warm
    pub access_list: Vec<AccessListItem>,
}

/// An EIP-1559 dynamic fee transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DynamicFeeTx {
    /// Chain id (mandatory for typed transactions)
    pub chain_id: u64,
    /// Sender nonce
    pub nonce: u64,
    /// Maximum priority fee per gas (tip)
    pub max_priority_fee_per_gas: u128,
    /// Maximum total fee per gas
    pub max_fee_per_gas: u128,
    /// Gas limit
    pub gas_limit: u64,
    /// Recipient; `None` for contract creation
    pub to: Option<Address>,
    /// Value in wei
    pub value: U256,
    /// Calldata or contract init code
    pub data: Bytes,
    /// Addresses and storage slots to warm
    pub access_list: Vec<AccessListItem>,
}

/// A transaction: tagged union over the three wire variants.
///
/// Signing digests and wire encodings dispatch on the tag, so field sets
/// that are only valid for some variants cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// Legacy transaction
    Legacy(LegacyTx),
    /// EIP-2930 access list transaction
    AccessList(AccessListTx),
    /// EIP-1559 dynamic fee transaction
    DynamicFee(DynamicFeeTx),
}

impl Transaction {
    /// Returns the variant tag.
    pub fn tx_type(&self) -> TxType {
        match self {
            Self::Legacy(_) => TxType::Legacy,
            Self::AccessList(_) => TxType::AccessList,
            Self::DynamicFee(_) => TxType::DynamicFee,
        }
    }

    /// Returns the sender nonce.
    pub fn nonce(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.nonce,
            Self::AccessList(tx) => tx.nonce,
            Self::DynamicFee(tx) => tx.nonce,
        }
    }

    /// Returns the recipient, `None` meaning contract creation.
    pub fn to(&self) -> Option<Address> {
        match self {
            Self::Legacy(tx) => tx.to,
            Self::AccessList(tx) => tx.to,
            Self::DynamicFee(tx) => tx.to,
        }
    }

    /// Returns the value transferred in wei.
    pub fn value(&self) -> U256 {
        match self {
            Self::Legacy(tx) => tx.value,
            Self::AccessList(tx) => tx.value,
            Self::DynamicFee(tx) => tx.value,
        }
    }

    /// Returns the input data.
    pub fn data(&self) -> &Bytes {
        match self {
            Self::Legacy(tx) => &tx.data,
            Self::AccessList(tx) => &tx.data,
            Self::DynamicFee(tx) => &tx.data,
        }
    }

    /// Returns the gas limit.
    pub fn gas_limit(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.gas_limit,
            Self::AccessList(tx) => tx.gas_limit,
            Self::DynamicFee(tx) => tx.gas_limit,
        }
    }

    /// Returns the chain id, if set.
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            Self::Legacy(tx) => tx.chain_id,
            Self::AccessList(tx) => Some(tx.chain_id),
            Self::DynamicFee(tx) => Some(tx.chain_id),
        }
    }

    /// Checks if this is a contract creation transaction.
    pub fn is_create(&self) -> bool {
        self.to().is_none()
    }

    /// Returns the digest to sign for this transaction.
    ///
    /// - Legacy without chain id: `keccak256(rlp([nonce, gas_price, gas, to, value, data]))`
    /// - Legacy with chain id (EIP-155): the 9-item list with `chain_id, 0, 0` appended
    /// - Typed: `keccak256(type_byte || rlp(fields))`, signature excluded
    pub fn signing_hash(&self) -> H256 {
        match self {
            Self::Legacy(tx) => {
                let mut s = RlpStream::new();
                match tx.chain_id {
                    Some(chain_id) => {
                        s.begin_list(9);
                        append_legacy_body(&mut s, tx);
                        s.append(&chain_id);
                        s.append(&0u8);
                        s.append(&0u8);
                    }
                    None => {
                        s.begin_list(6);
                        append_legacy_body(&mut s, tx);
                    }
                }
                H256::keccak256(&s.out())
            }
            Self::AccessList(tx) => {
                let mut s = RlpStream::new_list(8);
                append_access_list_body(&mut s, tx);
                typed_digest(TxType::AccessList, &s.out())
            }
            Self::DynamicFee(tx) => {
                let mut s = RlpStream::new_list(9);
                append_dynamic_fee_body(&mut s, tx);
                typed_digest(TxType::DynamicFee, &s.out())
            }
        }
    }

    /// Attaches a signature, producing a [`SignedTransaction`].
    ///
    /// `recovery_id` must be the normalized value (0 or 1); the variant
    /// specific `v` offset is applied here. Signing is not idempotent:
    /// a prior signature is simply replaced by signing again.
    pub fn into_signed(self, r: H256, s: H256, recovery_id: u8) -> SignedTransaction {
        let v = match &self {
            Self::Legacy(tx) => match tx.chain_id {
                Some(chain_id) => chain_id * 2 + 35 + recovery_id as u64,
                None => 27 + recovery_id as u64,
            },
            Self::AccessList(_) | Self::DynamicFee(_) => recovery_id as u64,
        };
        SignedTransaction {
            transaction: self,
            signature: Signature::new(v, r, s),
        }
    }
}

/// A transaction carrying a signature, ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The transaction fields
    pub transaction: Transaction,
    /// The attached signature
    pub signature: Signature,
}

impl SignedTransaction {
    /// Serializes the signed transaction to its broadcast wire format.
    ///
    /// Legacy transactions encode as a 9-item RLP list; typed transactions
    /// as `type_byte || rlp(fields || [v, r, s])` with `v` the raw recovery
    /// id. Integers use the minimal big-endian form (zero is the empty
    /// string) and an absent recipient encodes as an empty byte string.
    pub fn rlp_encode(&self) -> Vec<u8> {
        match &self.transaction {
            Transaction::Legacy(tx) => {
                let mut s = RlpStream::new_list(9);
                append_legacy_body(&mut s, tx);
                append_signature(&mut s, &self.signature);
                s.out().to_vec()
            }
            Transaction::AccessList(tx) => {
                let mut s = RlpStream::new_list(11);
                append_access_list_body(&mut s, tx);
                append_signature(&mut s, &self.signature);
                prefix_type(TxType::AccessList, &s.out())
            }
            Transaction::DynamicFee(tx) => {
                let mut s = RlpStream::new_list(12);
                append_dynamic_fee_body(&mut s, tx);
                append_signature(&mut s, &self.signature);
                prefix_type(TxType::DynamicFee, &s.out())
            }
        }
    }

    /// Decodes a signed transaction from its broadcast wire format.
    ///
    /// Dispatches on the leading byte: `>= 0xc0` is a legacy RLP list,
    /// `0x01`/`0x02` are typed envelopes.
    pub fn rlp_decode(data: &[u8]) -> Result<Self> {
        let first = *data
            .first()
            .ok_or_else(|| Error::InvalidTransaction("empty transaction data".into()))?;

        if first >= 0xc0 {
            return Self::decode_legacy(data);
        }

        match TxType::from_byte(first)? {
            TxType::AccessList => Self::decode_access_list(&data[1..]),
            TxType::DynamicFee => Self::decode_dynamic_fee(&data[1..]),
            TxType::Legacy => Err(Error::InvalidTransaction(
                "type byte 0x00 is not a valid envelope".into(),
            )),
        }
    }

    /// Returns the transaction hash: keccak256 of the broadcast bytes.
    pub fn hash(&self) -> H256 {
        H256::keccak256(&self.rlp_encode())
    }

    /// Recovers the sender address from the signature.
    pub fn sender(&self) -> Result<Address> {
        let digest = self.transaction.signing_hash();

        let mut sig_bytes = [0u8; 64];
        sig_bytes[0..32].copy_from_slice(self.signature.r.as_bytes());
        sig_bytes[32..64].copy_from_slice(self.signature.s.as_bytes());

        let signature = K256Signature::from_bytes((&sig_bytes).into())
            .map_err(|e| Error::Signature(e.to_string()))?;

        let recovery_id = RecoveryId::from_byte(self.signature.recovery_id())
            .ok_or_else(|| Error::Signature("invalid recovery id".into()))?;

        let verifying_key =
            VerifyingKey::recover_from_prehash(digest.as_bytes(), &signature, recovery_id)
                .map_err(|e| Error::Signature(e.to_string()))?;

        let point = verifying_key.to_encoded_point(false);
        Ok(Address::from_public_key(&point.as_bytes()[1..]))
    }

    fn decode_legacy(data: &[u8]) -> Result<Self> {
        let rlp = Rlp::new(data);
        if rlp.item_count()? != 9 {
            return Err(Error::InvalidTransaction("invalid RLP item count".into()));
        }

        let v: u64 = rlp.val_at(6)?;
        let chain_id = if v == 27 || v == 28 {
            None
        } else if v >= 35 {
            Some((v - 35) / 2)
        } else {
            return Err(Error::InvalidTransaction(format!("invalid v value: {}", v)));
        };

        let transaction = Transaction::Legacy(LegacyTx {
            chain_id,
            nonce: rlp.val_at(0)?,
            gas_price: rlp.val_at(1)?,
            gas_limit: rlp.val_at(2)?,
            to: decode_to(&rlp, 3)?,
            value: decode_u256(&rlp, 4)?,
            data: Bytes::from(rlp.val_at::<Vec<u8>>(5)?),
        });

        let signature = Signature::new(v, decode_int_h256(&rlp, 7)?, decode_int_h256(&rlp, 8)?);
        Ok(Self {
            transaction,
            signature,
        })
    }

    fn decode_access_list(payload: &[u8]) -> Result<Self> {
        let rlp = Rlp::new(payload);
        if rlp.item_count()? != 11 {
            return Err(Error::InvalidTransaction("invalid RLP item count".into()));
        }

        let transaction = Transaction::AccessList(AccessListTx {
            chain_id: rlp.val_at(0)?,
            nonce: rlp.val_at(1)?,
            gas_price: rlp.val_at(2)?,
            gas_limit: rlp.val_at(3)?,
            to: decode_to(&rlp, 4)?,
            value: decode_u256(&rlp, 5)?,
            data: Bytes::from(rlp.val_at::<Vec<u8>>(6)?),
            access_list: rlp.list_at(7)?,
        });

        let signature = Signature::new(
            rlp.val_at(8)?,
            decode_int_h256(&rlp, 9)?,
            decode_int_h256(&rlp, 10)?,
        );
        Ok(Self {
            transaction,
            signature,
        })
    }

    fn decode_dynamic_fee(payload: &[u8]) -> Result<Self> {
        let rlp = Rlp::new(payload);
        if rlp.item_count()? != 12 {
            return Err(Error::InvalidTransaction("invalid RLP item count".into()));
        }

        let transaction = Transaction::DynamicFee(DynamicFeeTx {
            chain_id: rlp.val_at(0)?,
            nonce: rlp.val_at(1)?,
            max_priority_fee_per_gas: rlp.val_at(2)?,
            max_fee_per_gas: rlp.val_at(3)?,
            gas_limit: rlp.val_at(4)?,
            to: decode_to(&rlp, 5)?,
            value: decode_u256(&rlp, 6)?,
            data: Bytes::from(rlp.val_at::<Vec<u8>>(7)?),
            access_list: rlp.list_at(8)?,
        });

        let signature = Signature::new(
            rlp.val_at(9)?,
            decode_int_h256(&rlp, 10)?,
            decode_int_h256(&rlp, 11)?,
        );
        Ok(Self {
            transaction,
            signature,
        })
    }
}

impl fmt::Display for SignedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tx {{ hash: {}, nonce: {}, to: {} }}",
            self.hash(),
            self.transaction.nonce(),
            self.transaction
                .to()
                .map(|a| a.to_string())
                .unwrap_or_else(|| "CREATE".to_string()),
        )
    }
}

// ============================================================================
// RLP helpers
// ============================================================================

fn append_legacy_body(s: &mut RlpStream, tx: &LegacyTx) {
    s.append(&tx.nonce);
    s.append(&tx.gas_price);
    s.append(&tx.gas_limit);
    append_to(s, &tx.to);
    append_u256(s, &tx.value);
    s.append(&tx.data.as_ref());
}

fn append_access_list_body(s: &mut RlpStream, tx: &AccessListTx) {
    s.append(&tx.chain_id);
    s.append(&tx.nonce);
    s.append(&tx.gas_price);
    s.append(&tx.gas_limit);
    append_to(s, &tx.to);
    append_u256(s, &tx.value);
    s.append(&tx.data.as_ref());
    append_access_list(s, &tx.access_list);
}

fn append_dynamic_fee_body(s: &mut RlpStream, tx: &DynamicFeeTx) {
    s.append(&tx.chain_id);
    s.append(&tx.nonce);
    s.append(&tx.max_priority_fee_per_gas);
    s.append(&tx.max_fee_per_gas);
    s.append(&tx.gas_limit);
    append_to(s, &tx.to);
    append_u256(s, &tx.value);
    s.append(&tx.data.as_ref());
    append_access_list(s, &tx.access_list);
}

fn append_to(s: &mut RlpStream, to: &Option<Address>) {
    match to {
        Some(addr) => s.append(addr),
        // contract creation: empty byte string
        None => s.append_empty_data(),
    };
}

fn append_access_list(s: &mut RlpStream, list: &[AccessListItem]) {
    s.begin_list(list.len());
    for item in list {
        s.append(item);
    }
}

fn append_u256(s: &mut RlpStream, v: &U256) {
    let bytes = v.to_be_bytes_trimmed_vec();
    s.append(&bytes.as_slice());
}

// r and s are integers on the wire: leading zero bytes are stripped.
fn append_signature(s: &mut RlpStream, sig: &Signature) {
    s.append(&sig.v);
    append_int_h256(s, &sig.r);
    append_int_h256(s, &sig.s);
}

fn append_int_h256(s: &mut RlpStream, v: &H256) {
    let bytes = v.as_bytes();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    s.append(&&bytes[start..]);
}

fn typed_digest(ty: TxType, payload: &[u8]) -> H256 {
    H256::keccak256_concat(&[&[ty.as_byte()], payload])
}

fn prefix_type(ty: TxType, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + payload.len());
    out.push(ty.as_byte());
    out.extend_from_slice(payload);
    out
}

fn decode_to(rlp: &Rlp<'_>, index: usize) -> Result<Option<Address>> {
    let bytes: Vec<u8> = rlp.val_at(index)?;
    if bytes.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Address::from_slice(&bytes)?))
    }
}

fn decode_u256(rlp: &Rlp<'_>, index: usize) -> Result<U256> {
    let bytes: Vec<u8> = rlp.val_at(index)?;
    U256::try_from_be_slice(&bytes)
        .ok_or_else(|| Error::InvalidTransaction("integer field exceeds 256 bits".into()))
}

fn decode_int_h256(rlp: &Rlp<'_>, index: usize) -> Result<H256> {
    let bytes: Vec<u8> = rlp.val_at(index)?;
    if bytes.len() > 32 {
        return Err(Error::InvalidTransaction(
            "signature component exceeds 32 bytes".into(),
        ));
    }
    let mut arr = [0u8; 32];
    arr[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(H256::new(arr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eip155_v_encoding() {
        let tx = Transaction::Legacy(LegacyTx {
            chain_id: Some(5),
            ..Default::default()
        });
        let signed = tx.into_signed(H256::ZERO, H256::ZERO, 1);
        assert_eq!(signed.signature.v, 5 * 2 + 35 + 1);
        assert_eq!(signed.signature.v, 46);
        assert_eq!(signed.signature.recovery_id(), 1);
    }

    #[test]
    fn test_pre_eip155_v_encoding() {
        let tx = Transaction::Legacy(LegacyTx::default());
        let signed = tx.into_signed(H256::ZERO, H256::ZERO, 0);
        assert_eq!(signed.signature.v, 27);
        assert_eq!(signed.signature.recovery_id(), 0);
    }

    #[test]
    fn test_typed_v_is_raw_recovery_id() {
        let tx = Transaction::DynamicFee(DynamicFeeTx {
            chain_id: 1,
            ..Default::default()
        });
        let signed = tx.into_signed(H256::ZERO, H256::ZERO, 1);
        assert_eq!(signed.signature.v, 1);
    }

    #[test]
    fn test_signing_hash_changes_with_chain_id() {
        let without = Transaction::Legacy(LegacyTx::default());
        let with = Transaction::Legacy(LegacyTx {
            chain_id: Some(1),
            ..Default::default()
        });
        assert_ne!(without.signing_hash(), with.signing_hash());
    }

    #[test]
    fn test_signing_hash_deterministic() {
        let tx = Transaction::DynamicFee(DynamicFeeTx {
            chain_id: 1,
            nonce: 7,
            max_priority_fee_per_gas: 1_000_000_000,
            max_fee_per_gas: 2_000_000_000,
            gas_limit: 21_000,
            to: Some(Address::ZERO),
            value: U256::from(1000u64),
            ..Default::default()
        });
        assert_eq!(tx.signing_hash(), tx.signing_hash());
    }
}
