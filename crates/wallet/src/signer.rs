//! Recoverable signatures and transaction signing.

use crate::key::Key;
use crate::{Error, Result};
use etherlite_types::{Address, SignedTransaction, Transaction, H256};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};

/// A recoverable ECDSA signature over a 32-byte digest.
///
/// `v` is the normalized recovery id (0 or 1); network-specific offsets are
/// applied when the signature is attached to a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// R component
    pub r: H256,
    /// S component
    pub s: H256,
    /// Recovery id, 0 or 1
    pub v: u8,
}

impl Signature {
    /// Parses a signature from its 65-byte form `r || s || v`.
    ///
    /// A trailing `v` of 27 or 28 is normalized to 0 or 1.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 65 {
            return Err(Error::InvalidLength {
                expected: 65,
                actual: bytes.len(),
            });
        }
        let r = H256::from_slice(&bytes[0..32]).map_err(|e| Error::Signing(e.to_string()))?;
        let s = H256::from_slice(&bytes[32..64]).map_err(|e| Error::Signing(e.to_string()))?;
        let v = match bytes[64] {
            v @ (0 | 1) => v,
            v @ (27 | 28) => v - 27,
            v => return Err(Error::Recovery(format!("invalid recovery id: {}", v))),
        };
        Ok(Self { r, s, v })
    }

    /// Serializes the signature to its 65-byte form `r || s || v`.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[0..32].copy_from_slice(self.r.as_bytes());
        bytes[32..64].copy_from_slice(self.s.as_bytes());
        bytes[64] = self.v;
        bytes
    }

    /// Recovers the signer's address from this signature and the digest it
    /// was produced over.
    pub fn recover_address(&self, digest: &H256) -> Result<Address> {
        let mut sig_bytes = [0u8; 64];
        sig_bytes[0..32].copy_from_slice(self.r.as_bytes());
        sig_bytes[32..64].copy_from_slice(self.s.as_bytes());

        let signature = K256Signature::from_bytes((&sig_bytes).into())
            .map_err(|e| Error::Recovery(e.to_string()))?;
        let recovery_id = RecoveryId::from_byte(self.v)
            .ok_or_else(|| Error::Recovery(format!("invalid recovery id: {}", self.v)))?;

        let verifying_key =
            VerifyingKey::recover_from_prehash(digest.as_bytes(), &signature, recovery_id)
                .map_err(|e| Error::Recovery(e.to_string()))?;

        let point = verifying_key.to_encoded_point(false);
        Ok(Address::from_public_key(&point.as_bytes()[1..]))
    }
}

/// Signs a transaction with the variant-specific digest and `v` encoding.
///
/// The digest covers the chain id where the variant requires one, so the
/// resulting signature is replay-protected. Re-signing an already signed
/// transaction simply replaces the signature.
pub fn sign_transaction(tx: Transaction, key: &dyn Key) -> Result<SignedTransaction> {
    let digest = tx.signing_hash();
    let sig = key.sign_digest(&digest)?;
    Ok(tx.into_signed(sig.r, sig.s, sig.v))
}

/// Hashes a message with the `personal_sign` prefix (EIP-191):
/// `keccak256("\x19Ethereum Signed Message:\n" || len || message)`.
pub fn hash_message(message: &[u8]) -> H256 {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    H256::keccak256_concat(&[prefix.as_bytes(), message])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::PrivateKey;

    #[test]
    fn test_sign_and_recover() {
        let key = PrivateKey::random();
        let digest = hash_message(b"hello");
        let sig = key.sign_digest(&digest).unwrap();
        assert_eq!(sig.recover_address(&digest).unwrap(), key.address());
    }

    #[test]
    fn test_signature_byte_roundtrip() {
        let key = PrivateKey::random();
        let digest = H256::keccak256(b"x");
        let sig = key.sign_digest(&digest).unwrap();
        let restored = Signature::from_bytes(&sig.to_bytes()).unwrap();
        assert_eq!(restored, sig);
    }

    #[test]
    fn test_legacy_v_normalized_on_parse() {
        let key = PrivateKey::random();
        let digest = H256::keccak256(b"x");
        let sig = key.sign_digest(&digest).unwrap();

        let mut bytes = sig.to_bytes();
        bytes[64] += 27;
        let restored = Signature::from_bytes(&bytes).unwrap();
        assert_eq!(restored.v, sig.v);
    }

    #[test]
    fn test_from_bytes_rejects_bad_inputs() {
        assert!(Signature::from_bytes(&[0u8; 64]).is_err());
        let mut bytes = [0u8; 65];
        bytes[64] = 5;
        assert!(Signature::from_bytes(&bytes).is_err());
        // an EIP-155 offset v (chain 1337, truncated to a byte) is not a
        // recovery id and must be rejected rather than reinterpreted
        bytes[64] = 149;
        assert!(Signature::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_hash_message_prefix() {
        // prefix includes the decimal message length
        let a = hash_message(b"abc");
        let b = H256::keccak256(b"\x19Ethereum Signed Message:\n3abc");
        assert_eq!(a, b);
    }
}
