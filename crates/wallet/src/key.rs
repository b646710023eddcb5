//! Private keys and the signing capability trait.

use crate::signer::Signature;
use crate::{Error, Result};
use etherlite_types::{Address, H256};
use k256::ecdsa::SigningKey;
use k256::SecretKey;
use rand::rngs::OsRng;

/// The signing capability consumed by the contract client.
///
/// Anything that can produce a recoverable signature over a 32-byte digest
/// satisfies it: a local [`PrivateKey`], a hardware wallet, a remote
/// signing service.
pub trait Key: Send + Sync {
    /// The address transactions signed by this key are sent from.
    fn address(&self) -> Address;

    /// Signs a 32-byte digest, returning a recoverable signature with the
    /// recovery id normalized to 0 or 1.
    fn sign_digest(&self, digest: &H256) -> Result<Signature>;
}

/// A secp256k1 private key with its derived address.
///
/// Signing is deterministic (RFC 6979): the same key and digest always
/// produce the same signature. The secret scalar never leaves the type
/// except through the explicit [`PrivateKey::export_bytes`] call, and the
/// `Debug` impl prints only the derived address.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
    address: Address,
}

impl PrivateKey {
    /// Generates a random private key using the OS secure RNG.
    pub fn random() -> Self {
        Self::from_signing_key(SigningKey::from(SecretKey::random(&mut OsRng)))
    }

    /// Creates a private key from its 32 raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are zero or not below the curve order.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self> {
        let secret = SecretKey::from_bytes(bytes.into())
            .map_err(|e| Error::InvalidKey(e.to_string()))?;
        Ok(Self::from_signing_key(SigningKey::from(secret)))
    }

    /// Creates a private key from a hex string, with or without the `0x`
    /// prefix.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let bytes = hex::decode(hex)?;
        if bytes.len() != 32 {
            return Err(Error::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Self::from_bytes(&arr)
    }

    fn from_signing_key(inner: SigningKey) -> Self {
        let point = inner.verifying_key().to_encoded_point(false);
        let address = Address::from_public_key(&point.as_bytes()[1..]);
        Self { inner, address }
    }

    /// Exports the raw secret bytes.
    ///
    /// This is the explicit opt-in escape hatch; nothing else in the crate
    /// serializes the secret scalar.
    pub fn export_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes().into()
    }

    /// The address this key signs from. Inherent mirror of [`Key::address`]
    /// so callers don't need the trait in scope.
    pub fn address(&self) -> Address {
        self.address
    }
}

impl Key for PrivateKey {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_digest(&self, digest: &H256) -> Result<Signature> {
        let (sig, recovery_id) = self
            .inner
            .sign_prehash_recoverable(digest.as_bytes())
            .map_err(|e| Error::Signing(e.to_string()))?;

        let r: [u8; 32] = sig.r().to_bytes().into();
        let s: [u8; 32] = sig.s().to_bytes().into();
        Ok(Signature {
            r: H256::new(r),
            s: H256::new(s),
            v: recovery_id.to_byte(),
        })
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("address", &self.address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_key_address() {
        // the EIP-155 example key
        let key = PrivateKey::from_hex(
            "0x4646464646464646464646464646464646464646464646464646464646464646",
        )
        .unwrap();
        let expected: Address = "0x9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F".parse().unwrap();
        assert_eq!(key.address(), expected);
    }

    #[test]
    fn test_from_bytes_rejects_zero() {
        assert!(PrivateKey::from_bytes(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_from_hex_rejects_short_input() {
        assert!(matches!(
            PrivateKey::from_hex("0xabcd"),
            Err(Error::InvalidLength { expected: 32, .. }),
        ));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let key = PrivateKey::random();
        let digest = H256::keccak256(b"payload");
        let a = key.sign_digest(&digest).unwrap();
        let b = key.sign_digest(&digest).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = PrivateKey::from_hex(
            "4646464646464646464646464646464646464646464646464646464646464646",
        )
        .unwrap();
        let debug = format!("{:?}", key);
        assert!(!debug.contains("4646"));
    }

    #[test]
    fn test_export_roundtrip() {
        let key = PrivateKey::random();
        let restored = PrivateKey::from_bytes(&key.export_bytes()).unwrap();
        assert_eq!(key.address(), restored.address());
    }
}
