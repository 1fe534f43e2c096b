//! # Participant Identities
//!
//! Market owners and bidders are identified by BIP-340 x-only secp256k1 public
//! keys, carried around as 64-character lowercase hex.

use crate::{error::Result, MarketError};
use secp256k1::{Secp256k1, SecretKey, XOnlyPublicKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identity of a market owner or participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(XOnlyPublicKey);

impl Identity {
    /// Wrap an existing x-only public key.
    pub fn new(key: XOnlyPublicKey) -> Self {
        Self(key)
    }

    /// Parse a 32-byte hex-encoded x-only public key.
    pub fn from_hex(hex_key: &str) -> Result<Self> {
        let bytes = hex::decode(hex_key)?;
        if bytes.len() != 32 {
            return Err(MarketError::InvalidIdentity(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(XOnlyPublicKey::from_slice(&bytes)?))
    }

    /// Derive a deterministic identity from a one-byte seed.
    ///
    /// The secret key is `seed` in the first and last byte and zero elsewhere,
    /// which makes scenario files and tests reproducible. Seed `0` is rejected
    /// since the all-zero scalar is not a valid secret key.
    pub fn from_seed(seed: u8) -> Result<Self> {
        let mut secret_bytes = [0u8; 32];
        secret_bytes[0] = seed;
        secret_bytes[31] = seed;
        let secret_key = SecretKey::from_slice(&secret_bytes)?;
        let secp = Secp256k1::new();
        let (public_key, _parity) = secret_key.x_only_public_key(&secp);
        Ok(Self(public_key))
    }

    /// Raw 32-byte key.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.serialize()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// First eight hex characters, for log lines and tables.
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(8);
        hex
    }

    pub fn as_key(&self) -> &XOnlyPublicKey {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Identity {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s.trim())
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let hex_key = String::deserialize(deserializer)?;
        Self::from_hex(&hex_key).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_identities_are_deterministic() {
        let a = Identity::from_seed(1).unwrap();
        let b = Identity::from_seed(1).unwrap();
        let c = Identity::from_seed(2).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_zero_seed_rejected() {
        assert!(Identity::from_seed(0).is_err());
    }

    #[test]
    fn test_hex_roundtrip_through_display() {
        let id = Identity::from_seed(7).unwrap();
        let hex = id.to_string();
        assert_eq!(hex.len(), 64);
        assert_eq!(hex.parse::<Identity>().unwrap(), id);
        assert_eq!(id.short(), hex[..8]);
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert!(Identity::from_hex("not-hex").is_err());
        assert!(Identity::from_hex("abcd").is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let id = Identity::from_seed(3).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.to_hex()));
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
