// src/models/id.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Storage-assigned opaque identifier.
///
/// Twelve bytes rendered as 24 hex characters. Only the 24-hex form parses;
/// every other string is treated as a human-readable name or slug by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("\"{0}\" is not a valid identifier")]
pub struct IdError(pub String);

impl ObjectId {
    /// Generates a fresh identifier: unix seconds (big endian) followed by random bytes.
    pub fn new() -> Self {
        let secs = chrono::Utc::now().timestamp() as u32;
        let random = uuid::Uuid::new_v4();

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..].copy_from_slice(&random.as_bytes()[..8]);
        Self(bytes)
    }

    pub fn parse(token: &str) -> Result<Self, IdError> {
        if token.len() != 24 {
            return Err(IdError(token.to_string()));
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(token, &mut bytes).map_err(|_| IdError(token.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn is_valid(token: &str) -> bool {
        Self::parse(token).is_ok()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_24_hex_characters() {
        let id = ObjectId::parse("64b7f0c2a1e3d4f5a6b7c8d9").unwrap();
        assert_eq!(id.to_string(), "64b7f0c2a1e3d4f5a6b7c8d9");

        let upper = ObjectId::parse("64B7F0C2A1E3D4F5A6B7C8D9").unwrap();
        assert_eq!(upper, id);
    }

    #[test]
    fn twelve_character_names_are_not_identifiers() {
        // A 12-byte string is a name here, never a raw binary id.
        assert!(!ObjectId::is_valid("JEE Advanced"));
        assert!(!ObjectId::is_valid("UPSC"));
        assert!(!ObjectId::is_valid(""));
        assert!(!ObjectId::is_valid("64b7f0c2a1e3d4f5a6b7c8dz"));
    }

    #[test]
    fn fresh_ids_are_distinct_and_round_trip() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert_ne!(a, b);
        assert_eq!(ObjectId::parse(&a.to_hex()).unwrap(), a);
    }

    #[test]
    fn serializes_as_hex_string() {
        let id = ObjectId::parse("000000000000000000000001").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"000000000000000000000001\"");
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ObjectId>("\"nope\"").is_err());
    }
}
