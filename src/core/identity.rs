/*
 * Canonical identity for directories and views. The backend hands identities
 * over the wire either as a raw 16-byte sequence or as a string encoding;
 * both are normalized into a single `DirectoryId` at construction time so
 * equality and hashing never depend on the representation that happened to
 * arrive. All registry keys and lookups use this type.
 */
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug)]
pub enum IdentityError {
    MalformedString(String),
    WrongLength(usize),
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::MalformedString(s) => {
                write!(f, "Malformed identity string: '{s}'")
            }
            IdentityError::WrongLength(n) => {
                write!(f, "Identity byte sequence has length {n}, expected 16")
            }
        }
    }
}

impl std::error::Error for IdentityError {}

/*
 * A directory identity. Views share the same identity space (a view is
 * addressed by the UUID it was created with, not by its directory), hence
 * the `ViewId` alias below.
 */
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct DirectoryId(Uuid);

pub type ViewId = DirectoryId;

impl DirectoryId {
    pub fn new_v4() -> Self {
        DirectoryId(Uuid::new_v4())
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        DirectoryId(Uuid::from_bytes(bytes))
    }

    /*
     * Builds an identity from a raw byte slice, as delivered by backends
     * that serialize UUIDs as byte arrays. A slice of any length other
     * than 16 is a programmer error on the caller's side and is rejected.
     */
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdentityError> {
        Uuid::from_slice(bytes)
            .map(DirectoryId)
            .map_err(|_| IdentityError::WrongLength(bytes.len()))
    }

    /*
     * Parses a string-encoded identity. Both the hyphenated and the simple
     * (32 hex digit) encodings are accepted; the stored form is canonical
     * regardless, so an id parsed from a string compares equal to the same
     * id built from raw bytes.
     */
    pub fn parse(s: &str) -> Result<Self, IdentityError> {
        Uuid::parse_str(s)
            .map(DirectoryId)
            .map_err(|_| IdentityError::MalformedString(s.to_string()))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl fmt::Display for DirectoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_and_string_representations_compare_equal() {
        // Arrange: the same UUID, once as raw bytes and once as a string.
        let raw: [u8; 16] = [
            0x67, 0xe5, 0x50, 0x44, 0x10, 0xb1, 0x42, 0x6f, 0x92, 0x47, 0xbb, 0x68, 0x0e, 0x5f,
            0xe0, 0xc8,
        ];
        let from_bytes = DirectoryId::from_bytes(raw);
        let from_string = DirectoryId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let from_simple = DirectoryId::parse("67e5504410b1426f9247bb680e5fe0c8").unwrap();

        // Assert
        assert_eq!(from_bytes, from_string);
        assert_eq!(from_bytes, from_simple);
        assert_eq!(from_bytes.as_bytes(), &raw);
    }

    #[test]
    fn test_from_slice_rejects_wrong_length() {
        let err = DirectoryId::from_slice(&[1, 2, 3]).unwrap_err();
        match err {
            IdentityError::WrongLength(3) => {}
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DirectoryId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_new_v4_ids_are_distinct() {
        assert_ne!(DirectoryId::new_v4(), DirectoryId::new_v4());
    }

    #[test]
    fn test_serde_round_trip_is_transparent() {
        let id = DirectoryId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"67e55044-10b1-426f-9247-bb680e5fe0c8\"");
        let back: DirectoryId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
