use std::fmt;

/// BLAKE3 fingerprint of captured map content.
///
/// Equal content always fingerprints the same, so the ledger can check a
/// restore without keeping a second copy of the state.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    pub fn from_bytes(data: &[u8]) -> Self {
        blake3::hash(data).into()
    }

    /// Raw digest bytes, for feeding into an outer hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First four bytes in hex, for logs and one-line listings.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl From<blake3::Hash> for Digest {
    fn from(hash: blake3::Hash) -> Self {
        Self(*hash.as_bytes())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Digest").field(&self.short_hex()).finish()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_same_digest() {
        assert_eq!(Digest::from_bytes(b"tile"), Digest::from_bytes(b"tile"));
        assert_ne!(Digest::from_bytes(b"tile"), Digest::from_bytes(b"turf"));
    }

    #[test]
    fn hex_forms() {
        let digest = Digest::from_bytes(b"area");
        assert_eq!(digest.to_hex().len(), 64);
        assert!(digest.to_hex().starts_with(&digest.short_hex()));
        assert_eq!(digest.to_string(), digest.to_hex());
    }

    #[test]
    fn matches_blake3() {
        let hash = blake3::hash(b"floor");
        assert_eq!(Digest::from(hash).as_bytes(), hash.as_bytes());
    }
}
