use crate::error::CryptoError;

/// BLAKE3 digest (32 bytes).
pub type Digest = [u8; 32];

/// Hash arbitrary data using BLAKE3.
pub fn hash(data: &[u8]) -> Digest {
    *blake3::hash(data).as_bytes()
}

/// Encode a digest as a 64-character hex string.
pub fn digest_to_hex(digest: &Digest) -> String {
    hex::encode(digest)
}

/// Decode a 64-character hex string into a digest.
pub fn digest_from_hex(s: &str) -> Result<Digest, CryptoError> {
    let bytes =
        hex::decode(s).map_err(|e| CryptoError::InvalidInput(format!("invalid hex: {}", e)))?;
    bytes.as_slice().try_into().map_err(|_| {
        CryptoError::InvalidInput(format!("digest must be 32 bytes, got {}", bytes.len()))
    })
}
