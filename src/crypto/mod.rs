//! Hash primitives used by the script crypto opcodes
//!
//! SHA-256, SHA-1, RIPEMD-160 and SHA-512/256 come from the RustCrypto
//! digest crates. BLAKE3 (single-chunk) and KangarooTwelve (single-block)
//! are implemented in this module because the script dialect pins the
//! restricted variants, not the general tree/leaf modes.

pub mod blake3;
pub mod k12;

use ripemd::Ripemd160;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512_256};

pub use blake3::Blake3;
pub use k12::K12;

/// SHA-256
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let digest = Sha256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Double SHA-256 (HASH256)
pub fn hash256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut out = [0u8; 32];
    out.copy_from_slice(&second);
    out
}

/// RIPEMD-160
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let digest = Ripemd160::digest(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest);
    out
}

/// RIPEMD-160 of SHA-256 (HASH160)
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    let digest = Ripemd160::digest(sha);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest);
    out
}

/// SHA-1 (legacy, OP_SHA1)
pub fn sha1(data: &[u8]) -> [u8; 20] {
    let digest = Sha1::digest(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest);
    out
}

/// SHA-512/256
pub fn sha512_256(data: &[u8]) -> [u8; 32] {
    let digest = Sha512_256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Double SHA-512/256 (HASH512_256)
pub fn hash512_256(data: &[u8]) -> [u8; 32] {
    let first = Sha512_256::digest(data);
    let second = Sha512_256::digest(first);
    let mut out = [0u8; 32];
    out.copy_from_slice(&second);
    out
}

/// BLAKE3 one-shot (single-chunk mode, inputs up to 1024 bytes)
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake3::new();
    hasher.write(data);
    hasher.finalize()
}

/// KangarooTwelve one-shot (single-block mode, inputs up to 8192 bytes)
pub fn k12_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = K12::new();
    hasher.write(data);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_empty() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_abc() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hash256_empty() {
        assert_eq!(
            hex::encode(hash256(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn test_ripemd160_abc() {
        assert_eq!(
            hex::encode(ripemd160(b"abc")),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
    }

    #[test]
    fn test_hash160_length() {
        assert_eq!(hash160(b"hello").len(), 20);
    }

    #[test]
    fn test_sha1_abc() {
        assert_eq!(
            hex::encode(sha1(b"abc")),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_sha512_256_abc() {
        assert_eq!(
            hex::encode(sha512_256(b"abc")),
            "53048e2681941ef99b2e29b76b4c7dabe4c2d0c634fc6d46e0e2f13107e7af23"
        );
    }

    #[test]
    fn test_hash512_256_deterministic() {
        assert_eq!(hash512_256(b"abc"), hash512_256(b"abc"));
        assert_ne!(hash512_256(b"abc"), sha512_256(b"abc"));
    }
}
