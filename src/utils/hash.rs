//! Content hashing utilities.

use xxhash_rust::xxh3::xxh3_64;

const FNV1A_OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;
const FNV1A_PRIME: u64 = 1_099_511_628_211;

/// Compute a content hash for arbitrary bytes
pub fn content_hash(data: &[u8]) -> u64 {
    xxh3_64(data)
}

/// 64-bit FNV-1a over the bytes of `s`.
///
/// Not cryptographic. Used for identifiers, which must stay stable across
/// releases, so the algorithm and constants are fixed.
#[must_use]
pub fn fnv1a64(s: &str) -> u64 {
    s.bytes().fold(FNV1A_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV1A_PRIME)
    })
}

/// Format a `u64` as 16 lowercase hex digits.
#[must_use]
pub fn hex_u64(value: u64) -> String {
    format!("{value:016x}")
}
