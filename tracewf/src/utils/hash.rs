use std::io::Cursor;

use murmur3::*;

pub fn hash_code(v: &[u8]) -> std::io::Result<u32> {
    let mut cursor = Cursor::new(v);
    murmur3_32(&mut cursor, 0x19264330)
}

/// Stable 64 bit seed derived from a string, for reproducible random draws.
pub fn seed_of(value: &str) -> u64 {
    // reading from an in-memory cursor cannot fail
    hash_code(value.as_bytes()).unwrap_or(0) as u64
}
