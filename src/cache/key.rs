//! Key Derivation Module
//!
//! Maps caller-supplied logical keys to the internal keys used by the store.
//!
//! Two distinct logical keys that hash to the same value share one internal
//! key and overwrite each other. Collisions are not detected.

/// Prefix applied to every internal key.
pub const INTERNAL_KEY_PREFIX: &str = "Key";

// == Hash ==
/// Computes a 32-bit signed hash of a string.
///
/// Iterates over the UTF-16 code units of `input`, folding each one in as
/// `hash * 31 + unit` with wrapping arithmetic. The empty string hashes to 0.
pub fn hash32(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit))
        })
}

// == Derive Key ==
/// Derives the internal storage key for a logical key.
pub fn derive_key(logical_key: &str) -> String {
    format!("{}{}", INTERNAL_KEY_PREFIX, hash32(logical_key))
}
