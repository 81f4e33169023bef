//! Domain-separated BLAKE3 hashing.
//!
//! ## Modes
//!
//! - [`hash`] — Pure hashing, used for Merkle leaves (with a `0x00` prefix)
//! - [`derive_key`] — Key derivation from a registered context string
//! - [`keyed_hash`] — Keyed MAC, used for Merkle inner nodes
//!
//! ## Merkle nodes
//!
//! Inner nodes hash the *sorted* pair of children. Digests are read as
//! 256-bit big-endian integers, so byte-wise ordering of the arrays is the
//! numeric ordering and a verifier never needs to know which side a sibling
//! was on.

use std::sync::OnceLock;

/// Registered BLAKE3 context strings.
/// Using an unregistered context string is a protocol violation.
pub mod contexts {
    pub const MERKLE_INNER_NODE: &str = "Royalty v1 merkle-inner-node";
    pub const SNAPSHOT_DIGEST: &str = "Royalty v1 snapshot-digest";

    /// All registered context strings. Used for validation.
    pub const ALL_CONTEXTS: &[&str] = &[MERKLE_INNER_NODE, SNAPSHOT_DIGEST];
}

/// Compute the BLAKE3 hash of the input data.
pub fn hash(data: &[u8]) -> [u8; 32] {
    *::blake3::hash(data).as_bytes()
}

/// Derive a key using BLAKE3's built-in key derivation mode.
///
/// # Arguments
///
/// * `context` - A registered context string (must start with "Royalty v1 ")
/// * `key_material` - The input key material
pub fn derive_key(context: &str, key_material: &[u8]) -> [u8; 32] {
    let mut hasher = ::blake3::Hasher::new_derive_key(context);
    hasher.update(key_material);
    *hasher.finalize().as_bytes()
}

/// Compute a keyed BLAKE3 hash (MAC/PRF).
pub fn keyed_hash(key: &[u8; 32], message: &[u8]) -> [u8; 32] {
    *::blake3::keyed_hash(key, message).as_bytes()
}

/// Verify that a context string is registered.
pub fn is_registered_context(context: &str) -> bool {
    contexts::ALL_CONTEXTS.contains(&context)
}

/// Compute a Merkle tree leaf hash with domain separation.
///
/// Leaf nodes use `BLAKE3::hash(0x00 || data)` to prevent second-preimage attacks.
pub fn merkle_leaf(data: &[u8]) -> [u8; 32] {
    let mut input = Vec::with_capacity(1 + data.len());
    input.push(0x00);
    input.extend_from_slice(data);
    hash(&input)
}

fn inner_key() -> &'static [u8; 32] {
    static K_INNER: OnceLock<[u8; 32]> = OnceLock::new();
    K_INNER.get_or_init(|| derive_key(contexts::MERKLE_INNER_NODE, b""))
}

/// Compute a Merkle inner node over an unordered pair of children.
///
/// `BLAKE3::keyed_hash(K_inner, lo || hi)` where `lo <= hi` and
/// `K_inner = BLAKE3::derive_key("Royalty v1 merkle-inner-node", "")`.
pub fn merkle_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut message = [0u8; 64];
    message[..32].copy_from_slice(lo);
    message[32..].copy_from_slice(hi);
    keyed_hash(inner_key(), &message)
}
