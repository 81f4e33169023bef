//! 256-bit digests.
//!
//! A [`Hash256`] is a BLAKE3 output read as an unsigned 256-bit big-endian
//! integer. Deriving `Ord` on the byte array therefore gives numeric order,
//! which is what the sorted-pair Merkle hash relies on.

use std::fmt;
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{Result, TypesError};

/// A 256-bit digest / unsigned integer, big-endian.
#[derive(
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// The zero value. Used as the root of an empty tree.
    pub const ZERO: Hash256 = Hash256([0u8; 32]);

    /// Wrap raw digest bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Borrow the big-endian bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether this is the zero value.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({self})")
    }
}

impl FromStr for Hash256 {
    type Err = TypesError;

    /// Parse hex with an optional `0x` prefix. Shorter values are
    /// left-padded, so `"0x1f"` is the integer 31.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() {
            return Err(TypesError::InvalidHash("empty value".to_string()));
        }

        let significant = digits.trim_start_matches('0');
        if significant.len() > 64 {
            return Err(TypesError::InvalidHash(format!(
                "{} hex digits exceed 256 bits",
                significant.len()
            )));
        }

        let padded = format!("{significant:0>64}");
        let mut out = [0u8; 32];
        hex::decode_to_slice(&padded, &mut out)
            .map_err(|e| TypesError::InvalidHash(format!("{s:?}: {e}")))?;
        Ok(Self(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_fixed_width() {
        let text = Hash256::ZERO.to_string();
        assert_eq!(text.len(), 66);
        assert!(text.starts_with("0x"));
    }

    #[test]
    fn test_parse_short_value() {
        let h: Hash256 = "0x1f".parse().expect("parse");
        let mut expected = [0u8; 32];
        expected[31] = 0x1f;
        assert_eq!(h, Hash256(expected));

        let odd: Hash256 = "abc".parse().expect("parse");
        assert_eq!(odd.0[30], 0x0a);
        assert_eq!(odd.0[31], 0xbc);
    }

    #[test]
    fn test_parse_round_trip() {
        let h = Hash256(royalty_crypto::blake3::hash(b"root"));
        let parsed: Hash256 = h.to_string().parse().expect("parse");
        assert_eq!(parsed, h);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Hash256>().is_err());
        assert!("0x".parse::<Hash256>().is_err());
        assert!("0xnothex".parse::<Hash256>().is_err());
        assert!(format!("0x1{}", "0".repeat(64)).parse::<Hash256>().is_err());
    }

    #[test]
    fn test_numeric_ordering() {
        let small: Hash256 = "0xff".parse().expect("parse");
        let large: Hash256 = "0x100".parse().expect("parse");
        assert!(small < large);
        assert!(Hash256::ZERO < small);
    }

    #[test]
    fn test_is_zero() {
        assert!(Hash256::ZERO.is_zero());
        assert!(Hash256::default().is_zero());
        assert!(!Hash256([1u8; 32]).is_zero());
    }
}
