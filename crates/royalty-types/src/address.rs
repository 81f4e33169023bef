//! Ledger account addresses.
//!
//! An address is a workchain id plus a 32-byte account id. The canonical
//! text form is the raw form `"<workchain>:<64 lowercase hex>"`, which is
//! also how addresses appear in snapshot and claim files.

use std::fmt;
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{Result, TypesError};

/// Workchain id of ordinary accounts.
pub const BASECHAIN: i8 = 0;

/// An account address on the value-transfer ledger.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct Address {
    /// Workchain id.
    pub workchain: i8,
    /// Account id within the workchain.
    pub account: [u8; 32],
}

impl Address {
    /// Create an address from its parts.
    pub const fn new(workchain: i8, account: [u8; 32]) -> Self {
        Self { workchain, account }
    }

    /// Deterministic basechain address derived from a label.
    ///
    /// Handy for fixtures and dry runs; the account id is `BLAKE3(label)`.
    pub fn from_label(label: &str) -> Self {
        Self::new(BASECHAIN, royalty_crypto::blake3::hash(label.as_bytes()))
    }

    /// Fixed-width encoding used inside Merkle leaves: `workchain || account`.
    pub fn to_bytes(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        out[0] = self.workchain.to_be_bytes()[0];
        out[1..].copy_from_slice(&self.account);
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.workchain, hex::encode(self.account))
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (wc, account_hex) = s
            .split_once(':')
            .ok_or_else(|| TypesError::InvalidAddress(format!("missing workchain in {s:?}")))?;

        let workchain: i8 = wc
            .parse()
            .map_err(|_| TypesError::InvalidAddress(format!("bad workchain {wc:?}")))?;

        let bytes = hex::decode(account_hex)
            .map_err(|e| TypesError::InvalidAddress(format!("bad account hex: {e}")))?;
        let account: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            TypesError::InvalidAddress(format!("account must be 32 bytes, got {}", v.len()))
        })?;

        Ok(Self::new(workchain, account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parse() {
        let addr = Address::from_label("h0");
        let text = addr.to_string();
        assert!(text.starts_with("0:"));
        assert_eq!(text.len(), 2 + 64);
        let parsed: Address = text.parse().expect("parse");
        assert_eq!(parsed, addr);
    }

    #[test]
    fn test_masterchain_address() {
        let text = format!("-1:{}", "ab".repeat(32));
        let addr: Address = text.parse().expect("parse");
        assert_eq!(addr.workchain, -1);
        assert_eq!(addr.to_bytes()[0], 0xFF);
        assert_eq!(addr.to_string(), text);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("no-colon".parse::<Address>().is_err());
        assert!("x:00".parse::<Address>().is_err());
        assert!("0:abcd".parse::<Address>().is_err());
        assert!(format!("0:{}", "zz".repeat(32)).parse::<Address>().is_err());
    }

    #[test]
    fn test_serde_uses_raw_form() {
        let addr = Address::from_label("creator");
        let json = serde_json::to_string(&addr).expect("serialize");
        assert_eq!(json, format!("\"{addr}\""));
        let back: Address = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, addr);
    }

    #[test]
    fn test_labels_distinct() {
        assert_ne!(Address::from_label("h0"), Address::from_label("h1"));
    }
}
