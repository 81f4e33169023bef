//! # royalty-crypto
//!
//! Hashing primitives for royalty distribution.
//!
//! The suite is fixed: every digest in the system is BLAKE3, with leaf and
//! inner Merkle nodes separated by BLAKE3's own mode flags.
//!
//! ## Modules
//!
//! - [`blake3`] — Domain-separated BLAKE3 hashing and Merkle node hashes

pub mod blake3;
