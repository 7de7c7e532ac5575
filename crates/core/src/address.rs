//! Address - 32-byte account and object identifiers
//!
//! Accounts, asset classes and stores all live in the same address space.
//! Object addresses are derived deterministically from their creator:
//!
//! ```text
//! object_address = sha256(creator || seed || 0xFE)
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Domain separator appended when deriving object addresses
const OBJECT_ADDRESS_SCHEME: u8 = 0xFE;

/// Errors that can occur when parsing addresses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Empty address")]
    Empty,

    #[error("Address too long (max 64 hex chars): {0}")]
    TooLong(String),

    #[error("Invalid hex in address: {0}")]
    InvalidHex(String),
}

/// A 32-byte address.
///
/// Rendered as `0x` followed by 64 lowercase hex characters. Short forms
/// such as `0x1` are accepted when parsing and left-padded with zeros.
///
/// # Example
/// ```
/// use dasset_core::Address;
///
/// let one: Address = "0x1".parse().unwrap();
/// assert_eq!(one, Address::from_u64(1));
/// assert!(one.to_string().ends_with("01"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 32]);

impl Address {
    /// Length of an address in bytes
    pub const LENGTH: usize = 32;

    /// The all-zero address
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create an address from raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create an address whose low 8 bytes hold `value` (big-endian)
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Raw bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive a named object address owned by `creator`
    pub fn derive_object(creator: &Address, seed: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(creator.as_bytes());
        hasher.update(seed);
        hasher.update([OBJECT_ADDRESS_SCHEME]);
        Self(hasher.finalize().into())
    }

    /// Lowercase hex without the `0x` prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Shortened form for logs, e.g. `0x1a2b..9f0e`
    pub fn short(&self) -> String {
        let hex = self.to_hex();
        format!("0x{}..{}", &hex[..4], &hex[60..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.is_empty() {
            return Err(AddressError::Empty);
        }

        if digits.len() > Self::LENGTH * 2 {
            return Err(AddressError::TooLong(s.to_string()));
        }

        // Pad to an even 64-digit string so hex::decode sees whole bytes
        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|_| AddressError::InvalidHex(s.to_string()))?;

        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

/// Identity of an asset class (the address of its metadata object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetClass(Address);

impl AssetClass {
    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    #[inline]
    pub const fn address(&self) -> Address {
        self.0
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a store (an account-scoped holding of one asset class)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(Address);

impl StoreId {
    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    /// Deterministic store address for `owner` holding `class`
    pub fn derive(owner: &Address, class: &AssetClass, nonce: u64) -> Self {
        let mut seed = Vec::with_capacity(Address::LENGTH + 8);
        seed.extend_from_slice(class.address().as_bytes());
        seed.extend_from_slice(&nonce.to_be_bytes());
        Self(Address::derive_object(owner, &seed))
    }

    #[inline]
    pub const fn address(&self) -> Address {
        self.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
