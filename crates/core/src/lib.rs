//! Dasset Core - Domain types
//!
//! This crate contains the fundamental types used across Dasset:
//! - `Address`: 32-byte account/object address
//! - `AssetClass`: Identity of a fungible asset's metadata object
//! - `StoreId`: Identity of an account-scoped balance holding
//! - `AssetSymbol`: Validated ticker symbol for an asset class

pub mod address;
pub mod symbol;

pub use address::{Address, AddressError, AssetClass, StoreId};
pub use symbol::{AssetSymbol, SymbolError};
