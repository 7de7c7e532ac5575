//! Dasset Ledger - Fungible asset bookkeeping
//!
//! Owns every asset class and store. All balance and supply changes go
//! through [`FungibleLedger`].
//!
//! # Key Types
//! - `FungibleLedger`: Classes, stores, supply and the event log
//! - `FungibleAsset`: In-flight value withdrawn from a store
//! - `ConstructorRef`: Admin capability handed out when a class is created
//! - `MintRef` / `BurnRef` / `TransferRef` / `ExtendRef`: Derived capabilities
//! - `LedgerEvent`: Append-only record of state changes

pub mod asset;
pub mod error;
pub mod event;
pub mod ledger;
pub mod object;

pub use asset::FungibleAsset;
pub use error::{LedgerError, LedgerResult};
pub use event::{LedgerEvent, LedgerEventKind};
pub use ledger::{ClassMetadata, ClassState, FungibleLedger, LedgerCheckpoint, StoreState};
pub use object::{BurnRef, ConstructorRef, ExtendRef, MintRef, TransferRef};
