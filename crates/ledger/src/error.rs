//! Ledger errors

use dasset_core::{Address, AssetClass, StoreId};
use thiserror::Error;

/// Errors that can occur in ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Unknown asset class: {0}")]
    UnknownClass(AssetClass),

    #[error("Unknown store: {0}")]
    UnknownStore(StoreId),

    #[error("Asset class already exists: {0}")]
    ClassAlreadyExists(AssetClass),

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    // === Transfer rules ===

    #[error("{caller} does not own store {store}")]
    NotStoreOwner { store: StoreId, caller: Address },

    #[error("Store {0} is frozen")]
    StoreFrozen(StoreId),

    #[error("Default transfer path is frozen for class {0}")]
    DefaultTransferFrozen(AssetClass),

    #[error("Default transfer freeze on class {0} cannot be lifted")]
    DefaultTransferFreezePermanent(AssetClass),

    #[error("Insufficient balance in {store}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        store: StoreId,
        balance: u64,
        requested: u64,
    },

    #[error("Cannot extract {requested} from asset of {class} holding {available}")]
    InsufficientAsset {
        class: AssetClass,
        available: u64,
        requested: u64,
    },

    #[error("Balance overflow in store {0}")]
    BalanceOverflow(StoreId),

    #[error("Asset class mismatch: expected {expected}, got {actual}")]
    ClassMismatch {
        expected: AssetClass,
        actual: AssetClass,
    },

    #[error("Capability for {capability} cannot act on class {target}")]
    CapabilityMismatch {
        capability: AssetClass,
        target: AssetClass,
    },

    // === Supply ===

    #[error("Max supply exceeded for {class}: max {max}, would reach {requested}")]
    MaxSupplyExceeded {
        class: AssetClass,
        max: u64,
        requested: u128,
    },

    #[error("Cannot destroy non-zero asset of {class}: amount {amount}")]
    NonZeroAsset { class: AssetClass, amount: u64 },
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
