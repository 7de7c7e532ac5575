//! FungibleAsset - Value in flight between stores
//!
//! A `FungibleAsset` is produced by a withdraw or mint and must end up in a
//! deposit or burn. It is deliberately not `Clone`, `Copy` or
//! `Deserialize`, so value can only be created by the ledger.

use dasset_core::AssetClass;

use crate::error::{LedgerError, LedgerResult};

/// An amount of one asset class that has left its store
#[must_use = "a FungibleAsset must be deposited or burned"]
#[derive(Debug, PartialEq, Eq)]
pub struct FungibleAsset {
    class: AssetClass,
    amount: u64,
}

impl FungibleAsset {
    pub(crate) fn new(class: AssetClass, amount: u64) -> Self {
        Self { class, amount }
    }

    /// An empty asset of `class`
    pub fn zero(class: AssetClass) -> Self {
        Self { class, amount: 0 }
    }

    #[inline]
    pub fn class(&self) -> AssetClass {
        self.class
    }

    #[inline]
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Split `amount` off into a new asset
    pub fn extract(&mut self, amount: u64) -> LedgerResult<FungibleAsset> {
        if amount > self.amount {
            return Err(LedgerError::InsufficientAsset {
                class: self.class,
                available: self.amount,
                requested: amount,
            });
        }
        self.amount -= amount;
        Ok(FungibleAsset::new(self.class, amount))
    }

    /// Absorb `other` into this asset
    pub fn merge(&mut self, other: FungibleAsset) -> LedgerResult<()> {
        if other.class != self.class {
            return Err(LedgerError::ClassMismatch {
                expected: self.class,
                actual: other.class,
            });
        }
        // Total supply is a u64, so two halves of it cannot overflow
        self.amount += other.amount;
        Ok(())
    }

    /// Destroy an empty asset
    pub fn destroy_zero(self) -> LedgerResult<()> {
        if self.amount != 0 {
            return Err(LedgerError::NonZeroAsset {
                class: self.class,
                amount: self.amount,
            });
        }
        Ok(())
    }
}
