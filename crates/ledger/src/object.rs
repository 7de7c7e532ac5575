//! Object capabilities for asset classes
//!
//! Creating a class hands its creator a [`ConstructorRef`]. Every other
//! capability is derived from it:
//!
//! ```text
//! ConstructorRef ──► MintRef      (mint new supply)
//!                ├─► BurnRef      (destroy supply)
//!                ├─► TransferRef  (move value ignoring freezes and ownership)
//!                └─► ExtendRef    (change class-level flags)
//! ```
//!
//! None of these types implement `Clone` or `Serialize`. A capability can
//! only be handed out by the code that holds the `ConstructorRef`.

use dasset_core::{Address, AssetClass};

use crate::error::{LedgerError, LedgerResult};

/// Admin capability returned when an asset class is created
#[derive(Debug)]
pub struct ConstructorRef {
    class: AssetClass,
    creator: Address,
    can_delete: bool,
}

impl ConstructorRef {
    pub(crate) fn new(class: AssetClass, creator: Address, can_delete: bool) -> Self {
        Self {
            class,
            creator,
            can_delete,
        }
    }

    /// Address of the class metadata object
    #[inline]
    pub fn class(&self) -> AssetClass {
        self.class
    }

    #[inline]
    pub fn creator(&self) -> Address {
        self.creator
    }

    /// Whether the class object can later be deleted
    #[inline]
    pub fn can_delete(&self) -> bool {
        self.can_delete
    }

    pub fn generate_mint_ref(&self) -> MintRef {
        MintRef { class: self.class }
    }

    pub fn generate_burn_ref(&self) -> BurnRef {
        BurnRef { class: self.class }
    }

    pub fn generate_transfer_ref(&self) -> TransferRef {
        TransferRef { class: self.class }
    }

    pub fn generate_extend_ref(&self) -> ExtendRef {
        ExtendRef { class: self.class }
    }
}

macro_rules! class_capability {
    ($(#[$doc:meta])* $name:ident $(, check = #[$check:meta])?) => {
        $(#[$doc])*
        #[derive(Debug, PartialEq, Eq)]
        pub struct $name {
            class: AssetClass,
        }

        impl $name {
            /// Class this capability is scoped to
            #[inline]
            pub fn class(&self) -> AssetClass {
                self.class
            }

            /// Fail unless this capability covers `target`
            $(#[$check])?
            pub(crate) fn check(&self, target: AssetClass) -> LedgerResult<()> {
                if self.class != target {
                    return Err(LedgerError::CapabilityMismatch {
                        capability: self.class,
                        target,
                    });
                }
                Ok(())
            }
        }
    };
}

class_capability!(
    /// Authorizes minting new supply
    MintRef
);

class_capability!(
    /// Authorizes burning supply, from an in-flight asset or directly from a store
    BurnRef
);

class_capability!(
    /// Authorizes withdraw/deposit that bypasses ownership and freeze checks
    TransferRef
);

class_capability!(
    /// Authorizes changing class-level flags such as the default-transfer freeze.
    /// Class flags are addressed through the ref itself, so nothing checks it
    /// against another class.
    ExtendRef,
    check = #[allow(dead_code)]
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_refs_share_class() {
        let class = AssetClass::new(Address::from_u64(9));
        let ctor = ConstructorRef::new(class, Address::from_u64(1), false);

        assert_eq!(ctor.generate_mint_ref().class(), class);
        assert_eq!(ctor.generate_burn_ref().class(), class);
        assert_eq!(ctor.generate_transfer_ref().class(), class);
        assert_eq!(ctor.generate_extend_ref().class(), class);
        assert!(!ctor.can_delete());
    }

    #[test]
    fn test_capability_check() {
        let class = AssetClass::new(Address::from_u64(9));
        let other = AssetClass::new(Address::from_u64(10));
        let transfer_ref = ConstructorRef::new(class, Address::ZERO, true).generate_transfer_ref();

        assert!(transfer_ref.check(class).is_ok());
        assert_eq!(
            transfer_ref.check(other),
            Err(LedgerError::CapabilityMismatch {
                capability: class,
                target: other,
            })
        );
    }
}
