//! FungibleLedger - Asset classes, stores and supply
//!
//! The ledger enforces the base transfer rules:
//! - a default withdraw needs the store owner and an unfrozen store
//! - default withdraw/deposit are refused once a class's default path is frozen
//! - `*_with_ref` calls skip ownership and freeze checks but never balance checks
//! - supply only changes through mint and burn

use std::collections::HashMap;

use dasset_core::{Address, AssetClass, AssetSymbol, StoreId};
use serde::{Deserialize, Serialize};

use crate::asset::FungibleAsset;
use crate::error::{LedgerError, LedgerResult};
use crate::event::{LedgerEvent, LedgerEventKind};
use crate::object::{BurnRef, ConstructorRef, ExtendRef, MintRef, TransferRef};

/// Maximum number of decimals a class may declare
pub const MAX_DECIMALS: u8 = 32;

/// Descriptive metadata of an asset class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMetadata {
    pub name: String,
    pub symbol: AssetSymbol,
    pub decimals: u8,
    /// `None` means unlimited
    pub max_supply: Option<u64>,
}

impl ClassMetadata {
    pub fn new(name: impl Into<String>, symbol: AssetSymbol, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol,
            decimals,
            max_supply: None,
        }
    }

    /// Cap the total supply
    pub fn with_max_supply(mut self, max_supply: u64) -> Self {
        self.max_supply = Some(max_supply);
        self
    }

    fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::InvalidMetadata("name cannot be empty".into()));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(LedgerError::InvalidMetadata(format!(
                "decimals {} exceeds {}",
                self.decimals, MAX_DECIMALS
            )));
        }
        Ok(())
    }
}

/// Per-class state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassState {
    pub metadata: ClassMetadata,
    pub creator: Address,
    pub supply: u64,
    /// Whether the class object could be deleted later
    pub deletable: bool,
    /// Default withdraw/deposit are refused while set
    pub default_transfer_frozen: bool,
}

/// Per-store state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    pub owner: Address,
    pub class: AssetClass,
    pub balance: u64,
    pub frozen: bool,
}

/// Ledger state captured by [`FungibleLedger::checkpoint`]
#[derive(Debug, Clone)]
pub struct LedgerCheckpoint {
    classes: HashMap<AssetClass, ClassState>,
    stores: HashMap<StoreId, StoreState>,
    store_nonce: u64,
    events_len: usize,
}

/// In-memory fungible asset ledger
///
/// Use [`checkpoint`](Self::checkpoint) and [`rollback`](Self::rollback) to
/// undo a failed multi-step operation without copying the event log.
#[derive(Debug, Clone, Default)]
pub struct FungibleLedger {
    classes: HashMap<AssetClass, ClassState>,
    stores: HashMap<StoreId, StoreState>,
    store_nonce: u64,
    events: Vec<LedgerEvent>,
}

impl FungibleLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    // === Classes ===

    /// Create a new asset class at the address derived from `creator` and `seed`
    pub fn create_class(
        &mut self,
        creator: Address,
        seed: &str,
        metadata: ClassMetadata,
        deletable: bool,
    ) -> LedgerResult<ConstructorRef> {
        metadata.validate()?;

        let class = AssetClass::new(Address::derive_object(&creator, seed.as_bytes()));
        if self.classes.contains_key(&class) {
            return Err(LedgerError::ClassAlreadyExists(class));
        }

        self.classes.insert(
            class,
            ClassState {
                metadata,
                creator,
                supply: 0,
                deletable,
                default_transfer_frozen: false,
            },
        );
        self.emit(LedgerEventKind::ClassCreated { class, creator });

        Ok(ConstructorRef::new(class, creator, deletable))
    }

    pub fn class(&self, class: &AssetClass) -> LedgerResult<&ClassState> {
        self.classes
            .get(class)
            .ok_or(LedgerError::UnknownClass(*class))
    }

    fn class_mut(&mut self, class: &AssetClass) -> LedgerResult<&mut ClassState> {
        self.classes
            .get_mut(class)
            .ok_or(LedgerError::UnknownClass(*class))
    }

    pub fn supply(&self, class: &AssetClass) -> LedgerResult<u64> {
        Ok(self.class(class)?.supply)
    }

    pub fn is_default_transfer_frozen(&self, class: &AssetClass) -> LedgerResult<bool> {
        Ok(self.class(class)?.default_transfer_frozen)
    }

    /// Freeze the default transfer path of a class
    ///
    /// The freeze is one-way: once set, `frozen = false` fails with
    /// `DefaultTransferFreezePermanent`. Freezing again is a no-op.
    pub fn set_default_transfer_frozen(
        &mut self,
        extend_ref: &ExtendRef,
        frozen: bool,
    ) -> LedgerResult<()> {
        let class = extend_ref.class();
        let state = self.class_mut(&class)?;
        if state.default_transfer_frozen == frozen {
            return Ok(());
        }
        if state.default_transfer_frozen {
            return Err(LedgerError::DefaultTransferFreezePermanent(class));
        }
        state.default_transfer_frozen = true;
        self.emit(LedgerEventKind::DefaultTransferFrozen { class, frozen });
        Ok(())
    }

    // === Stores ===

    /// Create an empty store of `class` owned by `owner`
    pub fn create_store(&mut self, owner: Address, class: AssetClass) -> LedgerResult<StoreId> {
        self.class(&class)?;

        self.store_nonce += 1;
        let store = StoreId::derive(&owner, &class, self.store_nonce);
        self.stores.insert(
            store,
            StoreState {
                owner,
                class,
                balance: 0,
                frozen: false,
            },
        );
        self.emit(LedgerEventKind::StoreCreated { store, owner, class });

        Ok(store)
    }

    pub fn store(&self, store: &StoreId) -> LedgerResult<&StoreState> {
        self.stores
            .get(store)
            .ok_or(LedgerError::UnknownStore(*store))
    }

    fn store_mut(&mut self, store: &StoreId) -> LedgerResult<&mut StoreState> {
        self.stores
            .get_mut(store)
            .ok_or(LedgerError::UnknownStore(*store))
    }

    pub fn store_class(&self, store: &StoreId) -> LedgerResult<AssetClass> {
        Ok(self.store(store)?.class)
    }

    pub fn store_owner(&self, store: &StoreId) -> LedgerResult<Address> {
        Ok(self.store(store)?.owner)
    }

    pub fn balance(&self, store: &StoreId) -> LedgerResult<u64> {
        Ok(self.store(store)?.balance)
    }

    pub fn is_frozen(&self, store: &StoreId) -> LedgerResult<bool> {
        Ok(self.store(store)?.frozen)
    }

    /// Freeze or unfreeze a single store
    pub fn set_frozen_flag(
        &mut self,
        transfer_ref: &TransferRef,
        store: &StoreId,
        frozen: bool,
    ) -> LedgerResult<()> {
        let class = self.store_class(store)?;
        transfer_ref.check(class)?;
        self.store_mut(store)?.frozen = frozen;
        self.emit(LedgerEventKind::Frozen {
            store: *store,
            frozen,
        });
        Ok(())
    }

    // === Supply ===

    pub fn mint(&mut self, mint_ref: &MintRef, amount: u64) -> LedgerResult<FungibleAsset> {
        let class = mint_ref.class();
        let state = self.class_mut(&class)?;

        let new_supply = state.supply as u128 + amount as u128;
        let cap = state.metadata.max_supply.unwrap_or(u64::MAX);
        if new_supply > cap as u128 {
            return Err(LedgerError::MaxSupplyExceeded {
                class,
                max: cap,
                requested: new_supply,
            });
        }
        state.supply = new_supply as u64;

        self.emit(LedgerEventKind::Mint { class, amount });
        Ok(FungibleAsset::new(class, amount))
    }

    /// Mint straight into a store, bypassing freezes
    pub fn mint_to(&mut self, mint_ref: &MintRef, store: &StoreId, amount: u64) -> LedgerResult<()> {
        let class = self.store_class(store)?;
        mint_ref.check(class)?;
        let fa = self.mint(mint_ref, amount)?;
        self.deposit_internal(store, fa)
    }

    pub fn burn(&mut self, burn_ref: &BurnRef, asset: FungibleAsset) -> LedgerResult<()> {
        burn_ref.check(asset.class())?;
        let class = asset.class();
        let amount = asset.amount();

        let state = self.class_mut(&class)?;
        // Every live asset is backed by supply
        state.supply = state.supply.saturating_sub(amount);

        self.emit(LedgerEventKind::Burn { class, amount });
        Ok(())
    }

    /// Burn `amount` directly out of a store, bypassing freezes
    pub fn burn_from(&mut self, burn_ref: &BurnRef, store: &StoreId, amount: u64) -> LedgerResult<()> {
        let class = self.store_class(store)?;
        burn_ref.check(class)?;
        let fa = self.withdraw_internal(store, amount)?;
        self.burn(burn_ref, fa)
    }

    // === Default transfer path ===

    /// Checks shared by every withdraw entry point: ownership and store freeze
    pub fn withdraw_sanity_check(&self, caller: &Address, store: &StoreId) -> LedgerResult<()> {
        let state = self.store(store)?;
        if state.owner != *caller {
            return Err(LedgerError::NotStoreOwner {
                store: *store,
                caller: *caller,
            });
        }
        if state.frozen {
            return Err(LedgerError::StoreFrozen(*store));
        }
        Ok(())
    }

    /// Checks shared by every deposit entry point: store freeze
    pub fn deposit_sanity_check(&self, store: &StoreId) -> LedgerResult<()> {
        if self.store(store)?.frozen {
            return Err(LedgerError::StoreFrozen(*store));
        }
        Ok(())
    }

    /// Owner withdraw through the default path
    pub fn withdraw(
        &mut self,
        caller: &Address,
        store: &StoreId,
        amount: u64,
    ) -> LedgerResult<FungibleAsset> {
        self.withdraw_sanity_check(caller, store)?;
        self.ensure_default_path_open(store)?;
        self.withdraw_internal(store, amount)
    }

    /// Deposit through the default path
    pub fn deposit(&mut self, store: &StoreId, asset: FungibleAsset) -> LedgerResult<()> {
        self.deposit_sanity_check(store)?;
        self.ensure_default_path_open(store)?;
        self.deposit_internal(store, asset)
    }

    fn ensure_default_path_open(&self, store: &StoreId) -> LedgerResult<()> {
        let class = self.store_class(store)?;
        if self.is_default_transfer_frozen(&class)? {
            return Err(LedgerError::DefaultTransferFrozen(class));
        }
        Ok(())
    }

    // === Capability transfer path ===

    pub fn withdraw_with_ref(
        &mut self,
        transfer_ref: &TransferRef,
        store: &StoreId,
        amount: u64,
    ) -> LedgerResult<FungibleAsset> {
        transfer_ref.check(self.store_class(store)?)?;
        self.withdraw_internal(store, amount)
    }

    pub fn deposit_with_ref(
        &mut self,
        transfer_ref: &TransferRef,
        store: &StoreId,
        asset: FungibleAsset,
    ) -> LedgerResult<()> {
        transfer_ref.check(self.store_class(store)?)?;
        self.deposit_internal(store, asset)
    }

    fn withdraw_internal(&mut self, store: &StoreId, amount: u64) -> LedgerResult<FungibleAsset> {
        let state = self.store_mut(store)?;
        if state.balance < amount {
            return Err(LedgerError::InsufficientBalance {
                store: *store,
                balance: state.balance,
                requested: amount,
            });
        }
        state.balance -= amount;
        let class = state.class;

        self.emit(LedgerEventKind::Withdraw {
            store: *store,
            amount,
        });
        Ok(FungibleAsset::new(class, amount))
    }

    fn deposit_internal(&mut self, store: &StoreId, asset: FungibleAsset) -> LedgerResult<()> {
        let state = self.store_mut(store)?;
        if state.class != asset.class() {
            return Err(LedgerError::ClassMismatch {
                expected: state.class,
                actual: asset.class(),
            });
        }
        let amount = asset.amount();
        state.balance = state
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(*store))?;

        self.emit(LedgerEventKind::Deposit {
            store: *store,
            amount,
        });
        Ok(())
    }

    // === Checkpoints ===

    /// Capture balances, classes and the event-log position
    ///
    /// The event log is append-only, so only its length is recorded.
    pub fn checkpoint(&self) -> LedgerCheckpoint {
        LedgerCheckpoint {
            classes: self.classes.clone(),
            stores: self.stores.clone(),
            store_nonce: self.store_nonce,
            events_len: self.events.len(),
        }
    }

    /// Return to `checkpoint`, dropping every event emitted since
    pub fn rollback(&mut self, checkpoint: LedgerCheckpoint) {
        self.classes = checkpoint.classes;
        self.stores = checkpoint.stores;
        self.store_nonce = checkpoint.store_nonce;
        self.events.truncate(checkpoint.events_len);
    }

    // === Events ===

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    fn emit(&mut self, kind: LedgerEventKind) {
        let sequence = self.events.len() as u64 + 1;
        self.events.push(LedgerEvent::new(sequence, kind));
    }
}
