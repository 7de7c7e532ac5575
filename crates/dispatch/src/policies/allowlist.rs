//! Allow-listed recipients

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use dasset_core::{Address, StoreId};
use dasset_ledger::{FungibleAsset, TransferRef};

use crate::dispatcher::Dispatcher;
use crate::error::{DispatchError, DispatchResult};
use crate::function::{DepositHook, WithdrawHook};

/// Rejects deposits into stores whose owner is not allow-listed
///
/// Withdraws are unrestricted. The list can change after registration.
#[derive(Debug, Default)]
pub struct AllowlistPolicy {
    allowed: RwLock<HashSet<Address>>,
}

impl AllowlistPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(&self, owner: Address) {
        self.allowed
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(owner);
    }

    pub fn revoke(&self, owner: &Address) {
        self.allowed
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(owner);
    }

    pub fn is_allowed(&self, owner: &Address) -> bool {
        self.allowed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(owner)
    }
}

impl WithdrawHook for AllowlistPolicy {
    fn withdraw(
        &self,
        dispatcher: &mut Dispatcher,
        _caller: Address,
        store: StoreId,
        amount: u64,
        transfer_ref: &TransferRef,
    ) -> DispatchResult<FungibleAsset> {
        Ok(dispatcher
            .ledger_mut()
            .withdraw_with_ref(transfer_ref, &store, amount)?)
    }
}

impl DepositHook for AllowlistPolicy {
    fn deposit(
        &self,
        dispatcher: &mut Dispatcher,
        store: StoreId,
        asset: FungibleAsset,
        transfer_ref: &TransferRef,
    ) -> DispatchResult<()> {
        let owner = dispatcher.ledger().store_owner(&store)?;
        if !self.is_allowed(&owner) {
            return Err(DispatchError::hook_aborted(
                format!("Store owner {} is not allow-listed", owner.short()),
                "RECIPIENT_NOT_ALLOWED",
            ));
        }
        Ok(dispatcher
            .ledger_mut()
            .deposit_with_ref(transfer_ref, &store, asset)?)
    }
}
