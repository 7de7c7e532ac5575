//! Flat fee skimmed into a treasury on every withdraw

use dasset_core::{Address, StoreId};
use dasset_ledger::{FungibleAsset, TransferRef};

use crate::dispatcher::Dispatcher;
use crate::error::DispatchResult;
use crate::function::{DepositHook, WithdrawHook};

/// Withdraws the requested amount, moves `fee` of it into `treasury` and
/// hands back the rest. Withdraws smaller than the fee go entirely to the
/// treasury.
#[derive(Debug, Clone)]
pub struct FeeSkimPolicy {
    fee: u64,
    treasury: StoreId,
}

impl FeeSkimPolicy {
    pub fn new(fee: u64, treasury: StoreId) -> Self {
        Self { fee, treasury }
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn treasury(&self) -> StoreId {
        self.treasury
    }
}

impl WithdrawHook for FeeSkimPolicy {
    fn withdraw(
        &self,
        dispatcher: &mut Dispatcher,
        _caller: Address,
        store: StoreId,
        amount: u64,
        transfer_ref: &TransferRef,
    ) -> DispatchResult<FungibleAsset> {
        let ledger = dispatcher.ledger_mut();
        let mut asset = ledger.withdraw_with_ref(transfer_ref, &store, amount)?;

        let skimmed = asset.extract(self.fee.min(amount))?;
        ledger.deposit_with_ref(transfer_ref, &self.treasury, skimmed)?;
        Ok(asset)
    }
}

impl DepositHook for FeeSkimPolicy {
    fn deposit(
        &self,
        dispatcher: &mut Dispatcher,
        store: StoreId,
        asset: FungibleAsset,
        transfer_ref: &TransferRef,
    ) -> DispatchResult<()> {
        Ok(dispatcher
            .ledger_mut()
            .deposit_with_ref(transfer_ref, &store, asset)?)
    }
}
