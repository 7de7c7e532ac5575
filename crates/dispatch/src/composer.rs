//! Fixed-amount transfers for hooked classes
//!
//! Each side pins one amount by skipping one hook with the class's transfer
//! capability:
//!
//! - `transfer_fixed_send`: the sender is debited exactly; the deposit hook
//!   still decides what the recipient receives.
//! - `transfer_fixed_receive`: the recipient is credited exactly; the
//!   withdraw hook decides what the sender pays.

use std::sync::Arc;

use dasset_core::{Address, StoreId};

use crate::dispatcher::Dispatcher;
use crate::error::{DispatchError, DispatchResult};
use crate::record::ExtensionRecord;

impl Dispatcher {
    /// Debit exactly `amount` from `from` and route the deposit into `to`
    pub fn transfer_fixed_send(
        &mut self,
        caller: Address,
        from: StoreId,
        to: StoreId,
        amount: u64,
    ) -> DispatchResult<()> {
        self.atomic("transfer_fixed_send", |d| {
            let record = d.record_for_store(&from)?;
            d.guard.check(record.class())?;
            d.ledger.withdraw_sanity_check(&caller, &from)?;

            let asset = d.ledger.withdraw_with_ref(record.transfer_ref(), &from, amount)?;
            tracing::debug!(class = %record.class(), from = %from, to = %to, amount, "Fixed send");
            d.route_deposit(to, asset)
        })
    }

    /// Route the withdraw from `from` and credit exactly `amount` into `to`
    ///
    /// Fails with `AmountMismatch` unless the withdraw hook produced exactly
    /// `amount`.
    pub fn transfer_fixed_receive(
        &mut self,
        caller: Address,
        from: StoreId,
        to: StoreId,
        amount: u64,
    ) -> DispatchResult<()> {
        self.atomic("transfer_fixed_receive", |d| {
            let record = d.record_for_store(&from)?;
            let asset = d.route_withdraw(caller, from, amount)?;
            if asset.amount() != amount {
                return Err(DispatchError::AmountMismatch {
                    expected: amount,
                    actual: asset.amount(),
                });
            }

            tracing::debug!(class = %record.class(), from = %from, to = %to, amount, "Fixed receive");
            Ok(d.ledger.deposit_with_ref(record.transfer_ref(), &to, asset)?)
        })
    }

    fn record_for_store(&self, store: &StoreId) -> DispatchResult<Arc<ExtensionRecord>> {
        let class = self.ledger.store_class(store)?;
        self.extensions
            .get(&class)
            .ok_or(DispatchError::NoExtensionRecord(class))
    }
}
