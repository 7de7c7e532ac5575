//! Router - sends withdraws and deposits to hooks or the default path
//!
//! The extension table is consulted on every call. A class with a record
//! runs its hook; a class without one uses the ledger's default path.

use dasset_core::{Address, StoreId};
use dasset_ledger::{FungibleAsset, LedgerError};

use crate::dispatcher::Dispatcher;
use crate::error::{DispatchError, DispatchResult};
use crate::function::Value;
use crate::record::ExtensionRecord;

impl Dispatcher {
    // === Public operations ===

    /// Withdraw `amount` from `store` on behalf of its owner
    ///
    /// For a hooked class the returned asset is whatever the hook produced.
    pub fn withdraw(
        &mut self,
        caller: Address,
        store: StoreId,
        amount: u64,
    ) -> DispatchResult<FungibleAsset> {
        self.atomic("withdraw", |d| d.route_withdraw(caller, store, amount))
    }

    /// Deposit `asset` into `store`
    pub fn deposit(&mut self, store: StoreId, asset: FungibleAsset) -> DispatchResult<()> {
        self.atomic("deposit", |d| d.route_deposit(store, asset))
    }

    /// Withdraw from `from` and deposit into `to`, both routed
    pub fn transfer(
        &mut self,
        caller: Address,
        from: StoreId,
        to: StoreId,
        amount: u64,
    ) -> DispatchResult<()> {
        self.atomic("transfer", |d| {
            let asset = d.route_withdraw(caller, from, amount)?;
            d.route_deposit(to, asset)
        })
    }

    /// Like [`transfer`](Self::transfer), but fail unless `to` grows by at
    /// least `expected_minimum`
    pub fn transfer_assert_minimum_deposit(
        &mut self,
        caller: Address,
        from: StoreId,
        to: StoreId,
        amount: u64,
        expected_minimum: u64,
    ) -> DispatchResult<()> {
        self.atomic("transfer_assert_minimum_deposit", |d| {
            let before = d.ledger.balance(&to)?;
            let asset = d.route_withdraw(caller, from, amount)?;
            d.route_deposit(to, asset)?;
            let received = d.ledger.balance(&to)?.saturating_sub(before);

            if received < expected_minimum {
                return Err(DispatchError::AmountMismatch {
                    expected: expected_minimum,
                    actual: received,
                });
            }
            Ok(())
        })
    }

    pub fn balance(&self, store: &StoreId) -> DispatchResult<u64> {
        Ok(self.ledger.balance(store)?)
    }

    // === Routing ===

    pub(crate) fn route_withdraw(
        &mut self,
        caller: Address,
        store: StoreId,
        amount: u64,
    ) -> DispatchResult<FungibleAsset> {
        let class = self.ledger.store_class(&store)?;
        self.guard.check(class)?;
        self.ledger.withdraw_sanity_check(&caller, &store)?;

        match self.extensions.get(&class) {
            Some(record) => {
                tracing::debug!(class = %class, store = %store, amount, path = "hook", "Routing withdraw");
                self.dispatch_withdraw(&record, caller, store, amount)
            }
            None => {
                tracing::debug!(class = %class, store = %store, amount, path = "default", "Routing withdraw");
                Ok(self.ledger.withdraw(&caller, &store, amount)?)
            }
        }
    }

    pub(crate) fn route_deposit(&mut self, store: StoreId, asset: FungibleAsset) -> DispatchResult<()> {
        let class = self.ledger.store_class(&store)?;
        self.guard.check(class)?;
        self.ledger.deposit_sanity_check(&store)?;
        if asset.class() != class {
            return Err(LedgerError::ClassMismatch {
                expected: class,
                actual: asset.class(),
            }
            .into());
        }

        let amount = asset.amount();
        match self.extensions.get(&class) {
            Some(record) => {
                tracing::debug!(class = %class, store = %store, amount, path = "hook", "Routing deposit");
                self.dispatch_deposit(&record, store, asset)
            }
            None => {
                tracing::debug!(class = %class, store = %store, amount, path = "default", "Routing deposit");
                Ok(self.ledger.deposit(&store, asset)?)
            }
        }
    }

    // === Hook invocation ===

    fn dispatch_withdraw(
        &mut self,
        record: &ExtensionRecord,
        caller: Address,
        store: StoreId,
        amount: u64,
    ) -> DispatchResult<FungibleAsset> {
        let class = record.class();
        let hook = record.withdraw_hook();
        let balance_before = self.ledger.balance(&store)?;

        self.guard.enter(class)?;
        let result = self.invoke(
            hook,
            vec![
                Value::Address(caller),
                Value::Store(store),
                Value::U64(amount),
                Value::TransferRef(record.transfer_ref()),
                Value::Function(hook),
            ],
        );
        self.guard.exit(class);

        let asset = match result?.pop() {
            Some(Value::Asset(asset)) => asset,
            _ => return Err(DispatchError::argument_mismatch(hook, "withdraw hook returned no asset")),
        };
        if asset.class() != class {
            return Err(DispatchError::argument_mismatch(
                hook,
                format!("withdraw hook returned an asset of {}", asset.class()),
            ));
        }

        if self.config.enforce_withdraw_debit {
            let debited = balance_before.saturating_sub(self.ledger.balance(&store)?);
            if debited < amount {
                return Err(DispatchError::InsufficientDebit {
                    requested: amount,
                    debited,
                });
            }
        }

        Ok(asset)
    }

    fn dispatch_deposit(
        &mut self,
        record: &ExtensionRecord,
        store: StoreId,
        asset: FungibleAsset,
    ) -> DispatchResult<()> {
        let class = record.class();
        let hook = record.deposit_hook();

        self.guard.enter(class)?;
        let result = self.invoke(
            hook,
            vec![
                Value::Store(store),
                Value::Asset(asset),
                Value::TransferRef(record.transfer_ref()),
                Value::Function(hook),
            ],
        );
        self.guard.exit(class);

        result.map(|_| ())
    }
}
