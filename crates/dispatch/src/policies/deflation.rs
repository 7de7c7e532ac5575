//! Deflationary asset: every move burns part of the amount

use dasset_core::{Address, StoreId};
use dasset_ledger::{BurnRef, FungibleAsset, TransferRef};
use serde::{Deserialize, Serialize};

use crate::dispatcher::Dispatcher;
use crate::error::DispatchResult;
use crate::function::{DepositHook, WithdrawHook};

/// Burn rate, as `amount / burn_divisor`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeflationConfig {
    /// 10 burns 10%. Zero disables burning.
    #[serde(default = "default_burn_divisor")]
    pub burn_divisor: u64,
}

fn default_burn_divisor() -> u64 {
    10
}

impl Default for DeflationConfig {
    fn default() -> Self {
        Self {
            burn_divisor: default_burn_divisor(),
        }
    }
}

/// Burns `amount / burn_divisor` on both sides of a transfer
///
/// Withdraw burns the fee from the store on top of the requested amount, so
/// the caller still receives `amount`. Deposit burns the fee out of the
/// incoming asset, so the store receives less.
#[derive(Debug)]
pub struct DeflationPolicy {
    burn_ref: BurnRef,
    config: DeflationConfig,
}

impl DeflationPolicy {
    pub fn new(burn_ref: BurnRef, config: DeflationConfig) -> Self {
        Self { burn_ref, config }
    }

    pub fn config(&self) -> &DeflationConfig {
        &self.config
    }

    /// Amount burned when moving `amount`
    pub fn burn_amount(&self, amount: u64) -> u64 {
        amount.checked_div(self.config.burn_divisor).unwrap_or(0)
    }
}

impl WithdrawHook for DeflationPolicy {
    fn withdraw(
        &self,
        dispatcher: &mut Dispatcher,
        _caller: Address,
        store: StoreId,
        amount: u64,
        transfer_ref: &TransferRef,
    ) -> DispatchResult<FungibleAsset> {
        let burn = self.burn_amount(amount);
        let ledger = dispatcher.ledger_mut();
        if burn > 0 {
            ledger.burn_from(&self.burn_ref, &store, burn)?;
        }
        Ok(ledger.withdraw_with_ref(transfer_ref, &store, amount)?)
    }
}

impl DepositHook for DeflationPolicy {
    fn deposit(
        &self,
        dispatcher: &mut Dispatcher,
        store: StoreId,
        mut asset: FungibleAsset,
        transfer_ref: &TransferRef,
    ) -> DispatchResult<()> {
        let burn = self.burn_amount(asset.amount());
        let ledger = dispatcher.ledger_mut();
        if burn > 0 {
            let burned = asset.extract(burn)?;
            ledger.burn(&self.burn_ref, burned)?;
        }
        Ok(ledger.deposit_with_ref(transfer_ref, &store, asset)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dasset_core::AssetSymbol;
    use dasset_ledger::{ClassMetadata, FungibleLedger};

    fn policy(burn_divisor: u64) -> DeflationPolicy {
        let mut ledger = FungibleLedger::new();
        let metadata = ClassMetadata::new("Deflation", "DFL".parse::<AssetSymbol>().unwrap(), 8);
        let ctor = ledger
            .create_class(Address::from_u64(1), "dfl", metadata, false)
            .unwrap();
        DeflationPolicy::new(ctor.generate_burn_ref(), DeflationConfig { burn_divisor })
    }

    #[test]
    fn test_burn_amount_rounds_down() {
        let policy = policy(10);
        assert_eq!(policy.burn_amount(5), 0);
        assert_eq!(policy.burn_amount(10), 1);
        assert_eq!(policy.burn_amount(99), 9);
    }

    #[test]
    fn test_zero_divisor_disables_burn() {
        assert_eq!(policy(0).burn_amount(1_000), 0);
    }

    #[test]
    fn test_config_default_from_empty_json() {
        let config: DeflationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DeflationConfig::default());
        assert_eq!(config.burn_divisor, 10);
    }
}
