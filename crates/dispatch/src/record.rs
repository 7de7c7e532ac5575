//! Extension records - the hook binding of each dispatchable asset class

use std::collections::HashMap;
use std::sync::Arc;

use dasset_core::AssetClass;
use dasset_ledger::TransferRef;
use serde::Serialize;

use crate::error::{DispatchError, DispatchResult};
use crate::function::FunctionIdentity;

/// Hooks and transfer capability bound to one asset class
///
/// Written once by the registrar and never mutated. The transfer capability
/// stays inside the record; hooks only ever borrow it.
#[derive(Debug)]
pub struct ExtensionRecord {
    class: AssetClass,
    withdraw_hook: FunctionIdentity,
    deposit_hook: FunctionIdentity,
    transfer_ref: TransferRef,
}

impl ExtensionRecord {
    pub(crate) fn new(
        class: AssetClass,
        withdraw_hook: FunctionIdentity,
        deposit_hook: FunctionIdentity,
        transfer_ref: TransferRef,
    ) -> Self {
        Self {
            class,
            withdraw_hook,
            deposit_hook,
            transfer_ref,
        }
    }

    pub fn class(&self) -> AssetClass {
        self.class
    }

    pub fn withdraw_hook(&self) -> &FunctionIdentity {
        &self.withdraw_hook
    }

    pub fn deposit_hook(&self) -> &FunctionIdentity {
        &self.deposit_hook
    }

    pub(crate) fn transfer_ref(&self) -> &TransferRef {
        &self.transfer_ref
    }

    /// Public view without the capability
    pub fn info(&self) -> ExtensionInfo {
        ExtensionInfo {
            class: self.class,
            withdraw_hook: self.withdraw_hook.clone(),
            deposit_hook: self.deposit_hook.clone(),
        }
    }
}

/// Serializable description of a registered extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionInfo {
    pub class: AssetClass,
    pub withdraw_hook: FunctionIdentity,
    pub deposit_hook: FunctionIdentity,
}

/// All extension records, keyed by asset class
///
/// Insert-only: there is no way to replace or remove a record.
#[derive(Debug, Clone, Default)]
pub struct ExtensionTable {
    records: HashMap<AssetClass, Arc<ExtensionRecord>>,
}

impl ExtensionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, class: &AssetClass) -> Option<Arc<ExtensionRecord>> {
        self.records.get(class).cloned()
    }

    pub fn contains(&self, class: &AssetClass) -> bool {
        self.records.contains_key(class)
    }

    pub(crate) fn insert(&mut self, record: ExtensionRecord) -> DispatchResult<()> {
        let class = record.class;
        if self.records.contains_key(&class) {
            return Err(DispatchError::AlreadyRegistered(class));
        }
        self.records.insert(class, Arc::new(record));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Registered classes, sorted
    pub fn classes(&self) -> Vec<AssetClass> {
        let mut classes: Vec<AssetClass> = self.records.keys().copied().collect();
        classes.sort();
        classes
    }
}
