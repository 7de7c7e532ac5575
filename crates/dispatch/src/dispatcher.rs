//! Dispatcher - owns the ledger, the extension table and the executor
//!
//! ```text
//! register ──► ExtensionTable ──► route_withdraw / route_deposit
//!                                      │
//!                      record? ────────┼──────── no record
//!                         │                          │
//!                         ▼                          ▼
//!              guard.enter(class)            ledger default path
//!              invoke(hook, args)
//!              guard.exit(class)
//! ```
//!
//! Every public operation is an atomic unit: if it fails, the ledger,
//! the extension table and the function registry are restored to their
//! state at entry. Calls a hook makes back into the dispatcher join the
//! unit of the operation that invoked the hook.
//!
//! Routing lives in `router.rs`, registration in `registrar.rs` and the
//! fixed-amount transfers in `composer.rs`.

use dasset_core::AssetClass;
use dasset_ledger::{FungibleLedger, LedgerCheckpoint};

use crate::config::DispatchConfig;
use crate::error::DispatchResult;
use crate::function::{check_values, FunctionIdentity, FunctionRegistry, Value};
use crate::guard::CallChainGuard;
use crate::record::{ExtensionInfo, ExtensionTable};

/// State restored when an atomic unit fails
struct Snapshot {
    ledger: LedgerCheckpoint,
    extensions: ExtensionTable,
    functions: FunctionRegistry,
}

/// Entry point for dispatchable asset operations
#[derive(Debug)]
pub struct Dispatcher {
    pub(crate) ledger: FungibleLedger,
    pub(crate) extensions: ExtensionTable,
    pub(crate) functions: FunctionRegistry,
    pub(crate) guard: CallChainGuard,
    pub(crate) config: DispatchConfig,
}

impl Dispatcher {
    /// Create a dispatcher over `ledger` with default configuration
    pub fn new(ledger: FungibleLedger) -> Self {
        Self::with_config(ledger, DispatchConfig::default())
    }

    pub fn with_config(ledger: FungibleLedger, config: DispatchConfig) -> Self {
        Self {
            ledger,
            extensions: ExtensionTable::new(),
            functions: FunctionRegistry::new(),
            guard: CallChainGuard::new(config.max_dispatch_depth),
            config,
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn ledger(&self) -> &FungibleLedger {
        &self.ledger
    }

    /// Direct ledger access for minting, store creation and hook bodies.
    /// The default transfer path of a dispatchable class stays frozen here.
    pub fn ledger_mut(&mut self) -> &mut FungibleLedger {
        &mut self.ledger
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    pub fn extensions(&self) -> &ExtensionTable {
        &self.extensions
    }

    /// Registered hooks of `class`, if any
    pub fn extension(&self, class: &AssetClass) -> Option<ExtensionInfo> {
        self.extensions.get(class).map(|record| record.info())
    }

    /// Whether `class` routes through hooks
    pub fn is_dispatchable(&self, class: &AssetClass) -> bool {
        self.extensions.contains(class)
    }

    /// Number of hooks currently running
    pub fn call_depth(&self) -> usize {
        self.guard.depth()
    }

    /// Run `f` as one atomic unit of work
    ///
    /// Nested calls (made from inside a hook) run directly and share the
    /// outer unit. A guard violation recorded during the unit fails it even
    /// if the hook swallowed the error.
    pub(crate) fn atomic<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut Self) -> DispatchResult<T>,
    ) -> DispatchResult<T> {
        if !self.guard.is_idle() {
            return f(self);
        }

        let snapshot = self.config.rollback_on_error.then(|| Snapshot {
            ledger: self.ledger.checkpoint(),
            extensions: self.extensions.clone(),
            functions: self.functions.clone(),
        });

        let result = f(self);
        let result = match self.guard.take_violation() {
            Some(violation) => Err(violation),
            None => result,
        };

        if let Err(err) = &result {
            self.guard.reset();
            if let Some(snapshot) = snapshot {
                self.ledger.rollback(snapshot.ledger);
                self.extensions = snapshot.extensions;
                self.functions = snapshot.functions;
                tracing::warn!(op, error = %err, "Rolled back failed dispatch operation");
            } else {
                tracing::warn!(op, error = %err, "Dispatch operation failed without rollback");
            }
        }

        result
    }

    /// Executor: call a published function with type-checked arguments
    pub(crate) fn invoke<'a>(
        &mut self,
        function: &FunctionIdentity,
        args: Vec<Value<'a>>,
    ) -> DispatchResult<Vec<Value<'a>>> {
        let body = self.functions.body(function)?;
        let signature = function.signature();

        check_values(function, &signature.params, &args, "argument")?;
        let returns = body.call(self, args)?;
        check_values(function, &signature.returns, &returns, "return value")?;

        Ok(returns)
    }
}
