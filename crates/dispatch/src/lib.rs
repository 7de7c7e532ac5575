//! Dasset Dispatch - Issuer-defined withdraw/deposit hooks
//!
//! An asset issuer may register a withdraw hook and a deposit hook on a
//! non-deletable asset class. From then on every withdraw and deposit of
//! that class is routed through the hooks, and the ledger's default path for
//! the class is frozen so the hooks cannot be bypassed.
//!
//! # Flow
//!
//! ```text
//! FunctionRegistry::publish_*_hook ──► FunctionIdentity
//!                                           │
//! Dispatcher::register(&ConstructorRef, withdraw_hook, deposit_hook)
//!                                           │
//! Dispatcher::withdraw / deposit / transfer ──► hook or default path
//! Dispatcher::transfer_fixed_send / transfer_fixed_receive
//! ```
//!
//! # Key Types
//! - `Dispatcher`: Owns the ledger and routes every operation
//! - `FunctionRegistry`: Published hook bodies keyed by `(module, name)`
//! - `Signature` / `TypeTag`: Declared shapes checked at registration
//! - `WithdrawHook` / `DepositHook`: Typed hook traits
//! - `DispatchError`: Everything that can abort an operation

pub mod composer;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod function;
pub mod guard;
pub mod policies;
pub mod record;
pub mod registrar;
pub mod router;
pub mod signature;

pub use config::DispatchConfig;
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, DispatchResult};
pub use function::{
    DepositHook, DispatchFunction, FunctionIdentity, FunctionRegistry, ModuleId, Value,
    WithdrawHook,
};
pub use guard::CallChainGuard;
pub use record::{ExtensionInfo, ExtensionRecord, ExtensionTable};
pub use signature::{is_dispatch_compatible, HookKind, Signature, TypeTag};
