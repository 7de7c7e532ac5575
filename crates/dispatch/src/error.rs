//! Dispatch errors

use dasset_core::AssetClass;
use dasset_ledger::LedgerError;
use thiserror::Error;

use crate::signature::HookKind;

/// Errors from registration, routing and hook execution
///
/// Every variant aborts the enclosing operation. The dispatcher rolls back
/// whatever the operation changed before returning it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    // === Registration ===

    #[error("{0} hook signature does not match the dispatcher shape")]
    SignatureMismatch(HookKind),

    #[error("Asset class {0} is deletable and cannot take dispatch hooks")]
    ClassIsDeletable(AssetClass),

    #[error("Dispatch hooks already registered for {0}")]
    AlreadyRegistered(AssetClass),

    #[error("Function {module}::{name} is not published")]
    FunctionNotFound { module: String, name: String },

    #[error("Function {module}::{name} is already published")]
    FunctionAlreadyPublished { module: String, name: String },

    // === Routing ===

    #[error("No dispatch hooks registered for {0}")]
    NoExtensionRecord(AssetClass),

    #[error("Amount mismatch: expected {expected}, got {actual}")]
    AmountMismatch { expected: u64, actual: u64 },

    #[error("Withdraw hook debited {debited}, less than requested {requested}")]
    InsufficientDebit { requested: u64, debited: u64 },

    // === Executor ===

    #[error("Reentrant dispatch into {0}")]
    ReentrantDispatch(AssetClass),

    #[error("Dispatch depth limit {limit} exceeded")]
    DispatchDepthExceeded { limit: usize },

    #[error("Bad call to {function}: {reason}")]
    ArgumentMismatch { function: String, reason: String },

    #[error("Hook aborted: {reason} (code: {code})")]
    HookAborted { reason: String, code: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Result type for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;

impl DispatchError {
    /// Create a hook abort error
    pub fn hook_aborted(reason: impl Into<String>, code: impl Into<String>) -> Self {
        DispatchError::HookAborted {
            reason: reason.into(),
            code: code.into(),
        }
    }

    pub(crate) fn argument_mismatch(function: impl ToString, reason: impl Into<String>) -> Self {
        DispatchError::ArgumentMismatch {
            function: function.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if a hook tried to re-enter the router
    pub fn is_reentrancy(&self) -> bool {
        matches!(self, DispatchError::ReentrantDispatch(_))
    }

    /// Check if this was raised by a hook body
    pub fn is_hook_abort(&self) -> bool {
        matches!(self, DispatchError::HookAborted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dasset_core::Address;

    #[test]
    fn test_hook_aborted_error() {
        let err = DispatchError::hook_aborted("Recipient not allowed", "RECIPIENT_NOT_ALLOWED");
        assert!(err.is_hook_abort());
        assert!(!err.is_reentrancy());
        assert!(err.to_string().contains("RECIPIENT_NOT_ALLOWED"));
    }

    #[test]
    fn test_signature_mismatch_names_hook() {
        let err = DispatchError::SignatureMismatch(HookKind::Deposit);
        assert_eq!(
            err.to_string(),
            "deposit hook signature does not match the dispatcher shape"
        );
    }

    #[test]
    fn test_ledger_error_is_transparent() {
        let class = AssetClass::new(Address::from_u64(1));
        let err: DispatchError = LedgerError::DefaultTransferFrozen(class).into();
        assert_eq!(
            err.to_string(),
            LedgerError::DefaultTransferFrozen(class).to_string()
        );
    }

    #[test]
    fn test_reentrancy_predicate() {
        let err = DispatchError::ReentrantDispatch(AssetClass::new(Address::from_u64(1)));
        assert!(err.is_reentrancy());
    }
}
