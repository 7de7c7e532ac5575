//! Function registry - published hook functions and their identities
//!
//! Hooks are published under `(module, name)` with a declared [`Signature`].
//! The registry hands back a [`FunctionIdentity`], the only handle the
//! registrar accepts. At dispatch time the executor resolves the identity
//! to the `Arc<dyn DispatchFunction>` body again, so a record never holds a
//! callable directly.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dasset_core::{Address, StoreId};
use dasset_ledger::{FungibleAsset, TransferRef};
use serde::Serialize;

use crate::dispatcher::Dispatcher;
use crate::error::{DispatchError, DispatchResult};
use crate::signature::{Signature, TypeTag};

/// Module that publishes functions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModuleId {
    pub address: Address,
    pub name: String,
}

impl ModuleId {
    pub fn new(address: Address, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address.short(), self.name)
    }
}

/// A published function: module, name and declared signature
///
/// Only the [`FunctionRegistry`] creates these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionIdentity {
    module: ModuleId,
    name: String,
    signature: Signature,
}

impl FunctionIdentity {
    pub fn module(&self) -> &ModuleId {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

impl fmt::Display for FunctionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.name)
    }
}

/// Dynamically typed argument or return value
#[derive(Debug)]
pub enum Value<'a> {
    Address(Address),
    U64(u64),
    Bool(bool),
    Store(StoreId),
    Asset(FungibleAsset),
    TransferRef(&'a TransferRef),
    Function(&'a FunctionIdentity),
}

impl Value<'_> {
    /// Whether this value inhabits `tag`
    pub fn matches(&self, tag: &TypeTag) -> bool {
        match (self, tag) {
            (Value::Address(_), TypeTag::Address)
            | (Value::U64(_), TypeTag::U64)
            | (Value::Bool(_), TypeTag::Bool)
            | (Value::Asset(_), TypeTag::Asset)
            | (Value::TransferRef(_), TypeTag::TransferRef)
            | (Value::Function(_), TypeTag::FunctionIdentity) => true,
            // Stores are untyped at runtime; the object type only matters statically
            (Value::Store(_), TypeTag::Store(_)) => true,
            _ => false,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Address(_) => "address",
            Value::U64(_) => "u64",
            Value::Bool(_) => "bool",
            Value::Store(_) => "store",
            Value::Asset(_) => "asset",
            Value::TransferRef(_) => "transfer_ref",
            Value::Function(_) => "function",
        }
    }
}

/// Check a value list against declared types
pub(crate) fn check_values(
    function: &FunctionIdentity,
    expected: &[TypeTag],
    values: &[Value<'_>],
    what: &str,
) -> DispatchResult<()> {
    if expected.len() != values.len() {
        return Err(DispatchError::argument_mismatch(
            function,
            format!("expected {} {}s, got {}", expected.len(), what, values.len()),
        ));
    }
    for (i, (tag, value)) in expected.iter().zip(values).enumerate() {
        if !value.matches(tag) {
            return Err(DispatchError::argument_mismatch(
                function,
                format!("{} {} should be {}, got {}", what, i, tag, value.kind()),
            ));
        }
    }
    Ok(())
}

/// A callable function body
///
/// Implementations receive the dispatcher so they can reach the ledger and,
/// through the public router, other asset classes. Calls back into the
/// router for a class already on the call chain are rejected.
pub trait DispatchFunction: Send + Sync {
    fn call<'a>(
        &self,
        dispatcher: &mut Dispatcher,
        args: Vec<Value<'a>>,
    ) -> DispatchResult<Vec<Value<'a>>>;
}

/// Typed withdraw hook
///
/// Must hand back the asset the caller receives. The transfer capability is
/// only borrowed for the duration of the call.
pub trait WithdrawHook: Send + Sync {
    fn withdraw(
        &self,
        dispatcher: &mut Dispatcher,
        caller: Address,
        store: StoreId,
        amount: u64,
        transfer_ref: &TransferRef,
    ) -> DispatchResult<FungibleAsset>;
}

/// Typed deposit hook
pub trait DepositHook: Send + Sync {
    fn deposit(
        &self,
        dispatcher: &mut Dispatcher,
        store: StoreId,
        asset: FungibleAsset,
        transfer_ref: &TransferRef,
    ) -> DispatchResult<()>;
}

struct WithdrawAdapter(Arc<dyn WithdrawHook>);

impl DispatchFunction for WithdrawAdapter {
    fn call<'a>(
        &self,
        dispatcher: &mut Dispatcher,
        args: Vec<Value<'a>>,
    ) -> DispatchResult<Vec<Value<'a>>> {
        let mut args = args.into_iter();
        match (
            args.next(),
            args.next(),
            args.next(),
            args.next(),
            args.next(),
            args.next(),
        ) {
            (
                Some(Value::Address(caller)),
                Some(Value::Store(store)),
                Some(Value::U64(amount)),
                Some(Value::TransferRef(transfer_ref)),
                Some(Value::Function(_)),
                None,
            ) => {
                let asset = self
                    .0
                    .withdraw(dispatcher, caller, store, amount, transfer_ref)?;
                Ok(vec![Value::Asset(asset)])
            }
            _ => Err(DispatchError::argument_mismatch(
                "withdraw hook",
                "arguments do not fit the withdraw shape",
            )),
        }
    }
}

struct DepositAdapter(Arc<dyn DepositHook>);

impl DispatchFunction for DepositAdapter {
    fn call<'a>(
        &self,
        dispatcher: &mut Dispatcher,
        args: Vec<Value<'a>>,
    ) -> DispatchResult<Vec<Value<'a>>> {
        let mut args = args.into_iter();
        match (args.next(), args.next(), args.next(), args.next(), args.next()) {
            (
                Some(Value::Store(store)),
                Some(Value::Asset(asset)),
                Some(Value::TransferRef(transfer_ref)),
                Some(Value::Function(_)),
                None,
            ) => {
                self.0.deposit(dispatcher, store, asset, transfer_ref)?;
                Ok(vec![])
            }
            _ => Err(DispatchError::argument_mismatch(
                "deposit hook",
                "arguments do not fit the deposit shape",
            )),
        }
    }
}

#[derive(Clone)]
struct PublishedFunction {
    identity: FunctionIdentity,
    body: Arc<dyn DispatchFunction>,
}

/// Registry of published functions, keyed by `(module, name)`
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<(ModuleId, String), PublishedFunction>,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self
            .functions
            .values()
            .map(|p| p.identity.to_string())
            .collect();
        names.sort();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a function body with an explicit signature
    ///
    /// Names are immutable once published.
    pub fn publish(
        &mut self,
        module: ModuleId,
        name: impl Into<String>,
        signature: Signature,
        body: Arc<dyn DispatchFunction>,
    ) -> DispatchResult<FunctionIdentity> {
        let name = name.into();
        let key = (module.clone(), name.clone());
        if self.functions.contains_key(&key) {
            return Err(DispatchError::FunctionAlreadyPublished {
                module: module.to_string(),
                name,
            });
        }

        let identity = FunctionIdentity {
            module,
            name,
            signature,
        };
        tracing::debug!(function = %identity, signature = %identity.signature, "Published function");

        self.functions.insert(
            key,
            PublishedFunction {
                identity: identity.clone(),
                body,
            },
        );
        Ok(identity)
    }

    /// Publish a typed withdraw hook under the canonical withdraw shape
    pub fn publish_withdraw_hook(
        &mut self,
        module: ModuleId,
        name: impl Into<String>,
        hook: Arc<dyn WithdrawHook>,
    ) -> DispatchResult<FunctionIdentity> {
        self.publish(
            module,
            name,
            Signature::withdraw_dispatcher(),
            Arc::new(WithdrawAdapter(hook)),
        )
    }

    /// Publish a typed deposit hook under the canonical deposit shape
    pub fn publish_deposit_hook(
        &mut self,
        module: ModuleId,
        name: impl Into<String>,
        hook: Arc<dyn DepositHook>,
    ) -> DispatchResult<FunctionIdentity> {
        self.publish(
            module,
            name,
            Signature::deposit_dispatcher(),
            Arc::new(DepositAdapter(hook)),
        )
    }

    /// Look up the identity of a published function
    pub fn resolve_function_identity(
        &self,
        module: &ModuleId,
        name: &str,
    ) -> DispatchResult<FunctionIdentity> {
        self.lookup(module, name).map(|p| p.identity.clone())
    }

    /// Fail unless `identity` is exactly what is published under its name
    pub fn ensure_published(&self, identity: &FunctionIdentity) -> DispatchResult<()> {
        self.body(identity).map(|_| ())
    }

    pub(crate) fn body(&self, identity: &FunctionIdentity) -> DispatchResult<Arc<dyn DispatchFunction>> {
        let published = self.lookup(&identity.module, &identity.name)?;
        if published.identity != *identity {
            return Err(DispatchError::argument_mismatch(
                identity,
                "published signature differs from the bound identity",
            ));
        }
        Ok(published.body.clone())
    }

    fn lookup(&self, module: &ModuleId, name: &str) -> DispatchResult<&PublishedFunction> {
        self.functions
            .get(&(module.clone(), name.to_string()))
            .ok_or_else(|| DispatchError::FunctionNotFound {
                module: module.to_string(),
                name: name.to_string(),
            })
    }

    /// Number of published functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dasset_core::AssetClass;

    struct Noop;

    impl DispatchFunction for Noop {
        fn call<'a>(
            &self,
            _dispatcher: &mut Dispatcher,
            _args: Vec<Value<'a>>,
        ) -> DispatchResult<Vec<Value<'a>>> {
            Ok(vec![])
        }
    }

    fn module() -> ModuleId {
        ModuleId::new(Address::from_u64(0xcafe), "hooks")
    }

    #[test]
    fn test_publish_and_resolve() {
        let mut registry = FunctionRegistry::new();
        let published = registry
            .publish(module(), "noop", Signature::deposit_dispatcher(), Arc::new(Noop))
            .unwrap();

        let resolved = registry.resolve_function_identity(&module(), "noop").unwrap();
        assert_eq!(resolved, published);
        assert_eq!(resolved.name(), "noop");
        assert_eq!(resolved.signature(), &Signature::deposit_dispatcher());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolve_missing() {
        let registry = FunctionRegistry::new();
        let err = registry.resolve_function_identity(&module(), "missing").unwrap_err();
        assert!(matches!(err, DispatchError::FunctionNotFound { .. }));
    }

    #[test]
    fn test_duplicate_publish_rejected() {
        let mut registry = FunctionRegistry::new();
        registry
            .publish(module(), "noop", Signature::deposit_dispatcher(), Arc::new(Noop))
            .unwrap();
        let err = registry
            .publish(module(), "noop", Signature::withdraw_dispatcher(), Arc::new(Noop))
            .unwrap_err();
        assert!(matches!(err, DispatchError::FunctionAlreadyPublished { .. }));
    }

    #[test]
    fn test_identity_from_other_registry_rejected() {
        let mut a = FunctionRegistry::new();
        let mut b = FunctionRegistry::new();
        let identity = a
            .publish(module(), "f", Signature::deposit_dispatcher(), Arc::new(Noop))
            .unwrap();
        b.publish(module(), "f", Signature::withdraw_dispatcher(), Arc::new(Noop))
            .unwrap();

        assert!(a.ensure_published(&identity).is_ok());
        assert!(matches!(
            b.ensure_published(&identity),
            Err(DispatchError::ArgumentMismatch { .. })
        ));
    }

    #[test]
    fn test_value_matching() {
        assert!(Value::U64(1).matches(&TypeTag::U64));
        assert!(!Value::U64(1).matches(&TypeTag::Address));
        assert!(Value::Store(StoreId::new(Address::ZERO)).matches(&TypeTag::generic_store()));
        assert!(Value::Asset(FungibleAsset::zero(AssetClass::new(Address::ZERO)))
            .matches(&TypeTag::Asset));
        assert!(!Value::Bool(true).matches(&TypeTag::TypeParam(0)));
    }

    #[test]
    fn test_check_values_reports_position() {
        let mut registry = FunctionRegistry::new();
        let identity = registry
            .publish(module(), "f", Signature::withdraw_dispatcher(), Arc::new(Noop))
            .unwrap();

        let values = vec![Value::U64(1)];
        let err = check_values(&identity, &identity.signature().params, &values, "argument")
            .unwrap_err();
        assert!(err.to_string().contains("expected 5 arguments, got 1"));

        let values = vec![
            Value::Address(Address::ZERO),
            Value::U64(1),
            Value::U64(1),
            Value::Bool(false),
            Value::Bool(false),
        ];
        let err = check_values(&identity, &identity.signature().params, &values, "argument")
            .unwrap_err();
        assert!(err.to_string().contains("argument 1 should be Store<T0>, got u64"));
    }
}
