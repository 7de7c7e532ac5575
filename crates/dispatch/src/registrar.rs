//! Registrar - binds hooks to an asset class
//!
//! Registration is one-shot per class. Once it succeeds the class's default
//! transfer path is frozen and every withdraw and deposit goes through the
//! bound hooks.

use dasset_ledger::ConstructorRef;

use crate::dispatcher::Dispatcher;
use crate::error::{DispatchError, DispatchResult};
use crate::function::FunctionIdentity;
use crate::record::ExtensionRecord;
use crate::signature::{is_dispatch_compatible, HookKind, Signature};

impl Dispatcher {
    /// Register dispatch hooks for the class behind `constructor_ref`
    ///
    /// Fails without side effects when either hook is unpublished or has the
    /// wrong shape, when the class is deletable, or when it already has hooks.
    pub fn register(
        &mut self,
        constructor_ref: &ConstructorRef,
        withdraw_hook: FunctionIdentity,
        deposit_hook: FunctionIdentity,
    ) -> DispatchResult<()> {
        self.atomic("register", |d| {
            d.functions.ensure_published(&withdraw_hook)?;
            d.functions.ensure_published(&deposit_hook)?;

            if !is_dispatch_compatible(&Signature::withdraw_dispatcher(), &withdraw_hook) {
                return Err(DispatchError::SignatureMismatch(HookKind::Withdraw));
            }
            if !is_dispatch_compatible(&Signature::deposit_dispatcher(), &deposit_hook) {
                return Err(DispatchError::SignatureMismatch(HookKind::Deposit));
            }

            let class = constructor_ref.class();
            if constructor_ref.can_delete() {
                return Err(DispatchError::ClassIsDeletable(class));
            }
            if d.extensions.contains(&class) {
                return Err(DispatchError::AlreadyRegistered(class));
            }

            let extend_ref = constructor_ref.generate_extend_ref();
            d.ledger.set_default_transfer_frozen(&extend_ref, true)?;

            let transfer_ref = constructor_ref.generate_transfer_ref();
            tracing::info!(
                class = %class,
                withdraw_hook = %withdraw_hook,
                deposit_hook = %deposit_hook,
                "Registered dispatch hooks"
            );
            d.extensions.insert(ExtensionRecord::new(
                class,
                withdraw_hook,
                deposit_hook,
                transfer_ref,
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dasset_core::{Address, AssetSymbol};
    use dasset_ledger::{ClassMetadata, FungibleLedger, LedgerError};

    use super::*;
    use crate::function::{DispatchFunction, FunctionRegistry, ModuleId, Value};
    use crate::signature::TypeTag;

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

    struct Setup {
        dispatcher: Dispatcher,
        ctor: ConstructorRef,
        withdraw: FunctionIdentity,
        deposit: FunctionIdentity,
    }

    fn setup(deletable: bool) -> Setup {
        let issuer = Address::from_u64(0x1551);
        let mut ledger = FungibleLedger::new();
        let metadata = ClassMetadata::new("Test", "TST".parse::<AssetSymbol>().unwrap(), 6);
        let ctor = ledger
            .create_class(issuer, "test", metadata, deletable)
            .unwrap();

        let mut dispatcher = Dispatcher::new(ledger);
        let module = ModuleId::new(issuer, "hooks");
        let functions = dispatcher.functions_mut();
        let withdraw = functions
            .publish(module.clone(), "withdraw", Signature::withdraw_dispatcher(), Arc::new(Noop))
            .unwrap();
        let deposit = functions
            .publish(module, "deposit", Signature::deposit_dispatcher(), Arc::new(Noop))
            .unwrap();

        Setup {
            dispatcher,
            ctor,
            withdraw,
            deposit,
        }
    }

    #[test]
    fn test_register_freezes_default_path() {
        let Setup {
            mut dispatcher,
            ctor,
            withdraw,
            deposit,
        } = setup(false);
        let class = ctor.class();

        dispatcher.register(&ctor, withdraw.clone(), deposit).unwrap();

        assert!(dispatcher.is_dispatchable(&class));
        assert!(dispatcher.ledger().is_default_transfer_frozen(&class).unwrap());
        assert_eq!(dispatcher.extension(&class).unwrap().withdraw_hook, withdraw);
    }

    #[test]
    fn test_swapped_hooks_rejected() {
        let Setup {
            mut dispatcher,
            ctor,
            withdraw,
            deposit,
        } = setup(false);

        let err = dispatcher.register(&ctor, deposit, withdraw).unwrap_err();
        assert_eq!(err, DispatchError::SignatureMismatch(HookKind::Withdraw));
        assert!(!dispatcher.is_dispatchable(&ctor.class()));
    }

    #[test]
    fn test_deposit_shape_checked() {
        let Setup {
            mut dispatcher,
            ctor,
            withdraw,
            ..
        } = setup(false);
        let bad = dispatcher
            .functions_mut()
            .publish(
                ModuleId::new(Address::from_u64(0x1551), "hooks"),
                "bad_deposit",
                Signature::new(1, vec![TypeTag::generic_store(), TypeTag::Asset], vec![]),
                Arc::new(Noop),
            )
            .unwrap();

        let err = dispatcher.register(&ctor, withdraw, bad).unwrap_err();
        assert_eq!(err, DispatchError::SignatureMismatch(HookKind::Deposit));
    }

    #[test]
    fn test_deletable_class_rejected() {
        let Setup {
            mut dispatcher,
            ctor,
            withdraw,
            deposit,
        } = setup(true);

        let err = dispatcher.register(&ctor, withdraw, deposit).unwrap_err();
        assert_eq!(err, DispatchError::ClassIsDeletable(ctor.class()));
        assert!(!dispatcher
            .ledger()
            .is_default_transfer_frozen(&ctor.class())
            .unwrap());
    }

    #[test]
    fn test_second_registration_rejected() {
        let Setup {
            mut dispatcher,
            ctor,
            withdraw,
            deposit,
        } = setup(false);

        dispatcher
            .register(&ctor, withdraw.clone(), deposit.clone())
            .unwrap();
        let err = dispatcher.register(&ctor, withdraw, deposit).unwrap_err();
        assert_eq!(err, DispatchError::AlreadyRegistered(ctor.class()));
        assert_eq!(dispatcher.extensions().len(), 1);
    }

    #[test]
    fn test_unpublished_hook_rejected() {
        let Setup {
            mut dispatcher,
            ctor,
            withdraw,
            ..
        } = setup(false);

        let mut other = FunctionRegistry::new();
        let stray = other
            .publish(
                ModuleId::new(Address::from_u64(0xbad), "elsewhere"),
                "deposit",
                Signature::deposit_dispatcher(),
                Arc::new(Noop),
            )
            .unwrap();

        let err = dispatcher.register(&ctor, withdraw, stray).unwrap_err();
        assert!(matches!(err, DispatchError::FunctionNotFound { .. }));
    }

    #[test]
    fn test_unknown_class_leaves_no_record() {
        let Setup {
            ctor,
            withdraw,
            deposit,
            ..
        } = setup(false);

        // Constructor from a ledger the dispatcher does not own
        let mut dispatcher = Dispatcher::new(FungibleLedger::new());
        dispatcher
            .functions_mut()
            .publish(
                withdraw.module().clone(),
                withdraw.name(),
                withdraw.signature().clone(),
                Arc::new(Noop),
            )
            .unwrap();
        dispatcher
            .functions_mut()
            .publish(
                deposit.module().clone(),
                deposit.name(),
                deposit.signature().clone(),
                Arc::new(Noop),
            )
            .unwrap();

        let err = dispatcher.register(&ctor, withdraw, deposit).unwrap_err();
        assert_eq!(err, DispatchError::Ledger(LedgerError::UnknownClass(ctor.class())));
        assert!(dispatcher.extensions().is_empty());
    }
}
