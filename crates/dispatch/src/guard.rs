//! Call-chain guard - rejects hooks that re-enter the router
//!
//! Every hooked route pushes its asset class before the hook runs and pops
//! it when the hook returns. Routing into a class that is already on the
//! chain is a reentrant dispatch.
//!
//! A violation is also remembered until the enclosing operation finishes,
//! so a hook cannot swallow the error and carry on.

use dasset_core::AssetClass;

use crate::error::{DispatchError, DispatchResult};

/// In-progress dispatch chain for one operation
#[derive(Debug, Clone)]
pub struct CallChainGuard {
    active: Vec<AssetClass>,
    max_depth: usize,
    violation: Option<DispatchError>,
}

impl CallChainGuard {
    pub fn new(max_depth: usize) -> Self {
        Self {
            active: Vec::new(),
            max_depth,
            violation: None,
        }
    }

    /// No hook is currently running
    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.active.len()
    }

    pub fn contains(&self, class: &AssetClass) -> bool {
        self.active.contains(class)
    }

    /// Fail if `class` already has a hook running
    pub fn check(&mut self, class: AssetClass) -> DispatchResult<()> {
        if self.contains(&class) {
            tracing::error!(
                class = %class,
                depth = self.depth(),
                "Rejected reentrant dispatch"
            );
            return Err(self.poison(DispatchError::ReentrantDispatch(class)));
        }
        Ok(())
    }

    /// Push `class` before running its hook
    pub fn enter(&mut self, class: AssetClass) -> DispatchResult<()> {
        self.check(class)?;
        if self.depth() >= self.max_depth {
            tracing::error!(
                class = %class,
                limit = self.max_depth,
                "Dispatch depth limit exceeded"
            );
            return Err(self.poison(DispatchError::DispatchDepthExceeded {
                limit: self.max_depth,
            }));
        }
        self.active.push(class);
        Ok(())
    }

    /// Pop `class` after its hook returned, whatever the outcome
    pub fn exit(&mut self, class: AssetClass) {
        let popped = self.active.pop();
        debug_assert_eq!(popped, Some(class), "unbalanced call-chain guard");
    }

    /// Take the recorded violation, if any
    pub fn take_violation(&mut self) -> Option<DispatchError> {
        self.violation.take()
    }

    /// Clear all state after an aborted operation
    pub fn reset(&mut self) {
        self.active.clear();
        self.violation = None;
    }

    fn poison(&mut self, err: DispatchError) -> DispatchError {
        if self.violation.is_none() {
            self.violation = Some(err.clone());
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dasset_core::Address;

    fn class(n: u64) -> AssetClass {
        AssetClass::new(Address::from_u64(n))
    }

    #[test]
    fn test_enter_exit() {
        let mut guard = CallChainGuard::new(4);
        assert!(guard.is_idle());

        guard.enter(class(1)).unwrap();
        assert_eq!(guard.depth(), 1);
        assert!(guard.contains(&class(1)));

        guard.exit(class(1));
        assert!(guard.is_idle());
        assert!(guard.take_violation().is_none());
    }

    #[test]
    fn test_reentry_rejected_and_remembered() {
        let mut guard = CallChainGuard::new(4);
        guard.enter(class(1)).unwrap();

        let err = guard.check(class(1)).unwrap_err();
        assert!(err.is_reentrancy());

        // Other classes may still be routed
        guard.enter(class(2)).unwrap();
        guard.exit(class(2));
        guard.exit(class(1));

        assert_eq!(
            guard.take_violation(),
            Some(DispatchError::ReentrantDispatch(class(1)))
        );
        assert!(guard.take_violation().is_none());
    }

    #[test]
    fn test_depth_limit() {
        let mut guard = CallChainGuard::new(2);
        guard.enter(class(1)).unwrap();
        guard.enter(class(2)).unwrap();

        let err = guard.enter(class(3)).unwrap_err();
        assert_eq!(err, DispatchError::DispatchDepthExceeded { limit: 2 });
        assert_eq!(guard.depth(), 2);
    }

    #[test]
    fn test_first_violation_wins() {
        let mut guard = CallChainGuard::new(1);
        guard.enter(class(1)).unwrap();
        let _ = guard.enter(class(2));
        let _ = guard.check(class(1));

        assert_eq!(
            guard.take_violation(),
            Some(DispatchError::DispatchDepthExceeded { limit: 1 })
        );
    }

    #[test]
    fn test_reset() {
        let mut guard = CallChainGuard::new(4);
        guard.enter(class(1)).unwrap();
        let _ = guard.check(class(1));

        guard.reset();
        assert!(guard.is_idle());
        assert!(guard.take_violation().is_none());
    }
}
