//! Ready-made hook policies
//!
//! - [`DeflationPolicy`] - burns a fraction of every withdraw and deposit
//! - [`AllowlistPolicy`] - only allow-listed owners may receive
//! - [`FeeSkimPolicy`] - skims a flat fee into a treasury on withdraw
//!
//! Each policy implements both [`WithdrawHook`] and [`DepositHook`];
//! [`publish_policy`] publishes the pair in one call.

mod allowlist;
mod deflation;
mod fee_skim;

pub use allowlist::AllowlistPolicy;
pub use deflation::{DeflationConfig, DeflationPolicy};
pub use fee_skim::FeeSkimPolicy;

use std::sync::Arc;

use crate::error::DispatchResult;
use crate::function::{DepositHook, FunctionIdentity, FunctionRegistry, ModuleId, WithdrawHook};

/// Publish `policy` as `module::withdraw` and `module::deposit`
///
/// Returns the `(withdraw, deposit)` identities, ready for `register`.
pub fn publish_policy<P>(
    registry: &mut FunctionRegistry,
    module: ModuleId,
    policy: Arc<P>,
) -> DispatchResult<(FunctionIdentity, FunctionIdentity)>
where
    P: WithdrawHook + DepositHook + 'static,
{
    let withdraw = registry.publish_withdraw_hook(module.clone(), "withdraw", policy.clone())?;
    let deposit = registry.publish_deposit_hook(module, "deposit", policy)?;
    Ok((withdraw, deposit))
}
