//! Dispatcher configuration
//!
//! Loaded from JSON; every field has a default so partial files work.

use serde::{Deserialize, Serialize};

/// Configuration for the [`Dispatcher`](crate::Dispatcher)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum number of hooks active at once in one call chain.
    /// A hook of one class may route another class, up to this depth.
    #[serde(default = "default_max_dispatch_depth")]
    pub max_dispatch_depth: usize,

    /// Require hooked withdraws to lower the store balance by at least the
    /// requested amount
    #[serde(default)]
    pub enforce_withdraw_debit: bool,

    /// Restore ledger and registrations when a top-level operation fails.
    /// Only turn this off to inspect partial state while debugging a hook.
    #[serde(default = "default_rollback_on_error")]
    pub rollback_on_error: bool,
}

fn default_max_dispatch_depth() -> usize {
    8
}

fn default_rollback_on_error() -> bool {
    true
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_dispatch_depth: default_max_dispatch_depth(),
            enforce_withdraw_debit: false,
            rollback_on_error: default_rollback_on_error(),
        }
    }
}

impl DispatchConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Builder-style override of the depth limit
    pub fn with_max_dispatch_depth(mut self, depth: usize) -> Self {
        self.max_dispatch_depth = depth;
        self
    }

    /// Builder-style toggle for the debit check
    pub fn with_withdraw_debit_check(mut self, enabled: bool) -> Self {
        self.enforce_withdraw_debit = enabled;
        self
    }
}
