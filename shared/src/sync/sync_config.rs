use std::default::Default;

use crate::BuiltinConfig;

/// Contains Config properties which will be used by the Synchronizer
#[derive(Clone, Debug, PartialEq)]
pub struct SyncConfig {
    /// Log every change at info level as it is applied
    pub log_changes: bool,
    /// Settings for the built-in `random`, `sample` and `apply` kinds
    pub builtins: BuiltinConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            log_changes: false,
            builtins: BuiltinConfig::default(),
        }
    }
}
