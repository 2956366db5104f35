//! Flag store: named booleans shared between the host and endpoints.
//! Names are fully qualified, e.g. `cell.connected` or `endpoint.cell.joined`.

use std::collections::BTreeSet;

use log::debug;

/// Placeholder replaced by the endpoint name in flag templates.
pub const ENDPOINT_NAME_PLACEHOLDER: &str = "{endpoint_name}";

/// Idempotent boolean store. The host owns persistence; endpoints only set and clear
/// flags in their own namespace.
pub trait FlagStore {
    /// Set `name`. Returns true if the flag was not already set.
    fn set(&mut self, name: &str) -> bool;
    /// Clear `name`. Returns true if the flag was set.
    fn clear(&mut self, name: &str) -> bool;
    fn is_set(&self, name: &str) -> bool;
}

/// In-memory flag store. Suitable for hosts without persistence and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFlagStore {
    flags: BTreeSet<String>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All set flags, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl FlagStore for MemoryFlagStore {
    fn set(&mut self, name: &str) -> bool {
        let changed = self.flags.insert(name.to_string());
        if changed {
            debug!("flag set: {}", name);
        }
        changed
    }

    fn clear(&mut self, name: &str) -> bool {
        let changed = self.flags.remove(name);
        if changed {
            debug!("flag cleared: {}", name);
        }
        changed
    }

    fn is_set(&self, name: &str) -> bool {
        self.flags.contains(name)
    }
}

/// Expand a flag template for an endpoint: `{endpoint_name}.connected` -> `cell.connected`.
pub fn expand_name(endpoint_name: &str, template: &str) -> String {
    template.replace(ENDPOINT_NAME_PLACEHOLDER, endpoint_name)
}
