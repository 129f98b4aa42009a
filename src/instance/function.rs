//! # Function configuration.
//!
//! [`FunctionConfig`] is opaque to the spawner: it only reads the name triple
//! to label logs and hands the whole value to the container factory and to the
//! metrics sink.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Description of the function an instance runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionConfig {
    /// Owning tenant.
    pub tenant: String,
    /// Namespace within the tenant.
    pub namespace: String,
    /// Function name within the namespace.
    pub name: String,
    /// Entry point of the user code (class, module or symbol).
    #[serde(default)]
    pub entry_point: String,
    /// Free-form settings interpreted by the container.
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

impl FunctionConfig {
    /// Creates a configuration from its name triple.
    pub fn new(
        tenant: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            namespace: namespace.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with the given entry point.
    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    /// Returns a copy with one more setting.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Returns `tenant/namespace/name`.
    pub fn fully_qualified_name(&self) -> String {
        format!("{}/{}/{}", self.tenant, self.namespace, self.name)
    }
}

impl fmt::Display for FunctionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.tenant, self.namespace, self.name)
    }
}
