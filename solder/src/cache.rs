use std::any::TypeId;
use std::collections::HashMap;

use crate::TypeKey;
use crate::instance::Instance;

/// Per-container singleton store.
///
/// Entries are created lazily on first singleton resolution and never shared
/// with parent or child containers.
#[derive(Default)]
pub(crate) struct Cache {
    instances: HashMap<TypeId, Instance>,
}

impl Cache {
    /// Stores `instance` under `key` unless an entry already exists and
    /// returns the winning entry. The first writer wins so that reentrant
    /// resolutions observe a single instance.
    pub(crate) fn store(&mut self, key: TypeKey, instance: Instance) -> Instance {
        self.instances.entry(key.id()).or_insert(instance).clone()
    }

    pub(crate) fn remove(&mut self, key: &TypeKey) -> bool {
        self.instances.remove(&key.id()).is_some()
    }
}
