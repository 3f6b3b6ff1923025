use std::any::TypeId;
use std::collections::HashMap;

use crate::binding::Binding;
use crate::{InjectionContext, TypeKey};

/// Per-container map from interface type to [`Binding`].
///
/// The key is unique and the last registration wins. Parent fallback is not
/// handled here; the resolver walks the container chain itself.
#[derive(Default)]
pub(crate) struct Registry {
    bindings: HashMap<TypeId, Binding>,
}

impl Registry {
    pub(crate) fn insert(&mut self, binding: Binding) {
        self.bindings.insert(binding.interface().id(), binding);
    }

    pub(crate) fn remove(&mut self, key: &TypeKey) -> bool {
        self.bindings.remove(&key.id()).is_some()
    }

    /// Looks up the binding for `key`, gated by its condition.
    ///
    /// A condition that returns false or panics makes the binding invisible
    /// to this lookup; the caller falls back to the parent chain.
    pub(crate) fn lookup(&self, key: &TypeKey, ctx: &InjectionContext) -> Option<Binding> {
        self.bindings
            .get(&key.id())
            .filter(|binding| binding.condition_allows(ctx))
            .cloned()
    }

    pub(crate) fn contains(&self, key: &TypeKey, ctx: &InjectionContext) -> bool {
        self.bindings
            .get(&key.id())
            .is_some_and(|binding| binding.condition_allows(ctx))
    }
}
