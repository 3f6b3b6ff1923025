use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::binding::{Binding, BindingBuilder};
use crate::cache::Cache;
use crate::error::{ResolveError, ScopeError, StdError};
use crate::inject::{DynInjectable, Injectable};
use crate::installer::Installer;
use crate::instance::Svc;
use crate::registry::Registry;
use crate::resolve::Resolution;
use crate::{InjectionContext, TypeKey};

pub(crate) struct ContainerInner {
    parent: Option<Rc<ContainerInner>>,
    pub(crate) registry: RefCell<Registry>,
    pub(crate) cache: RefCell<Cache>,
}

impl ContainerInner {
    pub(crate) fn parent(&self) -> Option<Rc<ContainerInner>> {
        self.parent.clone()
    }

    /// Whether a binding for `key` is visible from this container, walking
    /// the parent chain and honoring conditions. Used by the constructor
    /// eligibility check; no instances are produced.
    pub(crate) fn binding_visible(&self, key: &TypeKey, ctx: &InjectionContext) -> bool {
        if self.registry.borrow().contains(key, ctx) {
            return true;
        }
        match &self.parent {
            Some(parent) => parent.binding_visible(key, ctx),
            None => false,
        }
    }
}

/// Composition root exposing registration, resolution, and injection as one
/// facade.
///
/// A container owns its own binding registry and singleton cache and may
/// have a parent: lookups that miss locally fall back to the parent chain,
/// while singleton instances stay in the container whose binding produced
/// them. Cloning a `Container` clones a handle to the same underlying
/// scope.
///
/// Containers are single threaded; share one across threads and the
/// compiler will stop you (`Container` is not `Send`).
///
/// # Examples
///
/// ```rust
/// use solder::{Container, Svc};
///
/// struct Settings {
///     volume: u8,
/// }
///
/// let container = Container::new();
/// container
///     .bind::<Settings>()
///     .from_instance(Svc::new(Settings { volume: 7 }));
///
/// let settings = container.resolve::<Settings>().unwrap();
/// assert_eq!(settings.volume, 7);
/// ```
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: Rc<ContainerInner>,
}

impl Container {
    /// Creates a root container with no parent.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ContainerInner {
                parent: None,
                registry: RefCell::new(Registry::default()),
                cache: RefCell::new(Cache::default()),
            }),
        }
    }

    /// Creates a child container.
    ///
    /// The child starts with an empty registry and an empty singleton
    /// cache; resolutions that miss locally fall back to this container.
    /// A child binding shadows an identically typed parent binding for
    /// resolutions performed through the child, without removing it.
    pub fn child(&self) -> Self {
        Self {
            inner: Rc::new(ContainerInner {
                parent: Some(Rc::clone(&self.inner)),
                registry: RefCell::new(Registry::default()),
                cache: RefCell::new(Cache::default()),
            }),
        }
    }

    /// Returns the parent container, if any.
    pub fn parent(&self) -> Option<Container> {
        self.inner.parent().map(|inner| Container { inner })
    }

    /// Opens a fluent binding builder for the interface `I`.
    ///
    /// See [`BindingBuilder`] for the available configuration calls.
    pub fn bind<I>(&self) -> BindingBuilder<'_, I>
    where
        I: ?Sized + 'static,
    {
        BindingBuilder::new(self)
    }

    /// Registers a programmatically assembled [`Binding`], replacing any
    /// prior binding for the same interface type.
    pub fn register(&self, binding: Binding) {
        self.insert_binding(binding);
    }

    /// Removes the local binding for `I`, leaving parent bindings and any
    /// cached singleton untouched. Returns whether a binding was present.
    pub fn unbind<I>(&self) -> bool
    where
        I: ?Sized + 'static,
    {
        let key = TypeKey::of::<I>();
        let removed = self.inner.registry.borrow_mut().remove(&key);
        if removed {
            debug!(interface = %key, "unbound");
        }
        removed
    }

    /// Drops the cached singleton for `I` from this container, if present.
    pub fn clear_cached<I>(&self) -> bool
    where
        I: ?Sized + 'static,
    {
        self.inner.cache.borrow_mut().remove(&TypeKey::of::<I>())
    }

    /// Resolves `T` into a fully constructed, dependency-satisfied handle.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] wrapping the precise failure: a missing
    /// binding, a dependency cycle, a failed constructor or factory, or a
    /// failed member injection. See [`ResolveError::root_cause`].
    pub fn resolve<T>(&self) -> Result<Svc<T>, ResolveError>
    where
        T: ?Sized + 'static,
    {
        self.resolve_with::<T>(&InjectionContext::request::<T>())
    }

    /// Resolves `T` under an explicit [`InjectionContext`], which binding
    /// conditions observe.
    pub fn resolve_with<T>(&self, ctx: &InjectionContext) -> Result<Svc<T>, ResolveError>
    where
        T: ?Sized + 'static,
    {
        Resolution::new(Rc::clone(&self.inner)).resolve::<T>(ctx)
    }

    /// Populates the marked members of an existing object.
    ///
    /// Members are overwritten unconditionally. The first failing member
    /// aborts the call with a [`ResolveError::MemberInjection`]; members
    /// injected before the failure keep their values.
    pub fn inject<T>(&self, target: &mut T) -> Result<(), ResolveError>
    where
        T: Injectable,
    {
        let mut resolution = Resolution::new(Rc::clone(&self.inner));
        target.inject_members(&mut resolution)
    }

    /// Populates the marked members of a type-erased object, for hosts that
    /// hold heterogeneous `Box<dyn ..>` collections.
    pub fn inject_dyn(&self, target: &mut dyn DynInjectable) -> Result<(), ResolveError> {
        let mut resolution = Resolution::new(Rc::clone(&self.inner));
        target.inject_members_dyn(&mut resolution)
    }

    /// Constructs `T` through its injection constructors without requiring
    /// a binding for `T` itself, then runs member injection on the result.
    ///
    /// Constructor parameters are resolved against this container's
    /// bindings with the usual selection policy.
    pub fn construct<T>(&self) -> Result<Svc<T>, ResolveError>
    where
        T: Injectable,
    {
        Resolution::new(Rc::clone(&self.inner)).construct_unbound::<T>()
    }

    /// Runs a single installer against this container.
    pub fn install(&self, installer: &dyn Installer) -> Result<(), StdError> {
        installer.install_bindings(self)
    }

    /// Runs installers in order; the first error aborts the remainder.
    pub fn install_all(&self, installers: &[&dyn Installer]) -> Result<(), StdError> {
        for installer in installers {
            installer.install_bindings(self)?;
        }
        Ok(())
    }

    pub(crate) fn insert_binding(&self, binding: Binding) {
        debug!(
            interface = %binding.interface(),
            implementation = %binding.implementation(),
            lifetime = ?binding.lifetime(),
            source = ?binding.source(),
            "registered binding"
        );
        self.inner.registry.borrow_mut().insert(binding);
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

/// Explicit push/pop management of a container hierarchy.
///
/// The stack starts at a root container; [`push`](ScopeStack::push) enters
/// a child scope and [`pop`](ScopeStack::pop) leaves it again. Popping the
/// root scope is an error.
///
/// # Examples
///
/// ```rust
/// use solder::{Container, ScopeStack};
///
/// let mut scopes = ScopeStack::new(Container::new());
/// let scene = scopes.push();
/// assert!(scene.parent().is_some());
/// scopes.pop().unwrap();
/// assert!(scopes.pop().is_err());
/// ```
pub struct ScopeStack {
    scopes: Vec<Container>,
}

impl ScopeStack {
    /// Creates a stack rooted at `root`.
    pub fn new(root: Container) -> Self {
        Self { scopes: vec![root] }
    }

    /// Enters a new child scope of the current container and returns it.
    pub fn push(&mut self) -> Container {
        let child = self.current().child();
        self.scopes.push(child.clone());
        child
    }

    /// Leaves the current scope, returning the popped container.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::RootScope`] when only the root remains.
    pub fn pop(&mut self) -> Result<Container, ScopeError> {
        if self.scopes.len() == 1 {
            return Err(ScopeError::RootScope);
        }
        Ok(self.scopes.pop().expect("stack holds at least the root"))
    }

    /// The container of the innermost scope.
    pub fn current(&self) -> &Container {
        self.scopes.last().expect("stack holds at least the root")
    }

    /// The number of scopes on the stack, root included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
