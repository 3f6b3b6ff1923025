//! The recursive graph-resolution engine.

use std::rc::Rc;

use tracing::trace;

use crate::binding::{Binding, Lifetime, Source};
use crate::construct::{plans_of, select_plan};
use crate::container::ContainerInner;
use crate::error::ResolveError;
use crate::inject::Injectable;
use crate::instance::{Instance, Svc};
use crate::{InjectionContext, TypeKey};

/// State of one logical resolution call chain.
///
/// A `Resolution` is created per top-level [`Container::resolve`],
/// [`inject`], or [`construct`] call and threaded through every recursive
/// step. It owns the in-progress resolution stack used for cycle detection
/// and tracks the container whose binding is currently being produced, so
/// nested lookups and singleton caching happen in the right scope.
///
/// Host code only ever sees a `Resolution` inside manifest callbacks; the
/// typed helpers below are what generated manifests call.
///
/// [`Container::resolve`]: crate::Container::resolve
/// [`inject`]: crate::Container::inject
/// [`construct`]: crate::Container::construct
pub struct Resolution {
    current: Rc<ContainerInner>,
    stack: Vec<TypeKey>,
}

impl Resolution {
    pub(crate) fn new(scope: Rc<ContainerInner>) -> Self {
        Self {
            current: scope,
            stack: Vec::new(),
        }
    }

    /// Resolves `T` at the given injection site.
    pub fn resolve<T>(&mut self, ctx: &InjectionContext) -> Result<Svc<T>, ResolveError>
    where
        T: ?Sized + 'static,
    {
        let instance = self.resolve_erased(TypeKey::of::<T>(), ctx)?;
        Ok(instance
            .downcast::<T>()
            .expect("resolved instance matches the requested interface"))
    }

    /// Resolves `T` for a marked member, wrapping any failure in a
    /// [`ResolveError::MemberInjection`] naming that member.
    pub fn resolve_member<T>(&mut self, ctx: &InjectionContext) -> Result<Svc<T>, ResolveError>
    where
        T: ?Sized + 'static,
    {
        self.resolve::<T>(ctx)
            .map_err(|source| ResolveError::MemberInjection {
                target: ctx.target().unwrap_or_else(|| ctx.requested()),
                member: ctx.member().map(|member| member.name()).unwrap_or("<member>"),
                source: Box::new(source),
            })
    }

    /// Resolves `T` for a constructor parameter, wrapping any failure in a
    /// [`ResolveError::Construction`] naming the constructor.
    pub fn resolve_argument<T>(&mut self, ctx: &InjectionContext) -> Result<Svc<T>, ResolveError>
    where
        T: ?Sized + 'static,
    {
        self.resolve::<T>(ctx)
            .map_err(|source| ResolveError::Construction {
                implementation: ctx.target().unwrap_or_else(|| ctx.requested()),
                constructor: ctx
                    .member()
                    .map(|member| member.name())
                    .unwrap_or("<constructor>"),
                source: Box::new(source),
            })
    }

    pub(crate) fn resolve_erased(
        &mut self,
        key: TypeKey,
        ctx: &InjectionContext,
    ) -> Result<Instance, ResolveError> {
        if self.stack.contains(&key) {
            return Err(ResolveError::CircularDependency {
                requested: key,
                chain: self.chain_through(key),
            });
        }
        self.stack.push(key);
        let result = self
            .resolve_in(Rc::clone(&self.current), key, ctx)
            .map_err(|source| ResolveError::Resolution {
                requested: key,
                source: Box::new(source),
            });
        self.stack.pop();
        result
    }

    /// Looks up `key` in `scope`, falling back to the parent chain under
    /// the same cycle guard. Production and singleton caching happen in the
    /// container that owns the binding.
    fn resolve_in(
        &mut self,
        scope: Rc<ContainerInner>,
        key: TypeKey,
        ctx: &InjectionContext,
    ) -> Result<Instance, ResolveError> {
        let binding = scope.registry.borrow().lookup(&key, ctx);
        let Some(binding) = binding else {
            return match scope.parent() {
                Some(parent) => self.resolve_in(parent, key, ctx),
                None => Err(ResolveError::BindingNotFound { requested: key }),
            };
        };
        let previous = std::mem::replace(&mut self.current, Rc::clone(&scope));
        let produced = self.produce(&scope, &binding);
        self.current = previous;
        let instance = produced?;
        if binding.lifetime() == Lifetime::Singleton {
            let cached = scope.cache.borrow_mut().store(key, instance);
            trace!(interface = %key, "returning cached singleton");
            return Ok(cached);
        }
        Ok(instance)
    }

    fn produce(
        &mut self,
        scope: &Rc<ContainerInner>,
        binding: &Binding,
    ) -> Result<Instance, ResolveError> {
        match &binding.source {
            Source::Instance(instance) => Ok(instance.clone()),
            Source::Factory(produce) => (produce.as_ref())(self),
            Source::New(plans) => {
                let plan = select_plan(scope, binding.implementation(), plans)?;
                let produce = Rc::clone(&plan.produce);
                (produce.as_ref())(self)
            }
        }
    }

    pub(crate) fn construct_unbound<T>(&mut self) -> Result<Svc<T>, ResolveError>
    where
        T: Injectable,
    {
        let key = TypeKey::of::<T>();
        if self.stack.contains(&key) {
            return Err(ResolveError::CircularDependency {
                requested: key,
                chain: self.chain_through(key),
            });
        }
        self.stack.push(key);
        let result = self.construct_current::<T>(key);
        self.stack.pop();
        result
    }

    fn construct_current<T>(&mut self, key: TypeKey) -> Result<Svc<T>, ResolveError>
    where
        T: Injectable,
    {
        let scope = Rc::clone(&self.current);
        let plans = plans_of::<T, T>();
        let plan = select_plan(&scope, key, &plans)?;
        let produce = Rc::clone(&plan.produce);
        let instance = (produce.as_ref())(self)?;
        Ok(instance
            .downcast::<T>()
            .expect("constructed instance matches the requested type"))
    }

    fn chain_through(&self, key: TypeKey) -> String {
        let mut chain = self
            .stack
            .iter()
            .map(|entry| entry.name())
            .collect::<Vec<_>>();
        chain.push(key.name());
        chain.join(" -> ")
    }
}
