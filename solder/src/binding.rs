use std::marker::PhantomData;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use crate::construct::{ConstructorPlan, Produce, plans_of};
use crate::container::Container;
use crate::error::{BindingError, ResolveError, StdError};
use crate::inject::{Implements, Injectable};
use crate::instance::{Instance, Svc};
use crate::{InjectionContext, TypeKey};

/// How long a resolved instance is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    /// A new instance is produced on every resolution.
    #[default]
    Transient,
    /// One instance is shared per container.
    Singleton,
}

/// How a binding produces instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Construct through an injection constructor.
    FromNew,
    /// Hand out a pre-supplied instance.
    FromInstance,
    /// Invoke a factory delegate.
    FromFactory,
}

pub(crate) type Condition = Rc<dyn Fn(&InjectionContext) -> bool>;

/// The construction strategy of a binding. Exactly one variant holds the
/// data that matches it, so an inconsistent binding cannot be represented.
#[derive(Clone)]
pub(crate) enum Source {
    Instance(Instance),
    Factory(Produce),
    New(Vec<ConstructorPlan>),
}

/// Immutable descriptor mapping an interface type to a construction
/// strategy, lifetime, and optional applicability condition.
///
/// Bindings are usually created through [`Container::bind`]; the direct
/// constructors below cover hosts that assemble bindings programmatically
/// and register them with [`Container::register`].
///
/// Re-registering under the same interface type replaces the prior binding.
#[derive(Clone)]
pub struct Binding {
    pub(crate) interface: TypeKey,
    pub(crate) implementation: TypeKey,
    pub(crate) lifetime: Lifetime,
    pub(crate) source: Source,
    pub(crate) condition: Option<Condition>,
}

impl Binding {
    /// A binding that constructs new instances of `C` for the interface `I`.
    pub fn to_new<I, C>() -> Self
    where
        I: ?Sized + 'static,
        C: Injectable + Implements<I>,
    {
        Self {
            interface: TypeKey::of::<I>(),
            implementation: TypeKey::of::<C>(),
            lifetime: Lifetime::default(),
            source: Source::New(plans_of::<I, C>()),
            condition: None,
        }
    }

    /// A binding to a pre-existing instance.
    ///
    /// Externally supplied instances are handed out verbatim: member
    /// injection is never applied to them, neither at registration nor at
    /// resolution time. Call [`Container::inject`] explicitly if the
    /// instance has members to populate.
    pub fn to_instance<I, C>(instance: Svc<C>) -> Self
    where
        I: ?Sized + 'static,
        C: Implements<I>,
    {
        Self {
            interface: TypeKey::of::<I>(),
            implementation: TypeKey::of::<C>(),
            lifetime: Lifetime::default(),
            source: Source::Instance(Instance::new::<I>(C::as_service(instance))),
            condition: None,
        }
    }

    /// A binding that produces instances through `factory`.
    ///
    /// Factory results receive member injection before they are handed out.
    pub fn to_factory<I, C, F>(factory: F) -> Self
    where
        I: ?Sized + 'static,
        C: Injectable + Implements<I>,
        F: Fn() -> Result<C, StdError> + 'static,
    {
        let produce: Produce = Rc::new(move |cx| {
            let mut value = factory().map_err(ResolveError::factory_failed::<C>)?;
            value.inject_members(cx)?;
            Ok(Instance::new::<I>(C::as_service(Svc::new(value))))
        });
        Self {
            interface: TypeKey::of::<I>(),
            implementation: TypeKey::of::<C>(),
            lifetime: Lifetime::default(),
            source: Source::Factory(produce),
            condition: None,
        }
    }

    /// Sets the lifetime.
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Sets the applicability condition.
    pub fn with_condition<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&InjectionContext) -> bool + 'static,
    {
        self.condition = Some(Rc::new(predicate));
        self
    }

    /// The interface type this binding applies to.
    pub fn interface(&self) -> TypeKey {
        self.interface
    }

    /// The concrete implementation type this binding resolves to.
    pub fn implementation(&self) -> TypeKey {
        self.implementation
    }

    /// The lifetime of resolved instances.
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// How this binding produces instances.
    pub fn source(&self) -> SourceKind {
        match self.source {
            Source::Instance(_) => SourceKind::FromInstance,
            Source::Factory(_) => SourceKind::FromFactory,
            Source::New(_) => SourceKind::FromNew,
        }
    }

    /// Whether an applicability condition is attached.
    pub fn has_condition(&self) -> bool {
        self.condition.is_some()
    }

    /// Evaluates the condition against `ctx`.
    ///
    /// A panicking predicate is contained and reads as false, so a broken
    /// condition hides the binding instead of aborting the resolution.
    pub(crate) fn condition_allows(&self, ctx: &InjectionContext) -> bool {
        match &self.condition {
            None => true,
            Some(predicate) => {
                let predicate = Rc::clone(predicate);
                catch_unwind(AssertUnwindSafe(|| (predicate.as_ref())(ctx))).unwrap_or(false)
            }
        }
    }
}

/// Fluent, re-entrant binding registrar obtained from [`Container::bind`].
///
/// Every configuration call that leaves the binding in a valid state
/// re-registers it immediately, so the last call always wins. Selecting a
/// source more than once is allowed; the lifetime and condition configured
/// so far carry over to the new source.
///
/// # Examples
///
/// ```rust
/// use solder::{Container, Implements, Injectable, Svc};
///
/// trait Greeter {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct ConsoleGreeter;
///
/// impl Greeter for ConsoleGreeter {
///     fn greet(&self) -> String {
///         "hello".into()
///     }
/// }
///
/// impl Injectable for ConsoleGreeter {
///     fn constructors() -> Vec<solder::Constructor<Self>> {
///         vec![solder::Constructor::new("default", Vec::new(), |_cx| {
///             Ok(ConsoleGreeter)
///         })]
///     }
/// }
///
/// impl Implements<dyn Greeter> for ConsoleGreeter {
///     fn as_service(svc: Svc<Self>) -> Svc<dyn Greeter> {
///         svc
///     }
/// }
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let container = Container::new();
/// container
///     .bind::<dyn Greeter>()
///     .to::<ConsoleGreeter>()
///     .as_singleton()?;
///
/// let greeter = container.resolve::<dyn Greeter>()?;
/// assert_eq!(greeter.greet(), "hello");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct BindingBuilder<'c, I>
where
    I: ?Sized + 'static,
{
    container: &'c Container,
    interface: TypeKey,
    binding: Option<Binding>,
    _marker: PhantomData<fn(Svc<I>) -> Svc<I>>,
}

impl<'c, I> BindingBuilder<'c, I>
where
    I: ?Sized + 'static,
{
    pub(crate) fn new(container: &'c Container) -> Self {
        Self {
            container,
            interface: TypeKey::of::<I>(),
            binding: None,
            _marker: PhantomData,
        }
    }

    /// Binds the interface to new constructions of `C` and registers the
    /// binding (transient unless configured otherwise).
    pub fn to<C>(mut self) -> Self
    where
        C: Injectable + Implements<I>,
    {
        self.replace_source(Binding::to_new::<I, C>());
        self
    }

    /// Binds a concrete type to itself.
    pub fn to_self(self) -> Self
    where
        I: Injectable,
    {
        self.to::<I>()
    }

    /// Binds the interface to a pre-existing instance and registers the
    /// binding.
    ///
    /// The instance is handed out verbatim on every resolution; member
    /// injection is never re-applied to it (see [`Binding::to_instance`]).
    pub fn from_instance<C>(mut self, instance: Svc<C>) -> Self
    where
        C: Implements<I>,
    {
        self.replace_source(Binding::to_instance::<I, C>(instance));
        self
    }

    /// Binds the interface to a factory delegate and registers the binding.
    pub fn from_factory<C, F>(mut self, factory: F) -> Self
    where
        C: Injectable + Implements<I>,
        F: Fn() -> Result<C, StdError> + 'static,
    {
        self.replace_source(Binding::to_factory::<I, C, F>(factory));
        self
    }

    /// Marks the binding transient and re-registers it.
    pub fn as_transient(self) -> Result<Self, BindingError> {
        self.update(|binding| binding.lifetime = Lifetime::Transient)
    }

    /// Marks the binding singleton and re-registers it.
    pub fn as_singleton(self) -> Result<Self, BindingError> {
        self.update(|binding| binding.lifetime = Lifetime::Singleton)
    }

    /// Attaches an applicability condition and re-registers the binding.
    ///
    /// The binding is only visible to lookups whose [`InjectionContext`]
    /// satisfies the predicate; a false or panicking predicate makes the
    /// lookup fall through to an unconditional parent binding, if any.
    pub fn when<P>(self, predicate: P) -> Result<Self, BindingError>
    where
        P: Fn(&InjectionContext) -> bool + 'static,
    {
        self.update(|binding| binding.condition = Some(Rc::new(predicate)))
    }

    fn replace_source(&mut self, mut binding: Binding) {
        if let Some(previous) = &self.binding {
            binding.lifetime = previous.lifetime;
            binding.condition = previous.condition.clone();
        }
        self.register(binding);
    }

    fn update(mut self, apply: impl FnOnce(&mut Binding)) -> Result<Self, BindingError> {
        match self.binding.take() {
            None => Err(BindingError::MissingImplementation {
                interface: self.interface,
            }),
            Some(mut binding) => {
                apply(&mut binding);
                self.register(binding);
                Ok(self)
            }
        }
    }

    fn register(&mut self, binding: Binding) {
        self.container.insert_binding(binding.clone());
        self.binding = Some(binding);
    }
}
