//! Injection manifests for types constructed or populated by the container.
//!
//! Rust has no runtime reflection, so every type that participates in
//! constructor or member injection declares an explicit manifest through
//! the [`Injectable`] trait: a table of injection constructors and a routine
//! that populates its marked members. Manifests are usually generated by
//! the `#[derive(Injectable)]` and `#[injectable]` macros from
//! `solder-macros`, but hand-written implementations are fully supported.

use crate::construct::Constructor;
use crate::error::ResolveError;
use crate::instance::Svc;
use crate::resolve::Resolution;

/// Declares how the container constructs a type and populates its members.
///
/// Both items default to "nothing to do": a type with no injection
/// constructors can still be bound [`from_instance`] or [`from_factory`],
/// and a type with no marked members passes through member injection
/// untouched.
///
/// # Examples
///
/// A hand-written manifest with one constructor and one injected field:
///
/// ```rust
/// use solder::{Constructor, Injectable, InjectionContext, Param, Resolution, ResolveError, Svc};
///
/// #[derive(Default, Clone)]
/// struct Clock;
///
/// impl Injectable for Clock {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new("default", Vec::new(), |_cx| Ok(Clock))]
///     }
/// }
///
/// struct Alarm {
///     clock: Svc<Clock>,
/// }
///
/// impl Injectable for Alarm {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new("new", vec![Param::of::<Clock>("clock")], |cx| {
///             let clock = cx.resolve_argument::<Clock>(
///                 &InjectionContext::constructor_parameter::<Self, Clock>("new", "clock"),
///             )?;
///             Ok(Alarm { clock })
///         })]
///     }
///
///     fn inject_members(&mut self, cx: &mut Resolution) -> Result<(), ResolveError> {
///         self.clock =
///             cx.resolve_member::<Clock>(&InjectionContext::field::<Self, Clock>("clock"))?;
///         Ok(())
///     }
/// }
/// ```
///
/// [`from_instance`]: crate::BindingBuilder::from_instance
/// [`from_factory`]: crate::BindingBuilder::from_factory
pub trait Injectable: Sized + 'static {
    /// The injection constructors of this type, in declaration order.
    ///
    /// The resolver filters this table by parameter resolvability, prefers
    /// designated constructors, and picks the fewest parameters among the
    /// survivors.
    fn constructors() -> Vec<Constructor<Self>> {
        Vec::new()
    }

    /// Resolves and assigns every marked member of this instance.
    ///
    /// Members are populated in declaration order; the first failure aborts
    /// the call and members assigned before it keep their values.
    fn inject_members(&mut self, cx: &mut Resolution) -> Result<(), ResolveError> {
        let _ = cx;
        Ok(())
    }
}

/// Object-safe twin of [`Injectable`] for heterogeneous injection targets.
///
/// Hosts that keep collections of `Box<dyn ..>` objects can route them
/// through [`Container::inject_dyn`](crate::Container::inject_dyn) without
/// knowing the concrete types.
pub trait DynInjectable {
    /// See [`Injectable::inject_members`].
    fn inject_members_dyn(&mut self, cx: &mut Resolution) -> Result<(), ResolveError>;
}

impl<T> DynInjectable for T
where
    T: Injectable,
{
    fn inject_members_dyn(&mut self, cx: &mut Resolution) -> Result<(), ResolveError> {
        self.inject_members(cx)
    }
}

/// Compile-time assignability of an implementation to an interface.
///
/// Where the original reflection-based engine checked assignability at
/// registration time, this trait moves the check to the type system: a
/// binding from interface `I` to implementation `C` only compiles when
/// `C: Implements<I>`. The impl is a single coercion and is generated by
/// `#[injectable(implements(..))]`, or written by hand:
///
/// ```rust
/// use solder::{Implements, Svc};
///
/// trait Greeter {
///     fn greet(&self) -> String;
/// }
///
/// struct ConsoleGreeter;
///
/// impl Greeter for ConsoleGreeter {
///     fn greet(&self) -> String {
///         "hello".into()
///     }
/// }
///
/// impl Implements<dyn Greeter> for ConsoleGreeter {
///     fn as_service(svc: Svc<Self>) -> Svc<dyn Greeter> {
///         svc
///     }
/// }
/// ```
///
/// Every type trivially implements its own interface, which is what
/// [`BindingBuilder::to_self`](crate::BindingBuilder::to_self) relies on.
pub trait Implements<I>: Sized + 'static
where
    I: ?Sized + 'static,
{
    /// Coerces a concrete handle into an interface handle.
    fn as_service(svc: Svc<Self>) -> Svc<I>;
}

impl<T> Implements<T> for T
where
    T: 'static,
{
    fn as_service(svc: Svc<T>) -> Svc<T> {
        svc
    }
}
