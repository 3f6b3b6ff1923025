//! Constructor manifests and the selection policy applied to them.

use std::rc::Rc;

use crate::container::ContainerInner;
use crate::error::ResolveError;
use crate::inject::{Implements, Injectable};
use crate::instance::{Instance, Svc};
use crate::resolve::Resolution;
use crate::{InjectionContext, TypeKey};

/// A single constructor parameter as declared in a manifest.
#[derive(Debug, Clone)]
pub struct Param {
    name: &'static str,
    key: TypeKey,
}

impl Param {
    /// Declares a parameter named `name` resolving to `T`.
    pub fn of<T>(name: &'static str) -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name,
            key: TypeKey::of::<T>(),
        }
    }

    /// The parameter name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type the parameter resolves to.
    pub fn key(&self) -> TypeKey {
        self.key
    }
}

/// One injection constructor of `T`.
///
/// The `construct` function resolves every parameter through the given
/// [`Resolution`] and invokes the actual constructor; generated manifests
/// produce it from `#[construct]` methods.
pub struct Constructor<T> {
    pub(crate) name: &'static str,
    pub(crate) designated: bool,
    pub(crate) params: Vec<Param>,
    pub(crate) construct: fn(&mut Resolution) -> Result<T, ResolveError>,
}

impl<T> Constructor<T> {
    /// Declares an ordinary constructor.
    pub fn new(
        name: &'static str,
        params: Vec<Param>,
        construct: fn(&mut Resolution) -> Result<T, ResolveError>,
    ) -> Self {
        Self {
            name,
            designated: false,
            params,
            construct,
        }
    }

    /// Declares the designated injection constructor, preferred over any
    /// other eligible constructor regardless of parameter count.
    pub fn designated(
        name: &'static str,
        params: Vec<Param>,
        construct: fn(&mut Resolution) -> Result<T, ResolveError>,
    ) -> Self {
        Self {
            name,
            designated: true,
            params,
            construct,
        }
    }
}

pub(crate) type Produce = Rc<dyn Fn(&mut Resolution) -> Result<Instance, ResolveError>>;

/// A type-erased constructor bound to a concrete interface/implementation
/// pair. Built once at registration time.
#[derive(Clone)]
pub(crate) struct ConstructorPlan {
    pub(crate) name: &'static str,
    pub(crate) designated: bool,
    pub(crate) target: TypeKey,
    pub(crate) params: Vec<Param>,
    pub(crate) produce: Produce,
}

/// Erases the constructor manifest of `C` against the interface `I`.
///
/// Each plan constructs the value, runs member injection on it while it is
/// still uniquely owned, and only then coerces it into an interface handle.
pub(crate) fn plans_of<I, C>() -> Vec<ConstructorPlan>
where
    I: ?Sized + 'static,
    C: Injectable + Implements<I>,
{
    C::constructors()
        .into_iter()
        .map(|constructor| {
            let construct = constructor.construct;
            ConstructorPlan {
                name: constructor.name,
                designated: constructor.designated,
                target: TypeKey::of::<C>(),
                params: constructor.params,
                produce: Rc::new(move |cx| {
                    let mut value = construct(cx)?;
                    value.inject_members(cx)?;
                    Ok(Instance::new::<I>(C::as_service(Svc::new(value))))
                }),
            }
        })
        .collect()
}

/// Applies the constructor selection policy.
///
/// Retains constructors whose every parameter has a visible binding in the
/// container chain, prefers designated constructors, then picks the fewest
/// parameters. Ties keep declaration order.
pub(crate) fn select_plan<'p>(
    scope: &ContainerInner,
    implementation: TypeKey,
    plans: &'p [ConstructorPlan],
) -> Result<&'p ConstructorPlan, ResolveError> {
    let eligible: Vec<&ConstructorPlan> = plans
        .iter()
        .filter(|plan| {
            plan.params.iter().all(|param| {
                let ctx = InjectionContext::for_parameter(
                    param.key(),
                    plan.target,
                    plan.name,
                    param.name(),
                );
                scope.binding_visible(&param.key(), &ctx)
            })
        })
        .collect();
    if eligible.is_empty() {
        return Err(ResolveError::NoConstructor { implementation });
    }
    let mut pool: Vec<&ConstructorPlan> = eligible
        .iter()
        .copied()
        .filter(|plan| plan.designated)
        .collect();
    if pool.is_empty() {
        pool = eligible;
    }
    let mut best = pool[0];
    for plan in &pool[1..] {
        if plan.params.len() < best.params.len() {
            best = plan;
        }
    }
    Ok(best)
}
