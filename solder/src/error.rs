use thiserror::Error;

use crate::TypeKey;

/// Type alias for boxed errors produced by host-supplied code.
///
/// Factories, fallible constructors, and installers report failures through
/// this type; the container wraps them into the matching [`ResolveError`]
/// variant.
pub type StdError = Box<dyn std::error::Error + Send + Sync>;

/// A binding was configured in an invalid order.
///
/// Raised by [`BindingBuilder`](crate::BindingBuilder) when a lifetime or
/// condition is set before any implementation was chosen. The remaining
/// validation rules of the builder (assignability, missing instances or
/// factories) are enforced by the type system and cannot fail at runtime.
#[derive(Debug, Error)]
pub enum BindingError {
    /// No implementation was selected before a terminal builder call.
    #[error("no implementation selected for `{interface}`")]
    MissingImplementation {
        /// The interface the builder was opened for.
        interface: TypeKey,
    },
}

/// A scope stack operation was invalid.
#[derive(Debug, Error)]
pub enum ScopeError {
    /// The root scope cannot be popped.
    #[error("cannot pop the root scope")]
    RootScope,
}

/// A resolution, construction, or injection failure.
///
/// Low-level causes are always wrapped by the next level up and the
/// resolver wraps each resolution step in a [`ResolveError::Resolution`]
/// carrying the requested type, so the full failure path is recoverable
/// from the source chain. [`root_cause`](ResolveError::root_cause) walks to
/// the innermost failure.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No binding exists anywhere in the container chain.
    #[error("no binding found for `{requested}`")]
    BindingNotFound {
        /// The type that was requested.
        requested: TypeKey,
    },
    /// The requested type is already on the in-progress resolution stack.
    #[error("circular dependency detected while resolving `{requested}`: {chain}")]
    CircularDependency {
        /// The type that closed the cycle.
        requested: TypeKey,
        /// The resolution chain that led back to the type.
        chain: String,
    },
    /// A resolution step failed; wraps the underlying cause.
    #[error("failed to resolve `{requested}`")]
    Resolution {
        /// The type requested at this step.
        requested: TypeKey,
        /// The underlying failure.
        #[source]
        source: Box<ResolveError>,
    },
    /// No declared constructor had all of its parameters resolvable.
    #[error("no eligible constructor for `{implementation}`")]
    NoConstructor {
        /// The implementation type under construction.
        implementation: TypeKey,
    },
    /// A constructor argument could not be resolved.
    #[error("failed to construct `{implementation}` via `{constructor}`")]
    Construction {
        /// The implementation type under construction.
        implementation: TypeKey,
        /// The constructor being invoked.
        constructor: &'static str,
        /// The underlying failure.
        #[source]
        source: Box<ResolveError>,
    },
    /// A fallible constructor reported an error.
    #[error("constructor `{constructor}` of `{implementation}` failed")]
    ConstructorFailed {
        /// The implementation type under construction.
        implementation: TypeKey,
        /// The constructor that failed.
        constructor: &'static str,
        /// The error reported by the constructor.
        #[source]
        source: StdError,
    },
    /// A factory delegate reported an error.
    #[error("factory for `{implementation}` failed")]
    Factory {
        /// The implementation type the factory produces.
        implementation: TypeKey,
        /// The error reported by the factory.
        #[source]
        source: StdError,
    },
    /// Injection into a single member failed.
    #[error("failed to inject member `{member}` of `{target}`")]
    MemberInjection {
        /// The type whose member was being populated.
        target: TypeKey,
        /// The member that failed.
        member: &'static str,
        /// The underlying failure.
        #[source]
        source: Box<ResolveError>,
    },
}

impl ResolveError {
    /// Builds a [`ResolveError::ConstructorFailed`] for `T`.
    ///
    /// Used by generated manifests and by hand-written [`Injectable`]
    /// implementations whose constructors return `Result`.
    ///
    /// [`Injectable`]: crate::Injectable
    pub fn constructor_failed<T>(constructor: &'static str, source: StdError) -> Self
    where
        T: ?Sized + 'static,
    {
        Self::ConstructorFailed {
            implementation: TypeKey::of::<T>(),
            constructor,
            source,
        }
    }

    pub(crate) fn factory_failed<T>(source: StdError) -> Self
    where
        T: ?Sized + 'static,
    {
        Self::Factory {
            implementation: TypeKey::of::<T>(),
            source,
        }
    }

    /// Walks the wrapper chain to the innermost [`ResolveError`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use solder::{Container, ResolveError};
    ///
    /// trait Greeter: std::fmt::Debug {}
    ///
    /// let container = Container::new();
    /// let error = container.resolve::<dyn Greeter>().unwrap_err();
    /// assert!(matches!(
    ///     error.root_cause(),
    ///     ResolveError::BindingNotFound { .. }
    /// ));
    /// ```
    pub fn root_cause(&self) -> &ResolveError {
        match self {
            Self::Resolution { source, .. }
            | Self::Construction { source, .. }
            | Self::MemberInjection { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
