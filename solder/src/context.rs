use std::any::{TypeId, type_name};
use std::fmt;

/// Runtime identity of a requested or implementing type.
///
/// A `TypeKey` pairs a [`TypeId`] with the type's name so that registry
/// lookups stay cheap while diagnostics stay readable. Keys can be taken
/// for concrete types as well as for `dyn Trait` objects.
///
/// # Examples
///
/// ```rust
/// use solder::TypeKey;
///
/// trait Greeter {}
///
/// let key = TypeKey::of::<dyn Greeter>();
/// assert!(key.name().contains("Greeter"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key for `T`.
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the underlying [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The kind of member an injection targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// A marked field of the target type.
    Field,
    /// A parameter of a marked injection method.
    MethodParameter,
    /// A parameter of an injection constructor.
    ConstructorParameter,
}

/// Describes the member an injection site belongs to.
#[derive(Debug, Clone)]
pub struct Member {
    name: &'static str,
    kind: MemberKind,
    parameter: Option<&'static str>,
}

impl Member {
    /// The field, method, or constructor name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The kind of member.
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// The parameter name, for method and constructor parameters.
    pub fn parameter(&self) -> Option<&'static str> {
        self.parameter
    }
}

/// Metadata about a single resolution or injection site.
///
/// A context is created per attempt and handed to binding conditions
/// registered with [`BindingBuilder::when`](crate::BindingBuilder::when).
/// It carries the requested type, the type whose member is being populated
/// (if any), and the member itself. Contexts are never stored.
///
/// # Examples
///
/// Conditions typically branch on the injection target:
///
/// ```rust
/// use solder::InjectionContext;
///
/// let is_audit_target = |ctx: &InjectionContext| {
///     ctx.target()
///         .map(|target| target.name().ends_with("AuditService"))
///         .unwrap_or(false)
/// };
/// # let _ = is_audit_target;
/// ```
#[derive(Debug, Clone)]
pub struct InjectionContext {
    requested: TypeKey,
    target: Option<TypeKey>,
    member: Option<Member>,
}

impl InjectionContext {
    /// Context for a direct `resolve` call with no enclosing member.
    pub fn request<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            requested: TypeKey::of::<T>(),
            target: None,
            member: None,
        }
    }

    /// Context for injecting the field `name` of `Target`.
    pub fn field<Target, T>(name: &'static str) -> Self
    where
        Target: ?Sized + 'static,
        T: ?Sized + 'static,
    {
        Self {
            requested: TypeKey::of::<T>(),
            target: Some(TypeKey::of::<Target>()),
            member: Some(Member {
                name,
                kind: MemberKind::Field,
                parameter: None,
            }),
        }
    }

    /// Context for resolving the parameter `parameter` of the injection
    /// method `method` on `Target`.
    pub fn method_parameter<Target, T>(method: &'static str, parameter: &'static str) -> Self
    where
        Target: ?Sized + 'static,
        T: ?Sized + 'static,
    {
        Self {
            requested: TypeKey::of::<T>(),
            target: Some(TypeKey::of::<Target>()),
            member: Some(Member {
                name: method,
                kind: MemberKind::MethodParameter,
                parameter: Some(parameter),
            }),
        }
    }

    /// Context for resolving the parameter `parameter` of the constructor
    /// `constructor` on `Target`.
    pub fn constructor_parameter<Target, T>(
        constructor: &'static str,
        parameter: &'static str,
    ) -> Self
    where
        Target: ?Sized + 'static,
        T: ?Sized + 'static,
    {
        Self {
            requested: TypeKey::of::<T>(),
            target: Some(TypeKey::of::<Target>()),
            member: Some(Member {
                name: constructor,
                kind: MemberKind::ConstructorParameter,
                parameter: Some(parameter),
            }),
        }
    }

    pub(crate) fn for_parameter(
        requested: TypeKey,
        target: TypeKey,
        constructor: &'static str,
        parameter: &'static str,
    ) -> Self {
        Self {
            requested,
            target: Some(target),
            member: Some(Member {
                name: constructor,
                kind: MemberKind::ConstructorParameter,
                parameter: Some(parameter),
            }),
        }
    }

    /// The type requested at this site.
    pub fn requested(&self) -> TypeKey {
        self.requested
    }

    /// The type whose member is being populated, if any.
    pub fn target(&self) -> Option<TypeKey> {
        self.target
    }

    /// The member being populated, if any.
    pub fn member(&self) -> Option<&Member> {
        self.member.as_ref()
    }
}
