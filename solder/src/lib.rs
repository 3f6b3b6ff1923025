//! # solder
//!
//! A hierarchical dependency-injection container: declarative bindings from
//! abstract types to construction strategies, on-demand resolution of whole
//! object graphs with lifetime and cycle enforcement, and member injection
//! into already-existing objects.
//!
//! ## Core Concepts
//!
//! - **Container**: a scope owning its own bindings and singleton cache,
//!   optionally falling back to a parent container
//! - **Binding**: maps an interface type to a construction strategy
//!   (new / instance / factory), a lifetime, and an optional condition
//! - **Injectable**: the per-type manifest declaring injection constructors
//!   and marked members, written by hand or generated by macros
//! - **Resolution**: one logical resolution call chain, carrying the cycle
//!   guard and the scope in which singletons are cached
//! - **Installer**: a reusable unit of binding registrations
//!
//! ## Basic Usage
//!
//! ```rust
//! use solder::{Constructor, Container, Implements, Injectable, Svc};
//!
//! trait Greeter {
//!     fn greet(&self) -> String;
//! }
//!
//! struct ConsoleGreeter;
//!
//! impl Greeter for ConsoleGreeter {
//!     fn greet(&self) -> String {
//!         "hello".into()
//!     }
//! }
//!
//! impl Injectable for ConsoleGreeter {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::new("new", Vec::new(), |_cx| Ok(ConsoleGreeter))]
//!     }
//! }
//!
//! impl Implements<dyn Greeter> for ConsoleGreeter {
//!     fn as_service(svc: Svc<Self>) -> Svc<dyn Greeter> {
//!         svc
//!     }
//! }
//!
//! let container = Container::new();
//! container
//!     .bind::<dyn Greeter>()
//!     .to::<ConsoleGreeter>()
//!     .as_singleton()
//!     .unwrap();
//!
//! let greeter = container.resolve::<dyn Greeter>().unwrap();
//! assert_eq!(greeter.greet(), "hello");
//! ```
//!
//! ## Using Macros
//!
//! With the `macros` feature (default), manifests are generated instead of
//! written out. `#[derive(Injectable)]` covers field injection and trait
//! coercions; the `#[injectable]` attribute covers constructor and method
//! injection on an impl block:
//!
//! ```rust
//! use solder::{Container, Injectable, Svc, injectable};
//!
//! trait ThreatService {
//!     fn threat(&self) -> u32;
//! }
//!
//! #[derive(Default, Injectable)]
//! #[solder(implements(ThreatService), default)]
//! struct DistanceThreat;
//!
//! impl ThreatService for DistanceThreat {
//!     fn threat(&self) -> u32 {
//!         3
//!     }
//! }
//!
//! struct EnemyAi {
//!     threat: Svc<dyn ThreatService>,
//! }
//!
//! #[injectable]
//! impl EnemyAi {
//!     #[construct]
//!     fn new(threat: Svc<dyn ThreatService>) -> Self {
//!         Self { threat }
//!     }
//! }
//!
//! let container = Container::new();
//! container.bind::<dyn ThreatService>().to::<DistanceThreat>();
//! container.bind::<EnemyAi>().to_self();
//!
//! let ai = container.resolve::<EnemyAi>().unwrap();
//! assert_eq!(ai.threat.threat(), 3);
//! ```
//!
//! ## Scoped Containers
//!
//! Child containers shadow parent bindings and keep independent singleton
//! caches, while unresolved lookups fall back to the parent chain:
//!
//! ```rust
//! use solder::{Container, Svc};
//!
//! struct Session {
//!     user: String,
//! }
//!
//! let root = Container::new();
//! root.bind::<Session>()
//!     .from_instance(Svc::new(Session { user: "root".into() }));
//!
//! let scene = root.child();
//! assert_eq!(scene.resolve::<Session>().unwrap().user, "root");
//!
//! scene
//!     .bind::<Session>()
//!     .from_instance(Svc::new(Session { user: "scene".into() }));
//! assert_eq!(scene.resolve::<Session>().unwrap().user, "scene");
//! assert_eq!(root.resolve::<Session>().unwrap().user, "root");
//! ```
//!
//! ## Conditional Bindings
//!
//! A binding can be restricted to specific injection sites; lookups whose
//! context fails the predicate fall through to the parent chain:
//!
//! ```rust
//! use solder::{Constructor, Container, Injectable};
//!
//! #[derive(Clone)]
//! struct Verbosity(u8);
//!
//! impl Injectable for Verbosity {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::new("new", Vec::new(), |_cx| Ok(Verbosity(1)))]
//!     }
//! }
//!
//! let container = Container::new();
//! container
//!     .bind::<Verbosity>()
//!     .to_self()
//!     .when(|ctx| {
//!         ctx.target()
//!             .map(|target| target.name().contains("Debug"))
//!             .unwrap_or(false)
//!     })
//!     .unwrap();
//!
//! // No target in a plain resolve call, so the binding stays invisible.
//! assert!(container.resolve::<Verbosity>().is_err());
//! ```
//!
//! ## Features
//!
//! - `macros` (default): enables the `#[derive(Injectable)]` and
//!   `#[injectable]` procedural macros

mod binding;
mod cache;
mod construct;
mod container;
mod context;
mod error;
mod inject;
mod installer;
mod instance;
mod registry;
mod resolve;

pub use binding::{Binding, BindingBuilder, Lifetime, SourceKind};
pub use construct::{Constructor, Param};
pub use container::{Container, ScopeStack};
pub use context::{InjectionContext, Member, MemberKind, TypeKey};
pub use error::{BindingError, ResolveError, ScopeError, StdError};
pub use inject::{DynInjectable, Implements, Injectable};
pub use installer::Installer;
pub use instance::Svc;
pub use resolve::Resolution;

#[cfg(feature = "macros")]
pub use solder_macros::*;
