use crate::container::Container;
use crate::error::StdError;

/// A reusable unit of binding registrations.
///
/// Hosts group related bindings into installers and run them during setup
/// with [`Container::install`] or [`Container::install_all`], in an order
/// the host defines. An error from an installer propagates out of setup and
/// aborts it; there is no partial-success policy.
///
/// # Examples
///
/// ```rust
/// use solder::{Container, Injectable, Installer, StdError};
///
/// #[derive(Default)]
/// struct Telemetry;
///
/// impl Injectable for Telemetry {
///     fn constructors() -> Vec<solder::Constructor<Self>> {
///         vec![solder::Constructor::new("default", Vec::new(), |_cx| {
///             Ok(Telemetry)
///         })]
///     }
/// }
///
/// struct CoreInstaller;
///
/// impl Installer for CoreInstaller {
///     fn install_bindings(&self, container: &Container) -> Result<(), StdError> {
///         container.bind::<Telemetry>().to_self().as_singleton()?;
///         Ok(())
///     }
/// }
///
/// let container = Container::new();
/// container.install(&CoreInstaller).unwrap();
/// assert!(container.resolve::<Telemetry>().is_ok());
/// ```
pub trait Installer {
    /// Registers this installer's bindings into `container`.
    fn install_bindings(&self, container: &Container) -> Result<(), StdError>;
}
