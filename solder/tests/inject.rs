use solder::{
    Constructor, Container, DynInjectable, Implements, Injectable, InjectionContext, Installer,
    MemberKind, Param, ResolveError, ScopeError, ScopeStack, StdError, Svc,
};

trait Logger {
    fn tag(&self) -> &'static str;
}

struct FileLogger;

impl Logger for FileLogger {
    fn tag(&self) -> &'static str {
        "file"
    }
}

impl Injectable for FileLogger {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new("new", Vec::new(), |_cx| Ok(FileLogger))]
    }
}

impl Implements<dyn Logger> for FileLogger {
    fn as_service(svc: Svc<Self>) -> Svc<dyn Logger> {
        svc
    }
}

trait Metrics {
    fn sink(&self) -> &'static str;
}

struct StatsdMetrics;

impl Metrics for StatsdMetrics {
    fn sink(&self) -> &'static str {
        "statsd"
    }
}

impl Injectable for StatsdMetrics {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new("new", Vec::new(), |_cx| Ok(StatsdMetrics))]
    }
}

impl Implements<dyn Metrics> for StatsdMetrics {
    fn as_service(svc: Svc<Self>) -> Svc<dyn Metrics> {
        svc
    }
}

#[derive(Debug)]
struct NullLogger;

impl Logger for NullLogger {
    fn tag(&self) -> &'static str {
        "null"
    }
}

impl Injectable for NullLogger {}

/// A scene object with a hand-written member manifest: one injected field
/// and one injection method.
struct HudOverlay {
    logger: Svc<dyn Logger>,
    metrics: Option<Svc<dyn Metrics>>,
}

impl HudOverlay {
    fn new() -> Self {
        Self {
            logger: Svc::new(NullLogger),
            metrics: None,
        }
    }

    fn wire_metrics(&mut self, metrics: Svc<dyn Metrics>) {
        self.metrics = Some(metrics);
    }
}

impl Injectable for HudOverlay {
    fn inject_members(
        &mut self,
        cx: &mut solder::Resolution,
    ) -> Result<(), ResolveError> {
        self.logger = cx.resolve_member::<dyn Logger>(
            &InjectionContext::field::<Self, dyn Logger>("logger"),
        )?;
        let metrics = cx.resolve_member::<dyn Metrics>(
            &InjectionContext::method_parameter::<Self, dyn Metrics>("wire_metrics", "metrics"),
        )?;
        self.wire_metrics(metrics);
        Ok(())
    }
}

#[test]
fn test_inject_overwrites_members() {
    let container = Container::new();
    container.bind::<dyn Logger>().to::<FileLogger>();
    container.bind::<dyn Metrics>().to::<StatsdMetrics>();

    let mut overlay = HudOverlay::new();
    assert_eq!(overlay.logger.tag(), "null");
    container.inject(&mut overlay).unwrap();
    assert_eq!(overlay.logger.tag(), "file");
    assert_eq!(overlay.metrics.as_ref().unwrap().sink(), "statsd");
}

#[test]
fn test_inject_failure_names_member_and_keeps_progress() {
    let container = Container::new();
    container.bind::<dyn Logger>().to::<FileLogger>();
    // No metrics binding: the second member fails.

    let mut overlay = HudOverlay::new();
    let error = container.inject(&mut overlay).unwrap_err();
    match &error {
        ResolveError::MemberInjection { member, .. } => {
            assert_eq!(*member, "wire_metrics");
        }
        other => panic!("unexpected error: {other}"),
    }
    // The member injected before the failure keeps its value.
    assert_eq!(overlay.logger.tag(), "file");
    assert!(overlay.metrics.is_none());
}

#[test]
fn test_inject_dyn_targets() {
    let container = Container::new();
    container.bind::<dyn Logger>().to::<FileLogger>();
    container.bind::<dyn Metrics>().to::<StatsdMetrics>();

    let mut objects: Vec<Box<dyn DynInjectable>> = vec![Box::new(HudOverlay::new())];
    for object in &mut objects {
        container.inject_dyn(object.as_mut()).unwrap();
    }
}

struct PauseMenu {
    logger: Svc<dyn Logger>,
}

impl Injectable for PauseMenu {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(
            "new",
            vec![Param::of::<dyn Logger>("logger")],
            |cx| {
                let logger = cx.resolve_argument::<dyn Logger>(
                    &InjectionContext::constructor_parameter::<Self, dyn Logger>("new", "logger"),
                )?;
                Ok(PauseMenu { logger })
            },
        )]
    }
}

#[test]
fn test_construct_without_binding() {
    let container = Container::new();
    container.bind::<dyn Logger>().to::<FileLogger>();

    // PauseMenu itself is not bound; construct drives its constructor
    // directly against the container's bindings.
    let menu = container.construct::<PauseMenu>().unwrap();
    assert_eq!(menu.logger.tag(), "file");
}

#[test]
fn test_construct_without_manifest_fails() {
    let container = Container::new();
    let error = container.construct::<NullLogger>().unwrap_err();
    assert!(matches!(error, ResolveError::NoConstructor { .. }));
}

struct LoggingInstaller;

impl Installer for LoggingInstaller {
    fn install_bindings(&self, container: &Container) -> Result<(), StdError> {
        container
            .bind::<dyn Logger>()
            .to::<FileLogger>()
            .as_singleton()?;
        Ok(())
    }
}

struct MetricsInstaller;

impl Installer for MetricsInstaller {
    fn install_bindings(&self, container: &Container) -> Result<(), StdError> {
        container.bind::<dyn Metrics>().to::<StatsdMetrics>();
        Ok(())
    }
}

struct BrokenInstaller;

impl Installer for BrokenInstaller {
    fn install_bindings(&self, _container: &Container) -> Result<(), StdError> {
        Err("settings asset missing".into())
    }
}

#[test]
fn test_installers_run_in_order() {
    let container = Container::new();
    container
        .install_all(&[&LoggingInstaller, &MetricsInstaller])
        .unwrap();

    assert!(container.resolve::<dyn Logger>().is_ok());
    assert!(container.resolve::<dyn Metrics>().is_ok());
}

#[test]
fn test_failing_installer_aborts_setup() {
    let container = Container::new();
    let result =
        container.install_all(&[&LoggingInstaller, &BrokenInstaller, &MetricsInstaller]);

    assert!(result.is_err());
    // Installers before the failure took effect, later ones never ran.
    assert!(container.resolve::<dyn Logger>().is_ok());
    assert!(container.resolve::<dyn Metrics>().is_err());
}

#[test]
fn test_scope_stack_push_and_pop() {
    let mut scopes = ScopeStack::new(Container::new());
    scopes
        .current()
        .bind::<dyn Logger>()
        .to::<FileLogger>()
        .as_singleton()
        .unwrap();

    let scene = scopes.push();
    assert_eq!(scopes.depth(), 2);
    assert!(scene.resolve::<dyn Logger>().is_ok());

    scopes.pop().unwrap();
    assert_eq!(scopes.depth(), 1);
    assert!(matches!(scopes.pop(), Err(ScopeError::RootScope)));
}

#[test]
fn test_condition_observes_member_kind() {
    let container = Container::new();
    container.bind::<dyn Logger>().to::<FileLogger>();
    container
        .bind::<dyn Metrics>()
        .to::<StatsdMetrics>()
        .when(|ctx| {
            ctx.member()
                .map(|member| member.kind() == MemberKind::MethodParameter)
                .unwrap_or(false)
        })
        .unwrap();

    // Invisible to a direct resolve, visible to the wire_metrics parameter.
    assert!(container.resolve::<dyn Metrics>().is_err());
    let mut overlay = HudOverlay::new();
    container.inject(&mut overlay).unwrap();
    assert_eq!(overlay.metrics.as_ref().unwrap().sink(), "statsd");
}

#[test]
fn test_instance_bindings_are_not_reinjected() {
    let container = Container::new();
    container.bind::<dyn Logger>().to::<FileLogger>();
    container.bind::<dyn Metrics>().to::<StatsdMetrics>();

    // The overlay is supplied as a ready-made instance; resolving it must
    // not run member injection on it.
    let overlay: Svc<HudOverlay> = Svc::new(HudOverlay::new());
    container
        .bind::<HudOverlay>()
        .from_instance(Svc::clone(&overlay));

    let resolved = container.resolve::<HudOverlay>().unwrap();
    assert!(Svc::ptr_eq(&resolved, &overlay));
    assert_eq!(resolved.logger.tag(), "null");
    assert!(resolved.metrics.is_none());
}
