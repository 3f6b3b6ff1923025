use solder::{
    Binding, BindingError, Constructor, Container, Implements, Injectable, Lifetime, SourceKind,
    StdError, Svc,
};

trait Notifier {
    fn channel(&self) -> &'static str;
}

struct EmailNotifier;

impl Notifier for EmailNotifier {
    fn channel(&self) -> &'static str {
        "email"
    }
}

impl Injectable for EmailNotifier {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new("new", Vec::new(), |_cx| Ok(EmailNotifier))]
    }
}

impl Implements<dyn Notifier> for EmailNotifier {
    fn as_service(svc: Svc<Self>) -> Svc<dyn Notifier> {
        svc
    }
}

struct SmsNotifier;

impl Notifier for SmsNotifier {
    fn channel(&self) -> &'static str {
        "sms"
    }
}

impl Injectable for SmsNotifier {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new("new", Vec::new(), |_cx| Ok(SmsNotifier))]
    }
}

impl Implements<dyn Notifier> for SmsNotifier {
    fn as_service(svc: Svc<Self>) -> Svc<dyn Notifier> {
        svc
    }
}

#[test]
fn test_bind_defaults_to_transient() {
    let container = Container::new();
    container.bind::<dyn Notifier>().to::<EmailNotifier>();

    let first = container.resolve::<dyn Notifier>().unwrap();
    let second = container.resolve::<dyn Notifier>().unwrap();
    assert_eq!(first.channel(), "email");
    assert!(!Svc::ptr_eq(&first, &second));
}

#[test]
fn test_singleton_lifetime() {
    let container = Container::new();
    container
        .bind::<dyn Notifier>()
        .to::<EmailNotifier>()
        .as_singleton()
        .unwrap();

    let first = container.resolve::<dyn Notifier>().unwrap();
    let second = container.resolve::<dyn Notifier>().unwrap();
    assert!(Svc::ptr_eq(&first, &second));
}

#[test]
fn test_from_instance_returns_identical_object() {
    let container = Container::new();
    let notifier: Svc<SmsNotifier> = Svc::new(SmsNotifier);
    container
        .bind::<dyn Notifier>()
        .from_instance(Svc::clone(&notifier));

    let first = container.resolve::<dyn Notifier>().unwrap();
    let second = container.resolve::<dyn Notifier>().unwrap();
    assert!(Svc::ptr_eq(&first, &second));
    assert_eq!(first.channel(), "sms");
}

#[test]
fn test_last_registration_wins() {
    let container = Container::new();
    container.bind::<dyn Notifier>().to::<EmailNotifier>();
    container.bind::<dyn Notifier>().to::<SmsNotifier>();

    let notifier = container.resolve::<dyn Notifier>().unwrap();
    assert_eq!(notifier.channel(), "sms");
}

#[test]
fn test_last_source_call_wins() {
    let container = Container::new();
    container
        .bind::<dyn Notifier>()
        .to::<EmailNotifier>()
        .from_instance(Svc::new(SmsNotifier));

    let notifier = container.resolve::<dyn Notifier>().unwrap();
    assert_eq!(notifier.channel(), "sms");
}

#[test]
fn test_lifetime_survives_source_swap() {
    let container = Container::new();
    container
        .bind::<dyn Notifier>()
        .to::<EmailNotifier>()
        .as_singleton()
        .unwrap()
        .from_factory(|| -> Result<SmsNotifier, StdError> { Ok(SmsNotifier) });

    let first = container.resolve::<dyn Notifier>().unwrap();
    let second = container.resolve::<dyn Notifier>().unwrap();
    assert_eq!(first.channel(), "sms");
    assert!(Svc::ptr_eq(&first, &second));
}

#[test]
fn test_lifetime_before_implementation_is_rejected() {
    let container = Container::new();
    assert!(matches!(
        container.bind::<dyn Notifier>().as_singleton(),
        Err(BindingError::MissingImplementation { .. }),
    ));
    assert!(matches!(
        container.bind::<dyn Notifier>().when(|_| true),
        Err(BindingError::MissingImplementation { .. }),
    ));
}

#[test]
fn test_register_assembled_binding() {
    let container = Container::new();
    let binding =
        Binding::to_new::<dyn Notifier, EmailNotifier>().with_lifetime(Lifetime::Singleton);
    assert_eq!(binding.source(), SourceKind::FromNew);
    assert_eq!(binding.lifetime(), Lifetime::Singleton);
    assert!(!binding.has_condition());
    container.register(binding);

    let first = container.resolve::<dyn Notifier>().unwrap();
    let second = container.resolve::<dyn Notifier>().unwrap();
    assert!(Svc::ptr_eq(&first, &second));
}

#[test]
fn test_unbind_removes_local_binding() {
    let container = Container::new();
    container.bind::<dyn Notifier>().to::<EmailNotifier>();

    assert!(container.unbind::<dyn Notifier>());
    assert!(!container.unbind::<dyn Notifier>());
    assert!(container.resolve::<dyn Notifier>().is_err());
}

#[test]
fn test_unbind_does_not_touch_parent() {
    let root = Container::new();
    root.bind::<dyn Notifier>().to::<EmailNotifier>();
    let child = root.child();

    assert!(!child.unbind::<dyn Notifier>());
    assert!(child.resolve::<dyn Notifier>().is_ok());
}

#[test]
fn test_clear_cached_drops_singleton() {
    let container = Container::new();
    container
        .bind::<dyn Notifier>()
        .to::<EmailNotifier>()
        .as_singleton()
        .unwrap();

    let first = container.resolve::<dyn Notifier>().unwrap();
    assert!(container.clear_cached::<dyn Notifier>());
    let second = container.resolve::<dyn Notifier>().unwrap();
    assert!(!Svc::ptr_eq(&first, &second));
}
