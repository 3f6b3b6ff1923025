use std::any::Any;
use std::rc::Rc;

/// Shared handle to a resolved service.
///
/// Every value the container hands out is wrapped in an `Svc`. Handles are
/// reference counted and cheap to clone; identity comparisons in tests use
/// [`Rc::ptr_eq`]. The container is single threaded by design, so handles
/// are `Rc` rather than `Arc`.
pub type Svc<T> = Rc<T>;

/// Type-erased service handle.
///
/// The payload is always an `Svc<I>` for the interface the owning binding
/// was registered under, so a downcast with the same interface type always
/// succeeds.
#[derive(Clone)]
pub(crate) struct Instance {
    payload: Rc<dyn Any>,
}

impl Instance {
    pub(crate) fn new<I>(svc: Svc<I>) -> Self
    where
        I: ?Sized + 'static,
    {
        Self {
            payload: Rc::new(svc),
        }
    }

    pub(crate) fn downcast<T>(&self) -> Option<Svc<T>>
    where
        T: ?Sized + 'static,
    {
        self.payload.downcast_ref::<Svc<T>>().cloned()
    }
}
