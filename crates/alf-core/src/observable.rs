//! Observable value cell with change notification and a version counter.
//!
//! An [`Observable`] is the only sanctioned way to hold mutable simulation
//! state. Every write funnels through [`Observable::set`], so change
//! notification and versioning apply uniformly to every field of the model.
//!
//! # Write semantics
//!
//! - Writing a value that compares equal to the current one is a no-op: no
//!   notification fires and the version is unchanged.
//! - Writing a different value stores it, bumps the version by exactly one,
//!   then notifies every observer in registration order.

use crate::id::ObserverId;
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

/// Callback invoked with the new value after a changing write.
pub type ValueObserver<T> = Rc<RefCell<dyn FnMut(&T)>>;

/// A single mutable value with change notification and a version counter.
///
/// Writes go through `&self`, so a cell can live inside an aggregate shared
/// by `Rc` and be both written by a handler and read by its own observers
/// during the same notification.
pub struct Observable<T> {
    value: RefCell<T>,
    version: Cell<u64>,
    observers: RefCell<Vec<(ObserverId, ValueObserver<T>)>>,
    next_observer: Cell<u64>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.value.borrow())
            .field("version", &self.version.get())
            .field("observers", &self.observers.borrow().len())
            .finish()
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Observable<T> {
    /// Create a cell holding `initial` at version 0 with no observers.
    pub fn new(initial: T) -> Self {
        Self {
            value: RefCell::new(initial),
            version: Cell::new(0),
            observers: RefCell::new(Vec::new()),
            next_observer: Cell::new(0),
        }
    }

    /// Borrow the current value.
    pub fn value(&self) -> Ref<'_, T> {
        self.value.borrow()
    }

    /// Number of changing writes since construction.
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    /// Register an observer. Observers fire in registration order.
    pub fn subscribe(&self, observer: impl FnMut(&T) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer.get());
        self.next_observer.set(id.0 + 1);
        let observer: ValueObserver<T> = Rc::new(RefCell::new(observer));
        self.observers.borrow_mut().push((id, observer));
        id
    }

    /// Remove an observer. Returns `false` if the id was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(oid, _)| *oid != id);
        observers.len() != before
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }
}

impl<T: Copy> Observable<T> {
    /// Copy out the current value.
    pub fn get(&self) -> T {
        *self.value.borrow()
    }
}

impl<T: PartialEq + Clone> Observable<T> {
    /// The single write entry point. Returns `true` if the value changed.
    ///
    /// Observers run after the value and version are updated and no borrow
    /// of the cell is held, so they may read this cell or write other ones.
    /// The observer list is fixed when notification starts.
    pub fn set(&self, value: T) -> bool {
        if *self.value.borrow() == value {
            return false;
        }
        let notified = value.clone();
        *self.value.borrow_mut() = value;
        self.version.set(self.version.get() + 1);

        let observers: Vec<ValueObserver<T>> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in observers {
            (&mut *observer.borrow_mut())(&notified);
        }
        true
    }
}
