//! Ordered collection with add/remove notifications.
//!
//! Insertion order is significant and duplicates are permitted. Each
//! successful [`push`](ObservableVec::push) or [`remove`](ObservableVec::remove)
//! fires exactly one notification carrying the affected element.

use crate::id::ObserverId;

/// Callback invoked with the element that was added or removed.
pub type ItemObserver<T> = Box<dyn FnMut(&T)>;

/// A mutable ordered sequence that reports additions and removals.
pub struct ObservableVec<T> {
    items: Vec<T>,
    on_added: Vec<(ObserverId, ItemObserver<T>)>,
    on_removed: Vec<(ObserverId, ItemObserver<T>)>,
    next_observer: u64,
}

impl<T: std::fmt::Debug> std::fmt::Debug for ObservableVec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableVec")
            .field("items", &self.items)
            .field("on_added", &self.on_added.len())
            .field("on_removed", &self.on_removed.len())
            .finish()
    }
}

impl<T> Default for ObservableVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObservableVec<T> {
    /// An empty collection with no observers.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            on_added: Vec::new(),
            on_removed: Vec::new(),
            next_observer: 0,
        }
    }

    fn next_id(&mut self) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        id
    }

    /// Register an observer for additions.
    pub fn on_added(&mut self, observer: impl FnMut(&T) + 'static) -> ObserverId {
        let id = self.next_id();
        self.on_added.push((id, Box::new(observer)));
        id
    }

    /// Register an observer for removals.
    pub fn on_removed(&mut self, observer: impl FnMut(&T) + 'static) -> ObserverId {
        let id = self.next_id();
        self.on_removed.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer from either list. Returns `false` if unknown.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.on_added.len() + self.on_removed.len();
        self.on_added.retain(|(oid, _)| *oid != id);
        self.on_removed.retain(|(oid, _)| *oid != id);
        self.on_added.len() + self.on_removed.len() != before
    }

    /// Append an element and notify addition observers.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        if let Some(added) = self.items.last() {
            for (_, observer) in &mut self.on_added {
                observer(added);
            }
        }
    }

    /// Number of elements currently held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Element at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: PartialEq> ObservableVec<T> {
    /// Remove the first element equal to `item`. Returns `true` and notifies
    /// removal observers if one was found.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(index) = self.items.iter().position(|x| x == item) else {
            return false;
        };
        let removed = self.items.remove(index);
        for (_, observer) in &mut self.on_removed {
            observer(&removed);
        }
        true
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}

impl<'a, T> IntoIterator for &'a ObservableVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
