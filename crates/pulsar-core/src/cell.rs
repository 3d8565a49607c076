//! Observable value cells.
//!
//! A [`Cell`] holds one value and an ordered list of subscribers. Every
//! [`Cell::set`] or [`Cell::update`] stores the new value and then calls each
//! subscriber with it, synchronously and in registration order, before
//! returning. Equal values are delivered again: there is no change suppression.
//!
//! Cells are cheap handles over shared state. Cloning a cell yields another
//! handle to the same value, which is how the stores are passed to the parts
//! of the UI that need them.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use indexmap::IndexMap;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Registered subscribers, keyed by a monotonically increasing id so that
/// iteration order is registration order.
struct Listeners<T> {
    next_id: u64,
    entries: IndexMap<u64, Listener<T>>,
}

/// The value and a counter bumped on every replacement, locked together.
struct Slot<T> {
    value: T,
    version: u64,
}

struct Shared<T> {
    value: Mutex<Slot<T>>,
    listeners: Mutex<Listeners<T>>,
}

/// Locks a mutex, recovering the data if a subscriber panicked while holding it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A shared, observable value.
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use pulsar_core::Cell;
///
/// let running = Cell::new(false);
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let sub = running.subscribe(move |v| sink.lock().unwrap().push(*v));
///
/// running.set(true);
/// running.update(|v| !v);
/// assert_eq!(*seen.lock().unwrap(), vec![true, false]);
/// sub.unsubscribe();
/// ```
pub struct Cell<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        Cell {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Cell<T>
where
    T: Clone + Send + 'static,
{
    /// Creates a cell holding `initial` with no subscribers.
    pub fn new(initial: T) -> Self {
        Cell {
            shared: Arc::new(Shared {
                value: Mutex::new(Slot {
                    value: initial,
                    version: 0,
                }),
                listeners: Mutex::new(Listeners {
                    next_id: 0,
                    entries: IndexMap::new(),
                }),
            }),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        lock(&self.shared.value).value.clone()
    }

    /// Reads the current value without cloning it.
    ///
    /// The value stays locked while `f` runs, so `f` must not write to this
    /// same cell.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&lock(&self.shared.value).value)
    }

    /// Counter incremented by every `set`, `update`, or successful
    /// [`Cell::replace_if_version`].
    pub fn version(&self) -> u64 {
        lock(&self.shared.value).version
    }

    /// Replaces the value and notifies every subscriber.
    pub fn set(&self, value: T) {
        let snapshot = value.clone();
        {
            let mut slot = lock(&self.shared.value);
            slot.value = value;
            slot.version += 1;
        }
        self.notify(&snapshot);
    }

    /// Replaces the value only if no replacement happened since `version` was
    /// read. The check and the write are one step under the value lock.
    ///
    /// Returns `false`, without notifying anyone, if the cell moved on.
    pub fn replace_if_version(&self, version: u64, value: T) -> bool {
        let snapshot = value.clone();
        {
            let mut slot = lock(&self.shared.value);
            if slot.version != version {
                return false;
            }
            slot.value = value;
            slot.version += 1;
        }
        self.notify(&snapshot);
        true
    }

    /// Replaces the value with `f(current)` and notifies every subscriber.
    ///
    /// `f` runs while the value is locked and must be a pure transformation.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = {
            let mut slot = lock(&self.shared.value);
            let next = f(&slot.value);
            slot.value = next.clone();
            slot.version += 1;
            next
        };
        self.notify(&next);
    }

    /// Registers `listener` to receive every value assigned from now on.
    ///
    /// The current value is not replayed. The listener stays registered until
    /// [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, listener: F) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut listeners = lock(&self.shared.listeners);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.insert(id, Arc::new(listener));
        Subscription {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.shared.listeners).entries.len()
    }

    /// True when both handles point at the same cell.
    pub fn ptr_eq(&self, other: &Cell<T>) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    // Listeners are snapshotted first so they can subscribe, unsubscribe, or
    // read this cell while being called.
    fn notify(&self, value: &T) {
        let listeners: Vec<Listener<T>> = lock(&self.shared.listeners)
            .entries
            .values()
            .cloned()
            .collect();
        for listener in listeners {
            listener(value);
        }
    }
}

impl<T> Default for Cell<T>
where
    T: Clone + Send + Default + 'static,
{
    fn default() -> Self {
        Cell::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("value", &lock(&self.shared.value).value)
            .field("subscribers", &lock(&self.shared.listeners).entries.len())
            .finish()
    }
}

/// Handle returned by [`Cell::subscribe`].
///
/// Dropping the handle leaves the listener registered.
#[must_use = "keep the Subscription to be able to unsubscribe later"]
pub struct Subscription<T> {
    id: u64,
    shared: Weak<Shared<T>>,
}

impl<T> Subscription<T> {
    /// Removes the listener. Later assignments no longer reach it.
    pub fn unsubscribe(self) {
        if let Some(shared) = self.shared.upgrade() {
            // shift_remove keeps the remaining listeners in registration order.
            lock(&shared.listeners).entries.shift_remove(&self.id);
        }
    }

    /// False once the listener was removed or the cell no longer exists.
    pub fn is_active(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| lock(&shared.listeners).entries.contains_key(&self.id))
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
