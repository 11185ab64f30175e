use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hooked_core::{Cleanup, acquire_hook};

use crate::must;

pub type SubId = usize;

/// Observable value. Writes notify subscribers but never re-render the
/// component that owns it.
pub struct Binding<T: 'static>(Rc<Shared<T>>);

struct Shared<T> {
    value: RefCell<T>,
    subs: RefCell<Vec<(SubId, Rc<dyn Fn(&T)>)>>,
    next_sub: Cell<SubId>,
}

impl<T: 'static> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: 'static> Binding<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(Shared {
            value: RefCell::new(value),
            subs: RefCell::new(Vec::new()),
            next_sub: Cell::new(0),
        }))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.value.borrow())
    }

    pub fn set(&self, value: T) {
        *self.0.value.borrow_mut() = value;
        self.notify();
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.0.value.borrow_mut());
        self.notify();
    }

    /// Subscribers may read the binding and subscribe or unsubscribe while
    /// notified, but must not write to it.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Cleanup {
        let id = self.0.next_sub.get();
        self.0.next_sub.set(id + 1);
        self.0.subs.borrow_mut().push((id, Rc::new(f)));

        let weak = Rc::downgrade(&self.0);
        Cleanup::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.subs.borrow_mut().retain(|(sub, _)| *sub != id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.subs.borrow().len()
    }

    // Subscribers added during the notification hear the next write.
    fn notify(&self) {
        let subs: Vec<Rc<dyn Fn(&T)>> = self.0.subs.borrow().iter().map(|(_, s)| s.clone()).collect();
        let value = self.0.value.borrow();
        for s in subs {
            s(&value);
        }
    }
}

/// A [`Binding`] owned by the current component.
pub fn use_binding<T: 'static>(initial: T) -> Binding<T> {
    must(acquire_hook(move || Binding::new(initial))).get()
}
