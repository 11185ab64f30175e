use std::cell::RefCell;
use std::rc::Rc;

use hooked_core::acquire_hook;

use crate::must;

/// A mutable cell that lives as long as the component. Writes do not re-render.
pub fn use_value<T: 'static>(initial: T) -> Rc<RefCell<T>> {
    must(acquire_hook(move || Rc::new(RefCell::new(initial)))).get()
}

/// An empty slot for something attached after render, e.g. by an effect.
pub fn use_ref<T: 'static>() -> Rc<RefCell<Option<T>>> {
    use_value(None)
}
