use std::rc::Rc;

use hooked_core::{Deps, acquire_hook, are_deps_equal};

use crate::must;

/// Returns the stored value while `deps` compare equal; `None` recomputes on
/// every render.
pub fn use_memo<T: Clone + 'static>(factory: impl FnOnce() -> T, deps: Option<Deps>) -> T {
    let hook = must(acquire_hook(|| None::<(T, Option<Deps>)>));

    if let Some(next) = &deps {
        let cached = hook.with(|stored| match stored {
            Some((value, prev)) if are_deps_equal(next, prev.as_ref()) => Some(value.clone()),
            _ => None,
        });
        if let Some(value) = cached {
            return value;
        }
    }

    let value = factory();
    hook.set(Some((value.clone(), deps)));
    value
}

/// Keeps the first `callback` until `deps` change.
pub fn use_callback<F: 'static>(callback: F, deps: Deps) -> Rc<F> {
    use_memo(move || Rc::new(callback), Some(deps))
}
