use std::rc::Rc;

use hooked_core::{Hook, acquire_hook, set_hook_state};

use crate::must;

/// Setter returned by [`use_state`].
pub struct SetState<T: 'static> {
    hook: Hook<T>,
}

impl<T: 'static> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            hook: self.hook.clone(),
        }
    }
}

impl<T: PartialEq + 'static> SetState<T> {
    pub fn set(&self, value: T) {
        self.update(move |_| value);
    }

    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = self.hook.with(f);
        commit(&self.hook, next);
    }
}

/// Dispatcher returned by [`use_reducer`].
pub struct Dispatch<S: 'static, A: 'static> {
    hook: Hook<S>,
    reducer: Rc<dyn Fn(&S, A) -> S>,
}

impl<S: 'static, A: 'static> Clone for Dispatch<S, A> {
    fn clone(&self) -> Self {
        Self {
            hook: self.hook.clone(),
            reducer: self.reducer.clone(),
        }
    }
}

impl<S: PartialEq + 'static, A: 'static> Dispatch<S, A> {
    pub fn dispatch(&self, action: A) {
        let next = self.hook.with(|state| (self.reducer)(state, action));
        commit(&self.hook, next);
    }
}

// Same value: no re-render.
fn commit<T: PartialEq + 'static>(hook: &Hook<T>, next: T) {
    if hook.with(|current| *current == next) {
        log::trace!("hook {}: state unchanged, bailing out", hook.id());
        return;
    }
    let Some(session) = hook.session() else {
        log::warn!("hook {}: state update after its component was dropped", hook.id());
        return;
    };
    if let Err(err) = set_hook_state(&session, hook.id(), move |_: &T| next) {
        log::warn!("component {}: dropped state update: {err}", session.id());
    }
}

/// Positional state. `init` runs on the first render only.
pub fn use_state<T>(init: impl FnOnce() -> T) -> (T, SetState<T>)
where
    T: Clone + PartialEq + 'static,
{
    let hook = must(acquire_hook(init));
    (hook.get(), SetState { hook })
}

pub fn use_reducer<S, A>(reducer: impl Fn(&S, A) -> S + 'static, initial: S) -> (S, Dispatch<S, A>)
where
    S: Clone + PartialEq + 'static,
    A: 'static,
{
    use_reducer_with(reducer, initial, |s| s)
}

/// [`use_reducer`] with a lazily computed initial state.
pub fn use_reducer_with<S, A, I>(
    reducer: impl Fn(&S, A) -> S + 'static,
    arg: I,
    initializer: impl FnOnce(I) -> S,
) -> (S, Dispatch<S, A>)
where
    S: Clone + PartialEq + 'static,
    A: 'static,
{
    let hook = must(acquire_hook(move || initializer(arg)));
    (
        hook.get(),
        Dispatch {
            hook,
            reducer: Rc::new(reducer),
        },
    )
}
