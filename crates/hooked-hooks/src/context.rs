use hooked_core::{Cleanup, acquire_hook, deps};

use crate::{Binding, must, use_effect, use_state};

/// A value shared between components. Consumers re-render when it changes.
pub struct Context<T: 'static> {
    current: Binding<T>,
}

impl<T: 'static> Clone for Context<T> {
    fn clone(&self) -> Self {
        Self {
            current: self.current.clone(),
        }
    }
}

impl<T: 'static> Context<T> {
    pub fn new(default: T) -> Self {
        Self {
            current: Binding::new(default),
        }
    }

    /// Replaces the value and notifies every consumer.
    pub fn provide(&self, value: T) {
        self.current.set(value);
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.current.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.current.with(f)
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Cleanup {
        self.current.subscribe(f)
    }

    pub fn consumer_count(&self) -> usize {
        self.current.subscriber_count()
    }
}

pub fn create_context<T: 'static>(default: T) -> Context<T> {
    Context::new(default)
}

/// Current value of `context`.
///
/// The context seen on the first render stays attached to this position.
pub fn use_context<T>(context: &Context<T>) -> T
where
    T: Clone + PartialEq + 'static,
{
    let entry = must(acquire_hook(|| context.clone())).get();
    let (value, set_value) = use_state(|| entry.get());

    let seen = value.clone();
    use_effect(
        move || {
            // Provided between render and subscription.
            if entry.with(|current| *current != seen) {
                set_value.set(entry.get());
            }
            entry.subscribe(move |next| set_value.set(next.clone()))
        },
        Some(deps![]),
    );

    value
}
