use std::any::type_name;
use std::cell::RefCell;
use std::rc::Rc;

use crate::session::{self, Session, WeakSession};
use crate::HookError;

/// Position of a hook within its component's call sequence.
pub type HookId = usize;

struct Slot<T> {
    id: HookId,
    state: RefCell<T>,
    base_state: T,
}

/// Handle to one positional hook record.
///
/// The same position yields a handle to the same record on every render of
/// the owning instance.
pub struct Hook<T: 'static> {
    slot: Rc<Slot<T>>,
    session: WeakSession,
}

impl<T: 'static> Clone for Hook<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            session: self.session.clone(),
        }
    }
}

impl<T: 'static> Hook<T> {
    pub fn id(&self) -> HookId {
        self.slot.id
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.slot.state.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.slot.state.borrow())
    }

    /// Overwrites the state without asking the host for a render.
    pub fn set(&self, value: T) {
        *self.slot.state.borrow_mut() = value;
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.slot.state.borrow_mut());
    }

    /// State as it was when the record was created.
    pub fn base_state(&self) -> &T {
        &self.slot.base_state
    }

    /// Owning session, `None` once the instance has been dropped.
    pub fn session(&self) -> Option<Session> {
        self.session.upgrade()
    }

    pub fn ptr_eq(&self, other: &Hook<T>) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

/// Returns the hook at the next position of the current render, creating it
/// from `init` on first visit.
///
/// Fails with [`HookError::InvalidHookCall`] outside of a render.
pub fn acquire_hook<T: Clone + 'static>(
    init: impl FnOnce() -> T,
) -> Result<Hook<T>, HookError> {
    let (session, cursor) = session::current_position()?;
    let next = cursor.map_or(0, |c| c + 1);

    let existing = session.inner.borrow().hooks.get(next).cloned();
    if let Some(slot) = existing {
        let slot = slot
            .downcast::<Slot<T>>()
            .map_err(|_| HookError::HookTypeMismatch {
                id: next,
                expected: type_name::<T>(),
            })?;
        session::advance_cursor(next);
        return Ok(Hook {
            slot,
            session: session.downgrade(),
        });
    }

    {
        let s = session.inner.borrow();
        if s.completed_renders > 0 {
            if s.config.strict_hook_order {
                return Err(HookError::HookOrderMismatch {
                    expected: s.hooks.len(),
                    actual: next + 1,
                });
            }
            log::warn!(
                "component {} created hook {next} after its first render; hook call order must be stable",
                s.id
            );
        }
    }

    // No session borrow is held while user code runs.
    let value = init();

    let slot = Rc::new(Slot {
        id: next,
        state: RefCell::new(value.clone()),
        base_state: value,
    });
    {
        let mut s = session.inner.borrow_mut();
        if s.hooks.len() != next {
            // `init` called another hook.
            return Err(HookError::HookOrderMismatch {
                expected: next,
                actual: s.hooks.len(),
            });
        }
        s.hooks.push(slot.clone());
        log::trace!("component {}: created hook {next} ({})", s.id, type_name::<T>());
    }
    session::advance_cursor(next);

    Ok(Hook {
        slot,
        session: session.downgrade(),
    })
}

/// [`acquire_hook`] with a plain initial value.
pub fn acquire_hook_with<T: Clone + 'static>(initial: T) -> Result<Hook<T>, HookError> {
    acquire_hook(move || initial)
}

/// Applies `reducer` to the state of hook `id` and asks the host to re-render.
///
/// Works outside of renders; this is what dispatch functions call.
pub fn set_hook_state<T: 'static>(
    session: &Session,
    id: HookId,
    reducer: impl FnOnce(&T) -> T,
) -> Result<(), HookError> {
    let (slot, trigger, instance) = {
        let s = session.inner.borrow();
        let slot = s.hooks.get(id).cloned().ok_or(HookError::UnknownHook { id })?;
        (slot, s.trigger.clone(), s.id)
    };
    let slot = slot
        .downcast::<Slot<T>>()
        .map_err(|_| HookError::HookTypeMismatch {
            id,
            expected: type_name::<T>(),
        })?;

    let next = reducer(&slot.state.borrow());
    *slot.state.borrow_mut() = next;

    match trigger {
        Some(trigger) => trigger.request_render(instance, id),
        None => log::debug!("component {instance}: hook {id} updated without a render trigger"),
    }
    Ok(())
}
