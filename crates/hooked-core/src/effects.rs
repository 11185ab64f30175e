use std::mem;
use std::panic::{AssertUnwindSafe, catch_unwind};

use smallvec::SmallVec;

use crate::session::{self, Session};
use crate::{Deps, EffectPanicPolicy, HookError, HookId, panic_message};

/// Cleanup returned by an effect. Runs at most once.
pub struct Cleanup(Box<dyn FnOnce()>);

impl Cleanup {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn run(self) {
        (self.0)()
    }
}

/// Helper to build the cleanup an effect returns.
pub fn on_cleanup(f: impl FnOnce() + 'static) -> Cleanup {
    Cleanup::new(f)
}

/// What an effect callback may return.
pub trait IntoCleanup {
    fn into_cleanup(self) -> Option<Cleanup>;
}

impl IntoCleanup for () {
    fn into_cleanup(self) -> Option<Cleanup> {
        None
    }
}

impl IntoCleanup for Cleanup {
    fn into_cleanup(self) -> Option<Cleanup> {
        Some(self)
    }
}

impl IntoCleanup for Option<Cleanup> {
    fn into_cleanup(self) -> Option<Cleanup> {
        self
    }
}

pub type EffectCallback = Box<dyn FnOnce() -> Option<Cleanup>>;

/// One effect requested during a render.
pub struct EffectRecord {
    pub id: HookId,
    pub deps: Option<Deps>,
    callback: EffectCallback,
}

impl EffectRecord {
    pub fn new<R: IntoCleanup + 'static>(
        id: HookId,
        callback: impl FnOnce() -> R + 'static,
        deps: Option<Deps>,
    ) -> Self {
        Self {
            id,
            deps,
            callback: Box::new(move || callback().into_cleanup()),
        }
    }
}

pub(crate) type EffectQueue = SmallVec<[EffectRecord; 4]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Queue {
    Deferred,
    Immediate,
}

/// Appends `record` to the deferred or immediate queue of the rendering instance.
pub fn schedule_effect(record: EffectRecord, immediate: bool) -> Result<(), HookError> {
    let session = session::resolve_current_component()?;
    let mut s = session.inner.borrow_mut();
    log::trace!(
        "component {}: scheduled {} effect {}",
        s.id,
        if immediate { "immediate" } else { "deferred" },
        record.id
    );
    if immediate {
        s.immediate.push(record);
    } else {
        s.deferred.push(record);
    }
    Ok(())
}

/// Runs the effects scheduled for after commit.
pub fn flush_deferred_effects(session: &Session) -> Result<(), HookError> {
    flush(session, Queue::Deferred)
}

/// Runs the effects that must finish before commit is reported.
pub fn flush_immediate_effects(session: &Session) -> Result<(), HookError> {
    flush(session, Queue::Immediate)
}

fn flush(session: &Session, queue: Queue) -> Result<(), HookError> {
    let (records, policy, instance) = {
        let mut s = session.inner.borrow_mut();
        let records = match queue {
            Queue::Deferred => mem::take(&mut s.deferred),
            Queue::Immediate => mem::take(&mut s.immediate),
        };
        (records, s.config.effect_panic_policy, s.id)
    };
    if records.is_empty() {
        return Ok(());
    }
    log::debug!(
        "component {instance}: flushing {} {queue:?} effects",
        records.len()
    );

    let mut first_failure = None;
    for record in records {
        let EffectRecord { id, callback, .. } = record;

        // Previous run of the same effect is always cleaned up first.
        let previous = session.inner.borrow_mut().effect_handles.remove(&id);
        if let Some(cleanup) = previous
            && let Err(err) = guarded(policy, id, || cleanup.run())
        {
            first_failure.get_or_insert(err);
        }

        log::trace!("component {instance}: running effect {id}");
        match guarded(policy, id, callback) {
            Ok(Some(cleanup)) => {
                session.inner.borrow_mut().effect_handles.insert(id, cleanup);
            }
            Ok(None) => {}
            Err(err) => {
                first_failure.get_or_insert(err);
            }
        }
    }

    first_failure.map_or(Ok(()), Err)
}

/// Runs every installed cleanup and releases the instance's hooks.
pub fn unmount(session: &Session) -> Result<(), HookError> {
    let (hooks, handles, policy, instance) = {
        let mut s = session.inner.borrow_mut();
        s.unmounted = true;
        s.deferred.clear();
        s.immediate.clear();
        (
            mem::take(&mut s.hooks),
            mem::take(&mut s.effect_handles),
            s.config.effect_panic_policy,
            s.id,
        )
    };
    drop(hooks);
    log::debug!(
        "component {instance}: unmounting, {} cleanups",
        handles.len()
    );

    let mut first_failure = None;
    // Iteration order; nothing renders after this.
    for (id, cleanup) in handles {
        if let Err(err) = guarded(policy, id, || cleanup.run()) {
            first_failure.get_or_insert(err);
        }
    }
    first_failure.map_or(Ok(()), Err)
}

fn guarded<R>(policy: EffectPanicPolicy, id: HookId, f: impl FnOnce() -> R) -> Result<R, HookError> {
    match policy {
        EffectPanicPolicy::Propagate => Ok(f()),
        EffectPanicPolicy::Isolate => catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
            let message = panic_message(&*payload);
            log::error!("effect {id} panicked: {message}");
            HookError::EffectPanicked { id, message }
        }),
    }
}
