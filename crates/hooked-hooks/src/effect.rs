use hooked_core::{Deps, EffectRecord, IntoCleanup, acquire_hook, are_deps_equal, schedule_effect};

use crate::must;

/// Runs `callback` after the host committed the render.
///
/// With `Some(deps)` the effect only runs again when `deps` changed since the
/// last render; `Some(deps![])` runs once. `None` runs after every render.
/// A returned [`Cleanup`](hooked_core::Cleanup) runs before the next run and
/// on unmount.
pub fn use_effect<R>(callback: impl FnOnce() -> R + 'static, deps: Option<Deps>)
where
    R: IntoCleanup + 'static,
{
    schedule(callback, deps, false);
}

/// Like [`use_effect`], but flushed synchronously before commit is reported.
pub fn use_layout_effect<R>(callback: impl FnOnce() -> R + 'static, deps: Option<Deps>)
where
    R: IntoCleanup + 'static,
{
    schedule(callback, deps, true);
}

fn schedule<R>(callback: impl FnOnce() -> R + 'static, deps: Option<Deps>, immediate: bool)
where
    R: IntoCleanup + 'static,
{
    // Deps of the last run. Written when the effect runs, so a render that
    // is thrown away before its flush leaves them untouched.
    let hook = must(acquire_hook(|| None::<Deps>));
    if let Some(next) = &deps
        && hook.with(|prev| are_deps_equal(next, prev.as_ref()))
    {
        return;
    }
    let id = hook.id();
    let ran_with = deps.clone();
    let run = move || {
        hook.set(ran_with);
        callback()
    };
    must(schedule_effect(EffectRecord::new(id, run, deps), immediate));
}
