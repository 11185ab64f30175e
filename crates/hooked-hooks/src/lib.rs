//! # Hook primitives
//!
//! Thin policies over the two engine primitives, `acquire_hook` and
//! `schedule_effect`. Each call takes the next hook position of the component
//! currently rendering, so the usual rule applies: call them unconditionally
//! and in the same order on every render.
//!
//! - `use_state` / `use_reducer`: state that asks the host for a re-render
//!   when it changes (equal values bail out).
//! - `use_memo` / `use_callback`: values recomputed only when their deps change.
//! - `use_value` / `use_ref`: stable mutable cells, writes never re-render.
//! - `use_binding`: a subscribable value that changes without re-rendering.
//! - `use_effect` / `use_layout_effect`: deferred and immediate effects.
//! - `use_context`: read a shared [`Context`] and re-render when it changes.
//!
//! All of them panic when called outside of a render, or when the hook order
//! changed between renders, with the engine's [`HookError`] as the message.
//!
//! ```rust
//! use hooked_core::Session;
//! use hooked_hooks::*;
//!
//! let session = Session::new();
//! let guard = session.begin_render().unwrap();
//! let (count, set_count) = use_state(|| 0);
//! let doubled = use_memo(|| count * 2, Some(deps![count]));
//! assert_eq!(doubled, 0);
//! guard.finish().unwrap();
//!
//! set_count.set(1);
//! ```

pub mod binding;
pub mod context;
pub mod effect;
pub mod memo;
pub mod refs;
pub mod state;

pub use binding::*;
pub use context::*;
pub use effect::*;
pub use memo::*;
pub use refs::*;
pub use state::*;

pub use hooked_core::{Cleanup, Deps, HookError, IntoCleanup, deps, on_cleanup};

/// Engine errors inside a render are caller bugs; fail the render loudly.
#[track_caller]
pub(crate) fn must<T>(result: Result<T, HookError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}
