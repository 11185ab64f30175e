//! # Hook sessions
//!
//! Hooked lets a plain render function keep state between calls without
//! holding any itself. Every component instance owns a [`Session`]; while a
//! session renders, hook primitives find it through the thread's render
//! context and resume the state they used last time. There are four pieces:
//!
//! - the session guard: `render_ready` / `render_done` (or a
//!   [`RenderGuard`]) bracket every render, only one instance renders at a time;
//! - the hook list: [`acquire_hook`] returns the Nth record on the Nth call;
//! - the dependency comparator: [`are_deps_equal`];
//! - the effect scheduler: [`schedule_effect`], the two flushes, and
//!   [`unmount`].
//!
//! ## Positional hooks
//!
//! ```rust
//! use hooked_core::*;
//!
//! let session = Session::new();
//!
//! for expected in [0, 1, 2] {
//!     let guard = session.begin_render().unwrap();
//!     let count = acquire_hook(|| 0).unwrap();
//!     assert_eq!(count.get(), expected);
//!     count.set(count.get() + 1);
//!     guard.finish().unwrap();
//! }
//! ```
//!
//! Hook identity is the call position. The Nth call in a render always refers
//! to the Nth record, so hooks must not be called conditionally. With
//! [`EngineConfig::strict_hook_order`] (the default) a render that visits a
//! different number of positions than the first one fails with
//! [`HookError::HookOrderMismatch`].
//!
//! ## Effects and cleanup
//!
//! Effects are collected during a render and run later, when the host flushes
//! them. The cleanup of an effect's previous run always runs before the next
//! run of the same effect, and every installed cleanup runs on unmount:
//!
//! ```rust
//! use hooked_core::*;
//!
//! let session = Session::new();
//! let guard = session.begin_render().unwrap();
//! let hook = acquire_hook(|| None::<Deps>).unwrap();
//! schedule_effect(
//!     EffectRecord::new(
//!         hook.id(),
//!         || {
//!             log::info!("subscribed");
//!             on_cleanup(|| log::info!("unsubscribed"))
//!         },
//!         Some(deps![]),
//!     ),
//!     false,
//! )
//! .unwrap();
//! guard.finish().unwrap();
//!
//! flush_immediate_effects(&session).unwrap();
//! flush_deferred_effects(&session).unwrap();
//! assert_eq!(session.live_cleanups(), vec![0]);
//!
//! unmount(&session).unwrap();
//! assert!(session.live_cleanups().is_empty());
//! ```
//!
//! The engine never renders by itself. State updates coming from outside a
//! render go through [`set_hook_state`], which hands the re-render request to
//! the host's [`RenderTrigger`].

pub mod config;
pub mod deps;
pub mod effects;
pub mod error;
pub mod hooks;
pub mod prelude;
pub mod session;

pub use config::*;
pub use deps::*;
pub use effects::*;
pub use error::*;
pub use hooks::*;
pub use session::*;
