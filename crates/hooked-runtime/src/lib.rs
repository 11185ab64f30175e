//! Component host for Hooked.
//!
//! A [`Runtime`] owns mounted components, gives each one its own hook
//! [`Session`](hooked_core::Session), and turns state updates into queued
//! re-renders that run on the next [`Runtime::update`].
//!
//! ```
//! use hooked_hooks::{deps, use_effect, use_state};
//! use hooked_runtime::{Runtime, component};
//!
//! let counter = component("Counter", |step: &i32| {
//!     let (count, set_count) = use_state(|| 0);
//!     let step = *step;
//!     use_effect(
//!         move || {
//!             if count < 3 {
//!                 set_count.set(count + step);
//!             }
//!         },
//!         Some(deps![count]),
//!     );
//!     count
//! });
//!
//! let mut runtime = Runtime::new();
//! let key = runtime.mount(counter, 1).unwrap();
//! assert_eq!(runtime.output(key), Some(&0));
//!
//! runtime.update().unwrap();
//! assert_eq!(runtime.output(key), Some(&3));
//! ```

pub mod component;
pub mod error;
pub mod runtime;
pub mod stats;

pub use component::*;
pub use error::*;
pub use runtime::*;
pub use stats::*;
