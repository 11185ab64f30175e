use std::any::Any;

use crate::HookId;

/// Everything the engine can reject.
///
/// `InvalidHookCall`, `RenderNotDone` and `RenderOverlap` are caller bugs: the
/// render that hit them should be aborted and never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HookError {
    #[error(
        "invalid hook call: hooks can only be called inside the body of a component while it renders"
    )]
    InvalidHookCall,

    #[error("failed to render component: another component is already rendering")]
    RenderNotDone,

    #[error("failed to render component: another component rendered during this one")]
    RenderOverlap,

    #[error("hook {id} was created with a different type than `{expected}`; hook call order changed")]
    HookTypeMismatch { id: HookId, expected: &'static str },

    #[error("hook call order changed between renders: expected {expected} hooks, found {actual}")]
    HookOrderMismatch { expected: usize, actual: usize },

    #[error("no hook with id {id} exists on this component")]
    UnknownHook { id: HookId },

    #[error("effect {id} panicked: {message}")]
    EffectPanicked { id: HookId, message: String },
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}
