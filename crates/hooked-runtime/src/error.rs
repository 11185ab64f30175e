use hooked_core::{HookError, InstanceId};

use crate::InstanceKey;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Hook(#[from] HookError),

    #[error("no mounted component for {0:?}")]
    NotMounted(InstanceKey),

    #[error("props of a different type were sent to component {0:?}")]
    PropsMismatch(InstanceKey),

    #[error("component {instance} panicked while rendering: {message}")]
    RenderPanicked { instance: InstanceId, message: String },
}
