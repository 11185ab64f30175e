pub use crate::config::{EffectPanicPolicy, EngineConfig};
pub use crate::deps::{Deps, are_deps_equal};
pub use crate::effects::{Cleanup, IntoCleanup, on_cleanup};
pub use crate::error::HookError;
pub use crate::hooks::{Hook, HookId};
pub use crate::session::{InstanceId, RenderGuard, RenderTrigger, Session};
