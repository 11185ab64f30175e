/// What the effect scheduler does when a callback or cleanup panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EffectPanicPolicy {
    /// Catch the panic, log it, keep flushing the rest of the queue and report
    /// the first failure once the queue is done.
    #[default]
    Isolate,
    /// Let the panic unwind out of the flush. Records after the failing one
    /// are dropped without running.
    Propagate,
}

/// Per-session engine settings.
///
/// ```rust
/// use hooked_core::{EffectPanicPolicy, EngineConfig};
///
/// let config = EngineConfig::new()
///     .strict_hook_order(false)
///     .effect_panic_policy(EffectPanicPolicy::Propagate);
/// assert!(!config.strict_hook_order);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Once a session finished its first render, reject renders that visit a
    /// different number of hook positions.
    pub strict_hook_order: bool,
    pub effect_panic_policy: EffectPanicPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_hook_order: true,
            effect_panic_policy: EffectPanicPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict_hook_order(mut self, strict: bool) -> Self {
        self.strict_hook_order = strict;
        self
    }

    pub fn effect_panic_policy(mut self, policy: EffectPanicPolicy) -> Self {
        self.effect_panic_policy = policy;
        self
    }
}
