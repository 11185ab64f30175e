use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::effects::{Cleanup, EffectQueue};
use crate::{EngineConfig, HookError, HookId};

thread_local! {
    static CURRENT: RefCell<Option<RenderContext>> = const { RefCell::new(None) };
}

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Process-unique id of a component instance, used in logs and by render triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        Self(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Host side of a state update: asked to re-render an instance after one of
/// its hooks changed. The engine never renders by itself.
pub trait RenderTrigger {
    fn request_render(&self, instance: InstanceId, hook: HookId);
}

struct RenderContext {
    session: Session,
    /// Last hook position visited in this render.
    cursor: Option<HookId>,
}

pub(crate) struct SessionState {
    pub(crate) id: InstanceId,
    pub(crate) config: EngineConfig,
    pub(crate) hooks: Vec<Rc<dyn Any>>,
    pub(crate) deferred: EffectQueue,
    pub(crate) immediate: EffectQueue,
    pub(crate) effect_handles: HashMap<HookId, Cleanup>,
    pub(crate) completed_renders: u64,
    pub(crate) trigger: Option<Rc<dyn RenderTrigger>>,
    pub(crate) unmounted: bool,
}

/// Everything the engine keeps for one component instance.
///
/// Cloning is cheap and yields a handle to the same instance.
#[derive(Clone)]
pub struct Session {
    pub(crate) inner: Rc<RefCell<SessionState>>,
}

#[derive(Clone)]
pub struct WeakSession(Weak<RefCell<SessionState>>);

impl WeakSession {
    pub fn upgrade(&self) -> Option<Session> {
        self.0.upgrade().map(|inner| Session { inner })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SessionState {
                id: InstanceId::next(),
                config,
                hooks: Vec::new(),
                deferred: EffectQueue::new(),
                immediate: EffectQueue::new(),
                effect_handles: HashMap::new(),
                completed_renders: 0,
                trigger: None,
                unmounted: false,
            })),
        }
    }

    pub fn id(&self) -> InstanceId {
        self.inner.borrow().id
    }

    pub fn config(&self) -> EngineConfig {
        self.inner.borrow().config
    }

    pub fn set_render_trigger(&self, trigger: Rc<dyn RenderTrigger>) {
        self.inner.borrow_mut().trigger = Some(trigger);
    }

    pub fn downgrade(&self) -> WeakSession {
        WeakSession(Rc::downgrade(&self.inner))
    }

    pub fn ptr_eq(&self, other: &Session) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of hook positions created so far.
    pub fn hook_count(&self) -> usize {
        self.inner.borrow().hooks.len()
    }

    /// Number of renders that went through `render_done` cleanly.
    pub fn render_count(&self) -> u64 {
        self.inner.borrow().completed_renders
    }

    /// Ids of effects whose cleanup is currently installed, sorted.
    pub fn live_cleanups(&self) -> Vec<HookId> {
        let mut ids: Vec<HookId> = self.inner.borrow().effect_handles.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// `(deferred, immediate)` effects waiting for a flush.
    pub fn pending_effects(&self) -> (usize, usize) {
        let s = self.inner.borrow();
        (s.deferred.len(), s.immediate.len())
    }

    pub fn is_unmounted(&self) -> bool {
        self.inner.borrow().unmounted
    }

    /// Drops effects scheduled by a render that did not complete.
    pub fn discard_pending_effects(&self) {
        let mut s = self.inner.borrow_mut();
        s.deferred.clear();
        s.immediate.clear();
    }

    pub fn is_rendering(&self) -> bool {
        CURRENT.with(|current| {
            current
                .borrow()
                .as_ref()
                .is_some_and(|ctx| ctx.session.ptr_eq(self))
        })
    }

    /// Opens a render session that is closed again when the guard drops.
    pub fn begin_render(&self) -> Result<RenderGuard, HookError> {
        render_ready(self)?;
        Ok(RenderGuard {
            session: self.clone(),
            finished: false,
        })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.inner.borrow();
        f.debug_struct("Session")
            .field("id", &s.id)
            .field("hooks", &s.hooks.len())
            .field("deferred", &s.deferred.len())
            .field("immediate", &s.immediate.len())
            .field("live_cleanups", &s.effect_handles.len())
            .field("renders", &s.completed_renders)
            .finish()
    }
}

/// Marks `session` as the one rendering on this thread.
pub fn render_ready(session: &Session) -> Result<(), HookError> {
    CURRENT.with(|current| {
        let mut current = current.borrow_mut();
        if current.is_some() {
            return Err(HookError::RenderNotDone);
        }
        *current = Some(RenderContext {
            session: session.clone(),
            cursor: None,
        });
        Ok(())
    })?;
    log::debug!("render {} started", session.id());
    Ok(())
}

/// Closes the render opened by `render_ready` for this same `session`.
pub fn render_done(session: &Session) -> Result<(), HookError> {
    let cursor = CURRENT.with(|current| {
        let mut current = current.borrow_mut();
        match current.take() {
            Some(ctx) if ctx.session.ptr_eq(session) => Ok(ctx.cursor),
            other => {
                *current = other;
                Err(HookError::RenderOverlap)
            }
        }
    })?;
    let visited = cursor.map_or(0, |c| c + 1);

    let mut s = session.inner.borrow_mut();
    let created = s.hooks.len();
    let established = s.completed_renders > 0;
    s.completed_renders += 1;
    log::debug!("render {} done ({visited} hooks)", s.id);

    if established && visited != created {
        if s.config.strict_hook_order {
            return Err(HookError::HookOrderMismatch {
                expected: created,
                actual: visited,
            });
        }
        log::warn!(
            "component {} visited {visited} of {created} hooks; hook call order must not depend on conditions",
            s.id
        );
    }
    Ok(())
}

/// The session currently rendering on this thread.
pub fn resolve_current_component() -> Result<Session, HookError> {
    CURRENT.with(|current| {
        current
            .borrow()
            .as_ref()
            .map(|ctx| ctx.session.clone())
            .ok_or(HookError::InvalidHookCall)
    })
}

pub fn is_rendering() -> bool {
    CURRENT.with(|current| current.borrow().is_some())
}

pub(crate) fn current_position() -> Result<(Session, Option<HookId>), HookError> {
    CURRENT.with(|current| {
        current
            .borrow()
            .as_ref()
            .map(|ctx| (ctx.session.clone(), ctx.cursor))
            .ok_or(HookError::InvalidHookCall)
    })
}

pub(crate) fn advance_cursor(id: HookId) {
    CURRENT.with(|current| {
        if let Some(ctx) = current.borrow_mut().as_mut() {
            ctx.cursor = Some(id);
        }
    });
}

/// RAII form of `render_ready`/`render_done`.
///
/// Call [`RenderGuard::finish`] once the render function returned. Dropping
/// an unfinished guard (e.g. while a render panics) releases the session
/// without counting the render as completed.
pub struct RenderGuard {
    session: Session,
    finished: bool,
}

impl RenderGuard {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn finish(mut self) -> Result<(), HookError> {
        self.finished = true;
        render_done(&self.session)
    }
}

impl Drop for RenderGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        CURRENT.with(|current| {
            let mut current = current.borrow_mut();
            if current
                .as_ref()
                .is_some_and(|ctx| ctx.session.ptr_eq(&self.session))
            {
                *current = None;
            }
        });
        log::debug!("render {} abandoned", self.session.id());
    }
}
