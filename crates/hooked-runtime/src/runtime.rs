use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::{Rc, Weak};

use hooked_core::{
    EngineConfig, HookId, InstanceId, RenderTrigger, Session, flush_deferred_effects,
    flush_immediate_effects, panic_message,
};
use slotmap::{SlotMap, new_key_type};
use web_time::Instant;

use crate::{Component, RenderStats, RuntimeError};

new_key_type! {
    pub struct InstanceKey;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    /// Upper bound on render passes per [`Runtime::update`]. Keeps a component
    /// that sets state on every render from spinning forever.
    pub max_render_passes: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            max_render_passes: 64,
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn max_render_passes(mut self, passes: usize) -> Self {
        self.max_render_passes = passes.max(1);
        self
    }
}

#[derive(Default)]
struct DirtyQueue {
    order: VecDeque<InstanceKey>,
    queued: HashSet<InstanceKey>,
}

impl DirtyQueue {
    fn push(&mut self, key: InstanceKey) -> bool {
        if self.queued.insert(key) {
            self.order.push_back(key);
            true
        } else {
            false
        }
    }

    fn remove(&mut self, key: InstanceKey) {
        if self.queued.remove(&key) {
            self.order.retain(|k| *k != key);
        }
    }

    fn drain(&mut self) -> Vec<InstanceKey> {
        self.queued.clear();
        self.order.drain(..).collect()
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

struct InstanceTrigger {
    key: InstanceKey,
    dirty: Weak<RefCell<DirtyQueue>>,
}

impl RenderTrigger for InstanceTrigger {
    fn request_render(&self, instance: InstanceId, hook: HookId) {
        let Some(dirty) = self.dirty.upgrade() else {
            return;
        };
        if dirty.borrow_mut().push(self.key) {
            log::trace!("component {instance}: hook {hook} changed, queued for render");
        }
    }
}

trait Mounted<V> {
    fn session(&self) -> &Session;
    fn name(&self) -> &str;
    fn render(&mut self) -> Result<(), RuntimeError>;
    /// `None` when `props` has the wrong type.
    fn set_props(&mut self, props: Box<dyn Any>) -> Option<bool>;
    fn output(&self) -> Option<&V>;
    fn stats(&self) -> &RenderStats;
}

struct Instance<C: Component> {
    component: C,
    props: C::Props,
    session: Session,
    output: Option<C::Output>,
    stats: RenderStats,
}

impl<C: Component> Mounted<C::Output> for Instance<C> {
    fn session(&self) -> &Session {
        &self.session
    }

    fn name(&self) -> &str {
        self.component.name()
    }

    fn render(&mut self) -> Result<(), RuntimeError> {
        let started = Instant::now();
        let guard = self.session.begin_render()?;

        let component = &self.component;
        let props = &self.props;
        match catch_unwind(AssertUnwindSafe(|| component.render(props))) {
            Ok(output) => {
                if let Err(err) = guard.finish() {
                    self.session.discard_pending_effects();
                    return Err(err.into());
                }
                self.output = Some(output);
                self.stats.record(started.elapsed());
                Ok(())
            }
            Err(payload) => {
                drop(guard);
                self.session.discard_pending_effects();
                let message = panic_message(&*payload);
                log::error!(
                    "component {} ({}) panicked while rendering: {message}",
                    self.session.id(),
                    self.component.name()
                );
                Err(RuntimeError::RenderPanicked {
                    instance: self.session.id(),
                    message,
                })
            }
        }
    }

    fn set_props(&mut self, props: Box<dyn Any>) -> Option<bool> {
        let props = props.downcast::<C::Props>().ok()?;
        let update = self.component.should_update(&self.props, &props);
        self.props = *props;
        Some(update)
    }

    fn output(&self) -> Option<&C::Output> {
        self.output.as_ref()
    }

    fn stats(&self) -> &RenderStats {
        &self.stats
    }
}

/// Host for hooked components that all render to `V`.
///
/// Owns the instances, turns state updates into queued renders, and keeps
/// the flush order: immediate effects right after each render, deferred
/// effects once every render of the pass is committed.
pub struct Runtime<V: 'static> {
    config: RuntimeConfig,
    instances: SlotMap<InstanceKey, Box<dyn Mounted<V>>>,
    dirty: Rc<RefCell<DirtyQueue>>,
}

impl<V: 'static> Default for Runtime<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: 'static> Runtime<V> {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config,
            instances: SlotMap::with_key(),
            dirty: Rc::new(RefCell::new(DirtyQueue::default())),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Creates an instance and runs its first render and effects.
    ///
    /// Mounting is all or nothing: if the first render fails, or one of its
    /// effects fails under [`EffectPanicPolicy::Isolate`], both effect queues
    /// are still flushed, then the instance is unmounted again and the first
    /// error is returned.
    ///
    /// [`EffectPanicPolicy::Isolate`]: hooked_core::EffectPanicPolicy::Isolate
    pub fn mount<C>(&mut self, component: C, props: C::Props) -> Result<InstanceKey, RuntimeError>
    where
        C: Component<Output = V>,
    {
        let session = Session::with_config(self.config.engine);
        let dirty = Rc::downgrade(&self.dirty);
        let key = self.instances.insert_with_key(|key| {
            session.set_render_trigger(Rc::new(InstanceTrigger { key, dirty }));
            let instance: Box<dyn Mounted<V>> = Box::new(Instance {
                component,
                props,
                session,
                output: None,
                stats: RenderStats::default(),
            });
            instance
        });
        if let Some(instance) = self.instances.get(key) {
            log::debug!(
                "mounted {} as component {}",
                instance.name(),
                instance.session().id()
            );
        }

        if let Err(err) = self.render_and_commit(key) {
            if let Err(rollback) = self.unmount(key) {
                log::error!("rolling back failed mount: {rollback}");
            }
            return Err(err);
        }
        Ok(key)
    }

    /// Replaces the props of `key` and queues a render unless the component
    /// declines. Returns whether a render was queued.
    pub fn set_props<P: 'static>(&mut self, key: InstanceKey, props: P) -> Result<bool, RuntimeError> {
        let instance = self
            .instances
            .get_mut(key)
            .ok_or(RuntimeError::NotMounted(key))?;
        let update = instance
            .set_props(Box::new(props))
            .ok_or(RuntimeError::PropsMismatch(key))?;
        if update {
            self.dirty.borrow_mut().push(key);
        } else {
            log::trace!("component {}: props unchanged, render skipped", instance.session().id());
        }
        Ok(update)
    }

    /// Queues a render of `key` regardless of state changes.
    pub fn invalidate(&mut self, key: InstanceKey) -> Result<(), RuntimeError> {
        if !self.instances.contains_key(key) {
            return Err(RuntimeError::NotMounted(key));
        }
        self.dirty.borrow_mut().push(key);
        Ok(())
    }

    /// Renders every queued instance until nothing is queued or the pass limit
    /// is hit. Returns the number of renders. A failing instance does not stop
    /// the others; the first error is returned once the loop ends.
    pub fn update(&mut self) -> Result<usize, RuntimeError> {
        let mut renders = 0;
        let mut first_error: Option<RuntimeError> = None;

        for pass in 0..self.config.max_render_passes {
            let batch = self.dirty.borrow_mut().drain();
            if batch.is_empty() {
                break;
            }
            log::debug!("render pass {pass}: {} components", batch.len());

            let mut committed = Vec::with_capacity(batch.len());
            for key in batch {
                let Some(instance) = self.instances.get_mut(key) else {
                    continue;
                };
                if let Err(err) = instance.render() {
                    first_error.get_or_insert(err);
                    continue;
                }
                renders += 1;
                if let Err(err) = flush_immediate_effects(instance.session()) {
                    first_error.get_or_insert(err.into());
                }
                committed.push(key);
            }

            for key in committed {
                if let Some(instance) = self.instances.get(key)
                    && let Err(err) = flush_deferred_effects(instance.session())
                {
                    first_error.get_or_insert(err.into());
                }
            }
        }

        let pending = self.dirty.borrow().len();
        if pending > 0 {
            log::warn!(
                "update stopped after {} render passes with {pending} components still queued",
                self.config.max_render_passes
            );
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(renders),
        }
    }

    /// Removes `key` and runs all of its installed cleanups.
    pub fn unmount(&mut self, key: InstanceKey) -> Result<(), RuntimeError> {
        let instance = self
            .instances
            .remove(key)
            .ok_or(RuntimeError::NotMounted(key))?;
        self.dirty.borrow_mut().remove(key);
        log::debug!("unmounting component {} ({})", instance.session().id(), instance.name());
        hooked_core::unmount(instance.session())?;
        Ok(())
    }

    pub fn output(&self, key: InstanceKey) -> Option<&V> {
        self.instances.get(key).and_then(|i| i.output())
    }

    pub fn session(&self, key: InstanceKey) -> Option<&Session> {
        self.instances.get(key).map(|i| i.session())
    }

    pub fn stats(&self, key: InstanceKey) -> Option<&RenderStats> {
        self.instances.get(key).map(|i| i.stats())
    }

    pub fn contains(&self, key: InstanceKey) -> bool {
        self.instances.contains_key(key)
    }

    pub fn is_queued(&self, key: InstanceKey) -> bool {
        self.dirty.borrow().queued.contains(&key)
    }

    pub fn queued(&self) -> usize {
        self.dirty.borrow().len()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn render_and_commit(&mut self, key: InstanceKey) -> Result<(), RuntimeError> {
        let instance = self
            .instances
            .get_mut(key)
            .ok_or(RuntimeError::NotMounted(key))?;
        instance.render()?;
        let immediate = flush_immediate_effects(instance.session());
        let deferred = flush_deferred_effects(instance.session());
        immediate.and(deferred)?;
        Ok(())
    }
}

impl<V: 'static> Drop for Runtime<V> {
    fn drop(&mut self) {
        for (_, instance) in self.instances.drain() {
            if let Err(err) = hooked_core::unmount(instance.session()) {
                log::error!("component {}: {err}", instance.session().id());
            }
        }
    }
}
