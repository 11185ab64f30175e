use std::cell::RefCell;
use std::rc::Rc;

use hooked_core::{EngineConfig, HookError};
use hooked_hooks::*;
use hooked_runtime::*;

type Log = Rc<RefCell<Vec<String>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

/// Renders its props and logs mount/cleanup of an effect keyed on them.
fn tracked(log: &Log) -> FunctionComponent<i32, i32> {
    let log = log.clone();
    component("Tracked", move |props: &i32| {
        let value = *props;
        log.borrow_mut().push(format!("render {value}"));
        let log = log.clone();
        use_effect(
            move || {
                log.borrow_mut().push(format!("effect {value}"));
                let log = log.clone();
                on_cleanup(move || log.borrow_mut().push(format!("cleanup {value}")))
            },
            Some(deps![value]),
        );
        value
    })
}

#[test]
fn lifecycle_runs_in_order() {
    let log = log();
    let mut runtime = Runtime::new();

    let key = runtime.mount(tracked(&log), 1).unwrap();
    assert_eq!(runtime.output(key), Some(&1));

    assert!(runtime.set_props(key, 2).unwrap());
    assert_eq!(runtime.update().unwrap(), 1);
    assert_eq!(runtime.output(key), Some(&2));

    runtime.unmount(key).unwrap();
    assert!(!runtime.contains(key));

    assert_eq!(
        entries(&log),
        vec![
            "render 1", "effect 1", "render 2", "cleanup 1", "effect 2", "cleanup 2"
        ]
    );
}

#[test]
fn state_set_in_effect_queues_a_render() {
    let mut runtime = Runtime::new();
    let loader = component("Loader", |_: &()| {
        let (loaded, set_loaded) = use_state(|| false);
        use_effect(move || set_loaded.set(true), Some(deps![]));
        loaded
    });

    let key = runtime.mount(loader, ()).unwrap();
    assert_eq!(runtime.output(key), Some(&false));
    assert!(runtime.is_queued(key));

    assert_eq!(runtime.update().unwrap(), 1);
    assert_eq!(runtime.output(key), Some(&true));
    assert_eq!(runtime.queued(), 0);
    assert_eq!(runtime.stats(key).map(|s| s.renders), Some(2));

    assert_eq!(runtime.update().unwrap(), 0);
}

#[test]
fn several_updates_coalesce_into_one_render() {
    let mut runtime = Runtime::new();
    let setter = Rc::new(RefCell::new(None));
    let counter = {
        let setter = setter.clone();
        component("Counter", move |_: &()| {
            let (count, set) = use_state(|| 0);
            *setter.borrow_mut() = Some(set);
            count
        })
    };

    let key = runtime.mount(counter, ()).unwrap();
    let set = setter.borrow().clone().unwrap();
    set.update(|n| n + 1);
    set.update(|n| n + 1);
    set.update(|n| n + 1);

    assert_eq!(runtime.queued(), 1);
    assert_eq!(runtime.update().unwrap(), 1);
    assert_eq!(runtime.output(key), Some(&3));
}

#[test]
fn layout_effects_run_before_deferred_effects() {
    let log = log();
    let mut runtime = Runtime::new();
    let view = {
        let log = log.clone();
        component("View", move |_: &()| {
            let deferred = log.clone();
            use_effect(move || deferred.borrow_mut().push("effect".to_string()), None);
            let layout = log.clone();
            use_layout_effect(move || layout.borrow_mut().push("layout".to_string()), None);
        })
    };

    let key = runtime.mount(view, ()).unwrap();
    runtime.invalidate(key).unwrap();
    runtime.update().unwrap();

    assert_eq!(entries(&log), vec!["layout", "effect", "layout", "effect"]);
}

#[test]
fn deferred_effects_wait_for_every_render_in_the_pass() {
    let log = log();
    let mut runtime = Runtime::new();
    let make = |name: &'static str| {
        let log = log.clone();
        component(name, move |_: &()| {
            log.borrow_mut().push(format!("render {name}"));
            let log = log.clone();
            use_effect(move || log.borrow_mut().push(format!("effect {name}")), None);
        })
    };

    let a = runtime.mount(make("a"), ()).unwrap();
    let b = runtime.mount(make("b"), ()).unwrap();
    log.borrow_mut().clear();

    runtime.invalidate(a).unwrap();
    runtime.invalidate(b).unwrap();
    assert_eq!(runtime.update().unwrap(), 2);

    assert_eq!(
        entries(&log),
        vec!["render a", "render b", "effect a", "effect b"]
    );
}

#[test]
fn pure_component_skips_equal_props() {
    let renders = Rc::new(RefCell::new(0));
    let mut runtime = Runtime::new();
    let label = {
        let renders = renders.clone();
        pure("Label", move |text: &String| {
            *renders.borrow_mut() += 1;
            text.len()
        })
    };

    let key = runtime.mount(label, "abc".to_string()).unwrap();
    assert!(!runtime.set_props(key, "abc".to_string()).unwrap());
    assert_eq!(runtime.update().unwrap(), 0);

    assert!(runtime.set_props(key, "abcd".to_string()).unwrap());
    runtime.update().unwrap();

    assert_eq!(*renders.borrow(), 2);
    assert_eq!(runtime.output(key), Some(&4));
}

#[test]
fn wrong_key_or_props_type_is_reported() {
    let log = log();
    let mut runtime = Runtime::new();
    let key = runtime.mount(tracked(&log), 1).unwrap();

    assert_eq!(
        runtime.set_props(key, "text"),
        Err(RuntimeError::PropsMismatch(key))
    );

    runtime.unmount(key).unwrap();
    assert_eq!(runtime.unmount(key), Err(RuntimeError::NotMounted(key)));
    assert_eq!(runtime.set_props(key, 2), Err(RuntimeError::NotMounted(key)));
    assert_eq!(runtime.invalidate(key), Err(RuntimeError::NotMounted(key)));
    assert!(runtime.output(key).is_none());
}

#[test]
fn panicking_render_is_reported_and_released() {
    let mut runtime = Runtime::new();
    let fragile = component("Fragile", |fail: &bool| {
        let (n, _) = use_state(|| 5);
        if *fail {
            panic!("bad props");
        }
        n
    });

    let key = runtime.mount(fragile, false).unwrap();
    runtime.set_props(key, true).unwrap();

    match runtime.update() {
        Err(RuntimeError::RenderPanicked { message, .. }) => assert_eq!(message, "bad props"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(!hooked_core::is_rendering());
    assert_eq!(runtime.output(key), Some(&5));

    runtime.set_props(key, false).unwrap();
    assert_eq!(runtime.update().unwrap(), 1);
}

#[test]
fn failed_first_render_does_not_mount() {
    let mut runtime = Runtime::new();
    let broken = component("Broken", |fail: &bool| {
        if *fail {
            panic!("no");
        }
    });

    assert!(matches!(
        runtime.mount(broken, true),
        Err(RuntimeError::RenderPanicked { .. })
    ));
    assert!(runtime.is_empty());
}

#[test]
fn conditional_hooks_fail_the_render() {
    let mut runtime = Runtime::new();
    let conditional = component("Conditional", |extra: &bool| {
        let (a, _) = use_state(|| 1);
        if *extra {
            let (b, _) = use_state(|| 2);
            return a + b;
        }
        a
    });

    let key = runtime.mount(conditional, false).unwrap();
    runtime.set_props(key, true).unwrap();
    assert!(matches!(
        runtime.update(),
        Err(RuntimeError::RenderPanicked { .. })
    ));

    let mut lenient = Runtime::with_config(
        RuntimeConfig::new().engine(EngineConfig::new().strict_hook_order(false)),
    );
    let conditional = component("Conditional", |skip: &bool| {
        let (a, _) = use_state(|| 1);
        if !*skip {
            let (b, _) = use_state(|| 2);
            return a + b;
        }
        a
    });
    let key = lenient.mount(conditional, false).unwrap();
    lenient.set_props(key, true).unwrap();
    assert_eq!(lenient.update().unwrap(), 1);
    assert_eq!(lenient.output(key), Some(&1));
}

#[test]
fn missing_hooks_are_a_hook_error() {
    let mut runtime = Runtime::new();
    let shrinking = component("Shrinking", |both: &bool| {
        let (a, _) = use_state(|| 1);
        if *both {
            let (b, _) = use_state(|| 2);
            return a + b;
        }
        a
    });

    let key = runtime.mount(shrinking, true).unwrap();
    runtime.set_props(key, false).unwrap();
    assert_eq!(
        runtime.update(),
        Err(RuntimeError::Hook(HookError::HookOrderMismatch {
            expected: 2,
            actual: 1
        }))
    );
    assert!(!hooked_core::is_rendering());
}

#[test]
fn render_loop_is_capped() {
    let mut runtime = Runtime::with_config(RuntimeConfig::new().max_render_passes(4));
    let runaway = component("Runaway", |_: &()| {
        let (n, set) = use_state(|| 0u32);
        use_effect(move || set.set(n + 1), None);
        n
    });

    let key = runtime.mount(runaway, ()).unwrap();
    assert_eq!(runtime.update().unwrap(), 4);
    assert_eq!(runtime.output(key), Some(&4));
    assert!(runtime.is_queued(key));
}

#[test]
fn dropping_the_runtime_unmounts_everything() {
    let log = log();
    let theme = create_context("dark");
    {
        let mut runtime = Runtime::new();
        runtime.mount(tracked(&log), 7).unwrap();
        let themed = {
            let theme = theme.clone();
            component("Themed", move |_: &i32| use_context(&theme).len() as i32)
        };
        let key = runtime.mount(themed, 0).unwrap();
        assert_eq!(runtime.output(key), Some(&4));
        assert_eq!(theme.consumer_count(), 1);
        assert_eq!(runtime.len(), 2);
    }

    assert_eq!(entries(&log), vec!["render 7", "effect 7", "cleanup 7"]);
    assert_eq!(theme.consumer_count(), 0);
}

#[test]
fn context_change_rerenders_consumers() {
    let theme = create_context(1);
    let mut runtime = Runtime::new();
    let make = || {
        let theme = theme.clone();
        component("Consumer", move |offset: &i32| use_context(&theme) + offset)
    };

    let a = runtime.mount(make(), 0).unwrap();
    let b = runtime.mount(make(), 10).unwrap();

    theme.provide(2);
    assert_eq!(runtime.queued(), 2);
    assert_eq!(runtime.update().unwrap(), 2);
    assert_eq!(runtime.output(a), Some(&2));
    assert_eq!(runtime.output(b), Some(&12));
}

#[test]
fn aborted_render_does_not_swallow_the_next_effect_run() {
    let log = log();
    let fail = Rc::new(RefCell::new(false));
    let keyed = {
        let log = log.clone();
        let fail = fail.clone();
        component("Keyed", move |props: &i32| {
            let value = *props;
            let run_log = log.clone();
            use_effect(
                move || {
                    run_log.borrow_mut().push(format!("run {value}"));
                    let log = run_log.clone();
                    on_cleanup(move || log.borrow_mut().push(format!("cleanup {value}")))
                },
                Some(deps![value]),
            );
            if *fail.borrow() {
                panic!("aborted after effect");
            }
            value
        })
    };

    let mut runtime = Runtime::new();
    let key = runtime.mount(keyed, 1).unwrap();

    *fail.borrow_mut() = true;
    runtime.set_props(key, 2).unwrap();
    assert!(runtime.update().is_err());
    assert_eq!(entries(&log), vec!["run 1"]);

    *fail.borrow_mut() = false;
    runtime.invalidate(key).unwrap();
    assert_eq!(runtime.update().unwrap(), 1);

    assert_eq!(runtime.output(key), Some(&2));
    assert_eq!(entries(&log), vec!["run 1", "cleanup 1", "run 2"]);
}

#[test]
fn failing_layout_effect_still_flushes_deferred_effects_on_mount() {
    let log = log();
    let view = {
        let log = log.clone();
        component("View", move |_: &()| {
            use_layout_effect(|| -> () { panic!("layout failed") }, Some(deps![]));
            let log = log.clone();
            use_effect(
                move || {
                    log.borrow_mut().push("effect".to_string());
                    let log = log.clone();
                    on_cleanup(move || log.borrow_mut().push("cleanup".to_string()))
                },
                Some(deps![]),
            );
        })
    };

    let mut runtime = Runtime::new();
    match runtime.mount(view, ()) {
        Err(RuntimeError::Hook(HookError::EffectPanicked { id, message })) => {
            assert_eq!(id, 0);
            assert_eq!(message, "layout failed");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    assert_eq!(entries(&log), vec!["effect", "cleanup"]);
    assert!(runtime.is_empty());
    assert_eq!(runtime.queued(), 0);
}
