use hooked_core::{EffectPanicPolicy, EngineConfig};
use hooked_hooks::*;
use hooked_runtime::{Runtime, RuntimeConfig, component};

#[derive(Clone, Copy, Debug)]
enum Action {
    Step(i32),
    Reset,
}

fn reduce(count: &i32, action: Action) -> i32 {
    match action {
        Action::Step(n) => count + n,
        Action::Reset => 0,
    }
}

struct CounterProps {
    label: &'static str,
    step: i32,
    taps: Binding<u32>,
    theme: Context<&'static str>,
}

fn counter(props: &CounterProps) -> String {
    let (count, dispatch) = use_reducer(reduce, 0);
    let theme = use_context(&props.theme);
    let renders = use_value(0u32);
    *renders.borrow_mut() += 1;

    let parity = use_memo(
        || if count % 2 == 0 { "even" } else { "odd" },
        Some(deps![count]),
    );

    {
        let taps = props.taps.clone();
        let step = props.step;
        let label = props.label;
        use_effect(
            move || {
                log::info!("{label}: listening for taps");
                let cleanup = taps.subscribe(move |_| dispatch.dispatch(Action::Step(step)));
                on_cleanup(move || {
                    log::info!("{label}: stopped listening");
                    cleanup.run();
                })
            },
            Some(deps![step]),
        );
    }

    let label = props.label;
    use_layout_effect(
        move || log::debug!("{label}: committed count {count}"),
        Some(deps![count]),
    );

    format!(
        "[{theme}] {label}: {count} ({parity}, render #{})",
        renders.borrow()
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = RuntimeConfig::new().engine(
        EngineConfig::new().effect_panic_policy(EffectPanicPolicy::Isolate),
    );
    let mut runtime = Runtime::with_config(config);

    let taps = Binding::new(0u32);
    let theme = create_context("light");

    let ones = runtime.mount(
        component("Ones", counter),
        CounterProps {
            label: "ones",
            step: 1,
            taps: taps.clone(),
            theme: theme.clone(),
        },
    )?;
    let tens = runtime.mount(
        component("Tens", counter),
        CounterProps {
            label: "tens",
            step: 10,
            taps: taps.clone(),
            theme: theme.clone(),
        },
    )?;

    let print = |runtime: &Runtime<String>| {
        for key in [ones, tens] {
            if let Some(view) = runtime.output(key) {
                println!("{view}");
            }
        }
    };
    print(&runtime);

    for _ in 0..3 {
        taps.update(|n| *n += 1);
        let renders = runtime.update()?;
        log::info!("tap {} rendered {renders} components", taps.get());
        print(&runtime);
    }

    theme.provide("dark");
    runtime.update()?;
    print(&runtime);

    runtime.set_props(
        tens,
        CounterProps {
            label: "hundreds",
            step: 100,
            taps: taps.clone(),
            theme: theme.clone(),
        },
    )?;
    runtime.update()?;
    taps.update(|n| *n += 1);
    runtime.update()?;
    print(&runtime);

    if let Some(stats) = runtime.stats(ones) {
        log::info!(
            "ones rendered {} times, average {:?}",
            stats.renders,
            stats.average()
        );
    }

    runtime.unmount(ones)?;
    println!("{} subscribers left after unmounting ones", taps.subscriber_count());
    Ok(())
}
