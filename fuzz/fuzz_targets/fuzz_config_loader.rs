#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not. Anything that
    // validates must also build and survive a few ticks.
    let Ok(cfg) = toml::from_str::<cruise_config::Config>(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    let mut sim = cruise_core::Simulator::builder()
        .with_controller((&cfg.controller).into())
        .with_conversion((&cfg.conversion).into())
        .with_disturbance((&cfg.disturbance).into())
        .with_plant((&cfg.plant).into())
        .with_initial((&cfg.initial).into())
        .with_simulation((&cfg.simulation).into())
        .with_logger(cruise_core::NullLogger)
        .try_build()
        .expect("validated config must build");
    for _ in 0..10 {
        sim.tick(0.0, None);
    }
});
