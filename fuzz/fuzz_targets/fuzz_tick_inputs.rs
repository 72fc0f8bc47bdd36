#![no_main]
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Debug, arbitrary::Arbitrary)]
struct Step {
    disturbance: f64,
    target: Option<f64>,
}

fuzz_target!(|steps: Vec<Step>| {
    let plant = cruise_core::PlantParameters::default();
    let mut sim = cruise_core::Simulator::builder()
        .with_logger(cruise_core::NullLogger)
        .try_build()
        .expect("defaults build");
    for s in steps {
        let out = sim.tick(s.disturbance, s.target);
        assert!(out.speed >= plant.speed_min && out.speed <= plant.speed_max);
        assert!(out.actuator_real >= plant.actuator_min && out.actuator_real <= plant.actuator_max);
        assert!(sim.state().integral.abs() <= 2.0);
    }
});
