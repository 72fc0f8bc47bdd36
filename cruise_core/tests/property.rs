use cruise_core::{
    ControllerParameters, ConversionParameters, DisturbanceParameters, NullLogger,
    PlantParameters, Simulator,
};
use proptest::prelude::*;

prop_compose! {
    // (disturbance, optional target) per tick
    fn input_strategy()(
        inputs in prop::collection::vec(
            (-500.0f64..500.0, prop::option::weighted(0.05, 20.0f64..130.0)),
            50..400,
        )
    ) -> Vec<(f64, Option<f64>)> {
        inputs
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn state_stays_within_envelope(inputs in input_strategy()) {
        let plant = PlantParameters::default();
        let ctrl = ControllerParameters::default();
        let mut sim = Simulator::builder()
            .with_logger(NullLogger)
            .try_build()
            .unwrap();

        for (d, t) in inputs {
            let s = sim.tick(d, t);
            prop_assert!((plant.speed_min..=plant.speed_max).contains(&s.speed));
            prop_assert!((plant.actuator_min..=plant.actuator_max).contains(&s.actuator_command));
            prop_assert!((plant.actuator_min..=plant.actuator_max).contains(&s.actuator_real));
            prop_assert!(sim.state().integral.abs() <= ctrl.integral_limit);
            prop_assert!((ctrl.above_zone_limits.0..=ctrl.below_zone_limits.1.max(ctrl.normal_limits.1))
                .contains(&s.command));
            prop_assert!(s.command_volts.is_finite());
        }
    }

    #[test]
    fn time_advances_by_dt_per_tick(n in 1u64..300) {
        let mut sim = Simulator::builder().with_logger(NullLogger).try_build().unwrap();
        let mut prev = 0.0;
        for _ in 0..n {
            let s = sim.tick(0.0, None);
            prop_assert!(s.time > prev);
            prev = s.time;
        }
        prop_assert!((sim.time_elapsed() - n as f64 * 0.1).abs() < 1e-9);
        prop_assert_eq!(sim.ticks(), n);
    }

    #[test]
    fn shaping_is_idempotent_on_clamp(raw in -1e6f64..1e6) {
        let p = DisturbanceParameters::default();
        let once = p.clamp(raw);
        prop_assert_eq!(p.clamp(once), once);
        prop_assert!((p.min..=p.max).contains(&once));
        prop_assert!((p.shape(raw) - once * p.attenuation).abs() < 1e-12);
    }

    #[test]
    fn voltage_round_trip_inside_range(speed in 50.0f64..=100.0) {
        let c = ConversionParameters::default();
        let back = c.voltage_to_speed(c.speed_to_voltage(speed));
        prop_assert!((back - speed).abs() < 1e-9);
    }

    #[test]
    fn sensor_voltage_saturates(speed in -1e4f64..1e4) {
        let c = ConversionParameters::default();
        let v = c.speed_to_voltage(speed);
        prop_assert!((c.volt_min..=c.volt_max).contains(&v));
    }
}
