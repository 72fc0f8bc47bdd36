#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and scenario parsing for the speed control simulator.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//!   Every section is optional and defaults to the reference tuning.
//! - Scenario CSV loader enforces headers and step ordering; a scenario
//!   scripts the two live inputs (disturbance, target) over ticks.
use serde::Deserialize;

/// Scenario CSV schema.
///
/// Expected headers:
/// tick,disturbance,target
///
/// `target` may be left empty to keep the current setpoint.
///
/// Example:
/// tick,disturbance,target
/// 1,0,80
/// 200,200,
/// 400,0,60
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ScenarioRow {
    pub tick: u64,
    pub disturbance: f64,
    pub target: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationCfg {
    /// Simulated seconds per tick
    pub dt: f64,
    /// Wall-clock pacing between ticks (ms); 0 runs as fast as possible
    pub interval_ms: u64,
    /// Telemetry samples retained
    pub history_capacity: usize,
    /// Log a status line every N ticks
    pub log_every: u64,
    /// Optional tick budget; absent means run until interrupted
    pub ticks: Option<u64>,
}

impl Default for SimulationCfg {
    fn default() -> Self {
        Self {
            dt: 0.1,
            interval_ms: 100,
            history_capacity: 150,
            log_every: 5,
            ticks: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InitialCfg {
    pub speed: f64,
    pub actuator: f64,
    pub target: f64,
}

impl Default for InitialCfg {
    fn default() -> Self {
        Self {
            speed: 70.0,
            actuator: 4812.0,
            target: 80.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ControllerCfg {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Tolerance band offsets relative to the target (km/h)
    pub band_offset_min: f64,
    pub band_offset_max: f64,
    pub above_band_gain: f64,
    pub below_band_gain: f64,
    pub near_edge_gain: f64,
    pub near_edge_margin: f64,
    pub integral_window: f64,
    pub integral_rate: f64,
    pub integral_limit: f64,
    pub integral_decay: f64,
    pub prediction_trigger: f64,
    pub prediction_reference: f64,
    pub overshoot_gain: f64,
    pub undershoot_gain: f64,
    pub zone_margin: f64,
    /// Command limits as [min, max]
    pub above_zone_limits: (f64, f64),
    pub below_zone_limits: (f64, f64),
    pub normal_limits: (f64, f64),
}

impl Default for ControllerCfg {
    fn default() -> Self {
        Self {
            kp: 4.0,
            ki: 0.2,
            kd: 0.8,
            band_offset_min: -2.0,
            band_offset_max: 1.0,
            above_band_gain: 1.5,
            below_band_gain: 1.3,
            near_edge_gain: 0.7,
            near_edge_margin: 0.3,
            integral_window: 1.0,
            integral_rate: 0.02,
            integral_limit: 2.0,
            integral_decay: 0.9,
            prediction_trigger: 0.3,
            prediction_reference: 0.2,
            overshoot_gain: 10.0,
            undershoot_gain: 6.0,
            zone_margin: 0.2,
            above_zone_limits: (-30.0, 5.0),
            below_zone_limits: (-5.0, 20.0),
            normal_limits: (-25.0, 25.0),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConversionCfg {
    /// Speed at the bottom / top of the sensor range (km/h)
    pub speed_min: f64,
    pub speed_max: f64,
    pub volt_min: f64,
    pub volt_max: f64,
    /// Command voltage meaning "hold"
    pub neutral_volts: f64,
    pub command_range: f64,
}

impl Default for ConversionCfg {
    fn default() -> Self {
        Self {
            speed_min: 50.0,
            speed_max: 100.0,
            volt_min: 0.0,
            volt_max: 5.0,
            neutral_volts: 2.5,
            command_range: 25.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisturbanceCfg {
    pub min: f64,
    pub max: f64,
    pub attenuation: f64,
}

impl Default for DisturbanceCfg {
    fn default() -> Self {
        Self {
            min: -100.0,
            max: 200.0,
            attenuation: 0.3,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PlantCfg {
    pub actuator_nominal: f64,
    pub actuator_min: f64,
    pub actuator_max: f64,
    pub speed_min: f64,
    pub speed_max: f64,
    pub actuator_gain: f64,
    pub out_of_band_boost: f64,
}

impl Default for PlantCfg {
    fn default() -> Self {
        Self {
            actuator_nominal: 5500.0,
            actuator_min: 4700.0,
            actuator_max: 6300.0,
            speed_min: 50.0,
            speed_max: 100.0,
            actuator_gain: 18.0,
            out_of_band_boost: 1.3,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationCfg,
    pub initial: InitialCfg,
    pub controller: ControllerCfg,
    pub conversion: ConversionCfg,
    pub disturbance: DisturbanceCfg,
    pub plant: PlantCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

fn check_finite(name: &str, v: f64) -> eyre::Result<()> {
    if !v.is_finite() {
        eyre::bail!("{name} must be finite");
    }
    Ok(())
}

fn check_limits(name: &str, (lo, hi): (f64, f64)) -> eyre::Result<()> {
    check_finite(name, lo)?;
    check_finite(name, hi)?;
    if lo > hi {
        eyre::bail!("{name} must be [min, max] with min <= max");
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Simulation
        let s = &self.simulation;
        if !(s.dt.is_finite() && s.dt > 0.0) {
            eyre::bail!("simulation.dt must be > 0");
        }
        if s.interval_ms > 60_000 {
            eyre::bail!("simulation.interval_ms is unreasonably large (>60s)");
        }
        if s.history_capacity == 0 {
            eyre::bail!("simulation.history_capacity must be >= 1");
        }
        if s.history_capacity > 1_000_000 {
            eyre::bail!("simulation.history_capacity is unreasonably large (>1e6)");
        }
        if s.log_every == 0 {
            eyre::bail!("simulation.log_every must be >= 1");
        }
        if s.ticks == Some(0) {
            eyre::bail!("simulation.ticks must be >= 1 when set");
        }

        // Initial conditions
        check_finite("initial.speed", self.initial.speed)?;
        check_finite("initial.actuator", self.initial.actuator)?;
        check_finite("initial.target", self.initial.target)?;

        // Controller
        let c = &self.controller;
        for (name, v) in [
            ("controller.kp", c.kp),
            ("controller.ki", c.ki),
            ("controller.kd", c.kd),
            ("controller.band_offset_min", c.band_offset_min),
            ("controller.band_offset_max", c.band_offset_max),
            ("controller.above_band_gain", c.above_band_gain),
            ("controller.below_band_gain", c.below_band_gain),
            ("controller.near_edge_gain", c.near_edge_gain),
            ("controller.near_edge_margin", c.near_edge_margin),
            ("controller.integral_window", c.integral_window),
            ("controller.integral_rate", c.integral_rate),
            ("controller.integral_limit", c.integral_limit),
            ("controller.integral_decay", c.integral_decay),
            ("controller.prediction_trigger", c.prediction_trigger),
            ("controller.prediction_reference", c.prediction_reference),
            ("controller.overshoot_gain", c.overshoot_gain),
            ("controller.undershoot_gain", c.undershoot_gain),
            ("controller.zone_margin", c.zone_margin),
        ] {
            check_finite(name, v)?;
        }
        if c.band_offset_min > c.band_offset_max {
            eyre::bail!("controller.band_offset_min must be <= controller.band_offset_max");
        }
        if c.integral_limit < 0.0 {
            eyre::bail!("controller.integral_limit must be >= 0");
        }
        if !(0.0..=1.0).contains(&c.integral_decay) {
            eyre::bail!("controller.integral_decay must be in [0.0, 1.0]");
        }
        check_limits("controller.above_zone_limits", c.above_zone_limits)?;
        check_limits("controller.below_zone_limits", c.below_zone_limits)?;
        check_limits("controller.normal_limits", c.normal_limits)?;

        // Conversion
        let v = &self.conversion;
        check_limits("conversion speed range", (v.speed_min, v.speed_max))?;
        check_limits("conversion volt range", (v.volt_min, v.volt_max))?;
        check_finite("conversion.neutral_volts", v.neutral_volts)?;
        if !(v.volt_min..=v.volt_max).contains(&v.neutral_volts) {
            eyre::bail!("conversion.neutral_volts must lie within [volt_min, volt_max]");
        }
        if !(v.command_range.is_finite() && v.command_range > 0.0) {
            eyre::bail!("conversion.command_range must be > 0");
        }

        // Disturbance
        let d = &self.disturbance;
        check_limits("disturbance range", (d.min, d.max))?;
        if !(0.0..=1.0).contains(&d.attenuation) {
            eyre::bail!("disturbance.attenuation must be in [0.0, 1.0]");
        }

        // Plant
        let p = &self.plant;
        if !(p.actuator_nominal.is_finite() && p.actuator_nominal > 0.0) {
            eyre::bail!("plant.actuator_nominal must be > 0");
        }
        check_limits("plant actuator range", (p.actuator_min, p.actuator_max))?;
        check_limits("plant speed range", (p.speed_min, p.speed_max))?;
        check_finite("plant.actuator_gain", p.actuator_gain)?;
        check_finite("plant.out_of_band_boost", p.out_of_band_boost)?;

        // Logging
        if let Some(r) = self.logging.rotation.as_deref()
            && !matches!(r, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}

/// Check a list of scenario rows: ticks start at 1 and strictly increase,
/// values are finite.
pub fn validate_scenario(rows: &[ScenarioRow]) -> eyre::Result<()> {
    let mut last: Option<u64> = None;
    for (idx, row) in rows.iter().enumerate() {
        if row.tick == 0 {
            eyre::bail!("scenario row {}: tick must be >= 1", idx + 2);
        }
        if let Some(prev) = last
            && row.tick <= prev
        {
            eyre::bail!(
                "scenario row {}: ticks must be strictly increasing ({} after {})",
                idx + 2,
                row.tick,
                prev
            );
        }
        if !row.disturbance.is_finite() {
            eyre::bail!("scenario row {}: disturbance must be finite", idx + 2);
        }
        if let Some(t) = row.target
            && !t.is_finite()
        {
            eyre::bail!("scenario row {}: target must be finite", idx + 2);
        }
        last = Some(row.tick);
    }
    Ok(())
}

pub fn load_scenario_csv(path: &std::path::Path) -> eyre::Result<Vec<ScenarioRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open scenario CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["tick", "disturbance", "target"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "scenario CSV must have headers 'tick,disturbance,target', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<ScenarioRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    if rows.is_empty() {
        eyre::bail!("scenario CSV has no rows");
    }

    validate_scenario(&rows)?;
    Ok(rows)
}
