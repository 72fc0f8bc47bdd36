//! Human-readable error descriptions and structured JSON error formatting.

use cruise_core::error::{BuildError, SimError};

/// Full cause chain joined with ": ".
fn chain_message(err: &eyre::Report) -> String {
    err.chain()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::NonPositiveDt(dt) => format!(
                "What happened: The time step is not usable (dt = {dt}).\nLikely causes: simulation.dt is zero, negative or missing a decimal point.\nHow to fix: Set simulation.dt to a positive number of seconds (reference: 0.1)."
            ),
            BuildError::InvalidHistory => {
                "What happened: The telemetry history has no room.\nLikely causes: simulation.history_capacity = 0.\nHow to fix: Set simulation.history_capacity to at least 1 (reference: 150).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun `cruise check-config`."
            ),
        };
    }

    if let Some(se) = err.downcast_ref::<SimError>() {
        return match se {
            SimError::Interrupted { ticks } => format!(
                "What happened: Run interrupted after {ticks} ticks.\nLikely causes: Ctrl-C or a termination signal before the tick budget was spent.\nHow to fix: Nothing to fix; rerun to complete the budget."
            ),
            SimError::Config(msg) => format!(
                "What happened: Invalid input schedule ({msg}).\nLikely causes: Duplicate or zero ticks in the scenario.\nHow to fix: Make scenario ticks start at 1 and strictly increase."
            ),
        };
    }

    // String-based heuristics for errors coming from config loading
    let msg = chain_message(err);
    let lower = msg.to_ascii_lowercase();

    if lower.contains("scenario csv must have headers") {
        return "Invalid headers in scenario CSV. Expected 'tick,disturbance,target'.".to_string();
    }

    if lower.contains("read config") {
        return format!(
            "What happened: Could not read the config file.\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass --config <FILE> pointing at a readable TOML file. Original: {msg}"
        );
    }

    if lower.contains("invalid configuration") || lower.contains("parse config") {
        return format!(
            "What happened: Configuration is invalid.\nDetails: {msg}\nHow to fix: Edit the TOML config and try again."
        );
    }

    format!(
        "Something went wrong: {msg}\nHow to fix: Re-run with --log-level=debug for details."
    )
}

/// Stable exit codes: 130 for an interrupted bounded run, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(SimError::Interrupted { .. }) = err.downcast_ref::<SimError>() {
        return 130;
    }
    1
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::NonPositiveDt(_) => "NonPositiveDt",
            BuildError::InvalidHistory => "InvalidHistory",
            BuildError::InvalidConfig(_) => "InvalidConfig",
        };
    }
    match err.downcast_ref::<SimError>() {
        Some(SimError::Interrupted { .. }) => "Interrupted",
        Some(SimError::Config(_)) => "InvalidSchedule",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let mut obj = json!({ "reason": reason_name(err), "message": humanize(err) });
    if let Some(SimError::Interrupted { ticks }) = err.downcast_ref::<SimError>() {
        obj["details"] = json!({ "ticks": ticks });
    }
    obj.to_string()
}
