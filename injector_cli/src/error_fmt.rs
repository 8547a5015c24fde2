//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use injector_core::EngineError;

    // Typed matches first
    if let Some(ee) = err.downcast_ref::<EngineError>() {
        return match ee {
            EngineError::UnknownRow(id) => format!(
                "What happened: Row {id} does not exist.\nLikely causes: The row was removed, or the id was mistyped.\nHow to fix: Use an id shown in the current table."
            ),
            EngineError::UnknownField(name) => format!(
                "What happened: Unknown field {name:?}.\nLikely causes: Typo in the field name.\nHow to fix: Use injections, pulse_width_ms or total_mass_g."
            ),
            EngineError::IncompleteRow(id) => format!(
                "What happened: Row {id} is incomplete.\nLikely causes: A field is blank, zero or not a number.\nHow to fix: Enter injections, pulse width and mass for the row."
            ),
        };
    }

    // String-based heuristics for errors coming from config or data loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("rows csv must have headers") {
        return "Invalid headers in rows CSV. Expected 'injections,pulse_width_ms,total_mass_g' with an optional 'include' column.".to_string();
    }

    if lower.contains("open rows csv") {
        return format!(
            "What happened: Could not open the rows CSV.\nLikely causes: Wrong path or missing permissions.\nHow to fix: Check the --data path. Original: {msg}"
        );
    }

    if lower.contains("--exclude") {
        return format!(
            "What happened: {msg}.\nLikely causes: Row numbers are 1-based and refer to data lines in the CSV.\nHow to fix: Pick a number between 1 and the number of data rows."
        );
    }

    if lower.contains("config") || lower.starts_with("display.") || lower.starts_with("logging.") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: Unknown values or out-of-range settings in the TOML.\nHow to fix: Edit the config file and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 for bad row references, 1 for everything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<injector_core::EngineError>().is_some() {
        return 3;
    }
    if err.to_string().contains("--exclude") {
        return 3;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use injector_core::EngineError;
    use serde_json::json;

    let reason = match err.downcast_ref::<EngineError>() {
        Some(EngineError::UnknownRow(_)) => "UnknownRow",
        Some(EngineError::UnknownField(_)) => "UnknownField",
        Some(EngineError::IncompleteRow(_)) => "IncompleteRow",
        None => "Error",
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}
