//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use poslog_core::LogError;

    // Typed matches first
    if let Some(le) = err.downcast_ref::<LogError>() {
        return match le {
            LogError::ChannelMisconfigured { comparator } => format!(
                "What happened: An analog trigger's thresholds are ordered against its '{comparator}' comparator.\nLikely causes: on_threshold and off_threshold swapped in the [triggers] section.\nHow to fix: For greater_than put the on threshold above the off threshold; for less_than, below."
            ),
            LogError::RadiusTooSmall { min_radius } => format!(
                "What happened: The arc radius is shorter than half the distance between the two logged points.\nLikely causes: Points logged far apart, or move.arc_radius set too small.\nHow to fix: Use a radius of at least {min_radius:.4}, or log closer points."
            ),
            LogError::DegenerateMove => {
                "What happened: Arc start and end points are identical.\nLikely causes: Two logs taken without the machine moving.\nHow to fix: Move the machine between arc logs; a full circle cannot be expressed this way.".to_string()
            }
            LogError::MissingFeedRate { gcode } => format!(
                "What happened: A {gcode} move was requested without a feed rate.\nHow to fix: Set move.feed_rate to a positive value in the config."
            ),
            LogError::MissingArcRadius { gcode } => format!(
                "What happened: A {gcode} arc was requested without a radius.\nHow to fix: Set move.arc_radius to a positive value in the config."
            ),
            LogError::NoPriorPosition => {
                "What happened: An arc move needs a previously logged point as its start.\nHow to fix: Log one linear or rapid point first, then switch to the arc move type.".to_string()
            }
            LogError::PlanarAxesRequired => {
                "What happened: Arc moves need both X and Y in format.axes.\nHow to fix: Add X and Y to format.axes, or pick a non-arc move type.".to_string()
            }
            LogError::Status(msg) => format!(
                "What happened: The machine status channel failed ({msg}).\nLikely causes: The trace ran out or the status source disconnected.\nHow to fix: Check the playback file, or reconnect and rerun."
            ),
            LogError::Store(msg) => format!(
                "What happened: Script file access failed ({msg}).\nLikely causes: Missing directory, bad path, or insufficient permissions.\nHow to fix: Check script.path (or --out) and the directory permissions."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("playback csv") || lower.contains("invalid csv row") {
        return format!(
            "What happened: {msg}\nLikely causes: Wrong or missing header row, or a malformed value.\nHow to fix: The trace needs the exact header 'x,y,z,din,dout,ain,aout' and one numeric/boolean value per column."
        );
    }

    if lower.contains("config") && (lower.contains("parse") || lower.contains("read")) {
        return format!(
            "What happened: {msg}\nLikely causes: The config file is missing or not valid TOML.\nHow to fix: Check the --config path and the file syntax. See README for a sample."
        );
    }

    format!(
        "What happened: {msg}\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
    )
}

/// Structured error line for `--json` mode.
pub fn json_error(err: &eyre::Report) -> String {
    serde_json::json!({
        "event": "error",
        "message": err.to_string(),
        "detail": humanize(err),
    })
    .to_string()
}
