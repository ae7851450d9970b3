use thiserror::Error;

/// Typed, recoverable failures of a single log attempt. None of these
/// stop the polling loop; they abort the current compose only and leave
/// the script document and edge latches untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LogError {
    #[error("analog channel misconfigured: on/off thresholds conflict with '{comparator}' logic")]
    ChannelMisconfigured { comparator: &'static str },
    #[error("arc move needs a different end point")]
    DegenerateMove,
    #[error("radius can not be smaller than {min_radius:.4}")]
    RadiusTooSmall { min_radius: f64 },
    #[error("a feed rate must be entered for a {gcode} move")]
    MissingFeedRate { gcode: &'static str },
    #[error("{gcode} moves require an arc radius")]
    MissingArcRadius { gcode: &'static str },
    #[error("a G0 or G1 move must be done before an arc move")]
    NoPriorPosition,
    #[error("arc moves require the X and Y axes to be enabled")]
    PlanarAxesRequired,
    #[error("status source error: {0}")]
    Status(String),
    #[error("script store error: {0}")]
    Store(String),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
