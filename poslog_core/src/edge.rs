//! Latched edge detection for the four watched channels.
//!
//! Each channel kind (digital-in, digital-out, analog-in, analog-out)
//! carries one `EdgeState` for the whole session. The evaluation
//! functions are pure: they take the state by value and return the next
//! one, so a caller can decline to commit it when the triggered log
//! attempt fails.

use crate::error::LogError;

/// Which digital level counts as "log now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerLogic {
    #[default]
    ActiveHigh,
    ActiveLow,
}

/// Direction of the analog on-comparison. The off-comparison is always
/// the complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparator {
    #[default]
    GreaterThan,
    LessThan,
}

impl Comparator {
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::GreaterThan => ">",
            Comparator::LessThan => "<",
        }
    }
}

/// One watched boolean line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitalChannelCfg {
    pub index: usize,
    pub enabled: bool,
    pub logic: TriggerLogic,
}

/// One watched analog line with on/off thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogChannelCfg {
    pub index: usize,
    pub enabled: bool,
    pub on_threshold: f64,
    pub off_threshold: f64,
    pub on_comparator: Comparator,
}

impl AnalogChannelCfg {
    /// Thresholds must be ordered with the comparator direction, or the
    /// latch could never clear once set.
    pub fn thresholds_consistent(&self) -> bool {
        match self.on_comparator {
            Comparator::GreaterThan => self.on_threshold > self.off_threshold,
            Comparator::LessThan => self.on_threshold < self.off_threshold,
        }
    }
}

/// Per-channel memory of whether the channel is currently in the logged
/// state. Prevents re-firing until the value returns to the opposite
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeState {
    pub latched: bool,
}

impl EdgeState {
    const CLEAR: EdgeState = EdgeState { latched: false };
    const LATCHED: EdgeState = EdgeState { latched: true };
}

/// Evaluate one digital sample.
///
/// Fires exactly on the transition into the logged state while the
/// channel is enabled. Returning to the opposite state only clears the
/// latch; a disabled channel never latches, so enabling it while the
/// condition already holds fires on the next sample.
pub fn evaluate_digital(
    value: bool,
    cfg: &DigitalChannelCfg,
    state: EdgeState,
) -> (bool, EdgeState) {
    let in_logged_state = value == (cfg.logic == TriggerLogic::ActiveHigh);
    if in_logged_state {
        if cfg.enabled && !state.latched {
            (true, EdgeState::LATCHED)
        } else {
            (false, state)
        }
    } else {
        (false, EdgeState::CLEAR)
    }
}

/// Evaluate one analog sample against the on/off thresholds.
///
/// A misordered threshold pair is a configuration error on every sample
/// and never fires, enabled or not. Otherwise the channel latches (and
/// fires, when enabled) once the value strictly satisfies the
/// on-comparator, and clears once it strictly satisfies the complement
/// against the off threshold.
pub fn evaluate_analog(
    value: f64,
    cfg: &AnalogChannelCfg,
    state: EdgeState,
) -> Result<(bool, EdgeState), LogError> {
    if !cfg.thresholds_consistent() {
        return Err(LogError::ChannelMisconfigured {
            comparator: cfg.on_comparator.symbol(),
        });
    }
    let on = match cfg.on_comparator {
        Comparator::GreaterThan => value > cfg.on_threshold,
        Comparator::LessThan => value < cfg.on_threshold,
    };
    let off = match cfg.on_comparator {
        Comparator::GreaterThan => value < cfg.off_threshold,
        Comparator::LessThan => value > cfg.off_threshold,
    };
    if !state.latched && on {
        if cfg.enabled {
            Ok((true, EdgeState::LATCHED))
        } else {
            Ok((false, state))
        }
    } else if state.latched && off {
        Ok((false, EdgeState::CLEAR))
    } else {
        Ok((false, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digital_cfg(logic: TriggerLogic) -> DigitalChannelCfg {
        DigitalChannelCfg {
            index: 0,
            enabled: true,
            logic,
        }
    }

    #[test]
    fn digital_fires_once_per_rising_edge() {
        let cfg = digital_cfg(TriggerLogic::ActiveHigh);
        let mut state = EdgeState::default();
        let mut fires = 0;
        for v in [false, true, true, true, false, true] {
            let (fire, next) = evaluate_digital(v, &cfg, state);
            state = next;
            fires += u32::from(fire);
        }
        assert_eq!(fires, 2);
    }

    #[test]
    fn digital_active_low_inverts_sense() {
        let cfg = digital_cfg(TriggerLogic::ActiveLow);
        let mut state = EdgeState::default();
        let (fire, next) = evaluate_digital(false, &cfg, state);
        assert!(fire);
        state = next;
        let (fire, _) = evaluate_digital(false, &cfg, state);
        assert!(!fire, "held value must not re-fire");
    }

    #[test]
    fn disabled_digital_never_latches() {
        let mut cfg = digital_cfg(TriggerLogic::ActiveHigh);
        cfg.enabled = false;
        let (fire, state) = evaluate_digital(true, &cfg, EdgeState::default());
        assert!(!fire);
        assert!(!state.latched);
        // Enabling while the condition still holds fires immediately.
        cfg.enabled = true;
        let (fire, _) = evaluate_digital(true, &cfg, state);
        assert!(fire);
    }

    #[test]
    fn analog_band_requires_off_crossing_to_rearm() {
        let cfg = AnalogChannelCfg {
            index: 0,
            enabled: true,
            on_threshold: 5.0,
            off_threshold: 2.0,
            on_comparator: Comparator::GreaterThan,
        };
        let mut state = EdgeState::default();
        let mut fires = 0;
        // Drops to 3.0 (between thresholds) must not re-arm.
        for v in [1.0, 6.0, 3.0, 6.0, 1.0, 7.0] {
            let (fire, next) = evaluate_analog(v, &cfg, state).unwrap();
            state = next;
            fires += u32::from(fire);
        }
        assert_eq!(fires, 2);
    }

    #[test]
    fn analog_less_than_mirrors_greater_than() {
        let cfg = AnalogChannelCfg {
            index: 0,
            enabled: true,
            on_threshold: 2.0,
            off_threshold: 5.0,
            on_comparator: Comparator::LessThan,
        };
        let mut state = EdgeState::default();
        let mut fires = 0;
        for v in [9.0, 1.0, 1.0, 9.0, 1.0] {
            let (fire, next) = evaluate_analog(v, &cfg, state).unwrap();
            state = next;
            fires += u32::from(fire);
        }
        assert_eq!(fires, 2);
    }

    #[test]
    fn misconfigured_analog_reports_and_never_fires() {
        let cfg = AnalogChannelCfg {
            index: 0,
            enabled: true,
            on_threshold: 2.0,
            off_threshold: 5.0,
            on_comparator: Comparator::GreaterThan,
        };
        for v in [0.0, 3.0, 10.0] {
            let err = evaluate_analog(v, &cfg, EdgeState::default()).unwrap_err();
            assert!(matches!(err, LogError::ChannelMisconfigured { .. }));
        }
    }
}
