//! `From` implementations bridging `poslog_config` types to core types.

use std::path::PathBuf;

use crate::controller::ControllerCfg;
use crate::edge::{AnalogChannelCfg, Comparator, DigitalChannelCfg, TriggerLogic};
use crate::{Axis, MoveKind, MoveSpec, PositionMode};

impl From<poslog_config::TriggerLogicCfg> for TriggerLogic {
    fn from(c: poslog_config::TriggerLogicCfg) -> Self {
        match c {
            poslog_config::TriggerLogicCfg::ActiveHigh => TriggerLogic::ActiveHigh,
            poslog_config::TriggerLogicCfg::ActiveLow => TriggerLogic::ActiveLow,
        }
    }
}

impl From<poslog_config::ComparatorCfg> for Comparator {
    fn from(c: poslog_config::ComparatorCfg) -> Self {
        match c {
            poslog_config::ComparatorCfg::GreaterThan => Comparator::GreaterThan,
            poslog_config::ComparatorCfg::LessThan => Comparator::LessThan,
        }
    }
}

impl From<&poslog_config::DigitalChannelCfg> for DigitalChannelCfg {
    fn from(c: &poslog_config::DigitalChannelCfg) -> Self {
        Self {
            index: c.index,
            enabled: c.enabled,
            logic: c.logic.into(),
        }
    }
}

impl From<&poslog_config::AnalogChannelCfg> for AnalogChannelCfg {
    fn from(c: &poslog_config::AnalogChannelCfg) -> Self {
        Self {
            index: c.index,
            enabled: c.enabled,
            on_threshold: c.on_threshold,
            off_threshold: c.off_threshold,
            on_comparator: c.on_comparator.into(),
        }
    }
}

impl From<poslog_config::PositionModeCfg> for PositionMode {
    fn from(c: poslog_config::PositionModeCfg) -> Self {
        match c {
            poslog_config::PositionModeCfg::Relative => PositionMode::Relative,
            poslog_config::PositionModeCfg::Absolute => PositionMode::Absolute,
        }
    }
}

impl From<poslog_config::MoveKindCfg> for MoveKind {
    fn from(c: poslog_config::MoveKindCfg) -> Self {
        match c {
            poslog_config::MoveKindCfg::Rapid => MoveKind::Rapid,
            poslog_config::MoveKindCfg::Linear => MoveKind::Linear,
            poslog_config::MoveKindCfg::ArcCw => MoveKind::ArcCw,
            poslog_config::MoveKindCfg::ArcCcw => MoveKind::ArcCcw,
        }
    }
}

impl From<&poslog_config::MoveCfg> for MoveSpec {
    fn from(c: &poslog_config::MoveCfg) -> Self {
        Self {
            kind: c.kind.into(),
            feed_rate: c.feed_rate,
            arc_radius: c.arc_radius,
        }
    }
}

impl From<&poslog_config::Config> for ControllerCfg {
    fn from(cfg: &poslog_config::Config) -> Self {
        // Unknown letters were rejected by Config::validate.
        let axes: Vec<Axis> = cfg
            .format
            .axes
            .iter()
            .filter_map(|s| Axis::from_letter(s))
            .collect();
        Self {
            axes,
            mode: cfg.format.position_mode.into(),
            precision: cfg.format.precision,
            comment: cfg.format.comment.clone(),
            move_spec: cfg.move_type.as_ref().map(MoveSpec::from),
            digital_in: (&cfg.triggers.digital_in).into(),
            digital_out: (&cfg.triggers.digital_out).into(),
            analog_in: (&cfg.triggers.analog_in).into(),
            analog_out: (&cfg.triggers.analog_out).into(),
            interval_ms: cfg.record.interval_s.saturating_mul(1000),
            autosave: cfg.script.autosave,
            script_path: cfg.script.path.as_ref().map(PathBuf::from),
        }
    }
}
