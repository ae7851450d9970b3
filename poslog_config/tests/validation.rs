use poslog_config::load_toml;

#[test]
fn rejects_zero_poll_period() {
    let toml = r#"
[format]
axes = ["X", "Y"]
precision = 4

[poll]
period_ms = 0
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject period_ms=0");
    assert!(
        format!("{err}")
            .to_lowercase()
            .contains("poll.period_ms must be >= 1")
    );
}

#[test]
fn rejects_unknown_axis_letter() {
    let toml = r#"
[format]
axes = ["X", "Q"]
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject axis Q");
    assert!(format!("{err}").contains("unknown axis letter 'Q'"));
}

#[test]
fn rejects_arc_move_without_radius() {
    let toml = r#"
[move]
kind = "arc_cw"
feed_rate = 30.0
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject missing arc_radius");
    assert!(format!("{err}").contains("move.arc_radius must be > 0"));
}

#[test]
fn rejects_linear_move_without_feed() {
    let toml = r#"
[move]
kind = "linear"
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject missing feed_rate");
    assert!(format!("{err}").contains("move.feed_rate must be > 0"));
}

#[test]
fn rejects_autosave_without_path() {
    let toml = r#"
[script]
autosave = true
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject autosave w/o path");
    assert!(format!("{err}").contains("script.autosave requires script.path"));
}

#[test]
fn rejects_bad_script_extension() {
    let toml = r#"
[script]
path = "out.gcode"
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject extension");
    assert!(format!("{err}").contains(".ngc or .txt"));
}

#[test]
fn accepts_misordered_analog_thresholds_as_parseable() {
    // Misordered thresholds are a runtime channel error, not a hard
    // config rejection: the channel reports and never fires.
    let toml = r#"
[triggers.analog_in]
index = 0
enabled = true
on_threshold = 2.0
off_threshold = 5.0
on_comparator = "greater_than"
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("misordered thresholds still validate");
    assert!(!cfg.triggers.analog_in.thresholds_consistent());
}

#[test]
fn defaults_cover_empty_config() {
    let cfg = load_toml("").expect("parse empty TOML");
    cfg.validate().expect("defaults should validate");
    assert_eq!(cfg.poll.period_ms, 100);
    assert_eq!(cfg.format.precision, 4);
    assert!(cfg.move_type.is_none());
    assert!(!cfg.triggers.digital_in.enabled);
}
