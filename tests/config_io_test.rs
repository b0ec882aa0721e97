use hestia::config::Config;
use tempfile::tempdir;

#[test]
fn yaml_round_trip_via_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hestia_config.yaml");

    let mut config = Config::default();
    config.setpoints.heat_f = 68;
    config.timing.valve_settle_ms = 30_000;
    config.hardware.comp1_pin = 17;
    config.save_to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.setpoints.heat_f, 68);
    assert_eq!(loaded.timing.valve_settle_ms, 30_000);
    assert_eq!(loaded.hardware.comp1_pin, 17);
    assert!(loaded.validate().is_ok());
}

#[test]
fn override_path_must_exist() {
    let missing = std::path::Path::new("/nonexistent/hestia/config.yaml");
    assert!(Config::load_with_override(Some(missing)).is_err());
}

#[test]
fn invalid_yaml_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "timing: [not, a, map]").unwrap();
    assert!(Config::from_file(&path).is_err());
}

#[test]
fn loaded_config_with_collapsed_deadband_fails_validation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("deadband.yaml");
    std::fs::write(&path, "setpoints:\n  heat_f: 72\n  cool_f: 73\n").unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert!(loaded.validate().is_err());
}
