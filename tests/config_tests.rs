//! Tests for configuration defaults, YAML parsing and persistence.

use par_mux::{AlertAction, AlertKind, Config, MonitorOptions, SessionAlertOptions, VisualMode};
use par_mux_config::LogLevel;
use tempfile::TempDir;

/// Test that the defaults match the multiplexer's stock option values.
#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.log_level, LogLevel::Off);
    assert!(config.monitor.monitor_bell);
    assert!(!config.monitor.monitor_activity);
    assert_eq!(config.monitor.monitor_silence, 0);
    assert_eq!(config.monitor.silence_interval(), None);

    assert_eq!(config.alerts.bell_action, AlertAction::Any);
    assert_eq!(config.alerts.activity_action, AlertAction::Other);
    assert_eq!(config.alerts.silence_action, AlertAction::Other);
    for &kind in AlertKind::all() {
        assert_eq!(config.alerts.visual(kind), VisualMode::Off);
    }
}

/// Test that options are read from a flat YAML document.
#[test]
fn test_config_flat_yaml() {
    let yaml = r#"
log_level: debug
monitor_activity: true
monitor_silence: 30
bell_action: server-any
activity_action: current
visual_activity: both
"#;
    let config: Config = serde_yaml_ng::from_str(yaml).unwrap();
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.monitor.monitor_bell);
    assert!(config.monitor.monitor_activity);
    assert_eq!(
        config.monitor.silence_interval(),
        Some(std::time::Duration::from_secs(30))
    );
    assert_eq!(config.alerts.bell_action, AlertAction::ServerAny);
    assert_eq!(config.alerts.activity_action, AlertAction::Current);
    assert_eq!(config.alerts.silence_action, AlertAction::Other);
    assert_eq!(config.alerts.visual_activity, VisualMode::Both);
    assert_eq!(config.alerts.visual_bell, VisualMode::Off);
}

/// Test that the kebab-case option names are accepted.
#[test]
fn test_config_kebab_case_aliases() {
    let yaml = r#"
monitor-bell: false
monitor-silence: 10
silence-action: server-other
visual-silence: "on"
"#;
    let config: Config = serde_yaml_ng::from_str(yaml).unwrap();
    assert!(!config.monitor.monitor_bell);
    assert_eq!(config.monitor.monitor_silence, 10);
    assert_eq!(config.alerts.silence_action, AlertAction::ServerOther);
    assert_eq!(config.alerts.visual_silence, VisualMode::On);
}

/// Test that an unknown action name is rejected.
#[test]
fn test_config_rejects_unknown_action() {
    let result: Result<Config, _> = serde_yaml_ng::from_str("activity_action: sometimes\n");
    assert!(result.is_err());
}

/// Test that per-kind accessors line up with the fields.
#[test]
fn test_option_accessors_by_kind() {
    let monitor = MonitorOptions {
        monitor_bell: false,
        monitor_activity: true,
        monitor_silence: 5,
    };
    assert!(!monitor.enabled(AlertKind::Bell));
    assert!(monitor.enabled(AlertKind::Activity));
    assert!(monitor.enabled(AlertKind::Silence));

    let mut alerts = SessionAlertOptions::default();
    alerts.set_action(AlertKind::Silence, AlertAction::None);
    alerts.set_visual(AlertKind::Bell, VisualMode::Both);
    assert_eq!(alerts.silence_action, AlertAction::None);
    assert_eq!(alerts.action(AlertKind::Silence), AlertAction::None);
    assert_eq!(alerts.visual_bell, VisualMode::Both);
    assert_eq!(alerts.visual(AlertKind::Bell), VisualMode::Both);
}

/// Test that a saved config loads back unchanged.
#[test]
fn test_config_save_and_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.yaml");

    let mut config = Config::default();
    config.log_level = LogLevel::Info;
    config.monitor.monitor_activity = true;
    config.alerts.bell_action = AlertAction::None;
    config.save_to(&path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("monitor_activity: true"));
    assert!(contents.contains("bell_action: none"));

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

/// Test that the log level maps onto the log facade's filter.
#[test]
fn test_log_level_filter() {
    assert_eq!(LogLevel::Off.to_level_filter(), log::LevelFilter::Off);
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
