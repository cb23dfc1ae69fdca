//! Tests for scenario loading and replay.

use par_mux::scenario::{self, Scenario, ScenarioError};
use par_mux::{AlertKind, Config, LogSink, RecordingSink, Server, SinkEvent};
use std::time::Duration;

const WORK: &str = r#"
sessions:
  - name: work
    windows: [editor, build]
windows:
  build:
    monitor_activity: true
    monitor_silence: 5
clients:
  - name: alice
    session: work
steps:
  - at: 1
    signal: { window: build, kind: activity }
  - at: 2
    signal: { window: build, kind: activity }
run_until: 10
"#;

fn lines(events: &[scenario::TimedEvent]) -> Vec<String> {
    events.iter().map(ToString::to_string).collect()
}

/// Test that a replay reports activity once and silence after the quiet interval.
#[test]
fn test_replay_activity_then_silence() {
    let scenario = Scenario::from_yaml(WORK).unwrap();
    let events = scenario::replay(&scenario, Config::default()).unwrap();

    assert_eq!(
        lines(&events),
        vec![
            "[   1.000s] status-refresh work",
            "[   1.000s] hook alert-activity work:build",
            "[   1.000s] bell alice",
            "[   7.000s] status-refresh work",
            "[   7.000s] hook alert-silence work:build",
            "[   7.000s] bell alice",
        ]
    );
}

/// Test the JSON form of a replayed event.
#[test]
fn test_timed_event_json() {
    let scenario = Scenario::from_yaml(WORK).unwrap();
    let events = scenario::replay(&scenario, Config::default()).unwrap();

    let json = serde_json::to_value(&events[2]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "at": 1.0, "event": "bell", "client": "alice" })
    );
}

/// Test that a window name listed in two sessions is one shared window.
#[test]
fn test_shared_window_names() {
    let yaml = r#"
sessions:
  - name: a
    windows: [shared]
  - name: b
    windows: [home, shared]
    current: shared
"#;
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let mut server = Server::new(Config::default(), RecordingSink::new());
    scenario.build(&mut server).unwrap();

    assert_eq!(server.mux().windows().count(), 2);
    let shared = server.mux().find_window("shared").unwrap();
    assert_eq!(shared.links().len(), 2);

    let b = server.mux().find_session("b").unwrap();
    let current = b.current_link().unwrap();
    assert_eq!(current.window(), shared.id());
}

/// Test that a scenario drives a server whose sink only logs.
#[test]
fn test_build_with_log_sink() {
    let scenario = Scenario::from_yaml(WORK).unwrap();
    let mut server = Server::new(Config::default(), LogSink);
    scenario.build(&mut server).unwrap();

    let build = server.mux().find_window("build").unwrap().id();
    server.signal(build, AlertKind::Activity).unwrap();
    server.signal(build, AlertKind::Bell).unwrap();
    server.run_pending();

    assert_eq!(server.scheduler().flushes(), 1);
    assert_eq!(server.scheduler().evaluated(), 1);
    assert!(server.mux().find_window("build").unwrap().alerts().is_empty());
}

/// Test that per-session options in the scenario override the config.
#[test]
fn test_session_options_override() {
    let yaml = r#"
sessions:
  - name: work
    windows: [editor, build]
    options:
      bell_action: none
clients:
  - name: alice
    session: work
steps:
  - at: 0
    signal: { window: build, kind: bell }
"#;
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let events = scenario::replay(&scenario, Config::default()).unwrap();

    let kinds: Vec<&SinkEvent> = events.iter().map(|e| &e.event).collect();
    assert!(kinds.iter().all(|e| !matches!(e, SinkEvent::Bell { .. })));
    assert!(
        kinds
            .iter()
            .any(|e| matches!(e, SinkEvent::Hook { hook, .. } if hook == "alert-bell"))
    );
}

/// Test that steps are run in time order and can switch windows.
#[test]
fn test_steps_sorted_and_select() {
    let yaml = r#"
sessions:
  - name: work
    windows: [editor, build]
clients:
  - name: alice
    session: work
steps:
  - at: 3
    signal: { window: build, kind: bell }
  - at: 2
    select: { session: work, window: build }
"#;
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let events = scenario::replay(&scenario, Config::default()).unwrap();

    // The bell lands on the window being watched: no status refresh
    assert_eq!(
        lines(&events),
        vec![
            "[   3.000s] hook alert-bell work:build",
            "[   3.000s] bell alice",
        ]
    );
}

/// Test that attach and detach steps change who receives alerts.
#[test]
fn test_attach_and_detach_steps() {
    let yaml = r#"
sessions:
  - name: work
    windows: [editor, build]
steps:
  - at: 1
    attach: { client: bob, session: work }
  - at: 2
    signal: { window: build, kind: bell }
  - at: 3
    detach: { client: bob }
  - at: 4
    signal: { window: build, kind: bell }
"#;
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let events = scenario::replay(&scenario, Config::default()).unwrap();

    let bells: Vec<Duration> = events
        .iter()
        .filter(|e| matches!(&e.event, SinkEvent::Bell { client } if client == "bob"))
        .map(|e| e.at)
        .collect();
    assert_eq!(bells, vec![Duration::from_secs(2)]);
}

/// Test that signalling a destroyed window fails the replay.
#[test]
fn test_signal_after_destroy_fails() {
    let yaml = r#"
sessions:
  - name: work
    windows: [editor, build]
steps:
  - at: 1
    destroy: { window: build }
  - at: 2
    signal: { window: build, kind: activity }
"#;
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let err = scenario::replay(&scenario, Config::default()).unwrap_err();
    assert!(matches!(err, ScenarioError::UnknownWindow(name) if name == "build"));
}

/// Test the errors reported for malformed scenarios.
#[test]
fn test_scenario_errors() {
    let duplicate = Scenario::from_yaml("sessions:\n  - name: a\n  - name: a\n").unwrap();
    let err = scenario::replay(&duplicate, Config::default()).unwrap_err();
    assert!(matches!(err, ScenarioError::Duplicate { kind: "session", .. }));

    let negative = Scenario::from_yaml(
        r#"
sessions:
  - name: a
    windows: [w]
steps:
  - at: -1
    destroy: { window: w }
"#,
    )
    .unwrap();
    let err = scenario::replay(&negative, Config::default()).unwrap_err();
    assert!(matches!(err, ScenarioError::InvalidTime(_)));

    let not_linked = Scenario::from_yaml(
        r#"
sessions:
  - name: a
    windows: [w]
  - name: b
    windows: [x]
steps:
  - at: 0
    select: { session: a, window: x }
"#,
    )
    .unwrap();
    let err = scenario::replay(&not_linked, Config::default()).unwrap_err();
    assert!(matches!(err, ScenarioError::NotLinked { .. }));

    let unknown_client =
        Scenario::from_yaml("sessions:\n  - name: a\nclients:\n  - name: c\n    session: nope\n")
            .unwrap();
    let err = scenario::replay(&unknown_client, Config::default()).unwrap_err();
    assert!(matches!(err, ScenarioError::UnknownSession(name) if name == "nope"));

    assert!(matches!(
        Scenario::from_yaml("steps:\n  - at: 1\n    explode: {}\n"),
        Err(ScenarioError::Parse(_))
    ));
}

/// Test that times too large for the clock are rejected instead of panicking.
#[test]
fn test_out_of_range_times_are_errors() {
    let far_end = Scenario::from_yaml("run_until: 1.0e30\n").unwrap();
    let err = scenario::replay(&far_end, Config::default()).unwrap_err();
    assert!(matches!(err, ScenarioError::InvalidTime(t) if t == 1.0e30));

    let far_step = Scenario::from_yaml(
        r#"
sessions:
  - name: a
    windows: [w]
steps:
  - at: 1.0e20
    signal: { window: w, kind: bell }
"#,
    )
    .unwrap();
    let err = scenario::replay(&far_step, Config::default()).unwrap_err();
    assert!(matches!(err, ScenarioError::InvalidTime(t) if t == 1.0e20));

    // Representable as a duration but past the end of the clock
    let past_clock = Scenario::from_yaml("run_until: 1.0e19\n").unwrap();
    let err = scenario::replay(&past_clock, Config::default()).unwrap_err();
    assert!(matches!(err, ScenarioError::InvalidTime(_)));
}

/// Test that a scenario file is read from disk.
#[test]
fn test_load_scenario_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("work.yaml");
    std::fs::write(&path, WORK).unwrap();

    let scenario = Scenario::load(&path).unwrap();
    assert_eq!(scenario.steps.len(), 2);
    assert_eq!(scenario.sessions[0].windows, vec!["editor", "build"]);

    let err = Scenario::load(&dir.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(err, ScenarioError::Io { .. }));
}

/// Test that silence is detected on the system clock.
#[tokio::test]
async fn test_realtime_silence() {
    let yaml = r#"
sessions:
  - name: quiet
    windows: [w]
windows:
  w:
    monitor_silence: 1
run_until: 1.5
"#;
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let events = scenario::replay_realtime(&scenario, Config::default())
        .await
        .unwrap();

    let silence_hook = AlertKind::Silence.hook_name();
    let silences: Vec<_> = events
        .iter()
        .filter(|e| matches!(&e.event, SinkEvent::Hook { hook, .. } if hook == silence_hook))
        .collect();
    assert_eq!(silences.len(), 1);
    assert!(silences[0].at >= Duration::from_millis(900));
}

/// Test that the bundled demo scenario replays cleanly.
#[test]
fn test_demo_scenario_replays() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/work.yaml");
    let scenario = Scenario::load(&path).unwrap();
    let events = scenario::replay(&scenario, Config::default()).unwrap();

    assert!(
        events
            .iter()
            .any(|e| e.event.to_string() == "message alice: Activity in work:build")
    );
    assert!(
        events
            .iter()
            .all(|e| !matches!(&e.event, SinkEvent::Bell { client } if client == "monitor"))
    );
}
