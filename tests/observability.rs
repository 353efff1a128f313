use std::sync::{Arc, Mutex};

use line_record_parser::pipeline::{ParseContext, ParseObserver, ParseSeverity, ParseStats};
use line_record_parser::{ParseError, Pipeline};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<ParseStats>>,
    failures: Mutex<Vec<ParseSeverity>>,
    alerts: Mutex<Vec<ParseSeverity>>,
}

impl ParseObserver for RecordingObserver {
    fn on_success(&self, _ctx: &ParseContext, stats: ParseStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(&self, _ctx: &ParseContext, severity: ParseSeverity, _error: &ParseError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &ParseContext, severity: ParseSeverity, _error: &ParseError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn observer_receives_success_stats() {
    let obs = Arc::new(RecordingObserver::default());

    let result = Pipeline::from_text("a\nb\nc\n")
        .filter(|rec, _| Ok(rec.field(&0.into()).and_then(|v| v.as_str()) != Some("b")))
        .observer(obs.clone())
        .parse()
        .unwrap();

    assert_eq!(result.record_count(), 2);
    let successes = obs.successes.lock().unwrap().clone();
    // Three lines read, two records survived the filter.
    assert_eq!(successes, vec![ParseStats { lines: 3, records: 2 }]);
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());

    // Missing file -> Io error -> Critical
    let _ = Pipeline::from_path("tests/fixtures/does_not_exist.csv")
        .observer(obs.clone())
        .alert_at_or_above(ParseSeverity::Critical)
        .parse()
        .unwrap_err();

    let failures = obs.failures.lock().unwrap().clone();
    let alerts = obs.alerts.lock().unwrap().clone();
    assert_eq!(failures, vec![ParseSeverity::Critical]);
    assert_eq!(alerts, vec![ParseSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_non_critical_error() {
    let obs = Arc::new(RecordingObserver::default());

    // Transform failure -> Error severity (not Critical) -> should not alert
    let _ = Pipeline::from_text("a\n")
        .each(|_, _| Err("boom".into()))
        .observer(obs.clone())
        .alert_at_or_above(ParseSeverity::Critical)
        .parse()
        .unwrap_err();

    let failures = obs.failures.lock().unwrap().clone();
    assert_eq!(failures, vec![ParseSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn lowered_threshold_alerts_on_transform_failures() {
    let obs = Arc::new(RecordingObserver::default());

    let _ = Pipeline::from_text("a\n")
        .each(|_, _| Err("boom".into()))
        .observer(obs.clone())
        .alert_at_or_above(ParseSeverity::Error)
        .parse()
        .unwrap_err();

    assert_eq!(*obs.alerts.lock().unwrap(), vec![ParseSeverity::Error]);
}
