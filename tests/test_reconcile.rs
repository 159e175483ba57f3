mod common;
use common::{session_log, session_triggers, N_EVENTS, N_SKIPPED};
use mous::{reconcile, EventType, LogRow, MismatchRecord, RawEvent, ReconcileError};

fn single(code: i64, kind: &str, payload: &str) -> Result<mous::Reconciliation, ReconcileError> {
    let raw = [RawEvent::new(5000, code)];
    let log = [LogRow::new(0, 5000, 4.1667, 0.25, kind, Some(payload))];
    reconcile(&raw, &log, 2)
}

// ── Scenarios ─────────────────────────────────────────────────────────────

#[test]
fn block_scenario() {
    let out = single(10, "Picture", "ZINNEN").unwrap();
    let ev = &out.events[0];
    assert_eq!(ev.kind, EventType::Block);
    assert_eq!(ev.value, "ZINNEN");
    assert_eq!((ev.sentence, ev.relative_clause, ev.target), (false, false, false));
}

#[test]
fn fixation_scenario() {
    let out = single(20, "Picture", "FIX 3948").unwrap();
    let ev = &out.events[0];
    assert_eq!(ev.kind, EventType::Fixation);
    assert_eq!(ev.value, "NA");
    approx::assert_abs_diff_eq!(ev.duration, 3948.0);
}

#[test]
fn word_scenario() {
    let out = single(5, "Picture", "5 gemene 300").unwrap();
    let ev = &out.events[0];
    assert_eq!(ev.kind, EventType::Word);
    assert_eq!(ev.value, "gemene");
    approx::assert_abs_diff_eq!(ev.duration, 300.0);
    assert_eq!((ev.sentence, ev.relative_clause, ev.target), (true, false, false));
}

#[test]
fn sentence_final_scenario() {
    let out = single(5, "Picture", "5 300").unwrap();
    assert_eq!(out.events[0].value, "<END>");
    approx::assert_abs_diff_eq!(out.events[0].duration, 300.0);
}

#[test]
fn digital_input_scenario() {
    let out = single(128, "UDIO001", "128").unwrap();
    assert!(out.events.is_empty());
    assert!(out.errors.is_empty());
}

#[test]
fn unknown_code_scenario() {
    let err = single(999, "Picture", "ISI").unwrap_err();
    assert_eq!(err, ReconcileError::UnknownTriggerCode { index: 0, code: 999 });
}

#[test]
fn malformed_word_aborts_whole_pass() {
    let raw = [RawEvent::new(100, 15), RawEvent::new(200, 6)];
    let log = [
        LogRow::new(0, 100, 0.1, 0.0, "Picture", Some("ISI")),
        LogRow::new(1, 200, 0.2, 0.0, "Picture", Some("6 onvolledig")),
    ];
    let err = reconcile(&raw, &log, 2).unwrap_err();
    assert!(matches!(err, ReconcileError::MalformedPayload { index: 1, .. }), "{err}");
}

// ── Full session ──────────────────────────────────────────────────────────

#[test]
fn session_tables() {
    let out = reconcile(&session_triggers(), &session_log(), 2).unwrap();

    assert_eq!(out.events.len(), N_EVENTS);
    let values: Vec<&str> = out.events.iter().map(|e| e.value.as_str()).collect();
    assert_eq!(
        values,
        ["ZINNEN", "NA", "Het", "gemene", "kind", "<END>", "NA", "341", "1", "WOORDEN", "3", "NA", "2"]
    );

    assert_eq!(out.errors.len(), 3);
    assert_eq!(
        out.errors[0],
        MismatchRecord::SampleDrift { index: 13, sample: 10200, onset: 10200.0 / 1200.0, diff: 10 }
    );
    assert!(matches!(&out.errors[1], MismatchRecord::Unclassified { index: 14, code: 8, payload, .. } if payload == "7 boom 300"));
    assert!(matches!(&out.errors[2], MismatchRecord::Unclassified { index: 18, code: 30, .. }));
}

#[test]
fn session_summary() {
    let out = reconcile(&session_triggers(), &session_log(), 2).unwrap();
    let s = &out.summary;
    assert_eq!(s.rows, 20);
    assert_eq!(s.skipped, N_SKIPPED);
    assert_eq!(s.dropped, 1);
    assert_eq!(s.unclassified, 2);
    assert_eq!(s.drift, 1);
    assert_eq!(s.drift_superseded, 1);
    assert_eq!(s.events[&EventType::Word], 4);
    assert_eq!(s.events[&EventType::Response], 3);
    assert_eq!(s.events[&EventType::Block], 2);
    assert_eq!(s.rows, s.skipped + s.n_classified());
}

#[test]
fn session_word_conditions() {
    let out = reconcile(&session_triggers(), &session_log(), 2).unwrap();
    let words: Vec<_> = out.events.iter().filter(|e| e.kind == EventType::Word).collect();
    // Codes 1, 1, 2, 1.
    assert!(words.iter().all(|w| w.sentence && w.relative_clause));
    let targets: Vec<bool> = words.iter().map(|w| w.target).collect();
    assert_eq!(targets, [false, false, true, false]);
}

#[test]
fn response_keeps_log_duration() {
    let out = reconcile(&session_triggers(), &session_log(), 2).unwrap();
    for ev in out.events.iter().filter(|e| e.kind == EventType::Response) {
        approx::assert_abs_diff_eq!(ev.duration, 0.05);
    }
}

#[test]
fn zero_tolerance_reports_every_offset() {
    let out = reconcile(&session_triggers(), &session_log(), 0).unwrap();
    let drift: Vec<usize> = out.drift_records().map(|r| r.index()).collect();
    assert_eq!(drift, [3, 8, 11, 13]);
    // The drifting unclassified row still gets a single record.
    assert_eq!(out.errors.iter().filter(|r| r.index() == 18).count(), 1);
}

#[test]
fn events_keep_log_timing() {
    let log = session_log();
    let out = reconcile(&session_triggers(), &log, 2).unwrap();
    for ev in &out.events {
        let row = log.iter().find(|r| r.sample == ev.sample).unwrap();
        assert_eq!(ev.onset, row.onset);
        assert!(ev.sample > 0);
        assert!(ev.onset > 0.0);
    }
}

#[test]
fn value_domains_hold() {
    let out = reconcile(&session_triggers(), &session_log(), 2).unwrap();
    for ev in &out.events {
        assert!(ev.kind.accepts(&ev.value), "{} does not accept '{}'", ev.kind, ev.value);
    }
}

#[test]
fn error_rows_share_one_schema() {
    let out = reconcile(&session_triggers(), &session_log(), 2).unwrap();
    let rows = out.error_rows();
    assert_eq!(rows[0].kind, "sample_diff");
    assert_eq!(rows[0].value, "10");
    assert_eq!(rows[0].trigger_value, None);
    assert_eq!(rows[1].kind, "Picture");
    assert_eq!(rows[1].value, "7 boom 300");
    assert_eq!(rows[1].trigger_value, Some(8));
    approx::assert_abs_diff_eq!(rows[2].onset, 11.0);
}
