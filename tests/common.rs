/// Shared fixtures: a short synthetic MOUS visual session.
///
/// Sampling rate 1200 Hz. The session contains one of everything the
/// reconciler has to deal with:
///
/// | row | sample | kind               | value          | trigger       | outcome                |
/// |-----|--------|--------------------|----------------|---------------|------------------------|
/// | 0   | 1000   | trial              | n/a            |               | skipped (no value)     |
/// | 1   | 1200   | Picture            | ZINNEN         | 1200 / 10     | block                  |
/// | 2   | 1200   | UPPT001            | 10             |               | skipped (kind)         |
/// | 3   | 1800   | Picture            | FIX 3948       | 1801 / 20     | fixation               |
/// | 4   | 6540   | Picture            | 1 Het 300      | 6540 / 1      | word                   |
/// | 5   | 6900   | Picture            | blank          |               | skipped (blank)        |
/// | 6   | 7020   | Picture            | 1 gemene 300   | 7020 / 1      | word                   |
/// | 7   | 7500   | Picture            | 2 kind 300     | 7500 / 2      | word (target)          |
/// | 8   | 7980   | Picture            | 1 300          | 7981 / 1      | word <END>             |
/// | 9   | 8400   | Picture            | ISI            | 8400 / 15     | ISI                    |
/// | 10  | 9000   | Picture            | QUESTION 341   | 9000 / 40     | question               |
/// | 11  | 9600   | Response           | 1              | 9602 / 16     | response               |
/// | 12  | 9650   | UDIO001            | 128            | 9650 / 128    | dropped                |
/// | 13  | 10200  | Picture            | WOORDEN        | 10210 / 10    | block + sample_diff 10 |
/// | 14  | 10800  | Picture            | 7 boom 300     | 10800 / 8     | unclassified           |
/// | 15  | 11400  | Response           | 3              | 11400 / 3     | response               |
/// | 16  | 12000  | Picture            | pause          | 12000 / 30    | pause                  |
/// | 17  | 12600  | frontpanel trigger | 1              |               | skipped (kind)         |
/// | 18  | 13200  | Picture            | ISI            | 13230 / 30    | unclassified (drifts)  |
/// | 19  | 13800  | Response           | 2              | 13800 / 32    | response               |
use mous::{LogRow, RawEvent};
use std::path::{Path, PathBuf};

pub const SFREQ: f64 = 1200.0;

#[allow(unused)]
pub const N_EVENTS: usize = 13;
#[allow(unused)]
pub const N_SKIPPED: usize = 4;

const ROWS: &[(i64, &str, Option<&str>)] = &[
    (1000, "trial", None),
    (1200, "Picture", Some("ZINNEN")),
    (1200, "UPPT001", Some("10")),
    (1800, "Picture", Some("FIX 3948")),
    (6540, "Picture", Some("1 Het 300")),
    (6900, "Picture", Some("blank")),
    (7020, "Picture", Some("1 gemene 300")),
    (7500, "Picture", Some("2 kind 300")),
    (7980, "Picture", Some("1 300")),
    (8400, "Picture", Some("ISI")),
    (9000, "Picture", Some("QUESTION 341")),
    (9600, "Response", Some("1")),
    (9650, "UDIO001", Some("128")),
    (10200, "Picture", Some("WOORDEN")),
    (10800, "Picture", Some("7 boom 300")),
    (11400, "Response", Some("3")),
    (12000, "Picture", Some("pause")),
    (12600, "frontpanel trigger", Some("1")),
    (13200, "Picture", Some("ISI")),
    (13800, "Response", Some("2")),
];

const TRIGGERS: &[(i64, i64)] = &[
    (1200, 10),
    (1801, 20),
    (6540, 1),
    (7020, 1),
    (7500, 2),
    (7981, 1),
    (8400, 15),
    (9000, 40),
    (9602, 16),
    (9650, 128),
    (10210, 10),
    (10800, 8),
    (11400, 3),
    (12000, 30),
    (13230, 30),
    (13800, 32),
];

/// Duration the log gives a row: Response rows carry a reaction window,
/// everything else is left empty.
fn log_duration(kind: &str) -> f64 {
    if kind == "Response" { 0.05 } else { f64::NAN }
}

pub fn session_triggers() -> Vec<RawEvent> {
    TRIGGERS.iter().map(|&(s, c)| RawEvent::new(s, c)).collect()
}

pub fn session_log() -> Vec<LogRow> {
    ROWS.iter()
        .enumerate()
        .map(|(i, &(sample, kind, value))| {
            LogRow::new(i, sample, sample as f64 / SFREQ, log_duration(kind), kind, value)
        })
        .collect()
}

/// The session log as the stimulus software writes it.
#[allow(unused)]
pub fn session_log_tsv() -> String {
    let mut out = String::from("onset\tduration\tsample\ttype\tvalue\n");
    for &(sample, kind, value) in ROWS {
        let dur = log_duration(kind);
        let dur = if dur.is_nan() { "n/a".to_string() } else { dur.to_string() };
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            sample as f64 / SFREQ,
            dur,
            sample,
            kind,
            value.unwrap_or("n/a"),
        ));
    }
    out
}

/// The trigger stream as an MNE text event file.
#[allow(unused)]
pub fn session_eve() -> String {
    TRIGGERS.iter().map(|(s, c)| format!("{s} 0 {c}\n")).collect()
}

/// Write the session inputs into `dir`, returning `(eve_path, tsv_path)`.
#[allow(unused)]
pub fn write_session(dir: &Path) -> (PathBuf, PathBuf) {
    let eve = dir.join("visual_events.eve");
    let tsv = dir.join("sub-V1001_task-visual_events.tsv");
    std::fs::write(&eve, session_eve()).unwrap();
    std::fs::write(&tsv, session_log_tsv()).unwrap();
    (eve, tsv)
}

/// A stim channel that decodes to the session triggers.
#[allow(unused)]
pub fn session_stim() -> Vec<f64> {
    let last = TRIGGERS.last().unwrap().0 as usize;
    let mut stim = vec![0.0; last + 10];
    for &(s, c) in TRIGGERS {
        for t in s as usize..(s as usize + 5).min(stim.len()) {
            stim[t] = c as f64;
        }
    }
    stim
}
