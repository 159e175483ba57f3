//! File I/O for the reconciliation pipeline.
//!
//! Readers:
//! * presentation log: `*_events.tsv` (tab-separated, header row)
//! * trigger stream:   MNE text event files (`.eve`, `.txt`) or
//!   `.safetensors` holding an `events` [N, 3] tensor or a raw `stim` channel
//!
//! Writers: the events table and the error table (TSV), and the decoded
//! trigger stream as safetensors.
use anyhow::{bail, Context, Result};
use ndarray::Array1;
use std::collections::HashMap;
use std::path::Path;

use crate::error::ReconcileError;
use crate::events::{CanonicalEvent, ErrorRow, LogRow, RawEvent};
use crate::stim::find_events;

/// Cell values the tabular reader treats as missing.
pub const NA_VALUES: [&str; 13] = [
    "", "n/a", "N/A", "NA", "na", "nan", "NaN", "-NaN", "null", "NULL", "None", "<NA>", "#N/A",
];

pub fn is_missing(cell: &str) -> bool {
    NA_VALUES.contains(&cell.trim())
}

/// Missing check for text cells: whitespace is kept as a value.
fn is_missing_text(cell: &str) -> bool {
    NA_VALUES.contains(&cell)
}

/// Integer cell; accepts integral floats such as `1.2e3` (numpy `savetxt`).
fn parse_int(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    if let Ok(v) = cell.parse::<i64>() {
        return Some(v);
    }
    let f = cell.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

// ── Presentation log ──────────────────────────────────────────────────────

/// Read the presentation log from a TSV file.
pub fn read_log_tsv(path: &Path) -> Result<Vec<LogRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening log {}", path.display()))?;
    read_log(file).with_context(|| format!("reading log {}", path.display()))
}

/// Read the presentation log from any tab-separated source.
///
/// Required columns: `sample`, `onset`, `duration`, `type`, `value`; extra
/// columns are ignored. Missing `onset`/`duration` cells become NaN,
/// missing `value` cells become `None` (a whitespace-only `value` is kept
/// as text and reaches the classifier). A non-numeric, non-missing cell in a
/// numeric column is an error.
pub fn read_log<R: std::io::Read>(source: R) -> Result<Vec<LogRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let idx = |name: &str| -> Result<usize> {
        match headers.iter().position(|h| h == name) {
            Some(i) => Ok(i),
            None => bail!("missing column '{name}'"),
        }
    };
    let sample_idx = idx("sample")?;
    let onset_idx = idx("onset")?;
    let duration_idx = idx("duration")?;
    let type_idx = idx("type")?;
    let value_idx = idx("value")?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("parsing log row {index}"))?;
        let cell = |i: usize| record.get(i).unwrap_or("");

        let sample = parse_int(cell(sample_idx)).ok_or_else(|| ReconcileError::InvalidNumber {
            index,
            column: "sample",
            value: cell(sample_idx).to_string(),
        })?;
        let onset = parse_float(cell(onset_idx), index, "onset")?;
        let duration = parse_float(cell(duration_idx), index, "duration")?;
        let kind = cell(type_idx);
        let value = cell(value_idx);

        rows.push(LogRow {
            index,
            sample,
            onset,
            duration,
            kind: if is_missing(kind) { String::new() } else { kind.to_string() },
            payload: (!is_missing_text(value)).then(|| value.to_string()),
        });
    }
    Ok(rows)
}

fn parse_float(cell: &str, index: usize, column: &'static str) -> Result<f64, ReconcileError> {
    if is_missing(cell) {
        return Ok(f64::NAN);
    }
    cell.trim().parse::<f64>().map_err(|_| ReconcileError::InvalidNumber {
        index,
        column,
        value: cell.to_string(),
    })
}

// ── Trigger stream ────────────────────────────────────────────────────────

/// Load a trigger stream, choosing the reader by file extension.
pub fn read_trigger_events(path: &Path) -> Result<Vec<RawEvent>> {
    let is_st = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("safetensors"));
    if is_st {
        read_trigger_safetensors(path)
    } else {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading trigger events {}", path.display()))?;
        parse_event_text(&text)
    }
}

/// Parse an MNE text event file.
///
/// Rows are whitespace-separated `sample prev code` or
/// `sample time prev code`; `#` starts a comment line.
pub fn parse_event_text(text: &str) -> Result<Vec<RawEvent>> {
    let mut out = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let cols: Vec<&str> = line.split_whitespace().collect();
        let (sample, code) = match cols.len() {
            3 => (cols[0], cols[2]),
            4 => (cols[0], cols[3]),
            n => bail!("line {}: expected 3 or 4 columns, found {n}", lineno + 1),
        };
        let sample = parse_int(sample)
            .with_context(|| format!("line {}: bad sample '{sample}'", lineno + 1))?;
        let code = parse_int(code)
            .with_context(|| format!("line {}: bad trigger value '{code}'", lineno + 1))?;
        out.push(RawEvent::new(sample, code));
    }
    Ok(out)
}

// ── Low-level safetensors parser (raw bytes → numbers, no tensor types) ──

type Header = HashMap<String, serde_json::Value>;

fn parse_header(bytes: &[u8]) -> Result<(Header, usize)> {
    if bytes.len() < 8 {
        bail!("safetensors file too small");
    }
    let n = usize::try_from(u64::from_le_bytes(bytes[..8].try_into()?))
        .context("safetensors header length overflows")?;
    let end = 8usize.checked_add(n).context("safetensors header length overflows")?;
    let raw = bytes.get(8..end).context("safetensors header truncated")?;
    let header: Header = serde_json::from_slice(raw)
        .context("failed to parse safetensors header")?;
    Ok((header, end))
}

fn shape_of(entry: &serde_json::Value) -> Result<Vec<usize>> {
    entry["shape"]
        .as_array()
        .context("tensor entry has no shape")?
        .iter()
        .map(|v| v.as_u64().map(|d| d as usize).context("bad shape entry"))
        .collect()
}

/// Read a numeric tensor as `f64`. Handles F32, F64, I32, I64.
fn read_tensor_f64(bytes: &[u8], data_start: usize, entry: &serde_json::Value) -> Result<Vec<f64>> {
    let offsets = entry["data_offsets"].as_array().context("tensor entry has no data_offsets")?;
    let s = offsets.first().and_then(|v| v.as_u64()).context("bad data_offsets")? as usize;
    let e = offsets.get(1).and_then(|v| v.as_u64()).context("bad data_offsets")? as usize;
    let start = data_start.checked_add(s).context("tensor data offset overflows")?;
    let end = data_start.checked_add(e).context("tensor data offset overflows")?;
    let raw = bytes.get(start..end).context("tensor data out of bounds")?;
    let dtype = entry["dtype"].as_str().context("tensor entry has no dtype")?;
    let vals: Vec<f64> = match dtype {
        "F32" => raw.chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
            .collect(),
        "F64" => raw.chunks_exact(8)
            .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
            .collect(),
        "I32" => raw.chunks_exact(4)
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
            .collect(),
        "I64" => raw.chunks_exact(8)
            .map(|b| i64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f64)
            .collect(),
        other => bail!("unsupported dtype {other}"),
    };
    Ok(vals)
}

/// Load triggers from safetensors.
///
/// * `events` [N, 3] (`sample, prev, code`, as `mne.find_events` returns), or
/// * `stim` [T] or [1, T] plus optional scalar `first_samp`, decoded with
///   [`find_events`].
pub fn read_trigger_safetensors(path: &Path) -> Result<Vec<RawEvent>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let (header, data_start) = parse_header(&bytes)?;

    if let Some(entry) = header.get("events") {
        let shape = shape_of(entry)?;
        if shape.len() != 2 || shape[1] != 3 {
            bail!("'events' must have shape [N, 3], got {shape:?}");
        }
        let vals = read_tensor_f64(&bytes, data_start, entry)?;
        if Some(vals.len()) != shape[0].checked_mul(3) {
            bail!("'events' holds {} values, shape {shape:?} needs {}", vals.len(), shape[0].saturating_mul(3));
        }
        return Ok(vals
            .chunks_exact(3)
            .map(|r| RawEvent::new(r[0].round() as i64, r[2].round() as i64))
            .collect());
    }

    let entry = header
        .get("stim")
        .context("safetensors file has neither 'events' nor 'stim'")?;
    let stim = Array1::from(read_tensor_f64(&bytes, data_start, entry)?);
    let first_samp = match header.get("first_samp") {
        Some(e) => read_tensor_f64(&bytes, data_start, e)?
            .first()
            .map(|v| v.round() as i64)
            .unwrap_or(0),
        None => 0,
    };
    Ok(find_events(stim.view(), first_samp))
}

// ── Safetensors writer ────────────────────────────────────────────────────

/// Minimal safetensors writer for F64 and I64 tensors.
///
/// ```rust,no_run
/// use mous::io::StWriter;
/// use std::path::Path;
/// let mut w = StWriter::new();
/// w.add_i64("events", &[1200, 0, 10, 1500, 0, 5], &[2, 3]);
/// w.write(Path::new("/tmp/triggers.safetensors")).unwrap();
/// ```
#[derive(Default)]
pub struct StWriter {
    entries: Vec<(String, Vec<u8>, &'static str, Vec<usize>)>,
}

impl StWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_f64(&mut self, name: &str, data: &[f64], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F64", shape.to_vec()));
    }

    pub fn add_i64(&mut self, name: &str, data: &[i64], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "I64", shape.to_vec()));
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        use std::io::Write;
        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for (name, data, dtype, shape) in &self.entries {
            header_map.insert(name.clone(), serde_json::json!({
                "dtype": dtype,
                "shape": shape,
                "data_offsets": [offset, offset + data.len()],
            }));
            offset += data.len();
        }
        let hdr_bytes = serde_json::to_vec(&header_map)?;
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        let padded: Vec<u8> = hdr_bytes.into_iter()
            .chain(std::iter::repeat(b' ').take(pad))
            .collect();
        let mut f = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        f.write_all(&(padded.len() as u64).to_le_bytes())?;
        f.write_all(&padded)?;
        for (_, data, _, _) in &self.entries {
            f.write_all(data)?;
        }
        Ok(())
    }
}

/// Write a trigger stream as an `events` [N, 3] I64 tensor (`prev` = 0).
pub fn write_trigger_safetensors(events: &[RawEvent], path: &Path) -> Result<()> {
    let flat: Vec<i64> = events.iter().flat_map(|e| [e.sample, 0, e.code]).collect();
    let mut w = StWriter::new();
    w.add_i64("events", &flat, &[events.len(), 3]);
    w.write(path)
}

// ── Output tables ─────────────────────────────────────────────────────────

fn tsv_writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))
}

/// Write the events table:
/// `sample onset duration type value sentence relative_clause target`.
pub fn write_events_tsv(events: &[CanonicalEvent], path: &Path) -> Result<()> {
    let mut w = tsv_writer(path)?;
    if events.is_empty() {
        w.write_record(["sample", "onset", "duration", "type", "value",
                        "sentence", "relative_clause", "target"])?;
    }
    for ev in events {
        w.serialize(ev)?;
    }
    w.flush()?;
    Ok(())
}

/// Write the error table: `index onset sample type value trigger_value`.
pub fn write_errors_tsv(rows: &[ErrorRow], path: &Path) -> Result<()> {
    let mut w = tsv_writer(path)?;
    if rows.is_empty() {
        w.write_record(["index", "onset", "sample", "type", "value", "trigger_value"])?;
    }
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}
