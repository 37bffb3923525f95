//! Sensor-log parsing: whitespace-separated laser/radar rows.
//!
//! Format, one sample per line, ground truth trailing:
//! ```text
//! L  x y              timestamp_us  gt_px gt_py gt_vx gt_vy
//! R  range bearing rr timestamp_us  gt_px gt_py gt_vx gt_vy
//! ```
//! Fields after `gt_vy` (some recordings append yaw/yaw-rate truth) are
//! ignored.

use anyhow::{bail, Context, Result};
use sensor_models::{Measurement, MeasurementValue};
use std::path::Path;
use std::str::SplitWhitespace;
use ukf_core::GroundTruth;

/// One parsed log row: the measurement plus its ground-truth state.
#[derive(Clone, Copy, Debug)]
pub struct LogRecord {
    pub measurement: Measurement,
    pub ground_truth: GroundTruth,
}

/// Parse a whole sensor-log file.
pub fn load_log(path: &Path) -> Result<Vec<LogRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading sensor log {}", path.display()))?;
    parse_log(&text)
}

/// Parse sensor-log text, one record per non-empty line.
pub fn parse_log(text: &str) -> Result<Vec<LogRecord>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_line(line).with_context(|| format!("sensor log line {}", idx + 1))
        })
        .collect()
}

fn parse_line(line: &str) -> Result<LogRecord> {
    let mut fields = line.split_whitespace();
    let tag = fields.next().context("missing sensor tag")?;

    let (value, timestamp_us) = match tag {
        "L" => {
            let x = take_f64(&mut fields, "x")?;
            let y = take_f64(&mut fields, "y")?;
            let t = take_i64(&mut fields, "timestamp")?;
            (MeasurementValue::Laser { x, y }, t)
        }
        "R" => {
            let range = take_f64(&mut fields, "range")?;
            let bearing = take_f64(&mut fields, "bearing")?;
            let range_rate = take_f64(&mut fields, "range_rate")?;
            let t = take_i64(&mut fields, "timestamp")?;
            (
                MeasurementValue::Radar {
                    range,
                    bearing,
                    range_rate,
                },
                t,
            )
        }
        other => bail!("unknown sensor tag `{other}`"),
    };

    let ground_truth = GroundTruth {
        px: take_f64(&mut fields, "gt_px")?,
        py: take_f64(&mut fields, "gt_py")?,
        vx: take_f64(&mut fields, "gt_vx")?,
        vy: take_f64(&mut fields, "gt_vy")?,
    };

    Ok(LogRecord {
        measurement: Measurement {
            timestamp_us,
            value,
        },
        ground_truth,
    })
}

fn take_f64(fields: &mut SplitWhitespace<'_>, name: &str) -> Result<f64> {
    let s = fields
        .next()
        .with_context(|| format!("missing field `{name}`"))?;
    s.parse()
        .with_context(|| format!("field `{name}` is not a number: `{s}`"))
}

fn take_i64(fields: &mut SplitWhitespace<'_>, name: &str) -> Result<i64> {
    let s = fields
        .next()
        .with_context(|| format!("missing field `{name}`"))?;
    s.parse()
        .with_context(|| format!("field `{name}` is not an integer: `{s}`"))
}
