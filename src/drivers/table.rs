use ndarray::{Array2, ArrayView1, ShapeBuilder};
use crate::drivers::source::WaveformSource;
use crate::drivers::StackPlotError;
/// Evenly spaced millisecond offsets, end inclusive.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeAxis {
    pub start_ms: f64,
    pub step_ms: f64,
    values: Vec<f64>,
}
impl TimeAxis {
    pub fn new(start_ms: f64, end_ms: f64, step_ms: f64) -> Result<Self, StackPlotError> {
        if !(step_ms > 0.0) || !start_ms.is_finite() || !end_ms.is_finite() {
            return Err(StackPlotError::InvalidConfig(format!(
                "time axis {start_ms}..{end_ms} step {step_ms}"
            )));
        }
        // Same sample count as arange(start, end + step, step).
        let span = end_ms + step_ms - start_ms;
        let len = if span > 0.0 {
            (span / step_ms).ceil() as usize
        } else {
            0
        };
        let values = (0..len).map(|i| start_ms + i as f64 * step_ms).collect();
        Ok(Self {
            start_ms,
            step_ms,
            values,
        })
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
/// Samples (rows) x channels (columns).
#[derive(Clone, Debug)]
pub struct WaveformTable {
    pub time: TimeAxis,
    samples: Array2<f64>,
}
impl WaveformTable {
    /// Reshape a flat column-major buffer: channel `i` is the `i`-th contiguous block.
    pub fn from_column_major(
        values: Vec<f64>,
        channels: usize,
        time: TimeAxis,
    ) -> Result<Self, StackPlotError> {
        if channels == 0 || values.len() % channels != 0 {
            return Err(StackPlotError::ShapeMismatch {
                values: values.len(),
                channels,
            });
        }
        let rows = values.len() / channels;
        if rows != time.len() {
            log::debug!("{rows} rows against {} time values", time.len());
        }
        let samples = Array2::from_shape_vec((rows, channels).f(), values).map_err(|_| {
            StackPlotError::ShapeMismatch {
                values: rows * channels,
                channels,
            }
        })?;
        Ok(Self { time, samples })
    }
    pub fn rows(&self) -> usize {
        self.samples.nrows()
    }
    pub fn channels(&self) -> usize {
        self.samples.ncols()
    }
    pub fn channel(&self, index: usize) -> ArrayView1<'_, f64> {
        self.samples.column(index)
    }
    /// (time, value) pairs for one channel; rows take the leading time values.
    pub fn channel_points(&self, index: usize) -> Vec<(f64, f64)> {
        self.time
            .values()
            .iter()
            .copied()
            .zip(self.channel(index).iter().copied())
            .collect()
    }
    /// Largest absolute value; NaN wins like a numpy reduction.
    pub fn peak_abs(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().fold(0.0f64, |acc, v| {
            if acc.is_nan() || v.is_nan() {
                f64::NAN
            } else {
                acc.max(v.abs())
            }
        }))
    }
}
pub fn load_table<S: WaveformSource>(
    source: &mut S,
    channels: usize,
    time: TimeAxis,
) -> Result<WaveformTable, StackPlotError> {
    let values = source.read_values()?;
    let table = WaveformTable::from_column_major(values, channels, time)?;
    log::info!(
        "loaded {} ({} samples x {} channels)",
        source.describe(),
        table.rows(),
        table.channels()
    );
    Ok(table)
}
