use crate::drivers::table::WaveformTable;
use crate::drivers::StackPlotError;
/// Closed numeric interval shared by every panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisLimits {
    pub lo: f64,
    pub hi: f64,
}
impl AxisLimits {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }
    pub fn symmetric(magnitude: f64) -> Self {
        Self {
            lo: -magnitude,
            hi: magnitude,
        }
    }
    /// `[-m, m]` with `m = round(peak_abs * multiplier)`, ties to even.
    pub fn symmetric_from(table: &WaveformTable, multiplier: f64) -> Result<Self, StackPlotError> {
        let peak = table.peak_abs().ok_or(StackPlotError::EmptyTable)?;
        Self::symmetric_from_peak(peak, multiplier)
    }
    pub fn symmetric_from_peak(peak: f64, multiplier: f64) -> Result<Self, StackPlotError> {
        let scaled = peak * multiplier;
        if !scaled.is_finite() {
            return Err(StackPlotError::NonFinitePeak(scaled));
        }
        Ok(Self::symmetric(scaled.round_ties_even()))
    }
    pub fn span(&self) -> f64 {
        self.hi - self.lo
    }
    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo && value <= self.hi
    }
    pub fn as_range(&self) -> std::ops::Range<f64> {
        self.lo..self.hi
    }
}
/// Shared y-axis and colour limits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SharedLimits {
    pub y: AxisLimits,
    pub color: AxisLimits,
}
impl SharedLimits {
    pub fn from_table(
        table: &WaveformTable,
        y_multiplier: f64,
        color_multiplier: f64,
    ) -> Result<Self, StackPlotError> {
        let limits = Self {
            y: AxisLimits::symmetric_from(table, y_multiplier)?,
            color: AxisLimits::symmetric_from(table, color_multiplier)?,
        };
        if limits.y.is_degenerate() || limits.color.is_degenerate() {
            log::warn!("data peak rounds to zero; plotting with zero-width limits");
        }
        log::info!(
            "y limits [{}, {}], colour limits [{}, {}]",
            limits.y.lo,
            limits.y.hi,
            limits.color.lo,
            limits.color.hi
        );
        Ok(limits)
    }
}
