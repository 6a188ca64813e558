// src/drivers/ticks.rs
// x ticks come from a default-sized scratch figure, then get pinned to the bottom panel.
use crate::drivers::range::AxisLimits;
/// Candidate step mantissas per decade.
const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];
const MAX_BINS: usize = 9;
const MIN_TICKS_IN_VIEW: usize = 2;
const EDGE_TOLERANCE: f64 = 1e-10;
/// Fractions of the figure occupied by the axes box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubplotParams {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}
impl Default for SubplotParams {
    fn default() -> Self {
        Self {
            left: 0.125,
            right: 0.9,
            bottom: 0.11,
            top: 0.88,
        }
    }
}
/// Throwaway figure used only to derive tick positions.
#[derive(Clone, Copy, Debug)]
pub struct ScratchFigure {
    pub width_in: f64,
    pub height_in: f64,
    pub params: SubplotParams,
    pub font_size: f64,
}
impl ScratchFigure {
    pub fn with_font_size(font_size: f64) -> Self {
        Self {
            width_in: 6.4,
            height_in: 4.8,
            params: SubplotParams::default(),
            font_size,
        }
    }
    /// Width of the scratch axes in points.
    pub fn axis_length_pt(&self) -> f64 {
        self.width_in * (self.params.right - self.params.left) * 72.0
    }
    pub fn x_tick_budget(&self) -> usize {
        tick_budget(self.axis_length_pt(), self.font_size * 3.0)
    }
    pub fn x_ticks(&self, window: AxisLimits) -> Vec<f64> {
        let ticks = nice_ticks(window, self.x_tick_budget());
        log::debug!(
            "scratch figure: {} bins over [{}, {}] -> {:?}",
            self.x_tick_budget(),
            window.lo,
            window.hi,
            ticks
        );
        ticks
    }
}
/// How many labels of `label_extent_pt` fit along `axis_length_pt`, clamped to `[1, 9]`.
pub fn tick_budget(axis_length_pt: f64, label_extent_pt: f64) -> usize {
    if label_extent_pt <= 0.0 {
        return MAX_BINS;
    }
    ((axis_length_pt / label_extent_pt).floor() as usize).clamp(1, MAX_BINS)
}
/// Nice-number ticks covering `limits` with at most `nbins` intervals.
///
/// The returned list may extend one step past either end of the interval;
/// callers decide whether to draw those.
pub fn nice_ticks(limits: AxisLimits, nbins: usize) -> Vec<f64> {
    let (vmin, vmax) = (limits.lo.min(limits.hi), limits.lo.max(limits.hi));
    if !vmin.is_finite() || !vmax.is_finite() {
        return Vec::new();
    }
    if vmax - vmin == 0.0 {
        return vec![vmin];
    }
    let nbins = nbins.max(1) as f64;
    let raw_step = (vmax - vmin) / nbins;
    let scale = 10f64.powf(raw_step.log10().floor());
    let mut steps: Vec<f64> = NICE_STEPS[..NICE_STEPS.len() - 1]
        .iter()
        .map(|s| s * 0.1)
        .chain(NICE_STEPS.iter().copied())
        .chain(std::iter::once(NICE_STEPS[1] * 10.0))
        .map(|s| s * scale)
        .collect();
    steps.dedup();
    let first_large = steps
        .iter()
        .position(|s| *s >= raw_step)
        .unwrap_or(steps.len() - 1);
    let mut ticks = Vec::new();
    for &step in steps[..=first_large].iter().rev() {
        let best_vmin = (vmin / step).floor() * step;
        let low = edge_floor(vmin - best_vmin, step);
        let high = edge_ceil(vmax - best_vmin, step);
        ticks = (low..=high).map(|k| k as f64 * step + best_vmin).collect();
        let in_view = ticks.iter().filter(|t| **t >= vmin && **t <= vmax).count();
        if in_view >= MIN_TICKS_IN_VIEW {
            break;
        }
    }
    ticks
}
/// Ticks that fall inside `limits`.
pub fn visible_ticks(ticks: &[f64], limits: AxisLimits) -> Vec<f64> {
    ticks.iter().copied().filter(|t| limits.contains(*t)).collect()
}
pub fn format_tick(value: f64) -> String {
    if value == value.trunc() {
        format!("{:.0}", value + 0.0)
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
fn edge_floor(x: f64, step: f64) -> i64 {
    let d = (x / step).floor();
    let m = x - d * step;
    if ((m / step) - 1.0).abs() < EDGE_TOLERANCE {
        d as i64 + 1
    } else {
        d as i64
    }
}
fn edge_ceil(x: f64, step: f64) -> i64 {
    let d = (x / step).floor();
    let m = x - d * step;
    if (m / step).abs() < EDGE_TOLERANCE {
        d as i64
    } else {
        d as i64 + 1
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn scratch_budget_for_default_font() {
        let scratch = ScratchFigure::with_font_size(16.0);
        assert_eq!(scratch.x_tick_budget(), 7);
    }
    #[test]
    fn default_window_ticks_every_quarter_second() {
        let scratch = ScratchFigure::with_font_size(16.0);
        let ticks = scratch.x_ticks(AxisLimits::new(-900.0, 600.0));
        assert_eq!(
            ticks,
            vec![-1000.0, -750.0, -500.0, -250.0, 0.0, 250.0, 500.0, 750.0]
        );
        assert_eq!(
            visible_ticks(&ticks, AxisLimits::new(-900.0, 600.0)),
            vec![-750.0, -500.0, -250.0, 0.0, 250.0, 500.0]
        );
    }
    #[test]
    fn exact_edges_are_not_padded() {
        let ticks = nice_ticks(AxisLimits::new(0.0, 10.0), 5);
        assert_eq!(ticks, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }
    #[test]
    fn symmetric_colour_range() {
        let ticks = nice_ticks(AxisLimits::new(-12.0, 12.0), 6);
        assert_eq!(ticks, vec![-15.0, -10.0, -5.0, 0.0, 5.0, 10.0, 15.0]);
    }
    #[test]
    fn degenerate_range_yields_single_tick() {
        assert_eq!(nice_ticks(AxisLimits::new(0.0, 0.0), 5), vec![0.0]);
    }
    #[test]
    fn budget_is_clamped() {
        assert_eq!(tick_budget(10.0, 48.0), 1);
        assert_eq!(tick_budget(10_000.0, 48.0), 9);
    }
    #[test]
    fn tick_labels_drop_trailing_zeros() {
        assert_eq!(format_tick(-750.0), "-750");
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(-0.0), "0");
        assert_eq!(format_tick(2.5), "2.5");
    }
}
