// src/config.rs
use std::path::PathBuf;
use plotters::style::RGBColor;
use crate::drivers::colormap::{parse_hex_color, ColorMap};
use crate::drivers::events::EventSchedule;
use crate::drivers::range::AxisLimits;
use crate::drivers::StackPlotError;
#[derive(Clone, Debug, PartialEq)]
pub struct TitleConfig {
    pub lead: String,
    pub glyph: String,
    pub close: String,
    pub font_size: f64,
    /// Figure fraction (from the bottom) of the title baseline box.
    pub y_fraction: f64,
    /// Figure fraction of the first fragment's centre.
    pub x_fraction: f64,
}
impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            lead: "Neural response to an event is modulated by response to previous event ("
                .into(),
            glyph: "  |".into(),
            close: "  )".into(),
            font_size: 18.0,
            y_fraction: 0.90,
            x_fraction: 0.45,
        }
    }
}
/// Every knob of a run. `Default` is the only source: the plot's fixed constants.
#[derive(Clone, Debug, PartialEq)]
pub struct StackPlotConfig {
    pub subject_id: u32,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub channel_count: usize,
    pub time_start_ms: f64,
    pub time_end_ms: f64,
    pub ms_per_sample: f64,
    pub event_step_ms: f64,
    pub event_duration_ms: f64,
    /// Data-space height of the event tick.
    pub event_marker_y: f64,
    /// Where the hidden marker of a channel without an event sits.
    pub event_fallback_ms: f64,
    pub colormap: String,
    pub event_color: String,
    pub font_size: f64,
    pub figure_height_in: f64,
    pub aspect_ratio: f64,
    pub dpi: f64,
    pub y_multiplier: f64,
    pub color_multiplier: f64,
    pub vertical_line: bool,
    pub x_window_ms: [f64; 2],
    pub x_label: String,
    pub colorbar_label: String,
    pub colorbar_shrink: f64,
    pub title: TitleConfig,
    /// Open the preview window before saving (when a display exists).
    pub show: bool,
}
impl Default for StackPlotConfig {
    fn default() -> Self {
        Self {
            subject_id: 7,
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            channel_count: 14,
            time_start_ms: -1000.0,
            time_end_ms: 1000.0,
            ms_per_sample: 2.0,
            event_step_ms: 50.0,
            event_duration_ms: 250.0,
            event_marker_y: 5.0,
            event_fallback_ms: -250.0,
            colormap: "coolwarm".into(),
            event_color: "#31a354".into(),
            font_size: 16.0,
            figure_height_in: 8.0,
            aspect_ratio: 1.76,
            dpi: 100.0,
            y_multiplier: 1.3,
            color_multiplier: 1.0,
            vertical_line: true,
            x_window_ms: [-900.0, 600.0],
            x_label: "Time since event, milliseconds".into(),
            colorbar_label: "Voltage".into(),
            colorbar_shrink: 0.6,
            title: TitleConfig::default(),
            show: true,
        }
    }
}
impl StackPlotConfig {
    pub fn validate(&self) -> Result<(), StackPlotError> {
        if self.channel_count == 0 {
            return Err(StackPlotError::InvalidConfig(
                "channel_count must be at least 1".into(),
            ));
        }
        if !(self.figure_height_in > 0.0 && self.aspect_ratio > 0.0 && self.dpi > 0.0) {
            return Err(StackPlotError::InvalidConfig(
                "figure height, aspect ratio and dpi must be positive".into(),
            ));
        }
        let [lo, hi] = self.x_window_ms;
        if !(lo < hi) {
            return Err(StackPlotError::InvalidConfig(format!(
                "x window [{lo}, {hi}] is empty"
            )));
        }
        self.colormap()?;
        self.event_rgb()?;
        Ok(())
    }
    pub fn input_path(&self) -> PathBuf {
        self.data_dir.join(format!("MERP_S{}.bin", self.subject_id))
    }
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "colored_stack_plot_S{}_{}.pdf",
            self.subject_id, self.colormap
        ))
    }
    pub fn colormap(&self) -> Result<ColorMap, StackPlotError> {
        ColorMap::from_name(&self.colormap)
    }
    pub fn event_rgb(&self) -> Result<RGBColor, StackPlotError> {
        parse_hex_color(&self.event_color)
    }
    pub fn event_schedule(&self) -> EventSchedule {
        EventSchedule::new(self.event_step_ms, self.event_duration_ms)
    }
    pub fn x_window(&self) -> AxisLimits {
        AxisLimits::new(self.x_window_ms[0], self.x_window_ms[1])
    }
    pub fn figure_size_in(&self) -> (f64, f64) {
        (
            self.figure_height_in * self.aspect_ratio,
            self.figure_height_in,
        )
    }
    /// Figure size in backend pixels at `dpi`.
    pub fn figure_size_px(&self) -> (u32, u32) {
        let (w, h) = self.figure_size_in();
        (
            (w * self.dpi).round() as u32,
            (h * self.dpi).round() as u32,
        )
    }
    /// Points to pixels at the configured dpi.
    pub fn pt(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }
}
