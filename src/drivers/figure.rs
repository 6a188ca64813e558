use plotters::style::{RGBColor, BLACK};
use crate::config::StackPlotConfig;
use crate::drivers::colormap::ColorMap;
use crate::drivers::range::{AxisLimits, SharedLimits};
use crate::drivers::table::WaveformTable;
use crate::drivers::title::TitleFragment;
use crate::drivers::StackPlotError;
/// Short vertical tick drawn at a data coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub color: RGBColor,
    /// Hidden markers keep their slot but are never drawn.
    pub visible: bool,
}
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Spines {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}
impl Spines {
    pub fn none() -> Self {
        Self::default()
    }
}
#[cfg(test)]
impl Spines {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}
/// Tick positions and caption shown under the bottom-most panel.
#[derive(Clone, Debug, PartialEq)]
pub struct BottomAxis {
    pub ticks: Vec<f64>,
    pub label: String,
}
/// One channel's subplot.
#[derive(Clone, Debug)]
pub struct Panel {
    pub channel: usize,
    pub trace: Vec<(f64, f64)>,
    pub markers: Vec<Marker>,
    pub spines: Spines,
    pub axis: Option<BottomAxis>,
    pub x_limits: AxisLimits,
    pub y_limits: AxisLimits,
}
#[derive(Clone, Debug, PartialEq)]
pub struct Colorbar {
    pub limits: AxisLimits,
    /// Fraction of the panel stack height.
    pub shrink: f64,
    pub label: String,
}
/// Dashed line in panel-relative coordinates that runs through every panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceLine {
    /// Horizontal position as a fraction of the panel width.
    pub axes_x: f64,
    /// Height in units of one panel, measured up from the bottom panel.
    pub panels_spanned: usize,
}
/// Sizes resolved to backend pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FigureStyle {
    pub size_px: (u32, u32),
    pub dpi: f64,
    pub font_px: f64,
    pub marker_radius_px: f64,
    pub event_tick_px: f64,
    pub event_tick_width_px: f64,
    pub axis_line_px: f64,
    pub tick_len_px: f64,
    pub tick_pad_px: f64,
    pub label_pad_px: f64,
    pub reference_width_px: f64,
    pub reference_dash_px: (f64, f64),
}
impl FigureStyle {
    pub fn from_config(config: &StackPlotConfig) -> Self {
        let lw = 1.5;
        Self {
            size_px: config.figure_size_px(),
            dpi: config.dpi,
            font_px: config.pt(config.font_size),
            marker_radius_px: config.pt(3.0),
            event_tick_px: config.pt(14.0),
            event_tick_width_px: config.pt(3.0),
            axis_line_px: config.pt(0.8),
            tick_len_px: config.pt(3.5),
            tick_pad_px: config.pt(3.5),
            label_pad_px: config.pt(5.0),
            reference_width_px: config.pt(lw),
            reference_dash_px: (config.pt(3.7 * lw), config.pt(1.6 * lw)),
        }
    }
}
/// Backend-independent description of the whole figure.
#[derive(Clone, Debug)]
pub struct StackFigure {
    pub panels: Vec<Panel>,
    pub colormap: ColorMap,
    pub color_limits: AxisLimits,
    pub colorbar: Colorbar,
    pub reference_line: Option<ReferenceLine>,
    pub title: Vec<TitleFragment>,
    /// Figure fractions (x of the first fragment centre, y of the fragment bottoms).
    pub title_anchor: (f64, f64),
    pub style: FigureStyle,
}
impl StackFigure {
    pub fn build(
        table: &WaveformTable,
        events: &[Option<f64>],
        limits: SharedLimits,
        x_ticks: &[f64],
        config: &StackPlotConfig,
    ) -> Result<Self, StackPlotError> {
        let channels = table.channels();
        if channels == 0 || table.rows() == 0 {
            return Err(StackPlotError::EmptyTable);
        }
        let colormap = config.colormap()?;
        let event_color = config.event_rgb()?;
        let window = config.x_window();
        let mut panels = Vec::with_capacity(channels);
        for channel in 0..channels {
            let trace = table.channel_points(channel);
            let mut markers = Vec::with_capacity(2);
            match events.get(channel).copied().flatten() {
                Some(x) => markers.push(Marker {
                    x,
                    y: config.event_marker_y,
                    color: event_color,
                    visible: true,
                }),
                None => markers.push(Marker {
                    x: config.event_fallback_ms,
                    y: config.event_marker_y,
                    color: event_color,
                    visible: false,
                }),
            }
            if !config.vertical_line {
                markers.push(Marker {
                    x: 0.0,
                    y: config.event_marker_y,
                    color: BLACK,
                    visible: true,
                });
            }
            let y_limits = data_limits(trace.iter().map(|p| p.1));
            panels.push(Panel {
                channel,
                trace,
                markers,
                spines: Spines::none(),
                axis: None,
                x_limits: window,
                y_limits,
            });
        }
        if let Some(bottom) = panels.last_mut() {
            bottom.spines.bottom = true;
            bottom.axis = Some(BottomAxis {
                ticks: x_ticks.to_vec(),
                label: config.x_label.clone(),
            });
        }
        let reference_line = if config.vertical_line {
            let axes_x = window.lo.abs() / window.span();
            if !(0.0..=1.0).contains(&axes_x) {
                log::warn!("x window does not contain 0; the reference line falls outside the panels");
            }
            Some(ReferenceLine {
                axes_x,
                panels_spanned: channels,
            })
        } else {
            None
        };
        let title_px = config.pt(config.title.font_size);
        let title = vec![
            TitleFragment::plain(config.title.lead.clone(), title_px),
            TitleFragment::glyph(config.title.glyph.clone(), event_color, title_px),
            TitleFragment::plain(config.title.close.clone(), title_px),
        ];
        let mut figure = Self {
            panels,
            colormap,
            color_limits: limits.color,
            colorbar: Colorbar {
                limits: limits.color,
                shrink: config.colorbar_shrink,
                label: config.colorbar_label.clone(),
            },
            reference_line,
            title,
            title_anchor: (config.title.x_fraction, config.title.y_fraction),
            style: FigureStyle::from_config(config),
        };
        figure.apply_shared_limits(limits.y, window);
        Ok(figure)
    }
    /// Second pass: every panel gets the same limits, replacing its own.
    pub fn apply_shared_limits(&mut self, y: AxisLimits, x: AxisLimits) {
        for panel in &mut self.panels {
            panel.y_limits = y;
            panel.x_limits = x;
        }
    }
    pub fn title_text(&self) -> String {
        self.title.iter().map(|f| f.text.as_str()).collect()
    }
}
fn data_limits(values: impl Iterator<Item = f64>) -> AxisLimits {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        AxisLimits::new(0.0, 1.0)
    } else {
        AxisLimits::new(lo, hi)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::events::EventSchedule;
    use crate::drivers::table::TimeAxis;
    fn small_table() -> WaveformTable {
        // 3 channels x 5 samples, channel c holds (c + 1) * [-2, -1, 0, 1, 2].
        let values: Vec<f64> = (0..3)
            .flat_map(|c| (0..5).map(move |i| (c + 1) as f64 * (i as f64 - 2.0)))
            .collect();
        let time = TimeAxis::new(-4.0, 4.0, 2.0).unwrap();
        WaveformTable::from_column_major(values, 3, time).unwrap()
    }
    fn config() -> StackPlotConfig {
        StackPlotConfig {
            channel_count: 3,
            x_window_ms: [-4.0, 2.0],
            ..StackPlotConfig::default()
        }
    }
    fn build(config: &StackPlotConfig) -> StackFigure {
        let table = small_table();
        let events = EventSchedule::new(1.0, 0.5).offsets(3);
        let limits = SharedLimits::from_table(&table, 1.3, 1.0).unwrap();
        StackFigure::build(&table, &events, limits, &[-4.0, -2.0, 0.0, 2.0], config).unwrap()
    }
    #[test]
    fn only_bottom_panel_keeps_axis_chrome() {
        let figure = build(&config());
        assert_eq!(figure.panels.len(), 3);
        for panel in &figure.panels[..2] {
            assert!(!panel.spines.any());
            assert!(panel.axis.is_none());
        }
        let bottom = figure.panels.last().unwrap();
        assert_eq!(
            bottom.spines,
            Spines {
                bottom: true,
                ..Spines::none()
            }
        );
        let axis = bottom.axis.as_ref().unwrap();
        assert_eq!(axis.ticks, vec![-4.0, -2.0, 0.0, 2.0]);
        assert_eq!(axis.label, "Time since event, milliseconds");
    }
    #[test]
    fn shared_limits_override_autoscale() {
        let figure = build(&config());
        for panel in &figure.panels {
            assert_eq!(panel.y_limits, AxisLimits::new(-8.0, 8.0));
            assert_eq!(panel.x_limits, AxisLimits::new(-4.0, 2.0));
        }
        assert_eq!(figure.color_limits, AxisLimits::new(-6.0, 6.0));
    }
    #[test]
    fn missing_event_keeps_a_hidden_marker() {
        let figure = build(&config());
        let first = &figure.panels[0].markers;
        assert_eq!(first.len(), 1);
        assert!(!first[0].visible);
        assert_eq!(first[0].x, -250.0);
        let second = &figure.panels[1].markers;
        assert!(second[0].visible);
        assert_eq!(second[0].x, -1.5);
        assert_eq!(second[0].y, 5.0);
        assert_eq!(second[0].color, RGBColor(0x31, 0xa3, 0x54));
    }
    #[test]
    fn reference_line_sits_at_time_zero() {
        let figure = build(&config());
        let line = figure.reference_line.unwrap();
        assert!((line.axes_x - 4.0 / 6.0).abs() < 1e-12);
        assert_eq!(line.panels_spanned, 3);
        for panel in &figure.panels {
            assert!(panel.markers.iter().all(|m| m.color != BLACK));
        }
    }
    #[test]
    fn without_reference_line_each_panel_marks_zero() {
        let config = StackPlotConfig {
            vertical_line: false,
            ..config()
        };
        let figure = build(&config);
        assert!(figure.reference_line.is_none());
        for panel in &figure.panels {
            let zero = panel.markers.last().unwrap();
            assert_eq!((zero.x, zero.color, zero.visible), (0.0, BLACK, true));
        }
    }
    #[test]
    fn title_has_three_fragments_with_coloured_glyph() {
        let figure = build(&config());
        assert_eq!(figure.title.len(), 3);
        assert!(figure.title[1].bold);
        assert_eq!(figure.title[1].color, RGBColor(0x31, 0xa3, 0x54));
        assert!(figure.title_text().starts_with("Neural response"));
        assert!(figure.title_text().ends_with("  |  )"));
        assert_eq!(figure.title_anchor, (0.45, 0.90));
    }
    #[test]
    fn traces_pair_time_with_samples() {
        let figure = build(&config());
        assert_eq!(
            figure.panels[2].trace,
            vec![(-4.0, -6.0), (-2.0, -3.0), (0.0, 0.0), (2.0, 3.0), (4.0, 6.0)]
        );
    }
}
