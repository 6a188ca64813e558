use std::path::Path;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use crate::drivers::error::StackPlotError;
use crate::drivers::figure::{Panel, StackFigure};
use crate::drivers::pdf::PdfBackend;
use crate::drivers::ticks::{format_tick, nice_ticks, tick_budget, visible_ticks, SubplotParams};
use crate::drivers::title::{compose_title, draw_title};
/// Share of the subplot box handed to the colorbar, and the gap before it.
const COLORBAR_FRACTION: f64 = 0.15;
const COLORBAR_PAD: f64 = 0.05;
/// Colorbar height over width.
const COLORBAR_ASPECT: f64 = 20.0;
/// Margin kept around the content when the page is cropped, in inches.
pub const TIGHT_PAD_IN: f64 = 0.1;
/// Axis-aligned rectangle in backend pixels, y growing downwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}
impl PixelRect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
    /// Rounded corners, so adjacent rectangles share their edge pixels.
    fn corners(&self) -> ((i32, i32), (i32, i32)) {
        (
            (self.left.round() as i32, self.top.round() as i32),
            (self.right().round() as i32, self.bottom().round() as i32),
        )
    }
    fn area<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawingArea<DB, Shift> {
        let ((x0, y0), (x1, y1)) = self.corners();
        root.clone()
            .shrink((x0, y0), ((x1 - x0).max(1), (y1 - y0).max(1)))
    }
    fn x_at(&self, fraction: f64) -> f64 {
        self.left + fraction * self.width
    }
}
/// Where the panels and the colorbar land on the figure.
#[derive(Clone, Debug, PartialEq)]
pub struct StackLayout {
    pub panels: Vec<PixelRect>,
    pub colorbar: PixelRect,
}
impl StackLayout {
    /// Panels are stacked with no vertical gap inside the subplot box; the
    /// colorbar takes a slot on the right and is centred vertically.
    pub fn compute(size_px: (u32, u32), params: SubplotParams, panels: usize, shrink: f64) -> Self {
        let (w, h) = (size_px.0 as f64, size_px.1 as f64);
        let left = params.left * w;
        let top = (1.0 - params.top) * h;
        let box_width = (params.right - params.left) * w;
        let box_height = (params.top - params.bottom) * h;
        let stack_width = box_width * (1.0 - COLORBAR_FRACTION - COLORBAR_PAD);
        let panel_height = box_height / panels.max(1) as f64;
        let panels = (0..panels)
            .map(|i| PixelRect {
                left,
                top: top + i as f64 * panel_height,
                width: stack_width,
                height: panel_height,
            })
            .collect();
        let slot_left = left + box_width * (1.0 - COLORBAR_FRACTION);
        let slot_width = box_width * COLORBAR_FRACTION;
        let bar_height = box_height * shrink;
        let colorbar = PixelRect {
            left: slot_left,
            top: top + (box_height - bar_height) / 2.0,
            width: (bar_height / COLORBAR_ASPECT).min(slot_width),
            height: bar_height,
        };
        Self { panels, colorbar }
    }
}
/// Trace points inside the panel's window; everything else is clipped.
pub fn visible_points(panel: &Panel) -> impl Iterator<Item = (f64, f64)> + '_ {
    panel
        .trace
        .iter()
        .copied()
        .filter(|(t, v)| panel.x_limits.contains(*t) && panel.y_limits.contains(*v))
}
/// Split `[0, length]` into dash intervals, starting with a dash at 0.
pub fn dash_segments(length: f64, on: f64, off: f64) -> Vec<(f64, f64)> {
    let period = on + off;
    if length <= 0.0 || on <= 0.0 || period <= 0.0 {
        return Vec::new();
    }
    let mut segments = Vec::new();
    let mut start = 0.0;
    while start < length {
        segments.push((start, (start + on).min(length)));
        start += period;
    }
    segments
}
pub fn render_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &StackFigure,
) -> Result<(), StackPlotError>
where
    DB::ErrorType: 'static,
{
    let layout = StackLayout::compute(
        figure.style.size_px,
        SubplotParams::default(),
        figure.panels.len(),
        figure.colorbar.shrink,
    );
    log::debug!("layout {layout:?}");
    for (panel, rect) in figure.panels.iter().zip(&layout.panels) {
        draw_panel(root, figure, panel, rect)?;
    }
    if let (Some(panel), Some(rect)) = (figure.panels.last(), layout.panels.last()) {
        draw_bottom_axis(root, figure, panel, rect)?;
        if let Some(line) = figure.reference_line {
            let x = rect.x_at(line.axes_x).round() as i32;
            let length = rect.height * line.panels_spanned as f64;
            let (on, off) = figure.style.reference_dash_px;
            let style = BLACK.stroke_width(figure.style.reference_width_px.round() as u32);
            for (a, b) in dash_segments(length, on, off) {
                root.draw(&PathElement::new(
                    vec![
                        (x, (rect.bottom() - a).round() as i32),
                        (x, (rect.bottom() - b).round() as i32),
                    ],
                    style,
                ))?;
            }
        }
    }
    draw_colorbar(root, figure, &layout.colorbar)?;
    let placed = compose_title(
        &figure.title,
        figure.style.size_px,
        figure.title_anchor.0,
        figure.title_anchor.1,
        root,
    )?;
    draw_title(root, &placed)?;
    Ok(())
}
fn draw_panel<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &StackFigure,
    panel: &Panel,
    rect: &PixelRect,
) -> Result<(), StackPlotError>
where
    DB::ErrorType: 'static,
{
    let area = rect.area(root);
    let mut chart = ChartBuilder::on(&area)
        .build_cartesian_2d(panel.x_limits.as_range(), panel.y_limits.as_range())?;
    let radius = figure.style.marker_radius_px.round() as u32;
    chart.draw_series(visible_points(panel).map(|(t, v)| {
        let color = figure.colormap.color_for(v, figure.color_limits);
        Circle::new((t, v), radius, color.filled())
    }))?;
    let half = (figure.style.event_tick_px / 2.0).round() as i32;
    let width = figure.style.event_tick_width_px.round() as u32;
    let markers = panel.markers.iter().filter(|m| {
        m.visible && panel.x_limits.contains(m.x) && panel.y_limits.contains(m.y)
    });
    chart.draw_series(markers.map(|m| {
        EmptyElement::at((m.x, m.y))
            + PathElement::new(vec![(0, -half), (0, half)], m.color.stroke_width(width))
    }))?;
    Ok(())
}
fn draw_bottom_axis<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &StackFigure,
    panel: &Panel,
    rect: &PixelRect,
) -> Result<(), StackPlotError>
where
    DB::ErrorType: 'static,
{
    let style = &figure.style;
    let line = BLACK.stroke_width(style.axis_line_px.round().max(1.0) as u32);
    let ((x0, _), (x1, y)) = rect.corners();
    if panel.spines.bottom {
        root.draw(&PathElement::new(vec![(x0, y), (x1, y)], line))?;
    }
    let Some(axis) = &panel.axis else {
        return Ok(());
    };
    let font = ("sans-serif", style.font_px).into_font().color(&BLACK);
    let tick_len = style.tick_len_px.round() as i32;
    let label_top = y + tick_len + style.tick_pad_px.round() as i32;
    let mut label_height = 0;
    for tick in visible_ticks(&axis.ticks, panel.x_limits) {
        let fraction = (tick - panel.x_limits.lo) / panel.x_limits.span();
        let x = rect.x_at(fraction).round() as i32;
        root.draw(&PathElement::new(vec![(x, y), (x, y + tick_len)], line))?;
        let text = format_tick(tick);
        label_height = label_height.max(root.estimate_text_size(&text, &font)?.1 as i32);
        root.draw(&Text::new(
            text,
            (x, label_top),
            font.pos(Pos::new(HPos::Center, VPos::Top)),
        ))?;
    }
    let caption_top = label_top + label_height + style.label_pad_px.round() as i32;
    root.draw(&Text::new(
        axis.label.clone(),
        (rect.x_at(0.5).round() as i32, caption_top),
        font.pos(Pos::new(HPos::Center, VPos::Top)),
    ))?;
    Ok(())
}
fn draw_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &StackFigure,
    rect: &PixelRect,
) -> Result<(), StackPlotError>
where
    DB::ErrorType: 'static,
{
    let style = &figure.style;
    let bar = &figure.colorbar;
    let ((x0, y0), (x1, y1)) = rect.corners();
    let steps = 256;
    for i in 0..steps {
        let lower = rect.bottom() - rect.height * i as f64 / steps as f64;
        let upper = rect.bottom() - rect.height * (i + 1) as f64 / steps as f64;
        let color = figure.colormap.at((i as f64 + 0.5) / steps as f64);
        root.draw(&Rectangle::new(
            [(x0, upper.round() as i32), (x1, lower.round() as i32)],
            color.filled(),
        ))?;
    }
    let line = BLACK.stroke_width(style.axis_line_px.round().max(1.0) as u32);
    root.draw(&Rectangle::new([(x0, y0), (x1, y1)], line))?;
    let font = ("sans-serif", style.font_px).into_font().color(&BLACK);
    let tick_len = style.tick_len_px.round() as i32;
    let label_left = x1 + tick_len + style.tick_pad_px.round() as i32;
    let budget = tick_budget(rect.height, style.font_px * 2.0);
    let mut label_width = 0;
    for tick in visible_ticks(&nice_ticks(bar.limits, budget), bar.limits) {
        let fraction = if bar.limits.is_degenerate() {
            0.0
        } else {
            (tick - bar.limits.lo) / bar.limits.span()
        };
        let y = (rect.bottom() - fraction * rect.height).round() as i32;
        root.draw(&PathElement::new(vec![(x1, y), (x1 + tick_len, y)], line))?;
        let text = format_tick(tick);
        label_width = label_width.max(root.estimate_text_size(&text, &font)?.0 as i32);
        root.draw(&Text::new(
            text,
            (label_left, y),
            font.pos(Pos::new(HPos::Left, VPos::Center)),
        ))?;
    }
    let caption_left = label_left + label_width + style.label_pad_px.round() as i32;
    root.draw(&Text::new(
        bar.label.clone(),
        (caption_left, ((y0 + y1) / 2)),
        font.transform(FontTransform::Rotate270)
            .pos(Pos::new(HPos::Center, VPos::Top)),
    ))?;
    Ok(())
}
/// Render into an in-memory PDF document.
#[cfg(test)]
pub fn render_pdf(figure: &StackFigure) -> Result<Vec<u8>, StackPlotError> {
    let mut buffer = Vec::new();
    {
        let root = PdfBackend::with_buffer(&mut buffer, figure.style.size_px, figure.style.dpi)
            .tight(TIGHT_PAD_IN)
            .with_title(figure.title_text())
            .into_drawing_area();
        render_figure(&root, figure)?;
        root.present()?;
    }
    Ok(buffer)
}
/// Render and write the PDF to `path`, cropped to the drawn content.
pub fn save_pdf(figure: &StackFigure, path: &Path) -> Result<(), StackPlotError> {
    let root = PdfBackend::new(path, figure.style.size_px, figure.style.dpi)
        .tight(TIGHT_PAD_IN)
        .with_title(figure.title_text())
        .into_drawing_area();
    render_figure(&root, figure)?;
    root.present()?;
    log::info!("saved {}", path.display());
    Ok(())
}
