// src/preview.rs
use eframe::egui;
use egui::{Color32, RichText, Rounding, Stroke, Vec2};
use egui_plot::{Line, LineStyle, Plot, PlotBounds, PlotPoints, Points, VLine};
use plotters::style::RGBColor;
use crate::drivers::ticks::{format_tick, nice_ticks, visible_ticks};
use crate::drivers::{Panel, StackFigure, StackPlotError};
/// Whether an interactive window can be opened at all.
pub fn display_available() -> bool {
    if cfg!(target_os = "linux") {
        std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
    } else {
        true
    }
}
/// Block until the preview window is closed.
pub fn show(figure: &StackFigure) -> Result<(), StackPlotError> {
    let (w, h) = figure.style.size_px;
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([w as f32, h as f32])
        .with_title(figure.title_text());
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let app = PreviewApp {
        figure: figure.clone(),
    };
    eframe::run_native(
        "colored-stack-plot",
        options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|e| StackPlotError::Display(e.to_string()))
}
fn color32(c: RGBColor) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}
struct PreviewApp {
    figure: StackFigure,
}
impl PreviewApp {
    fn title(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            for fragment in &self.figure.title {
                let mut text = RichText::new(&fragment.text)
                    .size(fragment.size_px as f32)
                    .color(color32(fragment.color));
                if fragment.bold {
                    text = text.strong();
                }
                ui.label(text);
            }
        });
    }
    fn colorbar(&self, ui: &mut egui::Ui) {
        let bar = &self.figure.colorbar;
        let height = ui.available_height() * bar.shrink as f32;
        let size = Vec2::new(height / 20.0, height);
        ui.add_space((ui.available_height() - height) / 2.0);
        ui.horizontal(|ui| {
            let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
            let rect = response.rect;
            let steps = 128;
            for i in 0..steps {
                let lower = rect.bottom() - rect.height() * i as f32 / steps as f32;
                let upper = rect.bottom() - rect.height() * (i + 1) as f32 / steps as f32;
                let strip = egui::Rect::from_x_y_ranges(rect.x_range(), upper..=lower);
                let color = self.figure.colormap.at((i as f64 + 0.5) / steps as f64);
                painter.rect_filled(strip, Rounding::ZERO, color32(color));
            }
            painter.rect_stroke(rect, Rounding::ZERO, Stroke::new(1.0, Color32::BLACK));
            ui.vertical(|ui| {
                let ticks = visible_ticks(&nice_ticks(bar.limits, 6), bar.limits);
                for tick in ticks.iter().rev() {
                    ui.label(format_tick(*tick));
                }
                ui.label(RichText::new(&bar.label).strong());
            });
        });
    }
    fn panel(&self, ui: &mut egui::Ui, panel: &Panel, height: f32) {
        let figure = &self.figure;
        let bottom = panel.axis.is_some();
        Plot::new(("panel", panel.channel))
            .height(height)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .show_axes([bottom, false])
            .show_grid(false)
            .show_x(false)
            .show_y(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [panel.x_limits.lo, panel.y_limits.lo],
                    [panel.x_limits.hi, panel.y_limits.hi],
                ));
                // One point series per colour bin keeps the draw calls bounded.
                let mut bins: Vec<Vec<[f64; 2]>> = vec![Vec::new(); 256];
                for (t, v) in crate::drivers::plot::visible_points(panel) {
                    bins[figure.colormap.bin_for(v, figure.color_limits)].push([t, v]);
                }
                for (bin, points) in bins.into_iter().enumerate() {
                    if points.is_empty() {
                        continue;
                    }
                    plot_ui.points(
                        Points::new(points)
                            .radius(figure.style.marker_radius_px as f32)
                            .color(color32(figure.colormap.bin_color(bin))),
                    );
                }
                let half = panel.y_limits.span() * figure.style.event_tick_px / 2.0
                    / height.max(1.0) as f64;
                for marker in panel.markers.iter().filter(|m| m.visible) {
                    plot_ui.line(
                        Line::new(PlotPoints::new(vec![
                            [marker.x, marker.y - half],
                            [marker.x, marker.y + half],
                        ]))
                        .color(color32(marker.color))
                        .width(figure.style.event_tick_width_px as f32),
                    );
                }
                if figure.reference_line.is_some() {
                    plot_ui.vline(
                        VLine::new(0.0)
                            .color(Color32::BLACK)
                            .width(figure.style.reference_width_px as f32)
                            .style(LineStyle::dashed_dense()),
                    );
                }
            });
    }
}
impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::light());
        egui::TopBottomPanel::top("title").show(ctx, |ui| self.title(ui));
        egui::SidePanel::right("colorbar")
            .resizable(false)
            .show(ctx, |ui| self.colorbar(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = 0.0;
            let count = self.figure.panels.len().max(1) as f32;
            let height = ui.available_height() / count;
            for panel in &self.figure.panels {
                self.panel(ui, panel, height);
            }
        });
    }
}
