use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use crate::drivers::StackPlotError;
/// Rendered size of a piece of text, in backend pixels.
///
/// Title fragments are laid out one after another, so every placement after
/// the first depends on this measurement of its predecessor.
pub trait MeasureText {
    fn text_extent(&self, text: &str, style: &TextStyle) -> Result<(u32, u32), StackPlotError>;
}
impl<DB: DrawingBackend> MeasureText for DrawingArea<DB, Shift>
where
    DB::ErrorType: 'static,
{
    fn text_extent(&self, text: &str, style: &TextStyle) -> Result<(u32, u32), StackPlotError> {
        Ok(self.estimate_text_size(text, style)?)
    }
}
#[derive(Clone, Debug, PartialEq)]
pub struct TitleFragment {
    pub text: String,
    pub color: RGBColor,
    pub bold: bool,
    pub size_px: f64,
}
impl TitleFragment {
    pub fn plain(text: impl Into<String>, size_px: f64) -> Self {
        Self {
            text: text.into(),
            color: BLACK,
            bold: false,
            size_px,
        }
    }
    pub fn glyph(text: impl Into<String>, color: RGBColor, size_px: f64) -> Self {
        Self {
            text: text.into(),
            color,
            bold: true,
            size_px,
        }
    }
    pub fn style(&self) -> TextStyle<'static> {
        let weight = if self.bold {
            FontStyle::Bold
        } else {
            FontStyle::Normal
        };
        ("sans-serif", self.size_px, weight)
            .into_font()
            .color(&self.color)
            .pos(Pos::new(HPos::Center, VPos::Bottom))
    }
}
/// A fragment pinned to figure pixels: horizontally centred on `center_x`,
/// bottom edge on `bottom_y`.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedFragment {
    pub fragment: TitleFragment,
    pub center_x: f64,
    pub bottom_y: f64,
    pub width: f64,
}
impl PlacedFragment {
    pub fn right_edge(&self) -> f64 {
        self.center_x + self.width / 2.0
    }
}
/// Place fragments left to right: the first centred at `x_fraction` of the
/// figure width, each next one centred on the previous right edge.
pub fn compose_title<M: MeasureText>(
    fragments: &[TitleFragment],
    figure_px: (u32, u32),
    x_fraction: f64,
    y_fraction: f64,
    measure: &M,
) -> Result<Vec<PlacedFragment>, StackPlotError> {
    let (width, height) = (figure_px.0 as f64, figure_px.1 as f64);
    let bottom_y = height * (1.0 - y_fraction);
    let mut placed: Vec<PlacedFragment> = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        let (text_width, _) = measure.text_extent(&fragment.text, &fragment.style())?;
        let center_x = placed
            .last()
            .map(PlacedFragment::right_edge)
            .unwrap_or(width * x_fraction);
        placed.push(PlacedFragment {
            fragment: fragment.clone(),
            center_x,
            bottom_y,
            width: text_width as f64,
        });
    }
    Ok(placed)
}
pub fn draw_title<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    placed: &[PlacedFragment],
) -> Result<(), StackPlotError>
where
    DB::ErrorType: 'static,
{
    for part in placed {
        area.draw(&Text::new(
            part.fragment.text.clone(),
            (part.center_x.round() as i32, part.bottom_y.round() as i32),
            part.fragment.style(),
        ))?;
    }
    Ok(())
}
