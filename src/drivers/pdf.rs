// src/drivers/pdf.rs
use std::f64::consts::{FRAC_PI_2, PI};
use std::fs;
use std::io;
use std::path::PathBuf;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use plotters_backend::text_anchor::{HPos, Pos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontStyle, FontTransform,
};
/// Helvetica ascender and descender, per 1000 units of font size.
const ASCENT: f64 = 718.0;
const DESCENT: f64 = 207.0;
/// Cubic Bezier handle length for a quarter circle.
const KAPPA: f64 = 0.552_284_749_8;
const FALLBACK_WIDTH: u16 = 556;
// Standard 14 advance widths for ' '..='~'.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, 1015, 667, 667, 722, 722, 667,
    611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667,
    667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500,
    222, 833, 556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, 975, 722, 722, 722, 722, 667,
    611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667,
    667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556,
    278, 889, 611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
}
impl Face {
    fn resource(self) -> Name<'static> {
        match self {
            Face::Regular => Name(b"F1"),
            Face::Bold => Name(b"F2"),
        }
    }
    fn from_style(style: FontStyle) -> Self {
        match style {
            FontStyle::Bold => Face::Bold,
            _ => Face::Regular,
        }
    }
    /// Advance width of `text` at `size`.
    fn text_width(self, text: &str, size: f64) -> f64 {
        let table = match self {
            Face::Regular => &HELVETICA_WIDTHS,
            Face::Bold => &HELVETICA_BOLD_WIDTHS,
        };
        let units: u32 = text
            .chars()
            .map(|c| match c {
                ' '..='~' => table[c as usize - 32] as u32,
                _ => FALLBACK_WIDTH as u32,
            })
            .sum();
        units as f64 * size / 1000.0
    }
}
/// Offset from the anchor point to the text origin (baseline start), y up.
fn anchor_offset(anchor: Pos, width: f64, size: f64) -> (f64, f64) {
    let (ascent, descent) = (ASCENT * size / 1000.0, DESCENT * size / 1000.0);
    let dx = match anchor.h_pos {
        HPos::Left => 0.0,
        HPos::Center => -width / 2.0,
        HPos::Right => -width,
    };
    let dy = match anchor.v_pos {
        VPos::Top => -ascent,
        VPos::Center => -(ascent - descent) / 2.0,
        VPos::Bottom => descent,
    };
    (dx, dy)
}
/// WinAnsi bytes for the standard fonts; unmappable characters become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{a0}'..='\u{ff}' => c as u8,
            _ => b'?',
        })
        .collect()
}
/// Bounding box of everything drawn, in backend pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Extent {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}
enum Target<'a> {
    File(PathBuf),
    #[cfg_attr(not(test), allow(dead_code))]
    Buffer(&'a mut Vec<u8>),
}
/// Single-page PDF output for plotters. Pixels become points at `72 / dpi`,
/// text uses the standard Helvetica faces so nothing is embedded.
pub struct PdfBackend<'a> {
    target: Target<'a>,
    size: (u32, u32),
    /// Points per backend pixel.
    scale: f64,
    content: Content,
    extent: Option<Extent>,
    tight_pad_in: Option<f64>,
    title: Option<String>,
}
impl PdfBackend<'static> {
    /// Write to `path` on `present()`.
    pub fn new(path: impl Into<PathBuf>, size: (u32, u32), dpi: f64) -> Self {
        Self::with_target(Target::File(path.into()), size, dpi)
    }
}
impl<'a> PdfBackend<'a> {
    /// Replace the contents of `buffer` on `present()`.
    #[cfg(test)]
    pub fn with_buffer(buffer: &'a mut Vec<u8>, size: (u32, u32), dpi: f64) -> Self {
        Self::with_target(Target::Buffer(buffer), size, dpi)
    }
    fn with_target(target: Target<'a>, size: (u32, u32), dpi: f64) -> Self {
        Self {
            target,
            size,
            scale: 72.0 / dpi,
            content: Content::new(),
            extent: None,
            tight_pad_in: None,
            title: None,
        }
    }
    /// Crop the page to the drawn content plus `pad_in` inches.
    pub fn tight(mut self, pad_in: f64) -> Self {
        self.tight_pad_in = Some(pad_in);
        self
    }
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
    /// Backend pixel to PDF point.
    fn pt(&self, (x, y): (f64, f64)) -> (f32, f32) {
        (
            (x * self.scale) as f32,
            ((self.size.1 as f64 - y) * self.scale) as f32,
        )
    }
    fn touch(&mut self, x: f64, y: f64, pad: f64) {
        let next = Extent {
            min_x: x - pad,
            min_y: y - pad,
            max_x: x + pad,
            max_y: y + pad,
        };
        self.extent = Some(match self.extent {
            None => next,
            Some(e) => Extent {
                min_x: e.min_x.min(next.min_x),
                min_y: e.min_y.min(next.min_y),
                max_x: e.max_x.max(next.max_x),
                max_y: e.max_y.max(next.max_y),
            },
        });
    }
    fn set_stroke(&mut self, color: BackendColor, width: u32) {
        let (r, g, b) = rgb_unit(color);
        self.content
            .set_stroke_rgb(r, g, b)
            .set_line_width((width as f64 * self.scale) as f32);
    }
    fn set_fill(&mut self, color: BackendColor) {
        let (r, g, b) = rgb_unit(color);
        self.content.set_fill_rgb(r, g, b);
    }
    fn trace(&mut self, points: &[(f64, f64)]) {
        let Some((&first, rest)) = points.split_first() else {
            return;
        };
        let (x, y) = self.pt(first);
        self.content.move_to(x, y);
        for &p in rest {
            let (x, y) = self.pt(p);
            self.content.line_to(x, y);
        }
    }
    /// Whole page, or the drawn extent plus padding when cropping.
    pub fn page_box(&self) -> Rect {
        let (w, h) = (
            (self.size.0 as f64 * self.scale) as f32,
            (self.size.1 as f64 * self.scale) as f32,
        );
        match (self.tight_pad_in, self.extent) {
            (Some(pad_in), Some(e)) => {
                let pad = (pad_in * 72.0) as f32;
                let (x0, y0) = self.pt((e.min_x, e.max_y));
                let (x1, y1) = self.pt((e.max_x, e.min_y));
                Rect::new(x0 - pad, y0 - pad, x1 + pad, y1 + pad)
            }
            _ => Rect::new(0.0, 0.0, w, h),
        }
    }
    fn document(&mut self) -> Vec<u8> {
        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let page_id = Ref::new(3);
        let regular_id = Ref::new(4);
        let bold_id = Ref::new(5);
        let content_id = Ref::new(6);
        let info_id = Ref::new(7);
        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id).kids([page_id]).count(1);
        let mut page = pdf.page(page_id);
        page.media_box(self.page_box());
        page.parent(pages_id);
        page.contents(content_id);
        page.resources()
            .fonts()
            .pair(Face::Regular.resource(), regular_id)
            .pair(Face::Bold.resource(), bold_id);
        page.finish();
        pdf.type1_font(regular_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        let content = std::mem::replace(&mut self.content, Content::new()).finish();
        pdf.stream(content_id, &content);
        let mut info = pdf.document_info(info_id);
        info.producer(TextStr("colored-stack-plot"));
        if let Some(title) = &self.title {
            info.title(TextStr(title));
        }
        info.finish();
        pdf.finish()
    }
}
impl<'a> DrawingBackend for PdfBackend<'a> {
    type ErrorType = io::Error;
    fn get_size(&self) -> (u32, u32) {
        self.size
    }
    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<io::Error>> {
        Ok(())
    }
    fn present(&mut self) -> Result<(), DrawingErrorKind<io::Error>> {
        let bytes = self.document();
        match &mut self.target {
            Target::File(path) => fs::write(path, bytes).map_err(DrawingErrorKind::DrawingError),
            Target::Buffer(buffer) => {
                **buffer = bytes;
                Ok(())
            }
        }
    }
    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if color.alpha == 0.0 {
            return Ok(());
        }
        self.draw_rect(point, point, &color, true)
    }
    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        self.draw_path([from, to], style)
    }
    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        let color = style.color();
        if color.alpha == 0.0 {
            return Ok(());
        }
        let (x0, y0) = (upper_left.0 as f64, upper_left.1 as f64);
        // Filled pixel rectangles are inclusive of their far edge.
        let grow = if fill { 1.0 } else { 0.0 };
        let (x1, y1) = (bottom_right.0 as f64 + grow, bottom_right.1 as f64 + grow);
        let (px, py) = self.pt((x0, y1));
        let (w, h) = (
            ((x1 - x0) * self.scale) as f32,
            ((y1 - y0) * self.scale) as f32,
        );
        let pad = if fill {
            self.set_fill(color);
            self.content.rect(px, py, w, h).fill_nonzero();
            0.0
        } else {
            self.set_stroke(color, style.stroke_width());
            self.content.rect(px, py, w, h).stroke();
            style.stroke_width() as f64 / 2.0
        };
        self.touch(x0, y0, pad);
        self.touch(x1, y1, pad);
        Ok(())
    }
    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        let color = style.color();
        let points: Vec<(f64, f64)> = path
            .into_iter()
            .map(|(x, y)| (x as f64, y as f64))
            .collect();
        if color.alpha == 0.0 || points.len() < 2 {
            return Ok(());
        }
        let width = style.stroke_width();
        self.set_stroke(color, width);
        self.trace(&points);
        self.content.stroke();
        for (x, y) in points {
            self.touch(x, y, width as f64 / 2.0);
        }
        Ok(())
    }
    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        let color = style.color();
        if color.alpha == 0.0 {
            return Ok(());
        }
        let (cx, cy) = self.pt((center.0 as f64, center.1 as f64));
        let r = (radius as f64 * self.scale) as f32;
        let k = r * KAPPA as f32;
        if fill {
            self.set_fill(color);
        } else {
            self.set_stroke(color, style.stroke_width());
        }
        self.content
            .move_to(cx + r, cy)
            .cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r)
            .cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy)
            .cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r)
            .cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
        if fill {
            self.content.fill_nonzero();
        } else {
            self.content.stroke();
        }
        let pad = radius as f64 + if fill { 0.0 } else { style.stroke_width() as f64 / 2.0 };
        self.touch(center.0 as f64, center.1 as f64, pad);
        Ok(())
    }
    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        let color = style.color();
        let points: Vec<(f64, f64)> = vert
            .into_iter()
            .map(|(x, y)| (x as f64, y as f64))
            .collect();
        if color.alpha == 0.0 || points.len() < 3 {
            return Ok(());
        }
        self.set_fill(color);
        self.trace(&points);
        self.content.close_path().fill_nonzero();
        for (x, y) in points {
            self.touch(x, y, 0.0);
        }
        Ok(())
    }
    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        let color = style.color();
        if color.alpha == 0.0 || text.is_empty() {
            return Ok(());
        }
        let face = Face::from_style(style.style());
        let size = style.size();
        let width = face.text_width(text, size);
        let (tx, ty) = anchor_offset(style.anchor(), width, size);
        let angle = match style.transform() {
            FontTransform::Rotate90 => -FRAC_PI_2,
            FontTransform::Rotate180 => PI,
            FontTransform::Rotate270 => FRAC_PI_2,
            _ => 0.0,
        };
        let (sin, cos) = angle.sin_cos();
        let rotate = |dx: f64, dy: f64| (dx * cos - dy * sin, dx * sin + dy * cos);
        // Text space is scaled to points with y up.
        let anchor = self.pt((pos.0 as f64, pos.1 as f64));
        let (ox, oy) = rotate(tx * self.scale, ty * self.scale);
        let origin = (anchor.0 as f64 + ox, anchor.1 as f64 + oy);
        self.set_fill(color);
        self.content
            .begin_text()
            .set_font(face.resource(), (size * self.scale) as f32)
            .set_text_matrix([
                cos as f32,
                sin as f32,
                -sin as f32,
                cos as f32,
                origin.0 as f32,
                origin.1 as f32,
            ])
            .show(Str(&win_ansi(text)))
            .end_text();
        let descent = DESCENT * size / 1000.0;
        let ascent = ASCENT * size / 1000.0;
        for (dx, dy) in [(0.0, -descent), (width, -descent), (0.0, ascent), (width, ascent)] {
            let (rx, ry) = rotate(dx * self.scale, dy * self.scale);
            let x = (origin.0 + rx) / self.scale;
            let y = self.size.1 as f64 - (origin.1 + ry) / self.scale;
            self.touch(x, y, 0.0);
        }
        Ok(())
    }
    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<io::Error>> {
        let face = Face::from_style(style.style());
        let size = style.size();
        let width = face.text_width(text, size);
        let height = (ASCENT + DESCENT) * size / 1000.0;
        Ok((width.round() as u32, height.round() as u32))
    }
}
fn rgb_unit(color: BackendColor) -> (f32, f32, f32) {
    let (r, g, b) = color.rgb;
    (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}
#[cfg(test)]
mod tests {
    use super::*;
    use plotters::prelude::*;
    fn render<F>(size: (u32, u32), draw: F) -> Vec<u8>
    where
        F: FnOnce(&DrawingArea<PdfBackend<'_>, plotters::coord::Shift>),
    {
        let mut buffer = Vec::new();
        {
            let root = PdfBackend::with_buffer(&mut buffer, size, 72.0).into_drawing_area();
            draw(&root);
            root.present().unwrap();
        }
        buffer
    }
    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }
    #[test]
    fn empty_page_is_a_complete_document() {
        let pdf = text(&render((200, 100), |_| {}));
        assert!(pdf.starts_with("%PDF-"));
        assert!(pdf.contains("/Helvetica-Bold"));
        assert!(pdf.contains("/WinAnsiEncoding"));
        assert!(pdf.contains("colored-stack-plot"));
        assert!(pdf.contains("%%EOF"));
    }
    #[test]
    fn text_lands_in_the_content_stream() {
        let pdf = text(&render((300, 100), |root| {
            let style = ("sans-serif", 12.0).into_font().color(&BLACK);
            root.draw(&Text::new("Voltage", (10, 50), style)).unwrap();
        }));
        assert!(pdf.contains("(Voltage) Tj"));
        assert!(pdf.contains("BT"));
    }
    #[test]
    fn bold_style_selects_the_bold_face() {
        assert_eq!(Face::from_style(FontStyle::Bold), Face::Bold);
        assert_eq!(Face::from_style(FontStyle::Normal), Face::Regular);
        // "ii" is 2 x 278 units in the bold face and 2 x 222 in the regular one.
        assert!((Face::Bold.text_width("ii", 100.0) - 55.6).abs() < 1e-9);
        assert!((Face::Regular.text_width("ii", 100.0) - 44.4).abs() < 1e-9);
    }
    #[test]
    fn measured_size_follows_helvetica_metrics() {
        let mut buffer = Vec::new();
        let root = PdfBackend::with_buffer(&mut buffer, (100, 100), 72.0).into_drawing_area();
        let style = ("sans-serif", 10.0).into_font().color(&BLACK);
        // "Hi" = 722 + 222 units, height = 718 + 207 units.
        let (w, h) = root.estimate_text_size("Hi", &style).unwrap();
        assert_eq!(w, 9);
        assert_eq!(h, 9);
    }
    #[test]
    fn centred_bottom_anchor_shifts_by_half_width_and_descent() {
        let (dx, dy) = anchor_offset(Pos::new(HPos::Center, VPos::Bottom), 9.44, 10.0);
        assert!((dx + 4.72).abs() < 1e-9);
        assert!((dy - 2.07).abs() < 1e-9);
        let (dx, dy) = anchor_offset(Pos::new(HPos::Left, VPos::Top), 9.44, 10.0);
        assert_eq!(dx, 0.0);
        assert!((dy + 7.18).abs() < 1e-9);
    }
    #[test]
    fn non_latin_characters_fall_back() {
        assert_eq!(win_ansi("a\u{e9}\u{3bc}"), vec![b'a', 0xe9, b'?']);
    }
    #[test]
    fn tight_box_hugs_the_drawing() {
        let mut buffer = Vec::new();
        let mut backend = PdfBackend::with_buffer(&mut buffer, (400, 400), 72.0).tight(0.0);
        let fill = BackendColor {
            alpha: 1.0,
            rgb: (0, 0, 255),
        };
        backend.draw_rect((100, 100), (199, 149), &fill, true).unwrap();
        // Pixels 100..=199 x 100..=149 at 72 dpi, y flipped against a 400 pt page.
        let page = backend.page_box();
        assert_eq!((page.x1, page.y1, page.x2, page.y2), (100.0, 250.0, 200.0, 300.0));
    }
    #[test]
    fn untouched_page_keeps_full_size() {
        let mut buffer = Vec::new();
        let backend = PdfBackend::with_buffer(&mut buffer, (200, 100), 144.0).tight(0.1);
        let page = backend.page_box();
        assert_eq!((page.x1, page.y1, page.x2, page.y2), (0.0, 0.0, 100.0, 50.0));
    }
    #[test]
    fn file_target_writes_only_on_present() {
        let path = std::env::temp_dir().join(format!(
            "colored-stack-plot-pdf-test-{}.pdf",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        {
            let root = PdfBackend::new(&path, (10, 10), 72.0).into_drawing_area();
            root.draw(&Circle::new((5, 5), 2, BLACK.filled())).unwrap();
            assert!(!path.exists());
            root.present().unwrap();
        }
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        fs::remove_file(&path).unwrap();
    }
}
