use plotters::style::RGBColor;
use crate::drivers::range::AxisLimits;
use crate::drivers::StackPlotError;
const LUT_SIZE: usize = 256;
/// Moreland's diverging blue-white-red map.
const COOLWARM: &[(f64, (u8, u8, u8))] = &[
    (0.0, (59, 76, 192)),
    (0.0625, (77, 104, 215)),
    (0.125, (98, 130, 234)),
    (0.1875, (119, 154, 247)),
    (0.25, (141, 176, 254)),
    (0.3125, (163, 194, 255)),
    (0.375, (184, 208, 249)),
    (0.4375, (204, 217, 238)),
    (0.5, (221, 221, 221)),
    (0.5625, (236, 211, 197)),
    (0.625, (245, 196, 173)),
    (0.6875, (247, 177, 148)),
    (0.75, (244, 154, 123)),
    (0.8125, (236, 127, 99)),
    (0.875, (222, 96, 77)),
    (0.9375, (203, 62, 56)),
    (1.0, (180, 4, 38)),
];
const BWR: &[(f64, (u8, u8, u8))] = &[
    (0.0, (0, 0, 255)),
    (0.5, (255, 255, 255)),
    (1.0, (255, 0, 0)),
];
const SEISMIC: &[(f64, (u8, u8, u8))] = &[
    (0.0, (0, 0, 77)),
    (0.25, (0, 0, 255)),
    (0.5, (255, 255, 255)),
    (0.75, (255, 0, 0)),
    (1.0, (128, 0, 0)),
];
enum Ramp {
    Stops(&'static [(f64, (u8, u8, u8))]),
    Gradient(colorous::Gradient),
    /// Sampled end to start.
    Reversed(colorous::Gradient),
}
impl Ramp {
    fn at(&self, x: f64) -> RGBColor {
        match self {
            Ramp::Stops(stops) => interpolate(stops, x),
            Ramp::Gradient(gradient) => from_colorous(gradient.eval_continuous(x)),
            Ramp::Reversed(gradient) => from_colorous(gradient.eval_continuous(1.0 - x)),
        }
    }
}
/// Named colour lookup table with linear normalisation.
#[derive(Clone, Debug)]
pub struct ColorMap {
    lut: Vec<RGBColor>,
}
impl ColorMap {
    pub fn from_name(name: &str) -> Result<Self, StackPlotError> {
        let ramp = match name {
            "coolwarm" => Ramp::Stops(COOLWARM),
            "bwr" => Ramp::Stops(BWR),
            "seismic" => Ramp::Stops(SEISMIC),
            "viridis" => Ramp::Gradient(colorous::VIRIDIS),
            // Greys runs white to black.
            "gray" | "grey" => Ramp::Reversed(colorous::GREYS),
            other => return Err(StackPlotError::UnknownColormap(other.to_string())),
        };
        let lut = (0..LUT_SIZE)
            .map(|i| ramp.at(i as f64 / (LUT_SIZE - 1) as f64))
            .collect();
        Ok(Self { lut })
    }
    /// Colour at a normalised position; out-of-range values clamp to the ends.
    pub fn at(&self, fraction: f64) -> RGBColor {
        let idx = if fraction.is_nan() {
            0
        } else {
            ((fraction * LUT_SIZE as f64).floor().max(0.0) as usize).min(LUT_SIZE - 1)
        };
        self.lut[idx]
    }
    /// Colour for `value` scaled between `limits`. A zero-width range maps everything to 0.
    pub fn color_for(&self, value: f64, limits: AxisLimits) -> RGBColor {
        self.at(normalize(value, limits))
    }
    /// Index into the lookup table, used to bucket points of the same colour.
    pub fn bin_for(&self, value: f64, limits: AxisLimits) -> usize {
        let fraction = normalize(value, limits);
        ((fraction * LUT_SIZE as f64).floor().max(0.0) as usize).min(LUT_SIZE - 1)
    }
    pub fn bin_color(&self, bin: usize) -> RGBColor {
        self.lut[bin.min(LUT_SIZE - 1)]
    }
}
pub fn normalize(value: f64, limits: AxisLimits) -> f64 {
    if limits.is_degenerate() {
        0.0
    } else {
        ((value - limits.lo) / limits.span()).clamp(0.0, 1.0)
    }
}
/// Parse `#rrggbb`.
pub fn parse_hex_color(text: &str) -> Result<RGBColor, StackPlotError> {
    let invalid = || StackPlotError::InvalidColor(text.to_string());
    let hex = text.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
    };
    Ok(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
fn from_colorous(color: colorous::Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}
fn interpolate(stops: &[(f64, (u8, u8, u8))], x: f64) -> RGBColor {
    let upper = stops
        .iter()
        .position(|(pos, _)| *pos >= x)
        .unwrap_or(stops.len() - 1);
    if upper == 0 {
        let (_, (r, g, b)) = stops[0];
        return RGBColor(r, g, b);
    }
    let (p0, c0) = stops[upper - 1];
    let (p1, c1) = stops[upper];
    let t = if p1 > p0 { (x - p0) / (p1 - p0) } else { 0.0 };
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(lerp(c0.0, c1.0), lerp(c0.1, c1.1), lerp(c0.2, c1.2))
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn every_listed_name_resolves() {
        for name in ["coolwarm", "bwr", "seismic", "viridis", "gray", "grey"] {
            assert!(ColorMap::from_name(name).is_ok(), "{name}");
        }
        assert!(matches!(
            ColorMap::from_name("jet"),
            Err(StackPlotError::UnknownColormap(_))
        ));
    }
    #[test]
    fn coolwarm_endpoints_and_midpoint() {
        let map = ColorMap::from_name("coolwarm").unwrap();
        let limits = AxisLimits::symmetric(10.0);
        assert_eq!(map.color_for(-10.0, limits), RGBColor(59, 76, 192));
        assert_eq!(map.color_for(10.0, limits), RGBColor(180, 4, 38));
        assert_eq!(map.color_for(50.0, limits), RGBColor(180, 4, 38));
        let mid = map.color_for(0.0, limits);
        assert!(mid.0 > 200 && mid.1 > 200 && mid.2 > 190);
    }
    #[test]
    fn degenerate_limits_map_to_bottom() {
        let map = ColorMap::from_name("bwr").unwrap();
        let limits = AxisLimits::symmetric(0.0);
        assert_eq!(map.color_for(0.0, limits), RGBColor(0, 0, 255));
        assert_eq!(map.bin_for(3.0, limits), 0);
    }
    #[test]
    fn bins_cover_the_table() {
        let map = ColorMap::from_name("gray").unwrap();
        let limits = AxisLimits::new(0.0, 1.0);
        assert_eq!(map.bin_for(0.0, limits), 0);
        assert_eq!(map.bin_for(1.0, limits), 255);
    }
    fn close(a: RGBColor, b: RGBColor) -> bool {
        let near = |x: u8, y: u8| (x as i16 - y as i16).abs() <= 2;
        near(a.0, b.0) && near(a.1, b.1) && near(a.2, b.2)
    }
    #[test]
    fn gray_runs_black_to_white() {
        let map = ColorMap::from_name("gray").unwrap();
        assert!(close(map.bin_color(0), RGBColor(0, 0, 0)));
        assert!(close(map.bin_color(255), RGBColor(255, 255, 255)));
        let mid = map.bin_color(128);
        assert_eq!(mid.0, mid.1);
        assert_eq!(mid.1, mid.2);
        assert!(map.bin_color(64).0 < mid.0 && mid.0 < map.bin_color(192).0);
    }
    #[test]
    fn viridis_runs_purple_to_yellow() {
        let map = ColorMap::from_name("viridis").unwrap();
        assert!(close(map.bin_color(0), RGBColor(68, 1, 84)));
        assert!(close(map.bin_color(255), RGBColor(253, 231, 37)));
    }
    #[test]
    fn hex_colours() {
        assert_eq!(parse_hex_color("#31a354").unwrap(), RGBColor(0x31, 0xa3, 0x54));
        assert!(parse_hex_color("31a354").is_err());
        assert!(parse_hex_color("#31a35").is_err());
        assert!(parse_hex_color("#zzzzzz").is_err());
    }
}
