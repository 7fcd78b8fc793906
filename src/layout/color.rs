use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ColorStopSpec;

use super::LayoutError;

/// RGBA color with floating point channels: `r`, `g`, `b` in 0..=255 and `a` in
/// 0..=1. Channels are not rounded so interpolation stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parses a CSS color: `#rgb`, `#rrggbb`, `rgb()`, `rgba()` or a common
    /// color keyword.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Self::parse_functional(args);
        }
        Self::parse_named(&lower)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).ok().map(f32::from);
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])? * 17.0;
                let g = channel(&hex[1..2])? * 17.0;
                let b = channel(&hex[2..3])? * 17.0;
                Some(Self::rgb(r, g, b))
            }
            6 => {
                let r = channel(&hex[0..2])?;
                let g = channel(&hex[2..4])?;
                let b = channel(&hex[4..6])?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    fn parse_functional(args: &str) -> Option<Self> {
        let parts: Vec<f32> = args
            .split(',')
            .map(|part| part.trim().parse::<f32>().ok())
            .collect::<Option<Vec<_>>>()?;
        let in_range = |v: f32| (0.0..=255.0).contains(&v);
        match parts.as_slice() {
            [r, g, b] if in_range(*r) && in_range(*g) && in_range(*b) => {
                Some(Self::rgb(*r, *g, *b))
            }
            [r, g, b, a] if in_range(*r) && in_range(*g) && in_range(*b) => {
                Some(Self::rgba(*r, *g, *b, a.clamp(0.0, 1.0)))
            }
            _ => None,
        }
    }

    fn parse_named(name: &str) -> Option<Self> {
        let (r, g, b): (u8, u8, u8) = match name {
            "black" => (0, 0, 0),
            "white" => (255, 255, 255),
            "red" => (255, 0, 0),
            "green" => (0, 128, 0),
            "blue" => (0, 0, 255),
            "yellow" => (255, 255, 0),
            "cyan" | "aqua" => (0, 255, 255),
            "magenta" | "fuchsia" => (255, 0, 255),
            "orange" => (255, 165, 0),
            "purple" => (128, 0, 128),
            "pink" => (255, 192, 203),
            "brown" => (165, 42, 42),
            "gray" | "grey" => (128, 128, 128),
            "lightgray" | "lightgrey" => (211, 211, 211),
            "darkgray" | "darkgrey" => (169, 169, 169),
            "lime" => (0, 255, 0),
            "navy" => (0, 0, 128),
            "teal" => (0, 128, 128),
            "olive" => (128, 128, 0),
            "maroon" => (128, 0, 0),
            "silver" => (192, 192, 192),
            "coral" => (255, 127, 80),
            "salmon" => (250, 128, 114),
            "gold" => (255, 215, 0),
            "indigo" => (75, 0, 130),
            "violet" => (238, 130, 238),
            "crimson" => (220, 20, 60),
            "turquoise" => (64, 224, 208),
            "tomato" => (255, 99, 71),
            "darkgreen" => (0, 100, 0),
            "lightgreen" => (144, 238, 144),
            "steelblue" => (70, 130, 180),
            _ => return None,
        };
        Some(Self::rgb(f32::from(r), f32::from(g), f32::from(b)))
    }

    /// Channel-wise linear blend; `t` outside 0..=1 is clamped.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    pub fn to_css(&self) -> String {
        let r = self.r.round().clamp(0.0, 255.0) as u8;
        let g = self.g.round().clamp(0.0, 255.0) as u8;
        let b = self.b.round().clamp(0.0, 255.0) as u8;
        if self.a >= 1.0 {
            format!("rgb({r}, {g}, {b})")
        } else {
            format!("rgba({r}, {g}, {b}, {})", self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub value: f32,
    pub color: Color,
}

/// Piecewise-linear map from a value domain to colors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorScale {
    stops: Vec<ColorStop>,
}

impl ColorScale {
    pub fn new(stops: Vec<ColorStop>) -> Result<Self, LayoutError> {
        if stops.len() < 2 {
            return Err(LayoutError::InvalidConfig(format!(
                "color scale needs at least 2 stops, got {}",
                stops.len()
            )));
        }
        if let Some(stop) = stops.iter().find(|stop| !stop.value.is_finite()) {
            return Err(LayoutError::InvalidConfig(format!(
                "color stop {} is not finite",
                stop.value
            )));
        }
        if let Some(pair) = stops.windows(2).find(|pair| pair[1].value <= pair[0].value) {
            return Err(LayoutError::InvalidConfig(format!(
                "color stops must be strictly increasing ({} then {})",
                pair[0].value, pair[1].value
            )));
        }
        Ok(Self { stops })
    }

    pub fn from_specs(specs: &[ColorStopSpec]) -> Result<Self, LayoutError> {
        let stops = specs
            .iter()
            .map(|spec| {
                Color::parse(&spec.color)
                    .map(|color| ColorStop {
                        value: spec.value,
                        color,
                    })
                    .ok_or_else(|| {
                        LayoutError::InvalidConfig(format!("unrecognized color \"{}\"", spec.color))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(stops)
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn domain(&self) -> (f32, f32) {
        // `new` guarantees at least two stops.
        (self.stops[0].value, self.stops[self.stops.len() - 1].value)
    }

    pub fn evaluate(&self, value: f32) -> Color {
        let first = &self.stops[0];
        let last = &self.stops[self.stops.len() - 1];
        if value.is_nan() || value <= first.value {
            return first.color;
        }
        if value >= last.value {
            return last.color;
        }
        // First stop strictly greater than `value`; 1..len by the checks above.
        let upper = self.stops.partition_point(|stop| stop.value <= value);
        let lo = &self.stops[upper - 1];
        if lo.value == value {
            return lo.color;
        }
        let hi = &self.stops[upper];
        let t = (value - lo.value) / (hi.value - lo.value);
        lo.color.lerp(hi.color, t)
    }

    /// Gradient offsets in 0..=1, proportional to the spacing of the stops.
    pub fn gradient_offsets(&self) -> Vec<(f32, Color)> {
        let (min, max) = self.domain();
        let span = max - min;
        self.stops
            .iter()
            .map(|stop| ((stop.value - min) / span, stop.color))
            .collect()
    }
}
