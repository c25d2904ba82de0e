//! CSS-style color strings as they appear in snapshots (`color`, `backgroundColor`, sticker tint).

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{ClipstackError, ClipstackResult};

/// A straight-alpha sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha, 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Opaque color from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()`, `hsl()`, `hsla()`,
    /// `transparent` and a handful of named colors.
    pub fn parse(s: &str) -> ClipstackResult<Self> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        if let Some(hex) = lower.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| invalid(s));
        }
        if let Some(args) = func_args(&lower, "rgba").or_else(|| func_args(&lower, "rgb")) {
            return parse_rgb_args(args).ok_or_else(|| invalid(s));
        }
        if let Some(args) = func_args(&lower, "hsla").or_else(|| func_args(&lower, "hsl")) {
            return parse_hsl_args(args).ok_or_else(|| invalid(s));
        }
        named(&lower).ok_or_else(|| invalid(s))
    }

    /// `true` when fully transparent.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Premultiplied form for compositing.
    pub fn to_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }

    /// Straight `[r, g, b, a]`.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// `#rrggbb` for SVG `fill` attributes; alpha goes through [`Color::svg_opacity`].
    pub fn svg_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as an SVG opacity in `0..=1`.
    pub fn svg_opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

fn invalid(s: &str) -> ClipstackError {
    ClipstackError::validation(format!("unrecognized color \"{s}\""))
}

fn parse_hex(hex: &str) -> Option<Color> {
    fn nibble(c: u8) -> Option<u8> {
        (c as char).to_digit(16).map(|d| (d as u8) * 17)
    }
    fn byte(pair: &str) -> Option<u8> {
        u8::from_str_radix(pair, 16).ok()
    }

    if !hex.is_ascii() {
        return None;
    }
    let b = hex.as_bytes();
    match hex.len() {
        3 | 4 => Some(Color {
            r: nibble(b[0])?,
            g: nibble(b[1])?,
            b: nibble(b[2])?,
            a: if hex.len() == 4 { nibble(b[3])? } else { 255 },
        }),
        6 | 8 => Some(Color {
            r: byte(&hex[0..2])?,
            g: byte(&hex[2..4])?,
            b: byte(&hex[4..6])?,
            a: if hex.len() == 8 { byte(&hex[6..8])? } else { 255 },
        }),
        _ => None,
    }
}

fn func_args<'a>(s: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let inner = s.strip_prefix(name)?.trim_start().strip_prefix('(')?;
    let inner = inner.strip_suffix(')')?;
    Some(
        inner
            .split([',', ' ', '/'])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect(),
    )
}

fn unit_f64(part: &str) -> Option<f64> {
    let v = match part.strip_suffix('%') {
        Some(p) => p.parse::<f64>().ok()? / 100.0,
        None => part.parse::<f64>().ok()?,
    };
    v.is_finite().then_some(v.clamp(0.0, 1.0))
}

fn alpha_arg(parts: &[&str]) -> Option<u8> {
    match parts.get(3) {
        Some(p) => Some(to_u8(unit_f64(p)?)),
        None => Some(255),
    }
}

fn to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_rgb_args(parts: Vec<&str>) -> Option<Color> {
    if !(3..=4).contains(&parts.len()) {
        return None;
    }
    let channel = |p: &str| -> Option<u8> {
        match p.strip_suffix('%') {
            Some(pct) => Some(to_u8(pct.parse::<f64>().ok()? / 100.0)),
            None => {
                let v = p.parse::<f64>().ok()?;
                v.is_finite().then(|| v.clamp(0.0, 255.0).round() as u8)
            }
        }
    };
    Some(Color {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a: alpha_arg(&parts)?,
    })
}

fn parse_hsl_args(parts: Vec<&str>) -> Option<Color> {
    if !(3..=4).contains(&parts.len()) {
        return None;
    }
    let h = parts[0].trim_end_matches("deg").parse::<f64>().ok()?;
    if !h.is_finite() {
        return None;
    }
    let s = unit_f64(parts[1])?;
    let l = unit_f64(parts[2])?;
    let (r, g, b) = hsl_to_rgb(h, s, l);
    Some(Color {
        r: to_u8(r),
        g: to_u8(g),
        b: to_u8(b),
        a: alpha_arg(&parts)?,
    })
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = h.rem_euclid(360.0) / 360.0;
    if s == 0.0 {
        return (l, l, l);
    }

    fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

fn named(s: &str) -> Option<Color> {
    Some(match s {
        "transparent" => Color::TRANSPARENT,
        "black" => Color::rgb(0, 0, 0),
        "white" => Color::rgb(255, 255, 255),
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "lime" => Color::rgb(0, 255, 0),
        "blue" => Color::rgb(0, 0, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "cyan" | "aqua" => Color::rgb(0, 255, 255),
        "magenta" | "fuchsia" => Color::rgb(255, 0, 255),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "orange" => Color::rgb(255, 165, 0),
        "purple" => Color::rgb(128, 0, 128),
        _ => return None,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
