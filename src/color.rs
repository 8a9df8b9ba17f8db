//! Color-space conversions and photometric math.
//!
//! Pure, stateless functions: RGB ↔ HSL, RGB → CIE L\*a\*b\* (D65),
//! relative luminance and WCAG contrast ratios, CIE76 perceptual
//! distance, and dichromacy simulation.  Everything here is
//! deterministic and allocation-free.

use std::fmt;
use std::str::FromStr;

use rgb::RGB8;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// A color in the HSL cylinder: `h` ∈ \[0, 360), `s` and `l` ∈ \[0, 1\].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// A color in CIE L\*a\*b\* with a D65 white point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// An sRGB color whose canonical external representation is an
/// uppercase `#RRGGBB` string (no alpha).
///
/// `Display`, `FromStr` and serde all use the hex form; parsing rejects
/// anything that is not exactly `#` followed by six hex digits with
/// [`Error::InvalidColor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexColor(pub RGB8);

impl HexColor {
    pub const BLACK: HexColor = HexColor::new(0, 0, 0);
    pub const WHITE: HexColor = HexColor::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        HexColor(RGB8 { r, g, b })
    }

    #[inline]
    pub fn rgb(self) -> RGB8 {
        self.0
    }

    #[inline]
    pub fn hsl(self) -> Hsl {
        rgb_to_hsl(self.0)
    }

    #[inline]
    pub fn lab(self) -> Lab {
        rgb_to_lab(self.0)
    }

    /// WCAG relative luminance of the color, in \[0, 1\].
    #[inline]
    pub fn luminance(self) -> f64 {
        relative_luminance(self.0)
    }

    /// WCAG contrast ratio against `other`, in \[1, 21\].  Symmetric.
    #[inline]
    pub fn contrast_ratio(self, other: HexColor) -> f64 {
        contrast_ratio(self.0, other.0)
    }

    /// Shifts HSL lightness by `delta` percentage points, clamped to
    /// \[0, 100\].  The sole primitive for contrast-sensitive
    /// lighten/darken operations.
    pub fn lighten(self, delta: f64) -> HexColor {
        let mut hsl = self.hsl();
        hsl.l = ((hsl.l * 100. + delta).clamp(0., 100.)) / 100.;
        HexColor(hsl_to_rgb(hsl))
    }

    /// Coarse additive tint: adds `delta` to every RGB channel, clamped
    /// to \[0, 255\].  Only suitable for Material container/fixed tone
    /// derivations that carry no contrast contract; anything
    /// contrast-sensitive goes through [`HexColor::lighten`].
    pub fn tint(self, delta: i16) -> HexColor {
        let shift = |c: u8| (c as i32 + delta as i32).clamp(0, 255) as u8;
        HexColor::new(shift(self.0.r), shift(self.0.g), shift(self.0.b))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0.r, self.0.g, self.0.b)
    }
}

impl FromStr for HexColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidColor(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(HexColor::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Converts an RGB color to HSL.
pub fn rgb_to_hsl(c: RGB8) -> Hsl {
    let r = c.r as f64 / 255.;
    let g = c.g as f64 / 255.;
    let b = c.b as f64 / 255.;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.;
    if max == min {
        return Hsl { h: 0., s: 0., l }; // achromatic
    }
    let d = max - min;
    let s = if l > 0.5 { d / (2. - max - min) } else { d / (max + min) };
    let h = if max == r {
        60. * ((g - b) / d).rem_euclid(6.)
    } else if max == g {
        60. * ((b - r) / d + 2.)
    } else {
        60. * ((r - g) / d + 4.)
    };
    Hsl { h: h.rem_euclid(360.), s, l }
}

/// Converts an HSL color back to RGB.  Round-trips [`rgb_to_hsl`]
/// within ±1 per channel.
pub fn hsl_to_rgb(hsl: Hsl) -> RGB8 {
    let Hsl { h, s, l } = hsl;
    if s == 0. {
        let v = (l * 255.).round().clamp(0., 255.) as u8;
        return RGB8 { r: v, g: v, b: v };
    }
    let q = if l < 0.5 { l * (1. + s) } else { l + s - l * s };
    let p = 2. * l - q;
    let hue = |t: f64| {
        let t = t.rem_euclid(1.);
        if t < 1. / 6. {
            p + (q - p) * 6. * t
        } else if t < 0.5 {
            q
        } else if t < 2. / 3. {
            p + (q - p) * (2. / 3. - t) * 6.
        } else {
            p
        }
    };
    let h = h / 360.;
    let to_u8 = |v: f64| (v * 255.).round().clamp(0., 255.) as u8;
    RGB8 {
        r: to_u8(hue(h + 1. / 3.)),
        g: to_u8(hue(h)),
        b: to_u8(hue(h - 1. / 3.)),
    }
}

/// sRGB gamma decode of a single channel in \[0, 1\].
#[inline]
fn srgb_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// CIE linear/cubic-root threshold for the L\*a\*b\* transfer function.
const LAB_EPS: f64 = 0.008856;

/// Converts an RGB color to CIE L\*a\*b\* via linear sRGB → XYZ (D65).
pub fn rgb_to_lab(c: RGB8) -> Lab {
    let r = srgb_linear(c.r as f64 / 255.);
    let g = srgb_linear(c.g as f64 / 255.);
    let b = srgb_linear(c.b as f64 / 255.);
    // XYZ scaled by the D65 reference white.
    let x = (0.4124 * r + 0.3576 * g + 0.1805 * b) / 0.95047;
    let y = 0.2126 * r + 0.7152 * g + 0.0722 * b;
    let z = (0.0193 * r + 0.1192 * g + 0.9505 * b) / 1.08883;
    let f = |t: f64| {
        if t > LAB_EPS {
            t.cbrt()
        } else {
            7.787 * t + 16. / 116.
        }
    };
    let (fx, fy, fz) = (f(x), f(y), f(z));
    Lab {
        l: 116. * fy - 16.,
        a: 500. * (fx - fy),
        b: 200. * (fy - fz),
    }
}

/// CIE76 perceptual distance: Euclidean distance in L\*a\*b\*.
#[inline]
pub fn delta_e(a: Lab, b: Lab) -> f64 {
    ((a.l - b.l).powi(2) + (a.a - b.a).powi(2) + (a.b - b.b).powi(2)).sqrt()
}

/// WCAG relative luminance, in \[0, 1\].
pub fn relative_luminance(c: RGB8) -> f64 {
    let r = srgb_linear(c.r as f64 / 255.);
    let g = srgb_linear(c.g as f64 / 255.);
    let b = srgb_linear(c.b as f64 / 255.);
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// WCAG contrast ratio `(L₁ + 0.05) / (L₂ + 0.05)` with L₁ the lighter
/// luminance.  Symmetric, range \[1, 21\].
pub fn contrast_ratio(a: RGB8, b: RGB8) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}

/// Circular distance between two hue angles, in \[0, 180\].
pub fn hue_delta(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % 360.;
    d.min(360. - d)
}

/// Plain Euclidean distance in RGB space.  Not perceptual; used only to
/// compare distances before and after dichromacy simulation.
#[inline]
pub fn rgb_distance(a: RGB8, b: RGB8) -> f64 {
    let dr = a.r as f64 - b.r as f64;
    let dg = a.g as f64 - b.g as f64;
    let db = a.b as f64 - b.b as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// A form of color-vision deficiency in which one cone type is absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dichromacy {
    Protanopia,
    Deuteranopia,
    Tritanopia,
}

impl Dichromacy {
    pub const ALL: [Dichromacy; 3] =
        [Dichromacy::Protanopia, Dichromacy::Deuteranopia, Dichromacy::Tritanopia];

    pub fn name(self) -> &'static str {
        match self {
            Dichromacy::Protanopia => "protanopia",
            Dichromacy::Deuteranopia => "deuteranopia",
            Dichromacy::Tritanopia => "tritanopia",
        }
    }

    // Vienot/Brettel-style linear approximations.
    fn matrix(self) -> [[f64; 3]; 3] {
        match self {
            Dichromacy::Protanopia => [
                [0.567, 0.433, 0.],
                [0.558, 0.442, 0.],
                [0., 0.242, 0.758],
            ],
            Dichromacy::Deuteranopia => [
                [0.625, 0.375, 0.],
                [0.7, 0.3, 0.],
                [0., 0.3, 0.7],
            ],
            Dichromacy::Tritanopia => [
                [0.95, 0.05, 0.],
                [0., 0.433, 0.567],
                [0., 0.475, 0.525],
            ],
        }
    }
}

/// Approximates how `c` appears under a given dichromacy by a fixed
/// 3×3 linear transform, channels clamped to \[0, 255\].
pub fn simulate_dichromacy(c: RGB8, ty: Dichromacy) -> RGB8 {
    let m = ty.matrix();
    let v = [c.r as f64, c.g as f64, c.b as f64];
    let row = |r: [f64; 3]| {
        (r[0] * v[0] + r[1] * v[1] + r[2] * v[2]).round().clamp(0., 255.) as u8
    };
    RGB8 { r: row(m[0]), g: row(m[1]), b: row(m[2]) }
}

/// Quick black-or-white pick by YIQ-weighted brightness (threshold
/// 128).  For one-shot decisions only; contrast-critical choices use
/// [`optimal_text_color`].
pub fn contrast_color(c: HexColor) -> HexColor {
    let RGB8 { r, g, b } = c.0;
    let yiq = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
    if yiq >= 128 { HexColor::BLACK } else { HexColor::WHITE }
}

/// Whichever of pure black and pure white has the higher WCAG contrast
/// ratio against `bg`.
pub fn optimal_text_color(bg: HexColor) -> HexColor {
    if bg.contrast_ratio(HexColor::BLACK) >= bg.contrast_ratio(HexColor::WHITE) {
        HexColor::BLACK
    } else {
        HexColor::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_round_trip() {
        for r in (0..=255).step_by(15) {
            for g in (0..=255).step_by(15) {
                for b in (0..=255).step_by(15) {
                    let c = RGB8 { r: r as u8, g: g as u8, b: b as u8 };
                    let back = hsl_to_rgb(rgb_to_hsl(c));
                    assert!(
                        (c.r as i16 - back.r as i16).abs() <= 1
                            && (c.g as i16 - back.g as i16).abs() <= 1
                            && (c.b as i16 - back.b as i16).abs() <= 1,
                        "{:?} ≉ {:?}",
                        c,
                        back
                    );
                }
            }
        }
    }

    #[test]
    fn contrast_symmetric() {
        let a = RGB8 { r: 99, g: 102, b: 241 };
        let b = RGB8 { r: 16, g: 185, b: 129 };
        assert_eq!(contrast_ratio(a, b), contrast_ratio(b, a));
    }

    #[test]
    fn contrast_bounds() {
        let black = RGB8 { r: 0, g: 0, b: 0 };
        let white = RGB8 { r: 255, g: 255, b: 255 };
        assert!((contrast_ratio(black, white) - 21.).abs() < 1e-9);
        for c in [black, white, RGB8 { r: 99, g: 102, b: 241 }] {
            assert!((contrast_ratio(c, c) - 1.).abs() < 1e-12);
        }
    }

    #[test]
    fn lab_of_white_and_black() {
        let white = rgb_to_lab(RGB8 { r: 255, g: 255, b: 255 });
        assert!((white.l - 100.).abs() < 0.1, "L* of white = {}", white.l);
        assert!(white.a.abs() < 0.5 && white.b.abs() < 0.5);
        let black = rgb_to_lab(RGB8 { r: 0, g: 0, b: 0 });
        assert!(black.l.abs() < 0.1);
    }

    #[test]
    fn delta_e_is_a_metric_on_endpoints() {
        let a = rgb_to_lab(RGB8 { r: 255, g: 0, b: 0 });
        let b = rgb_to_lab(RGB8 { r: 0, g: 255, b: 0 });
        assert_eq!(delta_e(a, a), 0.);
        assert!(delta_e(a, b) > 80., "red/green should be far apart");
    }

    #[test]
    fn hex_parse_and_display() {
        let c: HexColor = "#6366F1".parse().unwrap();
        assert_eq!(c, HexColor::new(0x63, 0x66, 0xF1));
        assert_eq!(c.to_string(), "#6366F1");
        let lower: HexColor = "#6366f1".parse().unwrap();
        assert_eq!(lower, c);
        for bad in ["6366F1", "#6366F", "#6366F1A", "#GG66F1", "", "#"] {
            assert!(matches!(bad.parse::<HexColor>(), Err(Error::InvalidColor(_))), "{bad:?}");
        }
    }

    #[test]
    fn hex_serde_round_trip() {
        let c = HexColor::new(16, 185, 129);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#10B981\"");
        let back: HexColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn lighten_clamps() {
        let c = HexColor::new(99, 102, 241);
        assert_eq!(c.lighten(200.), HexColor::WHITE);
        assert_eq!(c.lighten(-200.), HexColor::BLACK);
        let up = c.lighten(10.).hsl().l;
        assert!((up - (c.hsl().l + 0.10)).abs() < 0.01);
    }

    #[test]
    fn tint_clamps_channels() {
        assert_eq!(HexColor::new(200, 10, 128).tint(80), HexColor::new(255, 90, 208));
        assert_eq!(HexColor::new(40, 10, 128).tint(-60), HexColor::new(0, 0, 68));
    }

    #[test]
    fn red_green_collapse_under_deuteranopia() {
        let red = simulate_dichromacy(RGB8 { r: 255, g: 0, b: 0 }, Dichromacy::Deuteranopia);
        let green = simulate_dichromacy(RGB8 { r: 0, g: 255, b: 0 }, Dichromacy::Deuteranopia);
        let before = rgb_distance(RGB8 { r: 255, g: 0, b: 0 }, RGB8 { r: 0, g: 255, b: 0 });
        let after = rgb_distance(red, green);
        assert!(after / before < 0.4, "ratio = {}", after / before);
    }

    #[test]
    fn contrast_color_flips_at_yiq_128() {
        // #808080 has YIQ brightness exactly 128, the first black pick.
        assert_eq!(contrast_color(HexColor::new(0x80, 0x80, 0x80)), HexColor::BLACK);
        assert_eq!(contrast_color(HexColor::new(0x7F, 0x7F, 0x7F)), HexColor::WHITE);
        assert_eq!(contrast_color(HexColor::new(0x10, 0x10, 0x10)), HexColor::WHITE);
        assert_eq!(contrast_color(HexColor::WHITE), HexColor::BLACK);
        // Channel weights are YIQ, not a plain mean: saturated green
        // reads bright, saturated blue reads dark.
        assert_eq!(contrast_color(HexColor::new(0, 255, 0)), HexColor::BLACK);
        assert_eq!(contrast_color(HexColor::new(0, 0, 255)), HexColor::WHITE);
    }

    #[test]
    fn optimal_text_color_on_brand_blue() {
        // #6366F1 sits almost exactly between: black wins by a hair.
        let bg = HexColor::new(0x63, 0x66, 0xF1);
        let fg = optimal_text_color(bg);
        assert!(bg.contrast_ratio(fg) >= 4.5);
    }
}
