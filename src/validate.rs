//! WCAG accessibility validation and auto-fix.
//!
//! Checks a fixed list of (background, foreground) role pairs against
//! the WCAG AA/AAA thresholds, scores brand harmony, palette efficiency
//! and color-blindness distinguishability, and can repair failing pairs
//! by binary search over HSL lightness.
//!
//! Validation never fails outright: a report full of low scores is
//! still a valid result.

use std::collections::HashSet;

use lazy_static::lazy_static;
use serde::Serialize;
use tracing::{debug, trace};

use crate::color::{
    hue_delta, optimal_text_color, rgb_distance, simulate_dichromacy, Dichromacy, HexColor,
};
use crate::scheme::{RoleKey, ThemeColors};

/// WCAG conformance level for one text size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WcagLevel {
    Aaa,
    Aa,
    Fail,
}

impl WcagLevel {
    /// Classification for normal-size text: AAA ≥ 7, AA ≥ 4.5.
    pub fn normal_text(ratio: f64) -> Self {
        if ratio >= 7. {
            WcagLevel::Aaa
        } else if ratio >= 4.5 {
            WcagLevel::Aa
        } else {
            WcagLevel::Fail
        }
    }

    /// Classification for large text: AAA ≥ 4.5, AA ≥ 3.  Same ratio,
    /// different thresholds — the two must never be conflated.
    pub fn large_text(ratio: f64) -> Self {
        if ratio >= 4.5 {
            WcagLevel::Aaa
        } else if ratio >= 3. {
            WcagLevel::Aa
        } else {
            WcagLevel::Fail
        }
    }
}

/// Which part of the scheme a validated pair belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PairCategory {
    Core,
    Container,
    Surface,
    Inverse,
    Fixed,
}

/// How badly a dichromacy collapses a role pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Critical,
}

/// Hue relationship of the brand triplet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Harmony {
    Monochromatic,
    Analogous,
    Triadic,
    #[serde(rename = "Split-Complementary")]
    SplitComplementary,
    Complementary,
    Custom,
}

impl Harmony {
    pub fn label(self) -> &'static str {
        match self {
            Harmony::Monochromatic => "Monochromatic",
            Harmony::Analogous => "Analogous",
            Harmony::Triadic => "Triadic",
            Harmony::SplitComplementary => "Split-Complementary",
            Harmony::Complementary => "Complementary",
            Harmony::Custom => "Custom",
        }
    }

    fn base_score(self) -> f64 {
        match self {
            Harmony::Monochromatic => 95.,
            Harmony::Analogous => 98.,
            Harmony::Triadic => 95.,
            Harmony::SplitComplementary => 92.,
            Harmony::Complementary => 90.,
            Harmony::Custom => 80.,
        }
    }
}

/// One checked (background, foreground) role pair.  The ratio is
/// recomputed fresh on every validation, never cached across scheme
/// mutation.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRow {
    pub pair: &'static str,
    pub bg: HexColor,
    pub fg: HexColor,
    pub bg_key: RoleKey,
    pub fg_key: RoleKey,
    pub ratio: f64,
    pub level: WcagLevel,
    pub large_text_level: WcagLevel,
    pub category: PairCategory,
}

/// Pass/fail tallies for one text-size classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PassCounts {
    pub aaa: usize,
    pub aa: usize,
    pub fail: usize,
}

impl PassCounts {
    fn add(&mut self, level: WcagLevel) {
        match level {
            WcagLevel::Aaa => self.aaa += 1,
            WcagLevel::Aa => self.aa += 1,
            WcagLevel::Fail => self.fail += 1,
        }
    }
}

/// One role pair under a simulated dichromacy.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedPair {
    pub pair: &'static str,
    pub severity: Severity,
    /// `simulatedDistance / originalDistance` in RGB space.
    pub ratio: f64,
}

/// Distinguishability under one dichromacy type, 0–100.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorBlindnessResult {
    pub dichromacy: Dichromacy,
    pub score: f64,
    pub pairs: Vec<AffectedPair>,
}

/// Aggregate validation report.  A pure function's output; owns no
/// references back into the scheme it was computed from.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeValidationReport {
    /// Overall contrast score from the normal-text classification.
    pub score: u8,
    pub brand_consistency: f64,
    pub palette_efficiency: f64,
    pub color_blindness: f64,
    pub harmony: Harmony,
    pub results: Vec<ValidationRow>,
    pub color_blindness_results: Vec<ColorBlindnessResult>,
    pub normal_text: PassCounts,
    pub large_text: PassCounts,
}

struct PairSpec {
    name: &'static str,
    bg: RoleKey,
    fg: RoleKey,
    category: PairCategory,
}

const fn pair(
    name: &'static str,
    bg: RoleKey,
    fg: RoleKey,
    category: PairCategory,
) -> PairSpec {
    PairSpec { name, bg, fg, category }
}

lazy_static! {
    /// The fixed pair list: 4 core, 4 container, 8 surface, 2 inverse
    /// and up to 6 fixed-tier pairs (skipped when the tier is absent).
    static ref VALIDATION_PAIRS: Vec<PairSpec> = {
        use PairCategory::{Container, Core, Fixed, Inverse, Surface as Surf};
        use RoleKey::*;
        vec![
            pair("Primary / On Primary", Primary, OnPrimary, Core),
            pair("Secondary / On Secondary", Secondary, OnSecondary, Core),
            pair("Tertiary / On Tertiary", Tertiary, OnTertiary, Core),
            pair("Error / On Error", Error, OnError, Core),
            pair("Primary Container / On Primary Container",
                 PrimaryContainer, OnPrimaryContainer, Container),
            pair("Secondary Container / On Secondary Container",
                 SecondaryContainer, OnSecondaryContainer, Container),
            pair("Tertiary Container / On Tertiary Container",
                 TertiaryContainer, OnTertiaryContainer, Container),
            pair("Error Container / On Error Container",
                 ErrorContainer, OnErrorContainer, Container),
            pair("Surface / On Surface", Surface, OnSurface, Surf),
            pair("Surface / On Surface Variant", Surface, OnSurfaceVariant, Surf),
            pair("Surface Dim / On Surface", SurfaceDim, OnSurface, Surf),
            pair("Surface Bright / On Surface", SurfaceBright, OnSurface, Surf),
            pair("Surface Container Low / On Surface",
                 SurfaceContainerLow, OnSurface, Surf),
            pair("Surface Container / On Surface", SurfaceContainer, OnSurface, Surf),
            pair("Surface Container High / On Surface",
                 SurfaceContainerHigh, OnSurface, Surf),
            pair("Surface Container Highest / On Surface",
                 SurfaceContainerHighest, OnSurface, Surf),
            pair("Inverse Surface / Inverse On Surface",
                 InverseSurface, InverseOnSurface, Inverse),
            pair("Inverse Surface / Inverse Primary",
                 InverseSurface, InversePrimary, Inverse),
            pair("Primary Fixed / On Primary Fixed", PrimaryFixed, OnPrimaryFixed, Fixed),
            pair("Primary Fixed Dim / On Primary Fixed Variant",
                 PrimaryFixedDim, OnPrimaryFixedVariant, Fixed),
            pair("Secondary Fixed / On Secondary Fixed",
                 SecondaryFixed, OnSecondaryFixed, Fixed),
            pair("Secondary Fixed Dim / On Secondary Fixed Variant",
                 SecondaryFixedDim, OnSecondaryFixedVariant, Fixed),
            pair("Tertiary Fixed / On Tertiary Fixed",
                 TertiaryFixed, OnTertiaryFixed, Fixed),
            pair("Tertiary Fixed Dim / On Tertiary Fixed Variant",
                 TertiaryFixedDim, OnTertiaryFixedVariant, Fixed),
        ]
    };
}

/// The five role pairs checked under each dichromacy.  Tertiary vs
/// error stands in for a success-vs-error check.
const COLOR_BLIND_PAIRS: [(&str, RoleKey, RoleKey); 5] = [
    ("Primary vs Secondary", RoleKey::Primary, RoleKey::Secondary),
    ("Primary vs Error", RoleKey::Primary, RoleKey::Error),
    ("Secondary vs Tertiary", RoleKey::Secondary, RoleKey::Tertiary),
    ("Tertiary vs Error", RoleKey::Tertiary, RoleKey::Error),
    ("Primary vs Tertiary", RoleKey::Primary, RoleKey::Tertiary),
];

/// Validates a scheme and produces the full report.  Deterministic and
/// pure; `is_dark` only annotates the log output.
pub fn validate(scheme: &ThemeColors, is_dark: bool) -> ThemeValidationReport {
    let mut results = Vec::with_capacity(VALIDATION_PAIRS.len());
    let mut normal_text = PassCounts::default();
    let mut large_text = PassCounts::default();
    for spec in VALIDATION_PAIRS.iter() {
        // Skip cleanly when either role is absent (optional fixed tier).
        let (Some(bg), Some(fg)) = (scheme.get(spec.bg), scheme.get(spec.fg)) else {
            continue;
        };
        let ratio = bg.contrast_ratio(fg);
        let level = WcagLevel::normal_text(ratio);
        let large = WcagLevel::large_text(ratio);
        normal_text.add(level);
        large_text.add(large);
        if level == WcagLevel::Fail {
            trace!(pair = spec.name, ratio, "contrast below AA");
        }
        results.push(ValidationRow {
            pair: spec.name,
            bg,
            fg,
            bg_key: spec.bg,
            fg_key: spec.fg,
            ratio,
            level,
            large_text_level: large,
            category: spec.category,
        });
    }

    let total = results.len().max(1);
    let score = (100. * (normal_text.aaa as f64 + 0.75 * normal_text.aa as f64)
        / total as f64)
        .round() as u8;

    let (harmony, brand_consistency) = brand_harmony(scheme);
    let palette_efficiency = palette_efficiency(scheme);
    let color_blindness_results = color_blindness(scheme);
    let color_blindness = color_blindness_results.iter().map(|r| r.score).sum::<f64>()
        / color_blindness_results.len() as f64;

    debug!(
        is_dark,
        score,
        harmony = harmony.label(),
        failing = normal_text.fail,
        "validated scheme"
    );

    ThemeValidationReport {
        score,
        brand_consistency,
        palette_efficiency,
        color_blindness,
        harmony,
        results,
        color_blindness_results,
        normal_text,
        large_text,
    }
}

/// Classifies the brand triplet's hue relationship and scores it, with
/// a saturation-uniformity bonus in \[−10, +10\].
fn brand_harmony(scheme: &ThemeColors) -> (Harmony, f64) {
    let hsls = [scheme.primary.hsl(), scheme.secondary.hsl(), scheme.tertiary.hsl()];
    let deltas = [
        hue_delta(hsls[0].h, hsls[1].h),
        hue_delta(hsls[1].h, hsls[2].h),
        hue_delta(hsls[0].h, hsls[2].h),
    ];
    let mut sorted = deltas;
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    // Priority order matters: first match wins.
    let harmony = if deltas.iter().all(|&d| d < 15.) {
        Harmony::Monochromatic
    } else if sorted[2] < 90. && sorted[1] < 60. {
        Harmony::Analogous
    } else if deltas.iter().filter(|&&d| (100. ..=140.).contains(&d)).count() >= 2 {
        Harmony::Triadic
    } else if deltas.iter().any(|&d| (120. ..=180.).contains(&d)) {
        Harmony::SplitComplementary
    } else if deltas.iter().any(|&d| (160. ..=200.).contains(&d)) {
        Harmony::Complementary
    } else {
        Harmony::Custom
    };

    let sats: Vec<f64> = hsls.iter().map(|h| h.s * 100.).collect();
    let mean = sats.iter().sum::<f64>() / sats.len() as f64;
    let variance = sats.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / sats.len() as f64;
    let bonus = (10. - variance.sqrt() / 2.).clamp(-10., 10.);
    (harmony, (harmony.base_score() + bonus).clamp(0., 100.))
}

/// Palette-efficiency score.  The base is deliberately non-monotonic in
/// the uniqueness ratio: very high uniqueness (minimal redundancy) and
/// very low uniqueness (intentional reuse) both score above the
/// mid-band.  Near-duplicate brand hues cost 5 points per pair.
fn palette_efficiency(scheme: &ThemeColors) -> f64 {
    let values: Vec<HexColor> = RoleKey::ALL.iter().filter_map(|&k| scheme.get(k)).collect();
    let unique: HashSet<HexColor> = values.iter().copied().collect();
    let uniqueness = unique.len() as f64 / values.len() as f64;
    let mut score: f64 = if uniqueness > 0.9 {
        95.
    } else if uniqueness < 0.5 {
        90.
    } else {
        80.
    };

    let hues = [
        (scheme.primary, scheme.secondary),
        (scheme.secondary, scheme.tertiary),
        (scheme.primary, scheme.tertiary),
    ];
    for (a, b) in hues {
        let d = hue_delta(a.hsl().h, b.hsl().h);
        if d > 0. && d < 10. {
            score -= 5.; // redundant near-duplicate hues
        }
    }
    score.clamp(0., 100.)
}

/// Scores distinguishability under each dichromacy over the five fixed
/// role pairs, comparing RGB distances before and after simulation.
fn color_blindness(scheme: &ThemeColors) -> Vec<ColorBlindnessResult> {
    Dichromacy::ALL
        .iter()
        .map(|&ty| {
            let pairs: Vec<AffectedPair> = COLOR_BLIND_PAIRS
                .iter()
                .filter_map(|&(name, a_key, b_key)| {
                    let a = scheme.get(a_key)?.rgb();
                    let b = scheme.get(b_key)?.rgb();
                    let original = rgb_distance(a, b);
                    let simulated =
                        rgb_distance(simulate_dichromacy(a, ty), simulate_dichromacy(b, ty));
                    let ratio = if original == 0. { 1. } else { simulated / original };
                    let severity = if ratio >= 0.7 {
                        Severity::Ok
                    } else if ratio >= 0.4 {
                        Severity::Warning
                    } else {
                        Severity::Critical
                    };
                    Some(AffectedPair { pair: name, severity, ratio })
                })
                .collect();
            let score = pairs
                .iter()
                .map(|p| match p.severity {
                    Severity::Ok => 100.,
                    Severity::Warning => 60.,
                    Severity::Critical => 20.,
                })
                .sum::<f64>()
                / pairs.len().max(1) as f64;
            ColorBlindnessResult { dichromacy: ty, score, pairs }
        })
        .collect()
}

/// Binary-search iteration budget for [`fix_color`].
const FIX_ITERATIONS: usize = 10;

/// Finds the smallest lightness shift in the given direction (`+1`
/// lighten, `-1` darken) that reaches `target`, or `None` when even the
/// full shift falls short.
fn search_direction(fg: HexColor, bg: HexColor, target: f64, sign: f64) -> Option<HexColor> {
    if fg.lighten(sign * 100.).contrast_ratio(bg) < target {
        return None;
    }
    let mut lo = 0.;
    let mut hi = 100.;
    for _ in 0..FIX_ITERATIONS {
        let mid = (lo + hi) / 2.;
        if fg.lighten(sign * mid).contrast_ratio(bg) >= target {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Some(fg.lighten(sign * hi))
}

/// Repairs a foreground color until it reaches `target` contrast
/// against `bg`, preferring to lighten on dark backgrounds and darken
/// on light ones.  Falls back to pure black/white when neither
/// direction can reach the target; never returns a color with a lower
/// ratio than the input.
pub fn fix_color(fg: HexColor, bg: HexColor, target: f64) -> HexColor {
    if fg.contrast_ratio(bg) >= target {
        return fg;
    }
    let lightened = search_direction(fg, bg, target, 1.);
    let darkened = search_direction(fg, bg, target, -1.);
    let picked = if bg.hsl().l < 0.5 {
        lightened.or(darkened)
    } else {
        darkened.or(lightened)
    };
    let fixed = picked.unwrap_or_else(|| optimal_text_color(bg));
    trace!(from = %fg, to = %fixed, on = %bg, target, "fixed color");
    fixed
}

/// The 7 → 4.5 → forced-black/white degradation ladder for `on*` roles.
fn fix_on(fg: HexColor, bg: HexColor) -> HexColor {
    if fg.contrast_ratio(bg) >= 7. {
        return fg;
    }
    let c = fix_color(fg, bg, 7.);
    if c.contrast_ratio(bg) >= 7. {
        return c;
    }
    let c = fix_color(fg, bg, 4.5);
    if c.contrast_ratio(bg) >= 4.5 {
        return c;
    }
    optimal_text_color(bg)
}

/// Returns a value copy of the scheme with every failing pair repaired:
/// `on*` roles to ≥7:1 (degrading to ≥4.5:1, then to forced
/// black/white), and brand/status roles to ≥3:1 against the scheme's
/// surface.  Idempotent — re-running on an already fixed scheme changes
/// nothing.
pub fn fixed_theme(scheme: &ThemeColors) -> ThemeColors {
    let mut out = *scheme;
    let bg = out.surface;
    for slot in [
        &mut out.primary,
        &mut out.secondary,
        &mut out.tertiary,
        &mut out.error,
        &mut out.success,
        &mut out.warning,
        &mut out.info,
    ] {
        *slot = fix_color(*slot, bg, 3.);
    }

    out.on_primary = fix_on(out.on_primary, out.primary);
    out.on_secondary = fix_on(out.on_secondary, out.secondary);
    out.on_tertiary = fix_on(out.on_tertiary, out.tertiary);
    out.on_error = fix_on(out.on_error, out.error);
    out.on_primary_container = fix_on(out.on_primary_container, out.primary_container);
    out.on_secondary_container = fix_on(out.on_secondary_container, out.secondary_container);
    out.on_tertiary_container = fix_on(out.on_tertiary_container, out.tertiary_container);
    out.on_error_container = fix_on(out.on_error_container, out.error_container);
    out.on_surface = fix_on(out.on_surface, out.surface);
    out.on_surface_variant = fix_on(out.on_surface_variant, out.surface);
    out.inverse_on_surface = fix_on(out.inverse_on_surface, out.inverse_surface);
    if let Some(fixed) = out.fixed.as_mut() {
        fixed.on_primary_fixed = fix_on(fixed.on_primary_fixed, fixed.primary_fixed);
        fixed.on_primary_fixed_variant =
            fix_on(fixed.on_primary_fixed_variant, fixed.primary_fixed_dim);
        fixed.on_secondary_fixed = fix_on(fixed.on_secondary_fixed, fixed.secondary_fixed);
        fixed.on_secondary_fixed_variant =
            fix_on(fixed.on_secondary_fixed_variant, fixed.secondary_fixed_dim);
        fixed.on_tertiary_fixed = fix_on(fixed.on_tertiary_fixed, fixed.tertiary_fixed);
        fixed.on_tertiary_fixed_variant =
            fix_on(fixed.on_tertiary_fixed_variant, fixed.tertiary_fixed_dim);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::{derive_scheme, BaseColors, VariantKey};

    fn light_scheme(p: &str, s: &str, t: &str) -> ThemeColors {
        let base = BaseColors::from_hex(p, s, t).unwrap();
        derive_scheme(&base, &[VariantKey::Light])[&VariantKey::Light]
    }

    #[test]
    fn full_scheme_checks_twenty_four_pairs() {
        let scheme = light_scheme("#6366F1", "#EC4899", "#10B981");
        let report = validate(&scheme, false);
        assert_eq!(report.results.len(), 24);
        let total = report.normal_text.aaa + report.normal_text.aa + report.normal_text.fail;
        assert_eq!(total, 24);
    }

    #[test]
    fn fixed_tier_pairs_are_skipped_when_absent() {
        let mut scheme = light_scheme("#6366F1", "#EC4899", "#10B981");
        scheme.fixed = None;
        let report = validate(&scheme, false);
        assert_eq!(report.results.len(), 18);
        assert!(report.results.iter().all(|r| r.category != PairCategory::Fixed));
    }

    #[test]
    fn primary_on_primary_reads_at_aa() {
        let scheme = light_scheme("#6366F1", "#EC4899", "#10B981");
        let row = validate(&scheme, false)
            .results
            .into_iter()
            .find(|r| r.pair == "Primary / On Primary")
            .unwrap();
        assert!(row.fg == HexColor::WHITE || row.fg == HexColor::BLACK);
        assert!(row.ratio >= 4.5, "ratio = {}", row.ratio);
        assert_ne!(row.level, WcagLevel::Fail);
    }

    #[test]
    fn normal_and_large_classifications_differ() {
        // 3.5:1 passes large-text AA but fails normal text.
        let ratio = 3.5;
        assert_eq!(WcagLevel::normal_text(ratio), WcagLevel::Fail);
        assert_eq!(WcagLevel::large_text(ratio), WcagLevel::Aa);
        assert_eq!(WcagLevel::normal_text(7.), WcagLevel::Aaa);
        assert_eq!(WcagLevel::large_text(4.5), WcagLevel::Aaa);
    }

    #[test]
    fn pure_rgb_triplet_is_triadic() {
        let scheme = light_scheme("#FF0000", "#00FF00", "#0000FF");
        let report = validate(&scheme, false);
        assert_eq!(report.harmony, Harmony::Triadic);
        assert!(report.brand_consistency >= 90., "score = {}", report.brand_consistency);
    }

    #[test]
    fn red_green_brand_is_critical_for_red_green_blindness() {
        let scheme = light_scheme("#FF0000", "#00FF00", "#0000FF");
        let report = validate(&scheme, false);
        for ty in [Dichromacy::Deuteranopia, Dichromacy::Protanopia] {
            let result = report
                .color_blindness_results
                .iter()
                .find(|r| r.dichromacy == ty)
                .unwrap();
            let pair =
                result.pairs.iter().find(|p| p.pair == "Primary vs Secondary").unwrap();
            assert_eq!(pair.severity, Severity::Critical, "{}", ty.name());
        }
    }

    #[test]
    fn identical_roles_guard_division_by_zero() {
        let mut scheme = light_scheme("#6366F1", "#EC4899", "#10B981");
        scheme.secondary = scheme.primary;
        let report = validate(&scheme, false);
        let pair = report.color_blindness_results[0]
            .pairs
            .iter()
            .find(|p| p.pair == "Primary vs Secondary")
            .unwrap();
        assert_eq!(pair.ratio, 1.);
        assert_eq!(pair.severity, Severity::Ok);
    }

    #[test]
    fn near_duplicate_hues_cost_efficiency_points() {
        let distinct = validate(&light_scheme("#6366F1", "#EC4899", "#10B981"), false);
        let duplicated = validate(&light_scheme("#6366F1", "#6A66F1", "#10B981"), false);
        assert!(duplicated.palette_efficiency < distinct.palette_efficiency);
        for report in [&distinct, &duplicated] {
            assert!((0. ..=100.).contains(&report.palette_efficiency));
        }
    }

    #[test]
    fn harmony_serializes_as_display_label() {
        for harmony in [
            Harmony::Monochromatic,
            Harmony::Analogous,
            Harmony::Triadic,
            Harmony::SplitComplementary,
            Harmony::Complementary,
            Harmony::Custom,
        ] {
            let json = serde_json::to_value(harmony).unwrap();
            assert_eq!(json, harmony.label());
        }
    }

    #[test]
    fn fix_color_reaches_target_or_improves() {
        let bg = HexColor::new(0x88, 0x88, 0x88);
        let fg = HexColor::new(0x77, 0x77, 0x77);
        let before = fg.contrast_ratio(bg);
        let fixed = fix_color(fg, bg, 4.5);
        let after = fixed.contrast_ratio(bg);
        assert!(after >= before);
        assert!(after >= 4.5, "after = {after}");
        // Light background prefers darkening.
        assert!(fixed.hsl().l < fg.hsl().l);
    }

    #[test]
    fn fix_color_is_noop_when_already_passing() {
        let bg = HexColor::WHITE;
        let fg = HexColor::new(0x20, 0x20, 0x20);
        assert_eq!(fix_color(fg, bg, 7.), fg);
    }

    #[test]
    fn fix_color_falls_back_to_pure_text_color() {
        // Mid-gray background: 10:1 is unreachable in either direction.
        let bg = HexColor::new(0x80, 0x80, 0x80);
        let fg = HexColor::new(0x70, 0x70, 0x70);
        let fixed = fix_color(fg, bg, 10.);
        assert_eq!(fixed, optimal_text_color(bg));
    }

    #[test]
    fn fixed_theme_is_idempotent() {
        let scheme = light_scheme("#6366F1", "#EC4899", "#10B981");
        let once = fixed_theme(&scheme);
        let twice = fixed_theme(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn fixed_theme_repairs_all_on_pairs() {
        let scheme = light_scheme("#AAAAFF", "#FFAAAA", "#AAFFAA");
        let fixed = fixed_theme(&scheme);
        for (bg, fg) in [
            (fixed.primary, fixed.on_primary),
            (fixed.secondary, fixed.on_secondary),
            (fixed.tertiary, fixed.on_tertiary),
            (fixed.error, fixed.on_error),
            (fixed.surface, fixed.on_surface),
        ] {
            assert!(bg.contrast_ratio(fg) >= 4.5, "{bg} / {fg}");
        }
        // Brand roles reach at least 3:1 against the surface.
        for role in [fixed.primary, fixed.secondary, fixed.tertiary, fixed.success] {
            assert!(role.contrast_ratio(fixed.surface) >= 3., "{role}");
        }
    }

    #[test]
    fn fixed_theme_does_not_mutate_its_input() {
        let scheme = light_scheme("#AAAAFF", "#FFAAAA", "#AAFFAA");
        let copy = scheme;
        let _ = fixed_theme(&scheme);
        assert_eq!(scheme, copy);
    }

    #[test]
    fn overall_score_formula() {
        let scheme = light_scheme("#6366F1", "#EC4899", "#10B981");
        let report = validate(&scheme, false);
        let total = report.results.len() as f64;
        let expected = (100. * (report.normal_text.aaa as f64 + 0.75 * report.normal_text.aa as f64)
            / total)
            .round() as u8;
        assert_eq!(report.score, expected);
    }

    #[test]
    fn image_to_report_pipeline() {
        use image::{DynamicImage, Rgba, RgbaImage};
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(60, 60, |x, _| {
            if x < 30 {
                Rgba([66, 103, 244, 255])
            } else {
                Rgba([240, 150, 40, 255])
            }
        }));
        let palette =
            crate::extract::extract_from_image(&img, &mut StdRng::seed_from_u64(7));
        let base = BaseColors {
            primary: palette[0],
            secondary: palette[1],
            tertiary: palette[2],
        };
        let set = derive_scheme(&base, &[VariantKey::Light, VariantKey::Dark]);
        for (key, scheme) in &set {
            let report = validate(scheme, key.is_dark());
            assert!(report.score <= 100);
            assert!(!report.results.is_empty());
            let repaired = fixed_theme(scheme);
            let after = validate(&repaired, key.is_dark());
            assert!(after.normal_text.fail <= report.normal_text.fail);
        }
    }

    #[test]
    fn report_serializes_with_external_shape() {
        let scheme = light_scheme("#6366F1", "#EC4899", "#10B981");
        let json = serde_json::to_value(validate(&scheme, false)).unwrap();
        let row = &json["results"][0];
        assert_eq!(row["bgKey"], "primary");
        assert_eq!(row["fgKey"], "onPrimary");
        assert!(row["ratio"].is_f64());
        assert!(matches!(row["level"].as_str().unwrap(), "AAA" | "AA" | "FAIL"));
        assert_eq!(json["colorBlindnessResults"][0]["dichromacy"], "protanopia");
    }
}
