//! Material 3 color-scheme derivation.
//!
//! Expands three base colors into a full role record for up to six
//! variants: light and dark, each at base, medium-contrast and
//! high-contrast tiers.  Surface, outline, error, shadow and scrim
//! roles come from a hand-authored Material baseline — error colors are
//! standardized, not brand-colored — while the container, fixed and
//! inverse tones are coarse channel tints of the brand colors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::{contrast_color, optimal_text_color, HexColor};
use crate::error::Error;

/// The three brand colors every derivation starts from.
///
/// Produced by palette extraction or supplied directly by a user;
/// immutable once passed downstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseColors {
    pub primary: HexColor,
    pub secondary: HexColor,
    pub tertiary: HexColor,
}

impl BaseColors {
    /// Parses the three hex strings, rejecting malformed input with
    /// [`Error::InvalidColor`].
    pub fn from_hex(primary: &str, secondary: &str, tertiary: &str) -> Result<Self, Error> {
        Ok(BaseColors {
            primary: primary.parse()?,
            secondary: secondary.parse()?,
            tertiary: tertiary.parse()?,
        })
    }
}

/// One of the six scheme variants: a brightness times a contrast tier.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum VariantKey {
    Light,
    LightMediumContrast,
    LightHighContrast,
    Dark,
    DarkMediumContrast,
    DarkHighContrast,
}

impl VariantKey {
    pub const ALL: [VariantKey; 6] = [
        VariantKey::Light,
        VariantKey::LightMediumContrast,
        VariantKey::LightHighContrast,
        VariantKey::Dark,
        VariantKey::DarkMediumContrast,
        VariantKey::DarkHighContrast,
    ];

    /// Variants generated when the caller does not pick a subset.
    pub const DEFAULT: [VariantKey; 2] = [VariantKey::Light, VariantKey::Dark];

    pub fn is_dark(self) -> bool {
        matches!(
            self,
            VariantKey::Dark | VariantKey::DarkMediumContrast | VariantKey::DarkHighContrast
        )
    }
}

/// The optional "fixed" role tier: tones that keep the same value in
/// light and dark themes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedColors {
    pub primary_fixed: HexColor,
    pub primary_fixed_dim: HexColor,
    pub on_primary_fixed: HexColor,
    pub on_primary_fixed_variant: HexColor,
    pub secondary_fixed: HexColor,
    pub secondary_fixed_dim: HexColor,
    pub on_secondary_fixed: HexColor,
    pub on_secondary_fixed_variant: HexColor,
    pub tertiary_fixed: HexColor,
    pub tertiary_fixed_dim: HexColor,
    pub on_tertiary_fixed: HexColor,
    pub on_tertiary_fixed_variant: HexColor,
}

/// A full Material 3 role record.  Every role resolves to a valid
/// color; `on*` roles are meant to be read on top of their paired base
/// role.  The fixed tier is optional per variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: HexColor,
    pub on_primary: HexColor,
    pub primary_container: HexColor,
    pub on_primary_container: HexColor,
    pub secondary: HexColor,
    pub on_secondary: HexColor,
    pub secondary_container: HexColor,
    pub on_secondary_container: HexColor,
    pub tertiary: HexColor,
    pub on_tertiary: HexColor,
    pub tertiary_container: HexColor,
    pub on_tertiary_container: HexColor,
    pub error: HexColor,
    pub on_error: HexColor,
    pub error_container: HexColor,
    pub on_error_container: HexColor,
    pub surface: HexColor,
    pub surface_dim: HexColor,
    pub surface_bright: HexColor,
    pub surface_container_lowest: HexColor,
    pub surface_container_low: HexColor,
    pub surface_container: HexColor,
    pub surface_container_high: HexColor,
    pub surface_container_highest: HexColor,
    pub on_surface: HexColor,
    pub on_surface_variant: HexColor,
    pub outline: HexColor,
    pub outline_variant: HexColor,
    pub shadow: HexColor,
    pub scrim: HexColor,
    pub inverse_surface: HexColor,
    pub inverse_on_surface: HexColor,
    pub inverse_primary: HexColor,
    pub surface_tint: HexColor,
    pub success: HexColor,
    pub warning: HexColor,
    pub info: HexColor,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<FixedColors>,
}

/// Variant key → role record, for the variants the caller selected.
pub type ThemeVariantSet = BTreeMap<VariantKey, ThemeColors>;

/// Every addressable role, for table-driven validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleKey {
    Primary,
    OnPrimary,
    PrimaryContainer,
    OnPrimaryContainer,
    Secondary,
    OnSecondary,
    SecondaryContainer,
    OnSecondaryContainer,
    Tertiary,
    OnTertiary,
    TertiaryContainer,
    OnTertiaryContainer,
    Error,
    OnError,
    ErrorContainer,
    OnErrorContainer,
    Surface,
    SurfaceDim,
    SurfaceBright,
    SurfaceContainerLowest,
    SurfaceContainerLow,
    SurfaceContainer,
    SurfaceContainerHigh,
    SurfaceContainerHighest,
    OnSurface,
    OnSurfaceVariant,
    Outline,
    OutlineVariant,
    Shadow,
    Scrim,
    InverseSurface,
    InverseOnSurface,
    InversePrimary,
    SurfaceTint,
    Success,
    Warning,
    Info,
    PrimaryFixed,
    PrimaryFixedDim,
    OnPrimaryFixed,
    OnPrimaryFixedVariant,
    SecondaryFixed,
    SecondaryFixedDim,
    OnSecondaryFixed,
    OnSecondaryFixedVariant,
    TertiaryFixed,
    TertiaryFixedDim,
    OnTertiaryFixed,
    OnTertiaryFixedVariant,
}

impl RoleKey {
    pub const ALL: [RoleKey; 49] = [
        RoleKey::Primary,
        RoleKey::OnPrimary,
        RoleKey::PrimaryContainer,
        RoleKey::OnPrimaryContainer,
        RoleKey::Secondary,
        RoleKey::OnSecondary,
        RoleKey::SecondaryContainer,
        RoleKey::OnSecondaryContainer,
        RoleKey::Tertiary,
        RoleKey::OnTertiary,
        RoleKey::TertiaryContainer,
        RoleKey::OnTertiaryContainer,
        RoleKey::Error,
        RoleKey::OnError,
        RoleKey::ErrorContainer,
        RoleKey::OnErrorContainer,
        RoleKey::Surface,
        RoleKey::SurfaceDim,
        RoleKey::SurfaceBright,
        RoleKey::SurfaceContainerLowest,
        RoleKey::SurfaceContainerLow,
        RoleKey::SurfaceContainer,
        RoleKey::SurfaceContainerHigh,
        RoleKey::SurfaceContainerHighest,
        RoleKey::OnSurface,
        RoleKey::OnSurfaceVariant,
        RoleKey::Outline,
        RoleKey::OutlineVariant,
        RoleKey::Shadow,
        RoleKey::Scrim,
        RoleKey::InverseSurface,
        RoleKey::InverseOnSurface,
        RoleKey::InversePrimary,
        RoleKey::SurfaceTint,
        RoleKey::Success,
        RoleKey::Warning,
        RoleKey::Info,
        RoleKey::PrimaryFixed,
        RoleKey::PrimaryFixedDim,
        RoleKey::OnPrimaryFixed,
        RoleKey::OnPrimaryFixedVariant,
        RoleKey::SecondaryFixed,
        RoleKey::SecondaryFixedDim,
        RoleKey::OnSecondaryFixed,
        RoleKey::OnSecondaryFixedVariant,
        RoleKey::TertiaryFixed,
        RoleKey::TertiaryFixedDim,
        RoleKey::OnTertiaryFixed,
        RoleKey::OnTertiaryFixedVariant,
    ];

    /// camelCase role name, as external consumers see it.
    pub fn name(self) -> &'static str {
        match self {
            RoleKey::Primary => "primary",
            RoleKey::OnPrimary => "onPrimary",
            RoleKey::PrimaryContainer => "primaryContainer",
            RoleKey::OnPrimaryContainer => "onPrimaryContainer",
            RoleKey::Secondary => "secondary",
            RoleKey::OnSecondary => "onSecondary",
            RoleKey::SecondaryContainer => "secondaryContainer",
            RoleKey::OnSecondaryContainer => "onSecondaryContainer",
            RoleKey::Tertiary => "tertiary",
            RoleKey::OnTertiary => "onTertiary",
            RoleKey::TertiaryContainer => "tertiaryContainer",
            RoleKey::OnTertiaryContainer => "onTertiaryContainer",
            RoleKey::Error => "error",
            RoleKey::OnError => "onError",
            RoleKey::ErrorContainer => "errorContainer",
            RoleKey::OnErrorContainer => "onErrorContainer",
            RoleKey::Surface => "surface",
            RoleKey::SurfaceDim => "surfaceDim",
            RoleKey::SurfaceBright => "surfaceBright",
            RoleKey::SurfaceContainerLowest => "surfaceContainerLowest",
            RoleKey::SurfaceContainerLow => "surfaceContainerLow",
            RoleKey::SurfaceContainer => "surfaceContainer",
            RoleKey::SurfaceContainerHigh => "surfaceContainerHigh",
            RoleKey::SurfaceContainerHighest => "surfaceContainerHighest",
            RoleKey::OnSurface => "onSurface",
            RoleKey::OnSurfaceVariant => "onSurfaceVariant",
            RoleKey::Outline => "outline",
            RoleKey::OutlineVariant => "outlineVariant",
            RoleKey::Shadow => "shadow",
            RoleKey::Scrim => "scrim",
            RoleKey::InverseSurface => "inverseSurface",
            RoleKey::InverseOnSurface => "inverseOnSurface",
            RoleKey::InversePrimary => "inversePrimary",
            RoleKey::SurfaceTint => "surfaceTint",
            RoleKey::Success => "success",
            RoleKey::Warning => "warning",
            RoleKey::Info => "info",
            RoleKey::PrimaryFixed => "primaryFixed",
            RoleKey::PrimaryFixedDim => "primaryFixedDim",
            RoleKey::OnPrimaryFixed => "onPrimaryFixed",
            RoleKey::OnPrimaryFixedVariant => "onPrimaryFixedVariant",
            RoleKey::SecondaryFixed => "secondaryFixed",
            RoleKey::SecondaryFixedDim => "secondaryFixedDim",
            RoleKey::OnSecondaryFixed => "onSecondaryFixed",
            RoleKey::OnSecondaryFixedVariant => "onSecondaryFixedVariant",
            RoleKey::TertiaryFixed => "tertiaryFixed",
            RoleKey::TertiaryFixedDim => "tertiaryFixedDim",
            RoleKey::OnTertiaryFixed => "onTertiaryFixed",
            RoleKey::OnTertiaryFixedVariant => "onTertiaryFixedVariant",
        }
    }
}

impl ThemeColors {
    /// Looks a role up by key.  Fixed-tier keys return `None` when the
    /// scheme carries no fixed tier.
    pub fn get(&self, key: RoleKey) -> Option<HexColor> {
        use RoleKey::*;
        Some(match key {
            Primary => self.primary,
            OnPrimary => self.on_primary,
            PrimaryContainer => self.primary_container,
            OnPrimaryContainer => self.on_primary_container,
            Secondary => self.secondary,
            OnSecondary => self.on_secondary,
            SecondaryContainer => self.secondary_container,
            OnSecondaryContainer => self.on_secondary_container,
            Tertiary => self.tertiary,
            OnTertiary => self.on_tertiary,
            TertiaryContainer => self.tertiary_container,
            OnTertiaryContainer => self.on_tertiary_container,
            Error => self.error,
            OnError => self.on_error,
            ErrorContainer => self.error_container,
            OnErrorContainer => self.on_error_container,
            Surface => self.surface,
            SurfaceDim => self.surface_dim,
            SurfaceBright => self.surface_bright,
            SurfaceContainerLowest => self.surface_container_lowest,
            SurfaceContainerLow => self.surface_container_low,
            SurfaceContainer => self.surface_container,
            SurfaceContainerHigh => self.surface_container_high,
            SurfaceContainerHighest => self.surface_container_highest,
            OnSurface => self.on_surface,
            OnSurfaceVariant => self.on_surface_variant,
            Outline => self.outline,
            OutlineVariant => self.outline_variant,
            Shadow => self.shadow,
            Scrim => self.scrim,
            InverseSurface => self.inverse_surface,
            InverseOnSurface => self.inverse_on_surface,
            InversePrimary => self.inverse_primary,
            SurfaceTint => self.surface_tint,
            Success => self.success,
            Warning => self.warning,
            Info => self.info,
            PrimaryFixed => self.fixed?.primary_fixed,
            PrimaryFixedDim => self.fixed?.primary_fixed_dim,
            OnPrimaryFixed => self.fixed?.on_primary_fixed,
            OnPrimaryFixedVariant => self.fixed?.on_primary_fixed_variant,
            SecondaryFixed => self.fixed?.secondary_fixed,
            SecondaryFixedDim => self.fixed?.secondary_fixed_dim,
            OnSecondaryFixed => self.fixed?.on_secondary_fixed,
            OnSecondaryFixedVariant => self.fixed?.on_secondary_fixed_variant,
            TertiaryFixed => self.fixed?.tertiary_fixed,
            TertiaryFixedDim => self.fixed?.tertiary_fixed_dim,
            OnTertiaryFixed => self.fixed?.on_tertiary_fixed,
            OnTertiaryFixedVariant => self.fixed?.on_tertiary_fixed_variant,
        })
    }
}

/// Hand-authored Material baseline roles shared by every brand.
struct Baseline {
    surface: HexColor,
    surface_dim: HexColor,
    surface_bright: HexColor,
    surface_container_lowest: HexColor,
    surface_container_low: HexColor,
    surface_container: HexColor,
    surface_container_high: HexColor,
    surface_container_highest: HexColor,
    on_surface: HexColor,
    on_surface_variant: HexColor,
    outline: HexColor,
    outline_variant: HexColor,
    inverse_surface: HexColor,
    inverse_on_surface: HexColor,
    error: HexColor,
    on_error: HexColor,
    error_container: HexColor,
    on_error_container: HexColor,
    success: HexColor,
    warning: HexColor,
    info: HexColor,
}

const fn hex(r: u8, g: u8, b: u8) -> HexColor {
    HexColor::new(r, g, b)
}

const LIGHT_BASELINE: Baseline = Baseline {
    surface: hex(0xFE, 0xF7, 0xFF),
    surface_dim: hex(0xDE, 0xD8, 0xE1),
    surface_bright: hex(0xFE, 0xF7, 0xFF),
    surface_container_lowest: hex(0xFF, 0xFF, 0xFF),
    surface_container_low: hex(0xF7, 0xF2, 0xFA),
    surface_container: hex(0xF3, 0xED, 0xF7),
    surface_container_high: hex(0xEC, 0xE6, 0xF0),
    surface_container_highest: hex(0xE6, 0xE0, 0xE9),
    on_surface: hex(0x1D, 0x1B, 0x20),
    on_surface_variant: hex(0x49, 0x45, 0x4F),
    outline: hex(0x79, 0x74, 0x7E),
    outline_variant: hex(0xCA, 0xC4, 0xD0),
    inverse_surface: hex(0x32, 0x2F, 0x35),
    inverse_on_surface: hex(0xF5, 0xEF, 0xF7),
    error: hex(0xB3, 0x26, 0x1E),
    on_error: hex(0xFF, 0xFF, 0xFF),
    error_container: hex(0xF9, 0xDE, 0xDC),
    on_error_container: hex(0x41, 0x0E, 0x0B),
    success: hex(0x04, 0x78, 0x57),
    warning: hex(0xB4, 0x53, 0x09),
    info: hex(0x1D, 0x4E, 0xD8),
};

const DARK_BASELINE: Baseline = Baseline {
    surface: hex(0x14, 0x12, 0x18),
    surface_dim: hex(0x14, 0x12, 0x18),
    surface_bright: hex(0x3B, 0x38, 0x3E),
    surface_container_lowest: hex(0x0F, 0x0D, 0x13),
    surface_container_low: hex(0x1D, 0x1B, 0x20),
    surface_container: hex(0x21, 0x1F, 0x26),
    surface_container_high: hex(0x2B, 0x29, 0x30),
    surface_container_highest: hex(0x36, 0x34, 0x3B),
    on_surface: hex(0xE6, 0xE0, 0xE9),
    on_surface_variant: hex(0xCA, 0xC4, 0xD0),
    outline: hex(0x93, 0x8F, 0x99),
    outline_variant: hex(0x49, 0x45, 0x4F),
    inverse_surface: hex(0xE6, 0xE0, 0xE9),
    inverse_on_surface: hex(0x32, 0x2F, 0x35),
    error: hex(0xF2, 0xB8, 0xB5),
    on_error: hex(0x60, 0x14, 0x10),
    error_container: hex(0x8C, 0x1D, 0x18),
    on_error_container: hex(0xF9, 0xDE, 0xDC),
    success: hex(0x34, 0xD3, 0x99),
    warning: hex(0xFB, 0xBF, 0x24),
    info: hex(0x60, 0xA5, 0xFA),
};

// Coarse channel-tint deltas for the derived tones.  These carry no
// contrast contract (the validator enforces that separately).
const LIGHT_CONTAINER_TINT: i16 = 80;
const LIGHT_ON_CONTAINER_TINT: i16 = -100;
const DARK_CONTAINER_TINT: i16 = -60;
const DARK_ON_CONTAINER_TINT: i16 = 110;
const FIXED_TINT: i16 = 90;
const FIXED_DIM_TINT: i16 = 60;
const ON_FIXED_TINT: i16 = -110;
const ON_FIXED_VARIANT_TINT: i16 = -70;

/// Derives the selected variants from the base colors.  An empty
/// `variants` slice selects [`VariantKey::DEFAULT`] (light and dark).
pub fn derive_scheme(base: &BaseColors, variants: &[VariantKey]) -> ThemeVariantSet {
    let keys: &[VariantKey] =
        if variants.is_empty() { &VariantKey::DEFAULT } else { variants };
    keys.iter()
        .map(|&key| {
            let scheme = match key {
                VariantKey::Light => light_scheme(base),
                VariantKey::LightMediumContrast => raise_contrast(&light_scheme(base), key),
                VariantKey::LightHighContrast => raise_contrast(&light_scheme(base), key),
                VariantKey::Dark => dark_scheme(base),
                VariantKey::DarkMediumContrast => raise_contrast(&dark_scheme(base), key),
                VariantKey::DarkHighContrast => raise_contrast(&dark_scheme(base), key),
            };
            (key, scheme)
        })
        .collect()
}

/// The fixed tier keeps the same tones in light and dark schemes.
fn fixed_tier(base: &BaseColors) -> FixedColors {
    let family = |c: HexColor| {
        (
            c.tint(FIXED_TINT),
            c.tint(FIXED_DIM_TINT),
            c.tint(ON_FIXED_TINT),
            c.tint(ON_FIXED_VARIANT_TINT),
        )
    };
    let (primary_fixed, primary_fixed_dim, on_primary_fixed, on_primary_fixed_variant) =
        family(base.primary);
    let (secondary_fixed, secondary_fixed_dim, on_secondary_fixed, on_secondary_fixed_variant) =
        family(base.secondary);
    let (tertiary_fixed, tertiary_fixed_dim, on_tertiary_fixed, on_tertiary_fixed_variant) =
        family(base.tertiary);
    FixedColors {
        primary_fixed,
        primary_fixed_dim,
        on_primary_fixed,
        on_primary_fixed_variant,
        secondary_fixed,
        secondary_fixed_dim,
        on_secondary_fixed,
        on_secondary_fixed_variant,
        tertiary_fixed,
        tertiary_fixed_dim,
        on_tertiary_fixed,
        on_tertiary_fixed_variant,
    }
}

fn light_scheme(base: &BaseColors) -> ThemeColors {
    let b = &LIGHT_BASELINE;
    ThemeColors {
        primary: base.primary,
        on_primary: optimal_text_color(base.primary),
        primary_container: base.primary.tint(LIGHT_CONTAINER_TINT),
        on_primary_container: base.primary.tint(LIGHT_ON_CONTAINER_TINT),
        secondary: base.secondary,
        on_secondary: optimal_text_color(base.secondary),
        secondary_container: base.secondary.tint(LIGHT_CONTAINER_TINT),
        on_secondary_container: base.secondary.tint(LIGHT_ON_CONTAINER_TINT),
        tertiary: base.tertiary,
        on_tertiary: optimal_text_color(base.tertiary),
        tertiary_container: base.tertiary.tint(LIGHT_CONTAINER_TINT),
        on_tertiary_container: base.tertiary.tint(LIGHT_ON_CONTAINER_TINT),
        error: b.error,
        on_error: b.on_error,
        error_container: b.error_container,
        on_error_container: b.on_error_container,
        surface: b.surface,
        surface_dim: b.surface_dim,
        surface_bright: b.surface_bright,
        surface_container_lowest: b.surface_container_lowest,
        surface_container_low: b.surface_container_low,
        surface_container: b.surface_container,
        surface_container_high: b.surface_container_high,
        surface_container_highest: b.surface_container_highest,
        on_surface: b.on_surface,
        on_surface_variant: b.on_surface_variant,
        outline: b.outline,
        outline_variant: b.outline_variant,
        shadow: HexColor::BLACK,
        scrim: HexColor::BLACK,
        inverse_surface: b.inverse_surface,
        inverse_on_surface: b.inverse_on_surface,
        inverse_primary: base.primary.tint(LIGHT_CONTAINER_TINT),
        surface_tint: base.primary,
        success: b.success,
        warning: b.warning,
        info: b.info,
        fixed: Some(fixed_tier(base)),
    }
}

fn dark_scheme(base: &BaseColors) -> ThemeColors {
    let b = &DARK_BASELINE;
    ThemeColors {
        primary: base.primary,
        on_primary: optimal_text_color(base.primary),
        primary_container: base.primary.tint(DARK_CONTAINER_TINT),
        on_primary_container: base.primary.tint(DARK_ON_CONTAINER_TINT),
        secondary: base.secondary,
        on_secondary: optimal_text_color(base.secondary),
        secondary_container: base.secondary.tint(DARK_CONTAINER_TINT),
        on_secondary_container: base.secondary.tint(DARK_ON_CONTAINER_TINT),
        tertiary: base.tertiary,
        on_tertiary: optimal_text_color(base.tertiary),
        tertiary_container: base.tertiary.tint(DARK_CONTAINER_TINT),
        on_tertiary_container: base.tertiary.tint(DARK_ON_CONTAINER_TINT),
        error: b.error,
        on_error: b.on_error,
        error_container: b.error_container,
        on_error_container: b.on_error_container,
        surface: b.surface,
        surface_dim: b.surface_dim,
        surface_bright: b.surface_bright,
        surface_container_lowest: b.surface_container_lowest,
        surface_container_low: b.surface_container_low,
        surface_container: b.surface_container,
        surface_container_high: b.surface_container_high,
        surface_container_highest: b.surface_container_highest,
        on_surface: b.on_surface,
        on_surface_variant: b.on_surface_variant,
        outline: b.outline,
        outline_variant: b.outline_variant,
        shadow: HexColor::BLACK,
        scrim: HexColor::BLACK,
        inverse_surface: b.inverse_surface,
        inverse_on_surface: b.inverse_on_surface,
        inverse_primary: base.primary.tint(DARK_CONTAINER_TINT),
        surface_tint: base.primary,
        success: b.success,
        warning: b.warning,
        info: b.info,
        fixed: Some(fixed_tier(base)),
    }
}

/// The Material "fixed contrast ladder": the medium and high tiers
/// shift the brand triplet by a fixed lightness offset and push
/// text-bearing roles toward black (light) or white (dark).  Surface
/// tones are never touched by contrast tiers.
fn raise_contrast(scheme: &ThemeColors, key: VariantKey) -> ThemeColors {
    let mut out = *scheme;
    match key {
        VariantKey::LightMediumContrast => {
            shift_brand(&mut out, -5.);
            out.on_primary_container = out.on_primary_container.lighten(-10.);
            out.on_secondary_container = out.on_secondary_container.lighten(-10.);
            out.on_tertiary_container = out.on_tertiary_container.lighten(-10.);
            out.on_surface = out.on_surface.lighten(-5.);
            out.on_surface_variant = out.on_surface_variant.lighten(-5.);
        }
        VariantKey::LightHighContrast => {
            shift_brand(&mut out, -15.);
            force_on_colors(&mut out);
            out.on_surface = HexColor::BLACK;
            out.on_surface_variant = HexColor::BLACK;
        }
        VariantKey::DarkMediumContrast => {
            shift_brand(&mut out, 15.);
            out.on_primary_container = out.on_primary_container.lighten(10.);
            out.on_secondary_container = out.on_secondary_container.lighten(10.);
            out.on_tertiary_container = out.on_tertiary_container.lighten(10.);
            out.on_surface = out.on_surface.lighten(5.);
            out.on_surface_variant = out.on_surface_variant.lighten(5.);
        }
        VariantKey::DarkHighContrast => {
            shift_brand(&mut out, 20.);
            force_on_colors(&mut out);
            out.on_surface = HexColor::WHITE;
            out.on_surface_variant = HexColor::WHITE;
        }
        VariantKey::Light | VariantKey::Dark => {}
    }
    out
}

fn shift_brand(scheme: &mut ThemeColors, delta: f64) {
    scheme.primary = scheme.primary.lighten(delta);
    scheme.secondary = scheme.secondary.lighten(delta);
    scheme.tertiary = scheme.tertiary.lighten(delta);
}

/// At the highest tier, text on colored roles is forced to whichever of
/// pure white and pure black reads best, never derived by offset.
fn force_on_colors(scheme: &mut ThemeColors) {
    scheme.on_primary = optimal_text_color(scheme.primary);
    scheme.on_secondary = optimal_text_color(scheme.secondary);
    scheme.on_tertiary = optimal_text_color(scheme.tertiary);
    scheme.on_error = optimal_text_color(scheme.error);
    scheme.on_primary_container = optimal_text_color(scheme.primary_container);
    scheme.on_secondary_container = optimal_text_color(scheme.secondary_container);
    scheme.on_tertiary_container = optimal_text_color(scheme.tertiary_container);
}

/// Quick black-or-white pick for "what text goes on this" decisions
/// outside the scheme.  Re-exported here because theme consumers reach
/// for it next to the derivation entry point.
pub fn contrast_text(c: HexColor) -> HexColor {
    contrast_color(c)
}
