//! Material 3 palettes from images: extraction, derivation, validation.
//!
//! - [`extract::extract_palette`] clusters an image's pixels with
//!   k-means in CIE L\*a\*b\* space and picks primary/secondary/accent
//!   brand colors.
//! - [`scheme::derive_scheme`] expands three base colors into a full
//!   Material 3 role record for up to six variants (light/dark ×
//!   base/medium/high contrast tiers).
//! - [`validate::validate`] checks the scheme's role pairs against
//!   WCAG AA/AAA, scores brand harmony, palette efficiency and
//!   color-blindness safety, and [`validate::fixed_theme`] repairs
//!   failing pairs by binary search over HSL lightness.
//!
//! All computation is synchronous and deterministic (k-means takes an
//! injectable randomness source); colors cross the API boundary as
//! uppercase `#RRGGBB` strings via [`color::HexColor`].
//!
//! ```
//! use palette_forge::scheme::{derive_scheme, BaseColors, VariantKey};
//! use palette_forge::validate::validate;
//!
//! let base = BaseColors::from_hex("#6366F1", "#EC4899", "#10B981")?;
//! let set = derive_scheme(&base, &[VariantKey::Light, VariantKey::Dark]);
//! let report = validate(&set[&VariantKey::Light], false);
//! assert!(report.score <= 100);
//! # Ok::<(), palette_forge::Error>(())
//! ```

pub mod color;
pub mod error;
pub mod extract;
pub mod scheme;
pub mod validate;

pub use color::{Dichromacy, HexColor, Hsl, Lab};
pub use error::Error;
pub use extract::{extract_palette, ColorCluster, ScoredCluster, FALLBACK_PALETTE};
pub use scheme::{derive_scheme, BaseColors, ThemeColors, ThemeVariantSet, VariantKey};
pub use validate::{fix_color, fixed_theme, validate, ThemeValidationReport};
