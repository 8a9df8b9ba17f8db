//! Crate error taxonomy.
//!
//! Only two conditions are fatal: an image that cannot be decoded and a
//! malformed hex color string.  Everything else (empty sample sets,
//! auto-fix exhaustion) degrades gracefully and is documented on the
//! functions concerned.

/// Errors returned by palette extraction and color parsing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input bytes could not be decoded as a raster image.  No
    /// partial palette is ever produced.
    #[error("could not decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// A color string was not of the form `#RRGGBB`.  Malformed input
    /// is never silently coerced.
    #[error("invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),
}
