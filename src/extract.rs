//! Image palette extraction.
//!
//! Downscales the source into a small working canvas, samples and
//! filters pixels, clusters them with k-means in L\*a\*b\* space, scores
//! the clusters for brand-color suitability and assigns
//! primary/secondary/accent roles.
//!
//! Decoding is the only fallible step; a sample set emptied by the
//! saturation/lightness filters (an all-gray image, say) falls back to a
//! fixed default palette instead of erroring.

use image::{imageops::FilterType, DynamicImage};
use rand::Rng;
use rgb::RGB8;
use tracing::{debug, trace};

use crate::color::{
    contrast_ratio, delta_e, hsl_to_rgb, hue_delta, rgb_to_hsl, rgb_to_lab, HexColor, Hsl,
};
use crate::error::Error;

/// Working canvas edge, pixels.
const CANVAS: u32 = 150;
/// Gaussian blur radius applied before sampling, to suppress
/// single-pixel noise and JPEG artifacts.
const BLUR_SIGMA: f32 = 0.5;
/// Visit every `STRIDE`-th pixel in scan order.
const STRIDE: usize = 5;
/// Minimum alpha for a pixel to count as opaque enough.
const MIN_ALPHA: u8 = 128;
/// Pixels below this HSL saturation are near-gray and dropped.
const MIN_SATURATION: f64 = 0.20;
/// Lightness must be strictly inside this band (drops near-black and
/// near-white pixels).
const LIGHTNESS_BAND: (f64, f64) = (0.10, 0.90);
/// Number of k-means centroids.
const K: usize = 8;
/// Iteration cap for k-means; convergence usually comes much earlier.
const MAX_ITERATIONS: usize = 20;
/// At most this many colors are suggested.
const MAX_COLORS: usize = 6;

/// Default palette substituted when filtering removes every pixel.
pub const FALLBACK_PALETTE: [HexColor; 6] = [
    HexColor::new(0x63, 0x66, 0xF1),
    HexColor::new(0xEC, 0x48, 0x99),
    HexColor::new(0x10, 0xB9, 0x81),
    HexColor::new(0xF5, 0x9E, 0x0B),
    HexColor::new(0xEF, 0x44, 0x44),
    HexColor::new(0x8B, 0x5C, 0xF6),
];

/// A k-means cluster of sampled pixels.
///
/// Invariants: `count ≥ 1` (empty clusters are pruned) and dominances
/// sum to ≈1 over the clusters returned by one run.
#[derive(Clone, Copy, Debug)]
pub struct ColorCluster {
    /// Cluster centroid, mean RGB of the assigned samples.
    pub color: RGB8,
    /// Number of samples assigned to the centroid.
    pub count: usize,
    /// `count / totalSamples`.
    pub dominance: f64,
}

/// A cluster together with its brand-color suitability score (higher is
/// better).
#[derive(Clone, Copy, Debug)]
pub struct ScoredCluster {
    pub cluster: ColorCluster,
    pub score: f64,
}

/// Extracts an ordered brand palette from raw image bytes.
///
/// The first three colors are the primary, secondary and accent roles;
/// up to three more clusters follow as extra suggestions.  Fails with
/// [`Error::ImageDecode`] when the bytes are not a decodable raster
/// image; never fails afterwards.
pub fn extract_palette(bytes: &[u8]) -> Result<Vec<HexColor>, Error> {
    let img = image::load_from_memory(bytes)?;
    Ok(extract_from_image(&img, &mut rand::thread_rng()))
}

/// Same as [`extract_palette`] for an already decoded image, with an
/// injected randomness source for the k-means initialization so tests
/// can seed it.
pub fn extract_from_image(img: &DynamicImage, rng: &mut impl Rng) -> Vec<HexColor> {
    let samples = sample_pixels(img);
    if samples.is_empty() {
        debug!("sample set empty after filtering, using fallback palette");
        return FALLBACK_PALETTE.to_vec();
    }
    let clusters = kmeans(&samples, K, rng);
    let scored = score_clusters(&clusters);
    assign_roles(&scored)
}

/// Downscale into the working canvas, blur, then keep every
/// `STRIDE`-th pixel that is opaque, saturated and mid-lightness.
///
/// The resize fits within the canvas instead of letterboxing to a
/// square: padding pixels would be transparent and dropped by the alpha
/// filter anyway, so the sample set is the same either way.
fn sample_pixels(img: &DynamicImage) -> Vec<RGB8> {
    let canvas = img.resize(CANVAS, CANVAS, FilterType::Triangle).blur(BLUR_SIGMA);
    let rgba = canvas.to_rgba8();
    let mut samples = Vec::with_capacity((rgba.pixels().len() / STRIDE) + 1);
    for px in rgba.pixels().step_by(STRIDE) {
        if px[3] < MIN_ALPHA {
            continue;
        }
        let c = RGB8 { r: px[0], g: px[1], b: px[2] };
        let hsl = rgb_to_hsl(c);
        if hsl.s < MIN_SATURATION {
            continue;
        }
        if hsl.l <= LIGHTNESS_BAND.0 || hsl.l >= LIGHTNESS_BAND.1 {
            continue;
        }
        samples.push(c);
    }
    debug!(total = rgba.pixels().len(), kept = samples.len(), "sampled pixels");
    samples
}

/// k-means over the sample set with the CIE76 ΔE distance.
///
/// Centroids are drawn uniformly at random from the samples, then
/// refined for up to [`MAX_ITERATIONS`] rounds, stopping early once no
/// rounded centroid moves.  Centroids that end with no assigned samples
/// are pruned.
fn kmeans(samples: &[RGB8], k: usize, rng: &mut impl Rng) -> Vec<ColorCluster> {
    let k = k.min(samples.len());
    let labs: Vec<_> = samples.iter().map(|&c| rgb_to_lab(c)).collect();
    let mut centroids: Vec<RGB8> =
        (0..k).map(|_| samples[rng.gen_range(0..samples.len())]).collect();
    let mut counts = vec![0usize; k];

    for round in 0..MAX_ITERATIONS {
        let centroid_labs: Vec<_> = centroids.iter().map(|&c| rgb_to_lab(c)).collect();
        let mut sums = vec![[0u64; 3]; k];
        counts.iter_mut().for_each(|c| *c = 0);
        for (sample, lab) in samples.iter().zip(&labs) {
            let mut best = 0;
            let mut best_d = f64::INFINITY;
            for (j, cl) in centroid_labs.iter().enumerate() {
                let d = delta_e(*lab, *cl);
                if d < best_d {
                    best_d = d;
                    best = j;
                }
            }
            sums[best][0] += sample.r as u64;
            sums[best][1] += sample.g as u64;
            sums[best][2] += sample.b as u64;
            counts[best] += 1;
        }
        let mut moved = false;
        for j in 0..k {
            if counts[j] == 0 {
                continue; // starved centroid keeps its position
            }
            let mean = RGB8 {
                r: ((sums[j][0] as f64 / counts[j] as f64).round()) as u8,
                g: ((sums[j][1] as f64 / counts[j] as f64).round()) as u8,
                b: ((sums[j][2] as f64 / counts[j] as f64).round()) as u8,
            };
            if mean != centroids[j] {
                centroids[j] = mean;
                moved = true;
            }
        }
        if !moved {
            trace!(round, "k-means converged");
            break;
        }
    }

    let total = samples.len() as f64;
    centroids
        .into_iter()
        .zip(counts)
        .filter(|&(_, count)| count > 0)
        .map(|(color, count)| ColorCluster { color, count, dominance: count as f64 / total })
        .collect()
}

/// Preferred hue centers for the psychology term, with weights.
/// Blue > green > purple > orange > red ≈ pink.
const HUE_PREFERENCES: [(f64, f64); 6] =
    [(220., 1.0), (140., 0.8), (280., 0.7), (30., 0.6), (0., 0.5), (330., 0.5)];

/// Hand-picked hue ranges that tend to read as harmonious in UI work.
const HARMONIOUS_HUES: [(f64, f64); 5] =
    [(210., 270.), (180., 220.), (90., 150.), (270., 330.), (20., 45.)];

fn hue_preference(h: f64) -> f64 {
    HUE_PREFERENCES
        .iter()
        .map(|&(center, weight)| {
            let d = hue_delta(h, center);
            if d < 60. { weight * (1. - d / 60.) } else { 0. }
        })
        .fold(0., f64::max)
}

fn in_harmonious_range(h: f64) -> bool {
    HARMONIOUS_HUES.iter().any(|&(lo, hi)| h >= lo && h <= hi)
        || h >= 345.
        || h <= 10. // red-pink wrap-around
}

const WHITE: RGB8 = RGB8 { r: 255, g: 255, b: 255 };
const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Brand-color suitability of a cluster: a weighted mix of saturation,
/// mid-tone lightness, best-case text contrast, dominance and hue
/// psychology, with small additive bonuses for balanced vibrancy,
/// harmonious hue and usable lightness.  Downstream consumers depend on
/// the relative ranking, not the absolute values.
fn suitability(cluster: &ColorCluster) -> f64 {
    let hsl = rgb_to_hsl(cluster.color);
    let saturation = (hsl.s * 1.3).min(1.);
    let mid_lightness = 1. - (hsl.l - 0.5).abs() * 2.;
    let contrast = contrast_ratio(cluster.color, WHITE)
        .max(contrast_ratio(cluster.color, BLACK))
        / 21.;
    let dominance = (cluster.dominance * 2.5).min(1.);
    let mut score = 0.28 * saturation
        + 0.25 * mid_lightness
        + 0.17 * contrast
        + 0.20 * dominance
        + 0.10 * hue_preference(hsl.h);
    if (0.5..=0.9).contains(&hsl.s) {
        score += 0.12; // balanced vibrancy band
    }
    if in_harmonious_range(hsl.h) {
        score += 0.08;
    }
    if (0.3..=0.7).contains(&hsl.l) {
        score += 0.05;
    }
    score
}

/// Scores every cluster and sorts descending; this ordering is the
/// contract consumed by role assignment.
fn score_clusters(clusters: &[ColorCluster]) -> Vec<ScoredCluster> {
    let mut scored: Vec<_> = clusters
        .iter()
        .map(|&cluster| ScoredCluster { cluster, score: suitability(&cluster) })
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    for s in &scored {
        trace!(color = %HexColor(s.cluster.color), score = s.score, "scored cluster");
    }
    scored
}

/// Re-saturate and re-center a cluster color for a given role.
fn enhance(c: RGB8, sat_mul: f64, sat_cap: f64, l_lo: f64, l_hi: f64) -> HexColor {
    let hsl = rgb_to_hsl(c);
    HexColor(hsl_to_rgb(Hsl {
        h: hsl.h,
        s: (hsl.s * sat_mul).min(sat_cap),
        l: hsl.l.clamp(l_lo, l_hi),
    }))
}

/// Rotate a color's hue, keeping saturation and lightness.
fn rotate_hue(c: RGB8, degrees: f64) -> RGB8 {
    let hsl = rgb_to_hsl(c);
    hsl_to_rgb(Hsl { h: (hsl.h + degrees).rem_euclid(360.), ..hsl })
}

/// Assigns primary/secondary/accent roles to the scored clusters and
/// appends the leftovers, up to [`MAX_COLORS`] total.
///
/// The top-scored cluster is always primary.  Secondary is the
/// remaining cluster closest to a triadic (±120°) or 30° analogous
/// offset from the primary hue; accent maximizes
/// `saturation × (1 − |lightness − 0.5|)`.  With fewer than three
/// clusters the missing roles are synthesized by hue rotation of the
/// primary.
fn assign_roles(scored: &[ScoredCluster]) -> Vec<HexColor> {
    let primary_rgb = scored[0].cluster.color;
    let primary_hue = rgb_to_hsl(primary_rgb).h;

    let rest = &scored[1..];
    let secondary_idx = rest
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let da = offset_affinity(primary_hue, a.cluster.color);
            let db = offset_affinity(primary_hue, b.cluster.color);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i);
    let secondary_rgb = match secondary_idx {
        Some(i) => rest[i].cluster.color,
        None => rotate_hue(primary_rgb, 120.),
    };

    let accent_candidates: Vec<&ScoredCluster> = rest
        .iter()
        .enumerate()
        // Keep the secondary pick available as accent only when the
        // cluster set is too small to afford excluding it.
        .filter(|(i, _)| scored.len() < 4 || Some(*i) != secondary_idx)
        .map(|(_, s)| s)
        .collect();
    let accent_rgb = accent_candidates
        .iter()
        .max_by(|a, b| {
            vibrancy(a.cluster.color)
                .partial_cmp(&vibrancy(b.cluster.color))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|s| s.cluster.color)
        .unwrap_or_else(|| rotate_hue(primary_rgb, 240.));

    let mut palette = vec![
        enhance(primary_rgb, 1.08, 0.95, 0.42, 0.62),
        enhance(secondary_rgb, 1.04, 0.92, 0.38, 0.68),
        enhance(accent_rgb, 1.15, 0.98, 0.48, 0.58),
    ];
    for s in rest {
        if palette.len() >= MAX_COLORS {
            break;
        }
        if Some(s.cluster.color) == secondary_idx.map(|i| rest[i].cluster.color)
            || s.cluster.color == accent_rgb
        {
            continue;
        }
        palette.push(HexColor(s.cluster.color));
    }
    debug!(primary = %palette[0], secondary = %palette[1], accent = %palette[2],
           extra = palette.len() - 3, "assigned palette roles");
    palette
}

/// Distance from a candidate's hue to the nearest triadic or analogous
/// offset of the primary hue (smaller is a better secondary).
fn offset_affinity(primary_hue: f64, c: RGB8) -> f64 {
    let h = rgb_to_hsl(c).h;
    [120., 240., 30., -30.]
        .iter()
        .map(|&off| hue_delta(h, (primary_hue + off).rem_euclid(360.)))
        .fold(f64::INFINITY, f64::min)
}

fn vibrancy(c: RGB8) -> f64 {
    let hsl = rgb_to_hsl(c);
    hsl.s * (1. - (hsl.l - 0.5).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5EED)
    }

    fn block_image(colors: &[[u8; 4]]) -> DynamicImage {
        // Vertical stripes, one per color, 60×60.
        let n = colors.len() as u32;
        let img = RgbaImage::from_fn(60, 60, |x, _| Rgba(colors[(x * n / 60) as usize]));
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn gray_image_falls_back_to_fixed_palette() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            64,
            64,
            Rgba([128, 128, 128, 255]),
        ));
        assert_eq!(extract_from_image(&img, &mut rng()), FALLBACK_PALETTE.to_vec());
    }

    #[test]
    fn transparent_image_falls_back_too() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(32, 32, Rgba([200, 40, 40, 0])));
        assert_eq!(extract_from_image(&img, &mut rng()), FALLBACK_PALETTE.to_vec());
    }

    #[test]
    fn kmeans_invariants() {
        let mut samples = Vec::new();
        for _ in 0..100 {
            samples.push(RGB8 { r: 220, g: 40, b: 40 });
            samples.push(RGB8 { r: 40, g: 220, b: 40 });
            samples.push(RGB8 { r: 40, g: 40, b: 220 });
        }
        let clusters = kmeans(&samples, K, &mut rng());
        assert!(!clusters.is_empty() && clusters.len() <= K);
        assert!(clusters.iter().all(|c| c.count >= 1));
        assert_eq!(clusters.iter().map(|c| c.count).sum::<usize>(), samples.len());
        let dom: f64 = clusters.iter().map(|c| c.dominance).sum();
        assert!((dom - 1.).abs() < 1e-9);
    }

    #[test]
    fn kmeans_handles_fewer_samples_than_k() {
        let samples = vec![RGB8 { r: 10, g: 200, b: 90 }; 3];
        let clusters = kmeans(&samples, K, &mut rng());
        assert!(clusters.len() <= 3);
        assert_eq!(clusters.iter().map(|c| c.count).sum::<usize>(), 3);
    }

    #[test]
    fn top_scored_cluster_becomes_primary() {
        let clusters = [
            ColorCluster { color: RGB8 { r: 120, g: 120, b: 125 }, count: 50, dominance: 0.5 },
            ColorCluster { color: RGB8 { r: 66, g: 103, b: 244 }, count: 30, dominance: 0.3 },
            ColorCluster { color: RGB8 { r: 140, g: 80, b: 60 }, count: 20, dominance: 0.2 },
        ];
        let scored = score_clusters(&clusters);
        assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
        let palette = assign_roles(&scored);
        // Primary keeps the top cluster's hue through enhancement.
        let top_hue = rgb_to_hsl(scored[0].cluster.color).h;
        let primary_hue = palette[0].hsl().h;
        assert!(hue_delta(top_hue, primary_hue) < 5., "{top_hue} vs {primary_hue}");
    }

    #[test]
    fn extraction_yields_three_to_six_colors() {
        let img = block_image(&[
            [66, 103, 244, 255],
            [240, 150, 40, 255],
            [40, 200, 120, 255],
            [200, 60, 160, 255],
        ]);
        let palette = extract_from_image(&img, &mut rng());
        assert!((3..=6).contains(&palette.len()), "got {}", palette.len());
        // Enhanced roles stay inside their documented lightness bands
        // (small slack for u8 rounding at the clamp edges).
        let l = palette[0].hsl().l;
        assert!((0.41..=0.63).contains(&l), "primary lightness {l}");
        let l = palette[2].hsl().l;
        assert!((0.47..=0.59).contains(&l), "accent lightness {l}");
    }

    #[test]
    fn decode_failure_is_an_error() {
        assert!(matches!(
            extract_palette(b"definitely not an image"),
            Err(crate::error::Error::ImageDecode(_))
        ));
    }

    #[test]
    fn png_bytes_decode_and_extract() {
        let img = block_image(&[[66, 103, 244, 255], [240, 150, 40, 255]]);
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        let palette = extract_palette(bytes.get_ref()).unwrap();
        assert!(palette.len() >= 3);
        for c in &palette {
            let s = c.to_string();
            assert!(s.len() == 7 && s.starts_with('#'));
            assert_eq!(s, s.to_uppercase());
        }
    }
}
