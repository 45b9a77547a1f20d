//! Synthetic training corpus generation.
//!
//! Bootstraps the classifier when no real labeled corpus exists, by
//! sampling feature vectors from per-class distributions that encode the
//! informal typographic rules: headings are rarer, larger, bolder and
//! shorter than body text, with H1 > H2 > H3 in size. This is an explicit
//! placeholder for real labeled data — its output quality bounds the
//! classifier's real-world accuracy.

use crate::classify::ClassLabel;
use crate::features::FEATURE_COUNT;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Per-class generation parameters, indexed by [`ClassLabel::index`].
struct ClassProfile {
    size_mean: f32,
    size_sd: f32,
    p_bold: f64,
    p_upper: f64,
    p_centered: f64,
    p_distinct_font: f64,
    text_len: std::ops::Range<u32>,
    gap: std::ops::Range<f32>,
}

const PROFILES: [ClassProfile; 4] = [
    // Body
    ClassProfile {
        size_mean: 12.0,
        size_sd: 2.0,
        p_bold: 0.1,
        p_upper: 0.05,
        p_centered: 0.05,
        p_distinct_font: 0.1,
        text_len: 20..200,
        gap: 0.0..1.5,
    },
    // H3
    ClassProfile {
        size_mean: 14.0,
        size_sd: 1.0,
        p_bold: 0.7,
        p_upper: 0.2,
        p_centered: 0.2,
        p_distinct_font: 0.4,
        text_len: 10..80,
        gap: 0.5..2.0,
    },
    // H2
    ClassProfile {
        size_mean: 16.0,
        size_sd: 1.0,
        p_bold: 0.8,
        p_upper: 0.3,
        p_centered: 0.3,
        p_distinct_font: 0.5,
        text_len: 5..60,
        gap: 0.8..2.5,
    },
    // H1
    ClassProfile {
        size_mean: 20.0,
        size_sd: 2.0,
        p_bold: 0.9,
        p_upper: 0.4,
        p_centered: 0.5,
        p_distinct_font: 0.6,
        text_len: 5..50,
        gap: 1.0..3.0,
    },
];

/// Generate `n` labeled training samples, class-balanced across the four
/// labels and deterministic for a fixed seed.
///
/// Returns the `(n, FEATURE_COUNT)` feature matrix and the label per row,
/// in shuffled order.
pub fn generate(n: usize, seed: u64) -> (Array2<f32>, Vec<ClassLabel>) {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut classes: Vec<usize> = (0..n).map(|i| i % 4).collect();
    classes.shuffle(&mut rng);

    let mut x = Array2::zeros((n, FEATURE_COUNT));
    let mut y = Vec::with_capacity(n);

    for (row, &class) in classes.iter().enumerate() {
        let profile = &PROFILES[class];
        let vector = sample_span(profile, &mut rng);
        for (col, value) in vector.iter().enumerate() {
            x[[row, col]] = *value;
        }
        // Class indices 0..4 always map to a label.
        y.push(ClassLabel::from_index(class).unwrap_or(ClassLabel::Body));
    }

    (x, y)
}

/// Sample one feature vector from a class profile.
fn sample_span(profile: &ClassProfile, rng: &mut StdRng) -> [f32; FEATURE_COUNT] {
    let font_size = normal(rng, profile.size_mean, profile.size_sd).max(6.0);

    // Simulated documents vary in base size, so the ratio feature sees
    // realistic spread rather than a fixed divisor.
    let body_size = normal(rng, 11.5, 1.0).clamp(8.0, 16.0);

    let upper_ratio = if rng.random_bool(profile.p_upper) {
        rng.random_range(0.7..1.0)
    } else {
        rng.random_range(0.0..0.3)
    };

    // Headings lean toward the top third of a page.
    let page_position = {
        let roll: f32 = rng.random();
        if roll < 0.5 {
            0.0
        } else if roll < 0.8 {
            1.0
        } else {
            2.0
        }
    };

    [
        font_size,
        font_size / body_size,
        if rng.random_bool(profile.p_bold) { 1.0 } else { 0.0 },
        if rng.random_bool(0.1) { 1.0 } else { 0.0 },
        rng.random_range(profile.text_len.clone()) as f32,
        upper_ratio,
        if rng.random_bool(profile.p_centered) { 1.0 } else { 0.0 },
        rng.random_range(profile.gap.clone()),
        rng.random_range(0..50) as f32,
        page_position,
        if rng.random_bool(profile.p_distinct_font) { 1.0 } else { 0.0 },
    ]
}

/// Box-Muller gaussian sample.
fn normal(rng: &mut StdRng, mean: f32, sd: f32) -> f32 {
    let u1: f32 = rng.random_range(f32::EPSILON..1.0);
    let u2: f32 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
    mean + sd * z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_requested_count() {
        let (x, y) = generate(100, 42);
        assert_eq!(x.shape(), &[100, FEATURE_COUNT]);
        assert_eq!(y.len(), 100);
    }

    #[test]
    fn test_class_balance() {
        let (_, y) = generate(400, 42);
        for label in [ClassLabel::Body, ClassLabel::H3, ClassLabel::H2, ClassLabel::H1] {
            let count = y.iter().filter(|&&l| l == label).count();
            assert_eq!(count, 100);
        }
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let (xa, ya) = generate(50, 7);
        let (xb, yb) = generate(50, 7);
        assert_eq!(xa, xb);
        assert_eq!(ya, yb);
    }

    #[test]
    fn test_different_seeds_differ() {
        let (xa, _) = generate(50, 1);
        let (xb, _) = generate(50, 2);
        assert_ne!(xa, xb);
    }

    #[test]
    fn test_headings_larger_than_body_on_average() {
        let (x, y) = generate(2000, 42);
        let mean_size = |label: ClassLabel| {
            let rows: Vec<usize> = y
                .iter()
                .enumerate()
                .filter(|(_, &l)| l == label)
                .map(|(i, _)| i)
                .collect();
            rows.iter().map(|&i| x[[i, 0]]).sum::<f32>() / rows.len() as f32
        };

        let body = mean_size(ClassLabel::Body);
        let h3 = mean_size(ClassLabel::H3);
        let h2 = mean_size(ClassLabel::H2);
        let h1 = mean_size(ClassLabel::H1);

        assert!(body < h3);
        assert!(h3 < h2);
        assert!(h2 < h1);
    }

    #[test]
    fn test_sizes_floored() {
        let (x, _) = generate(1000, 42);
        for i in 0..1000 {
            assert!(x[[i, 0]] >= 6.0);
        }
    }
}
