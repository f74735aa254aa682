//! Small vector helpers for similarity ranking.

/// Cosine similarity between two vectors.
///
/// Defined as 0 when either vector is empty, the lengths differ, or either
/// norm is non-positive, so callers never divide by zero.
pub fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        dot += f64::from(x) * f64::from(y);
        norm_a += f64::from(x) * f64::from(x);
        norm_b += f64::from(y) * f64::from(y);
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= 0.0 { 0.0 } else { dot / denom }
}
