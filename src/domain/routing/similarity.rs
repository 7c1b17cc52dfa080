//! Vector similarity.

/// Cosine similarity in `[-1, 1]`.
///
/// Zero when either vector has zero norm or the dimensions differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (dot, norm_a, norm_b) = a.iter().zip(b).fold((0.0f64, 0.0f64, 0.0f64), |(d, na, nb), (x, y)| {
        let (x, y) = (*x as f64, *y as f64);
        (d + x * y, na + x * x, nb + y * y)
    });
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}
