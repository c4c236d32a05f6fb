use crate::model::CodeSet;

/// Jaccard overlap of two raters' codes for one segment.
///
/// `None` when either side is empty; callers leave such pairs out of the
/// segment mean. Non-empty sets with nothing in common give `Some(0.0)`.
pub fn pair_agreement(a: &CodeSet, b: &CodeSet) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }

    let intersection = a.intersection_len(b);
    let union = a.len() + b.len() - intersection;
    Some(intersection as f64 / union as f64)
}
