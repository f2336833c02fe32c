//! Quantile threshold estimation over a masked grid.
//!
//! The source computes thresholds with a streaming P²-quantile estimator;
//! a streaming estimator is explicitly permitted but not required to be
//! exact. We estimate via a full sort instead: same deterministic traversal
//! order requirement, no approximation error to reason about without a
//! build/test loop available to validate one.

/// Find the smallest value `v` such that the proportion of unmasked cells
/// with value `<= v` is `>= 1 - fraction`. `mask`, if given, marks cells to
/// *exclude* (e.g. ocean) and is ignored entirely if its length doesn't
/// match `values`.
pub fn quantile_threshold(values: &[f32], mask: Option<&[bool]>, fraction: f32) -> f32 {
    let use_mask = mask.map(|m| m.len() == values.len()).unwrap_or(false);

    let mut sample: Vec<f32> = if use_mask {
        let mask = mask.unwrap();
        values
            .iter()
            .zip(mask.iter())
            .filter(|(_, masked)| !**masked)
            .map(|(v, _)| *v)
            .collect()
    } else {
        values.to_vec()
    };

    if sample.is_empty() {
        return f32::INFINITY;
    }

    sample.sort_by(|a, b| a.total_cmp(b));

    let keep_fraction = (1.0 - fraction).clamp(0.0, 1.0);
    let rank = ((sample.len() as f32) * keep_fraction).ceil() as usize;
    let idx = rank.saturating_sub(1).min(sample.len() - 1);
    sample[idx]
}
