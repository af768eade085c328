/// Mean squared error between predictions and targets.
///
/// # Panics
///
/// Panics if the slices differ in length or are empty.
#[must_use]
pub fn mse(pred: &[f32], target: &[f32]) -> f32 {
    assert_eq!(pred.len(), target.len());
    assert!(!pred.is_empty());
    #[allow(clippy::cast_precision_loss)]
    let n = pred.len() as f32;
    pred.iter().zip(target).map(|(p, t)| (p - t).powi(2)).sum::<f32>() / n
}

/// Gradient of [`mse`] with respect to each prediction.
///
/// # Panics
///
/// Panics if the slices differ in length.
#[must_use]
pub fn mse_grad(pred: &[f32], target: &[f32]) -> Vec<f32> {
    assert_eq!(pred.len(), target.len());
    #[allow(clippy::cast_precision_loss)]
    let n = pred.len() as f32;
    pred.iter().zip(target).map(|(p, t)| 2.0 * (p - t) / n).collect()
}
