use async_trait::async_trait;

use crate::domain::models::{ComputeRequest, ComputeResponse};

/// Port for running the pure compute function somewhere.
///
/// Implementations either call it inline (synchronous fallback) or hand the
/// request to a background worker. Both must return identical results for
/// the same request.
///
/// # Examples
///
/// ```no_run
/// use sweetspot::domain::ports::ComputeBackend;
/// use sweetspot::domain::models::{ComputeRequest, KeywordSet, WeightVector};
///
/// async fn example(backend: &dyn ComputeBackend) {
///     let request = ComputeRequest::new(WeightVector::default(), KeywordSet::new());
///     if let Some(response) = backend.compute(request).await {
///         println!("score = {}", response.detection.score);
///     }
/// }
/// ```
#[async_trait]
pub trait ComputeBackend: Send + Sync {
    /// Compute the response for `request`
    ///
    /// # Returns
    ///
    /// * `Some(response)` - The result for this request
    /// * `None` - A newer request superseded this one before it was computed
    async fn compute(&self, request: ComputeRequest) -> Option<ComputeResponse>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}
