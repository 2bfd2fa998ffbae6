//! Synchronous density analysis: clustering, segmentation, interpolation.

use std::time::Instant;

use density_cluster::DensityClusterer;
use density_map::{DensityInterpolator, DensityMap, DensityPreferences};
use scan_types::{AbortSignal, DensityPoint};
use tracing::info;

use crate::error::PipelineResult;

/// Build a density map from scan density points.
///
/// Runs clustering, region segmentation and interpolation in order on the
/// calling thread. Every stage watches `abort`.
///
/// # Errors
///
/// - [`PipelineError::DensityMap`](crate::PipelineError::DensityMap) for
///   invalid preferences or interpolation failures
/// - [`PipelineError::Cluster`](crate::PipelineError::Cluster) for invalid
///   clustering parameters
/// - [`PipelineError::Segment`](crate::PipelineError::Segment) if a cluster
///   has no usable boundary
///
/// Cancellation surfaces as one of the above with
/// [`PipelineError::is_cancelled`](crate::PipelineError::is_cancelled) set.
///
/// # Example
///
/// ```
/// use density_map::{BackendChoice, DensityPreferences};
/// use scalp_pipeline::analyze_density;
/// use scan_types::{AbortSignal, DensityPoint};
///
/// let points: Vec<DensityPoint> = (0..20)
///     .map(|i| {
///         let t = f64::from(i) * 0.05;
///         DensityPoint::from_coords(t, t, 0.0, 0.5)
///     })
///     .collect();
/// let prefs = DensityPreferences::default()
///     .with_resolution(0.1)
///     .with_backend(BackendChoice::Sequential);
///
/// let map = analyze_density(&points, &prefs, &AbortSignal::new()).unwrap();
/// assert_eq!(map.grid_size(), 10);
/// ```
pub fn analyze_density(
    points: &[DensityPoint],
    prefs: &DensityPreferences,
    abort: &AbortSignal,
) -> PipelineResult<DensityMap> {
    let start = Instant::now();
    prefs.validate()?;

    let clusters = DensityClusterer::new(prefs.cluster_params())
        .with_abort(abort.clone())
        .cluster(points)?;
    let regions = prefs.segmenter().segment(&clusters)?;
    let map = DensityInterpolator::from_preferences(prefs)
        .with_abort(abort.clone())
        .interpolate(points, prefs.resolution, &regions)?;

    info!(
        points = points.len(),
        clusters = clusters.len(),
        regions = map.regions.len(),
        grid_size = map.grid_size(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "density analysis complete"
    );
    Ok(map)
}
